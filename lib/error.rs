//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! Every error here is a deterministic function of its inputs; nothing in the
//! crate retries internally.
//!
//! [anyhow]: https://crates.io/crates/anyhow

use thiserror::Error;
use crate::utils::is_power_of_two;

/// Returned when a grid coordinate falls outside of an `n`×`n` grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("grid index ({x}, {y}) out of range for a {n}x{n} grid")]
pub struct IndexError {
    pub x: usize,
    pub y: usize,
    pub n: usize,
}

impl IndexError {
    pub(crate) fn check(x: usize, y: usize, n: usize) -> Result<(), Self> {
        (x < n && y < n).then_some(()).ok_or(Self { x, y, n })
    }
}

/// Returned when a grid size is not a power of two of at least 2.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("grid size must be a power of two of at least 2; got {0}")]
pub struct GridSizeError(pub usize);

impl GridSizeError {
    pub(crate) fn check(n: usize) -> Result<(), Self> {
        (n >= 2 && is_power_of_two(n)).then_some(()).ok_or(Self(n))
    }
}

/// Returned when a buffer does not have the expected `n`×`n` shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("encountered buffers with incompatible shapes; expected {0}x{0}, got {1}x{2}")]
pub struct ShapeError(pub usize, pub usize, pub usize);

impl ShapeError {
    pub(crate) fn check(n: usize, shape: &[usize]) -> Result<(), Self> {
        match *shape {
            [r, c] if r == n && c == n => Ok(()),
            [r, c] => Err(Self(n, r, c)),
            _ => Err(Self(n, 0, 0)),
        }
    }
}

/// Returned when a wavefunction cannot be renormalized because its total
/// probability is (numerically) zero or not finite.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
#[error("cannot renormalize a wavefunction with total probability {0:e}")]
pub struct NormError(pub f64);

impl NormError {
    pub(crate) fn check(norm_sqr: f64) -> Result<(), Self> {
        (norm_sqr.is_finite() && norm_sqr > crate::DEF_NORM_FLOOR)
            .then_some(()).ok_or(Self(norm_sqr))
    }
}

/// Returned when a simulation configuration fails validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when the grid size is not a power of two.
    #[error("invalid grid size: {0}")]
    GridSize(#[from] GridSizeError),

    /// Returned when a non-positive (or non-finite) grid spacing is encountered.
    #[error("grid spacing dx must be greater than 0; got {0}")]
    BadSpacing(f64),

    /// Returned when a non-positive (or non-finite) time step is encountered.
    #[error("time step dt must be greater than 0; got {0}")]
    BadTimeStep(f64),

    /// Returned when a non-positive (or non-finite) ħ is encountered.
    #[error("hbar must be greater than 0; got {0}")]
    BadHbar(f64),

    /// Returned when a non-positive (or non-finite) mass is encountered.
    #[error("mass must be greater than 0; got {0}")]
    BadMass(f64),

    /// Returned when a non-positive (or non-finite) time scale is encountered.
    #[error("time scale must be greater than 0; got {0}")]
    BadTimeScale(f64),
}

impl ConfigError {
    fn positive(value: f64) -> bool { value.is_finite() && value > 0.0 }

    pub(crate) fn check_spacing(dx: f64) -> Result<(), Self> {
        Self::positive(dx).then_some(()).ok_or(Self::BadSpacing(dx))
    }

    pub(crate) fn check_time_step(dt: f64) -> Result<(), Self> {
        Self::positive(dt).then_some(()).ok_or(Self::BadTimeStep(dt))
    }

    pub(crate) fn check_hbar(hbar: f64) -> Result<(), Self> {
        Self::positive(hbar).then_some(()).ok_or(Self::BadHbar(hbar))
    }

    pub(crate) fn check_mass(mass: f64) -> Result<(), Self> {
        Self::positive(mass).then_some(()).ok_or(Self::BadMass(mass))
    }

    pub(crate) fn check_time_scale(time_scale: f64) -> Result<(), Self> {
        Self::positive(time_scale).then_some(())
            .ok_or(Self::BadTimeScale(time_scale))
    }
}

/// Returned from potential construction.
#[derive(Debug, Error)]
pub enum PotentialError {
    /// Returned when a potential tag does not name a known potential.
    #[error("unknown potential type '{0}'")]
    UnknownPotentialType(String),

    /// Returned when a non-positive (or non-finite) bump width is encountered.
    #[error("potential width must be greater than 0; got {0}")]
    BadWidth(f64),

    /// Returned when a non-finite strength, center, or separation is
    /// encountered.
    #[error("potential parameters must be finite; got {0}")]
    NonFinite(f64),
}

impl PotentialError {
    pub(crate) fn check_width(width: f64) -> Result<(), Self> {
        (width.is_finite() && width > 0.0).then_some(())
            .ok_or(Self::BadWidth(width))
    }

    pub(crate) fn check_finite(value: f64) -> Result<(), Self> {
        value.is_finite().then_some(()).ok_or(Self::NonFinite(value))
    }
}

/// Returned from [`Engine`][crate::engine::Engine] operations.
#[derive(Debug, Error)]
pub enum SimError {
    /// [`ConfigError`]
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// [`PotentialError`]
    #[error("potential error: {0}")]
    Potential(#[from] PotentialError),

    /// [`IndexError`]
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// [`ShapeError`]
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    /// Returned when a wavepacket width is non-positive or not finite.
    #[error("wavepacket width must be greater than 0; got {0}")]
    BadWavepacketWidth(f64),

    /// Returned when a wavepacket center or momentum is not finite.
    #[error("wavepacket parameters must be finite; got {0}")]
    BadWavepacketParam(f64),

    /// Returned when the freshly sampled wavepacket has (numerically) zero
    /// total probability.
    #[error("degenerate wavepacket: {0}")]
    DegenerateWavepacket(NormError),

    /// Returned when a measurement radius is non-positive or not finite.
    #[error("measurement radius must be greater than 0; got {0}")]
    BadMeasureRadius(f64),

    /// Returned when a measurement coordinate is not finite.
    #[error("measurement coordinates must be finite; got ({0}, {1})")]
    BadMeasurePoint(f64, f64),

    /// Returned when the post-collapse wavefunction has (numerically) zero
    /// total probability.
    #[error("degenerate collapse: {0}")]
    CollapseDegenerate(NormError),

    /// Returned when a snapshot's clock is negative or not finite.
    #[error("snapshot time must be finite and non-negative; got {0}")]
    BadSnapshotTime(f64),

    /// Returned when a snapshot's sampled potential disagrees with its
    /// descriptor.
    #[error("snapshot potential value at ({x}, {y}) does not match its descriptor: expected {expected}, got {got}")]
    SnapshotPotentialMismatch { x: usize, y: usize, expected: f64, got: f64 },
}

impl SimError {
    pub(crate) fn check_packet_width(width: f64) -> Result<(), Self> {
        (width.is_finite() && width > 0.0).then_some(())
            .ok_or(Self::BadWavepacketWidth(width))
    }

    pub(crate) fn check_packet_param(value: f64) -> Result<(), Self> {
        value.is_finite().then_some(())
            .ok_or(Self::BadWavepacketParam(value))
    }

    pub(crate) fn check_radius(radius: f64) -> Result<(), Self> {
        (radius.is_finite() && radius > 0.0).then_some(())
            .ok_or(Self::BadMeasureRadius(radius))
    }

    pub(crate) fn check_point(x: f64, y: f64) -> Result<(), Self> {
        (x.is_finite() && y.is_finite()).then_some(())
            .ok_or(Self::BadMeasurePoint(x, y))
    }

    pub(crate) fn check_snapshot_time(time: f64) -> Result<(), Self> {
        (time.is_finite() && time >= 0.0).then_some(())
            .ok_or(Self::BadSnapshotTime(time))
    }
}
