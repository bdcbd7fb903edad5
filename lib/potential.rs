//! Static potential landscapes sampled on the simulation grid.
//!
//! A [`Potential`] is a tagged description of the landscape with its
//! parameters in physical units; [`PotentialField::build`] dispatches on the
//! variant once and samples it over the whole grid. All distances are
//! periodic-wrapped (see [`wrapped_dist_sqr`]), including those of the
//! harmonic potential, so that the field is continuous across the domain
//! boundary.

use std::{ fmt, str::FromStr };
use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::{
    config::SimConfig,
    error::{ IndexError, PotentialError },
    utils::wrapped_dist_sqr,
};

pub type PotResult<T> = Result<T, PotentialError>;

/// Bare tag identifying a family of potentials.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PotentialKind {
    None,
    GaussianWell,
    Barrier,
    Harmonic,
    DoubleWell,
}

impl PotentialKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::GaussianWell,
        Self::Barrier,
        Self::Harmonic,
        Self::DoubleWell,
    ];

    /// Canonical string tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::GaussianWell => "gaussianWell",
            Self::Barrier => "barrier",
            Self::Harmonic => "harmonic",
            Self::DoubleWell => "doubleWell",
        }
    }
}

impl fmt::Display for PotentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses canonical tags (`"gaussianWell"`) as well as their snake- and
/// kebab-case spellings, case-insensitively.
impl FromStr for PotentialKind {
    type Err = PotentialError;

    fn from_str(s: &str) -> PotResult<Self> {
        let key: String
            = s.trim().chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "none" => Ok(Self::None),
            "gaussianwell" => Ok(Self::GaussianWell),
            "barrier" => Ok(Self::Barrier),
            "harmonic" => Ok(Self::Harmonic),
            "doublewell" => Ok(Self::DoubleWell),
            _ => Err(PotentialError::UnknownPotentialType(s.to_string())),
        }
    }
}

/// A radially symmetric Gaussian bump.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bump {
    /// Physical center `(x, y)`.
    pub center: (f64, f64),
    /// Standard deviation σ of the bump.
    pub width: f64,
    /// Magnitude of the bump; its sign is fixed by the enclosing variant.
    pub strength: f64,
}

/// Quadratic confinement `A r²` about a center.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Harmonic {
    /// Physical center `(x, y)`.
    pub center: (f64, f64),
    /// Coefficient `A`.
    pub strength: f64,
}

/// Two identical Gaussian wells displaced by `±separation / 2` along `x` from
/// a common center.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoubleWell {
    /// Physical midpoint `(x, y)` between the wells.
    pub center: (f64, f64),
    /// Distance between the two well centers.
    pub separation: f64,
    /// Standard deviation σ of each well.
    pub width: f64,
    /// Depth of each well (magnitude).
    pub strength: f64,
}

/// A potential landscape and its parameters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Potential {
    /// `V = 0` everywhere.
    #[default]
    None,
    /// `V = -|A| exp(-r² / 2σ²)`.
    GaussianWell(Bump),
    /// `V = +|A| exp(-r² / 2σ²)`.
    Barrier(Bump),
    /// `V = A r²`.
    Harmonic(Harmonic),
    /// Sum of two [`GaussianWell`][Self::GaussianWell]s.
    DoubleWell(DoubleWell),
}

impl Potential {
    /// Get the tag of this potential.
    pub fn kind(&self) -> PotentialKind {
        match self {
            Self::None => PotentialKind::None,
            Self::GaussianWell(_) => PotentialKind::GaussianWell,
            Self::Barrier(_) => PotentialKind::Barrier,
            Self::Harmonic(_) => PotentialKind::Harmonic,
            Self::DoubleWell(_) => PotentialKind::DoubleWell,
        }
    }

    /// Construct a potential of the given kind centered in the domain, with
    /// parameters scaled to the domain size `L`:
    ///
    /// | kind         | width  | strength | separation |
    /// |--------------|--------|----------|------------|
    /// | gaussianWell | `L/10` | 20       |            |
    /// | barrier      | `L/32` | 50       |            |
    /// | harmonic     |        | 2        |            |
    /// | doubleWell   | `L/16` | 20       | `L/3`      |
    pub fn default_for(kind: PotentialKind, config: &SimConfig) -> Self {
        let l = config.domain_size();
        let center = (l / 2.0, l / 2.0);
        match kind {
            PotentialKind::None => Self::None,
            PotentialKind::GaussianWell
                => Self::GaussianWell(Bump { center, width: l / 10.0, strength: 20.0 }),
            PotentialKind::Barrier
                => Self::Barrier(Bump { center, width: l / 32.0, strength: 50.0 }),
            PotentialKind::Harmonic
                => Self::Harmonic(Harmonic { center, strength: 2.0 }),
            PotentialKind::DoubleWell
                => Self::DoubleWell(DoubleWell {
                    center,
                    separation: l / 3.0,
                    width: l / 16.0,
                    strength: 20.0,
                }),
        }
    }

    /// Parse a string tag and construct the [default][Self::default_for]
    /// potential of that kind.
    pub fn from_tag(tag: &str, config: &SimConfig) -> PotResult<Self> {
        tag.parse().map(|kind| Self::default_for(kind, config))
    }

    fn validate(&self) -> PotResult<()> {
        let check_center = |(x, y): (f64, f64)| -> PotResult<()> {
            PotentialError::check_finite(x)?;
            PotentialError::check_finite(y)
        };
        match self {
            Self::None => Ok(()),
            Self::GaussianWell(b) | Self::Barrier(b) => {
                check_center(b.center)?;
                PotentialError::check_width(b.width)?;
                PotentialError::check_finite(b.strength)
            },
            Self::Harmonic(h) => {
                check_center(h.center)?;
                PotentialError::check_finite(h.strength)
            },
            Self::DoubleWell(d) => {
                check_center(d.center)?;
                PotentialError::check_finite(d.separation)?;
                PotentialError::check_width(d.width)?;
                PotentialError::check_finite(d.strength)
            },
        }
    }
}

/// Real-valued potential sampled on the simulation grid, indexed as `[y, x]`.
#[derive(Clone, Debug, PartialEq)]
pub struct PotentialField {
    potential: Potential,
    values: nd::Array2<f64>,
}

// A exp(-r² / 2σ²) about `center`, periodic-wrapped
fn bump_field(config: &SimConfig, center: (f64, f64), width: f64, strength: f64)
    -> nd::Array2<f64>
{
    let n = config.grid_size;
    let l = config.domain_size();
    let inv_two_var = (2.0 * width * width).recip();
    nd::Array2::from_shape_fn((n, n), |(iy, ix)| {
        let r2 = wrapped_dist_sqr((config.coord(ix), config.coord(iy)), center, l);
        strength * (-r2 * inv_two_var).exp()
    })
}

impl PotentialField {
    /// Sample `potential` over the grid described by `config`.
    pub fn build(config: &SimConfig, potential: Potential) -> PotResult<Self> {
        potential.validate()?;
        let n = config.grid_size;
        let l = config.domain_size();
        let values: nd::Array2<f64>
            = match potential {
                Potential::None => nd::Array2::zeros((n, n)),
                Potential::GaussianWell(b)
                    => bump_field(config, b.center, b.width, -b.strength.abs()),
                Potential::Barrier(b)
                    => bump_field(config, b.center, b.width, b.strength.abs()),
                Potential::Harmonic(h) => {
                    nd::Array2::from_shape_fn((n, n), |(iy, ix)| {
                        let p = (config.coord(ix), config.coord(iy));
                        h.strength * wrapped_dist_sqr(p, h.center, l)
                    })
                },
                Potential::DoubleWell(d) => {
                    let (cx, cy) = d.center;
                    let half = d.separation / 2.0;
                    let depth = -d.strength.abs();
                    bump_field(config, (cx - half, cy), d.width, depth)
                        + bump_field(config, (cx + half, cy), d.width, depth)
                },
            };
        Ok(Self { potential, values })
    }

    /// A field of zeros.
    pub fn none(config: &SimConfig) -> Self {
        let n = config.grid_size;
        Self { potential: Potential::None, values: nd::Array2::zeros((n, n)) }
    }

    /// Get the descriptor this field was built from.
    pub fn potential(&self) -> &Potential { &self.potential }

    /// Get the tag of the descriptor this field was built from.
    pub fn kind(&self) -> PotentialKind { self.potential.kind() }

    /// Number of grid points along each axis.
    pub fn size(&self) -> usize { self.values.nrows() }

    /// Get `V(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Result<f64, IndexError> {
        IndexError::check(x, y, self.size())?;
        Ok(self.values[[y, x]])
    }

    /// Read-only view of all values, indexed as `[y, x]`.
    pub fn values(&self) -> nd::ArrayView2<'_, f64> { self.values.view() }

    /// Smallest value in the field.
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest value in the field.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}
