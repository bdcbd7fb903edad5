//! Split-operator time evolution of the 2D time-dependent Schrödinger equation
//! with periodic boundaries, plus unsharp position measurement.
//!
//! [`Engine`] owns all simulation state. Callers drive it with
//! [`step`][Engine::step] (typically some fixed number of times per rendered
//! frame), reseed it with [`initialize`][Engine::initialize] and probe it with
//! [`measure`][Engine::measure]; everything else is read-only access for
//! rendering and diagnostics.
//!
//! See [`docs`][crate::docs#time-evolution] for background.

use ndarray as nd;
use num_complex::Complex64 as C64;
use rand::{ Rng, SeedableRng };
use rand_chacha::ChaCha8Rng;
use serde::{ Deserialize, Serialize };
use tracing::{ debug, trace, warn };
use crate::{
    config::SimConfig,
    error::{ ConfigError, PotentialError, ShapeError, SimError },
    fft::Fft2,
    grid::ComplexGrid,
    measure::{ Measurement, collapse_into, detection_probability, detector_weights },
    potential::{ Potential, PotentialField },
    utils::{ fft_shift2, wavenumbers },
    wavepacket::Wavepacket,
};

pub type SimResult<T> = Result<T, SimError>;

const SNAPSHOT_POTENTIAL_TOL: f64 = 1e-9;

// exp(-i ħ (kx² + ky²) dt / 2m), indexed [ky, kx]
fn kinetic_propagator(config: &SimConfig) -> nd::Array2<C64> {
    let n = config.grid_size;
    let k = wavenumbers(n, config.dx);
    let c = config.hbar * config.effective_dt() / (2.0 * config.mass);
    nd::Array2::from_shape_fn((n, n), |(iy, ix)| {
        C64::cis(-c * (k[ix].powi(2) + k[iy].powi(2)))
    })
}

// exp(-i V dt / 2ħ), indexed [y, x]
fn half_potential_propagator(config: &SimConfig, field: &PotentialField)
    -> nd::Array2<C64>
{
    let c = config.effective_dt() / (2.0 * config.hbar);
    field.values().mapv(|v| C64::cis(-v * c))
}

fn apply_split_potential(prop: &nd::Array2<C64>, q: &mut ComplexGrid) {
    q.mul_pointwise(prop);
}

fn apply_split_kinetic(fft: &mut Fft2, prop: &nd::Array2<C64>, q: &mut ComplexGrid) {
    fft.forward_unchecked(q);
    q.mul_pointwise(prop);
    fft.inverse_unchecked(q);
}

// stored values must match a fresh sampling of their descriptor up to
// serialization round-off
fn check_potential_values(field: &PotentialField, stored: &nd::Array2<f64>)
    -> SimResult<()>
{
    for ((y, x), got) in stored.indexed_iter() {
        PotentialError::check_finite(*got)?;
        let expected = field.values()[[y, x]];
        if (got - expected).abs() > SNAPSHOT_POTENTIAL_TOL * (1.0 + expected.abs()) {
            return Err(SimError::SnapshotPotentialMismatch {
                x, y, expected, got: *got,
            });
        }
    }
    Ok(())
}

/// Expectation values of the kinetic and potential energy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Energy {
    pub kinetic: f64,
    pub potential: f64,
}

impl Energy {
    /// `⟨T⟩ + ⟨V⟩`.
    pub fn total(&self) -> f64 { self.kinetic + self.potential }
}

/// Self-contained copy of an engine's state, suitable for handing to another
/// thread or process and rebuilding there with [`Engine::from_snapshot`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub config: SimConfig,
    pub potential: Potential,
    /// Wavefunction, indexed as `[y, x]`.
    pub psi: nd::Array2<C64>,
    /// Sampled potential, indexed as `[y, x]`.
    pub potential_values: nd::Array2<f64>,
    pub time: f64,
}

/// Split-operator Schrödinger solver for a single particle on a periodic
/// square grid.
///
/// Invariant: outside of a call, `Σ |ψ|² = 1` up to floating-point error.
/// Operations that could break this ([`initialize`][Self::initialize],
/// [`measure`][Self::measure], ...) compute into scratch space and leave the
/// state untouched when they fail.
#[derive(Clone, Debug)]
pub struct Engine {
    config: SimConfig,
    fft: Fft2,
    potential: PotentialField,
    psi: ComplexGrid,
    scratch: ComplexGrid,
    kinetic: nd::Array2<C64>,
    half_potential: nd::Array2<C64>,
    time: f64,
    last_measurement: Option<Measurement>,
    rng: ChaCha8Rng,
}

impl Engine {
    /// Validate `config`, sample `potential`, and precompute both
    /// propagators.
    ///
    /// The wavefunction starts out as the default [`Wavepacket`].
    pub fn new(config: SimConfig, potential: Potential) -> SimResult<Self> {
        config.validate()?;
        let field = PotentialField::build(&config, potential)?;
        let psi = ComplexGrid::zeros(config.grid_size);
        let mut engine = Self::assemble(config, field, psi, 0.0)?;
        engine.initialize(&Wavepacket::default())?;
        debug!(
            grid_size = config.grid_size,
            dx = config.dx,
            dt = config.dt,
            potential = %engine.potential.kind(),
            "constructed engine",
        );
        Ok(engine)
    }

    /// Rebuild an engine from a [`Snapshot`].
    ///
    /// Everything is validated before anything is built: the configuration,
    /// both buffer shapes, the clock, and the potential descriptor, which is
    /// resampled and must agree with the stored values. The stored
    /// wavefunction is renormalized.
    pub fn from_snapshot(snapshot: Snapshot) -> SimResult<Self> {
        let Snapshot { config, potential, psi, potential_values, time } = snapshot;
        config.validate()?;
        let n = config.grid_size;
        ShapeError::check(n, psi.shape())?;
        ShapeError::check(n, potential_values.shape())?;
        SimError::check_snapshot_time(time)?;
        let field = PotentialField::build(&config, potential)?;
        check_potential_values(&field, &potential_values)?;
        let mut psi = ComplexGrid::from_array(psi)?;
        psi.renormalize().map_err(SimError::DegenerateWavepacket)?;
        let engine = Self::assemble(config, field, psi, time)?;
        debug!(time, potential = %engine.potential.kind(), "restored engine from snapshot");
        Ok(engine)
    }

    fn assemble(
        config: SimConfig,
        potential: PotentialField,
        psi: ComplexGrid,
        time: f64,
    ) -> SimResult<Self> {
        let n = config.grid_size;
        let fft = Fft2::new(n).map_err(ConfigError::from)?;
        let kinetic = kinetic_propagator(&config);
        let half_potential = half_potential_propagator(&config, &potential);
        Ok(Self {
            config,
            fft,
            potential,
            psi,
            scratch: ComplexGrid::zeros(n),
            kinetic,
            half_potential,
            time,
            last_measurement: None,
            rng: ChaCha8Rng::seed_from_u64(rand::random()),
        })
    }

    /// Use a deterministic measurement RNG seeded with `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    /// Reseed the measurement RNG.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Get the configuration.
    pub fn config(&self) -> &SimConfig { &self.config }

    /// Elapsed simulation time since the last (re)initialization.
    pub fn time(&self) -> f64 { self.time }

    /// `Σ |ψ|²`; should stay at 1 up to floating-point error.
    pub fn total_probability(&self) -> f64 { self.psi.norm_sqr_sum() }

    /// Number of grid points along each axis.
    pub fn grid_size(&self) -> usize { self.config.grid_size }

    /// Grid spacing.
    pub fn dx(&self) -> f64 { self.config.dx }

    /// Physical side length of the domain.
    pub fn domain_size(&self) -> f64 { self.config.domain_size() }

    /// Get the wavefunction.
    pub fn psi(&self) -> &ComplexGrid { &self.psi }

    /// Get the potential field.
    pub fn potential(&self) -> &PotentialField { &self.potential }

    /// Outcome of the most recent successful measurement since the last
    /// (re)initialization, if any.
    pub fn last_measurement(&self) -> Option<Measurement> { self.last_measurement }

    /// Replace the potential, rebuilding the position-space propagator.
    ///
    /// The wavefunction and clock are kept.
    pub fn set_potential(&mut self, potential: Potential) -> SimResult<()> {
        let field = PotentialField::build(&self.config, potential)?;
        self.half_potential = half_potential_propagator(&self.config, &field);
        self.potential = field;
        debug!(potential = %self.potential.kind(), "rebuilt potential propagator");
        Ok(())
    }

    /// Reset the wavefunction to a normalized Gaussian wavepacket and the
    /// clock to zero.
    ///
    /// Fails with [`SimError::DegenerateWavepacket`] if the sampled packet has
    /// numerically zero weight on the grid (e.g. a width far below `dx` and a
    /// center between grid points), in which case nothing is changed.
    pub fn initialize(&mut self, packet: &Wavepacket) -> SimResult<()> {
        let resolved = packet.resolve(&self.config)?;
        let mut psi = resolved.sample(&self.config);
        psi.renormalize()
            .map_err(|err| {
                warn!(norm_sqr = err.0, "rejected degenerate wavepacket");
                SimError::DegenerateWavepacket(err)
            })?;
        self.psi = psi;
        self.time = 0.0;
        self.last_measurement = None;
        debug!(
            center = ?resolved.center,
            width = resolved.width,
            momentum = ?resolved.momentum,
            "initialized wavepacket",
        );
        Ok(())
    }

    /// Replace the wavefunction with a normalized copy of `psi` and reset the
    /// clock to zero.
    pub fn load_wavefunction(&mut self, psi: &ComplexGrid) -> SimResult<()> {
        ShapeError::check(self.config.grid_size, psi.view().shape())?;
        let mut psi = psi.clone();
        psi.renormalize().map_err(SimError::DegenerateWavepacket)?;
        self.psi = psi;
        self.time = 0.0;
        self.last_measurement = None;
        Ok(())
    }

    /// Rescale ψ so that `Σ |ψ|² = 1`, returning the prior value of the sum.
    ///
    /// Fails with [`SimError::CollapseDegenerate`] if the sum is numerically
    /// zero, leaving ψ untouched.
    pub fn renormalize(&mut self) -> SimResult<f64> {
        self.psi.renormalize().map_err(SimError::CollapseDegenerate)
    }

    /// Advance by one Strang-split step of `dt * time_scale`:
    /// ```text
    /// ψ ← P · IFFT[ K · FFT[ P · ψ ] ]
    /// ```
    /// with `P` the half-step potential propagator and `K` the full-step
    /// kinetic propagator. Both are pure phases, so the step is unitary.
    pub fn step(&mut self) {
        apply_split_potential(&self.half_potential, &mut self.psi);
        apply_split_kinetic(&mut self.fft, &self.kinetic, &mut self.psi);
        apply_split_potential(&self.half_potential, &mut self.psi);
        self.time += self.config.effective_dt();
    }

    /// Call [`step`][Self::step] `n` times.
    pub fn step_n(&mut self, n: usize) {
        (0..n).for_each(|_| { self.step(); });
    }

    /// Propagate `n` steps of size `dtau` in imaginary time, renormalizing
    /// after every step.
    ///
    /// This damps excited components relative to the ground state of the
    /// current potential, so repeated calls converge ψ toward it. The clock is
    /// not advanced. If any step produces a degenerate state, ψ is left as it
    /// was before the call.
    pub fn relax(&mut self, n: usize, dtau: f64) -> SimResult<()> {
        ConfigError::check_time_step(dtau)?;
        let config = &self.config;
        let k = wavenumbers(config.grid_size, config.dx);
        let ck = config.hbar * dtau / (2.0 * config.mass);
        let kinetic: nd::Array2<f64>
            = nd::Array2::from_shape_fn((config.grid_size, config.grid_size), |(iy, ix)| {
                (-ck * (k[ix].powi(2) + k[iy].powi(2))).exp()
            });
        let cv = dtau / (2.0 * config.hbar);
        let half_potential: nd::Array2<f64>
            = self.potential.values().mapv(|v| (-v * cv).exp());

        self.scratch.array_mut().assign(self.psi.array());
        for _ in 0..n {
            self.scratch.mul_pointwise(&half_potential);
            self.fft.forward_unchecked(&mut self.scratch);
            self.scratch.mul_pointwise(&kinetic);
            self.fft.inverse_unchecked(&mut self.scratch);
            self.scratch.mul_pointwise(&half_potential);
            self.scratch.renormalize().map_err(SimError::DegenerateWavepacket)?;
        }
        std::mem::swap(&mut self.psi, &mut self.scratch);
        debug!(steps = n, dtau, "relaxed in imaginary time");
        Ok(())
    }

    /// Probability of finding the particle with a detector at physical
    /// `(x, y)` of resolution `radius`, without disturbing the state.
    pub fn measurement_probability(&self, x: f64, y: f64, radius: f64)
        -> SimResult<f64>
    {
        self.detector(x, y, radius).map(|(_, probability)| probability)
    }

    /// Perform a measurement at physical `(x, y)` with resolution `radius`,
    /// drawing the outcome from the engine's own RNG.
    ///
    /// The state is collapsed according to the outcome and renormalized; the
    /// clock is not advanced. See [`measure`][crate::measure] for the model.
    pub fn measure(&mut self, x: f64, y: f64, radius: f64) -> SimResult<Measurement> {
        let (weights, probability) = self.detector(x, y, radius)?;
        let u: f64 = self.rng.gen();
        self.commit_measurement(&weights, probability, u < probability)
    }

    /// Like [`measure`][Self::measure], but drawing from `rng`.
    pub fn measure_with<R>(&mut self, x: f64, y: f64, radius: f64, rng: &mut R)
        -> SimResult<Measurement>
    where R: Rng + ?Sized
    {
        let (weights, probability) = self.detector(x, y, radius)?;
        let u: f64 = rng.gen();
        self.commit_measurement(&weights, probability, u < probability)
    }

    /// Like [`measure`][Self::measure], but with the uniform deviate `u` in
    /// `[0, 1)` supplied directly: the particle is found iff `u < p`.
    pub fn measure_with_draw(&mut self, x: f64, y: f64, radius: f64, u: f64)
        -> SimResult<Measurement>
    {
        let (weights, probability) = self.detector(x, y, radius)?;
        self.commit_measurement(&weights, probability, u < probability)
    }

    /// Collapse onto a chosen outcome without drawing, returning the
    /// probability that outcome `found = true` would have had.
    pub fn collapse(&mut self, x: f64, y: f64, radius: f64, found: bool)
        -> SimResult<Measurement>
    {
        let (weights, probability) = self.detector(x, y, radius)?;
        self.commit_measurement(&weights, probability, found)
    }

    // validated detector weights and the detection probability of the current
    // state
    fn detector(&self, x: f64, y: f64, radius: f64)
        -> SimResult<(nd::Array2<f64>, f64)>
    {
        SimError::check_point(x, y)?;
        SimError::check_radius(radius)?;
        let weights = detector_weights(&self.config, x, y, radius);
        let probability = detection_probability(&weights, &self.psi);
        Ok((weights, probability))
    }

    // collapse into scratch and renormalize there; commit only on success
    fn commit_measurement(
        &mut self,
        weights: &nd::Array2<f64>,
        probability: f64,
        found: bool,
    ) -> SimResult<Measurement>
    {
        collapse_into(weights, &self.psi, found, &mut self.scratch);
        self.scratch.renormalize()
            .map_err(|err| {
                warn!(found, norm_sqr = err.0, "rejected degenerate collapse");
                SimError::CollapseDegenerate(err)
            })?;
        std::mem::swap(&mut self.psi, &mut self.scratch);
        let measurement = Measurement { found, probability };
        self.last_measurement = Some(measurement);
        trace!(found, probability, "measured");
        Ok(measurement)
    }

    // unnormalized momentum-space amplitudes in the scratch grid
    fn transform_into_scratch(&mut self) {
        self.scratch.array_mut().assign(self.psi.array());
        self.fft.forward_unchecked(&mut self.scratch);
    }

    /// Expectation values of the kinetic and potential energy of the current
    /// state.
    pub fn energy(&mut self) -> Energy {
        let n = self.config.grid_size;
        let norm = self.psi.norm_sqr_sum();
        let potential: f64
            = nd::Zip::from(self.psi.array()).and(self.potential.values())
            .fold(0.0, |acc, q, v| acc + *v * q.norm_sqr())
            / norm;
        self.transform_into_scratch();
        let k = wavenumbers(n, self.config.dx);
        let c = self.config.hbar.powi(2) / (2.0 * self.config.mass);
        // Parseval for an unnormalized forward transform: Σ |ψ|² = Σ |ψ̂|² / n²
        let kinetic: f64
            = nd::Zip::indexed(self.scratch.array())
            .fold(0.0, |acc, (iy, ix), q| {
                acc + c * (k[ix].powi(2) + k[iy].powi(2)) * q.norm_sqr()
            })
            / (n * n) as f64
            / norm;
        Energy { kinetic, potential }
    }

    /// `⟨p⟩ = (⟨px⟩, ⟨py⟩)` of the current state.
    pub fn mean_momentum(&mut self) -> (f64, f64) {
        let n = self.config.grid_size;
        self.transform_into_scratch();
        let k = wavenumbers(n, self.config.dx);
        let hbar = self.config.hbar;
        let (sx, sy, total)
            = nd::Zip::indexed(self.scratch.array())
            .fold((0.0, 0.0, 0.0), |(sx, sy, total), (iy, ix), q| {
                let p = q.norm_sqr();
                (sx + k[ix] * p, sy + k[iy] * p, total + p)
            });
        (hbar * sx / total, hbar * sy / total)
    }

    /// Momentum-space probability density `|ψ̂|²`, normalized to unit sum and
    /// shifted so that zero momentum sits at the center (`[n/2, n/2]`).
    pub fn momentum_density(&mut self) -> nd::Array2<f64> {
        self.transform_into_scratch();
        let mut density = self.scratch.probability_density();
        let total: f64 = density.sum();
        density.map_inplace(|p| { *p /= total; });
        fft_shift2(&density)
    }

    /// Copy out the full state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            config: self.config,
            potential: *self.potential.potential(),
            psi: self.psi.array().clone(),
            potential_values: self.potential.values().to_owned(),
            time: self.time,
        }
    }
}
