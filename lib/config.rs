//! Simulation configuration.
//!
//! A [`SimConfig`] is fixed for the lifetime of an
//! [`Engine`][crate::engine::Engine]: both propagators are precomputed from it,
//! so changing any value means constructing a new engine.

use serde::{ Deserialize, Serialize };
use crate::error::{ ConfigError, GridSizeError };

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Boundary conditions for the simulation domain.
///
/// Only periodic boundaries are supported; the split-operator scheme gets them
/// for free from the discrete Fourier transform.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    #[default]
    Periodic,
}

/// Numerical and physical parameters of a simulation.
///
/// The physical side length of the (square) domain is always derived as
/// `grid_size * dx` via [`Self::domain_size`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of grid points along each axis; must be a power of two of at
    /// least 2.
    pub grid_size: usize,
    /// Grid spacing.
    pub dx: f64,
    /// Time step.
    pub dt: f64,
    /// Reduced Planck constant.
    pub hbar: f64,
    /// Particle mass.
    pub mass: f64,
    /// Multiplier applied to `dt` in every propagator and in the clock.
    pub time_scale: f64,
    /// Boundary conditions.
    pub boundary: Boundary,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 64,
            dx: 0.1,
            dt: 0.001,
            hbar: 1.0,
            mass: 1.0,
            time_scale: 1.0,
            boundary: Boundary::Periodic,
        }
    }
}

impl SimConfig {
    /// Check all parameters, returning the first violation found.
    pub fn validate(&self) -> ConfigResult<()> {
        GridSizeError::check(self.grid_size)?;
        ConfigError::check_spacing(self.dx)?;
        ConfigError::check_time_step(self.dt)?;
        ConfigError::check_hbar(self.hbar)?;
        ConfigError::check_mass(self.mass)?;
        ConfigError::check_time_scale(self.time_scale)?;
        Ok(())
    }

    /// Physical side length of the domain.
    pub fn domain_size(&self) -> f64 { self.grid_size as f64 * self.dx }

    /// Physical time advanced by a single step.
    pub fn effective_dt(&self) -> f64 { self.dt * self.time_scale }

    /// Physical coordinate of grid index `i` along either axis.
    pub fn coord(&self, i: usize) -> f64 { crate::utils::grid_to_physical(i, self.dx) }
}
