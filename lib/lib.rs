//! Provides a split-operator solver for the two-dimensional, time-dependent
//! Schrödinger equation of a single particle on a periodic square grid, with
//! unsharp position measurement and wavefunction collapse.
//!
//! Provides implementations for the following:
//! - Row-column 2D FFT over power-of-two grids
//! - Static potential landscapes (Gaussian well, barrier, harmonic, double
//!   well) with periodic-wrapped distances
//! - Strang-split real-time evolution and imaginary-time relaxation
//! - Gaussian-weighted position measurement with positive and negative
//!   collapse
//!
//! All state lives in an [`Engine`][engine::Engine]; there is no global
//! simulation. Execution is single-threaded and every operation runs to
//! completion before returning. To hand a simulation to another thread, take a
//! [`Snapshot`][engine::Snapshot] and rebuild from it on the other side.
//!
//! ```
//! use xyspace::{ config::SimConfig, engine::Engine, potential::Potential };
//! use xyspace::wavepacket::Wavepacket;
//!
//! let mut engine = Engine::new(SimConfig::default(), Potential::None).unwrap();
//! engine.initialize(&Wavepacket::default().momentum(5.0, 0.0)).unwrap();
//! engine.step_n(10);
//! assert!((engine.total_probability() - 1.0).abs() < 1e-9);
//! let m = engine.measure(3.2, 3.2, 0.5).unwrap();
//! assert!((0.0..=1.0).contains(&m.probability));
//! ```
//!
//! See [`docs`] for theoretical background.

pub mod config;
pub mod engine;
pub mod error;
pub mod fft;
pub mod grid;
pub mod measure;
pub mod observables;
pub mod potential;
pub mod utils;
pub mod wavepacket;

pub mod docs;

/// Squared norms at or below this are treated as zero when renormalizing.
pub(crate) const DEF_NORM_FLOOR: f64 = 1e-12;

pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
