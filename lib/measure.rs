//! Approximate (unsharp) position measurement.
//!
//! A detector centered at `(x₀, y₀)` with resolution `σ_m` is described by the
//! weight field
//! ```text
//! w(x, y) = exp(-r² / 2σ_m²),   r periodic-wrapped distance to (x₀, y₀)
//! ```
//! The detector clicks with probability `p = Σ w |ψ|²` (clamped to `[0, 1]`).
//! On a click the state is multiplied by `w`; otherwise by `1 - w`. Both
//! updates are followed by renormalization. Neither is unitary.

use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::{ config::SimConfig, grid::ComplexGrid, utils::wrapped_dist_sqr };

/// Outcome of a single measurement.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Whether the particle was found in the measured region.
    pub found: bool,
    /// Probability of finding the particle there, evaluated before collapse.
    pub probability: f64,
}

/// Detector weights for a measurement at physical `(x, y)` with resolution
/// `radius`, indexed as `[y, x]`.
pub fn detector_weights(config: &SimConfig, x: f64, y: f64, radius: f64)
    -> nd::Array2<f64>
{
    let n = config.grid_size;
    let l = config.domain_size();
    let inv_two_var = (2.0 * radius * radius).recip();
    nd::Array2::from_shape_fn((n, n), |(iy, ix)| {
        let r2 = wrapped_dist_sqr((config.coord(ix), config.coord(iy)), (x, y), l);
        (-r2 * inv_two_var).exp()
    })
}

/// `clamp(Σ w |ψ|², 0, 1)`.
///
/// *Panics if `weights` and `psi` have different shapes*.
pub fn detection_probability(weights: &nd::Array2<f64>, psi: &ComplexGrid) -> f64 {
    nd::Zip::from(weights).and(psi.array())
        .fold(0.0, |acc, w, q| acc + *w * q.norm_sqr())
        .clamp(0.0, 1.0)
}

/// Write the unnormalized post-measurement state for outcome `found` into
/// `out`: `ψ w` if found, `ψ (1 - w)` otherwise.
///
/// *Panics if the shapes of `weights`, `psi`, and `out` differ*.
pub fn collapse_into(
    weights: &nd::Array2<f64>,
    psi: &ComplexGrid,
    found: bool,
    out: &mut ComplexGrid,
) {
    let zip = nd::Zip::from(out.array_mut()).and(psi.array()).and(weights);
    if found {
        zip.for_each(|o, q, w| { *o = *q * *w; });
    } else {
        zip.for_each(|o, q, w| { *o = *q * (1.0 - *w); });
    }
}
