//! Position-space expectation values of a wavefunction.
//!
//! All functions weight by `|ψ|²` and divide by `Σ |ψ|²`, so they accept
//! unnormalized grids. Coordinates are physical, `x = ix dx`.

use std::f64::consts::TAU;
use ndarray as nd;
use crate::grid::ComplexGrid;

// Σ f(x, y) |ψ|² / Σ |ψ|² for a pair of functions at once
fn weighted_pair<F>(psi: &ComplexGrid, dx: f64, mut f: F) -> (f64, f64)
where F: FnMut(f64, f64) -> (f64, f64)
{
    let (sa, sb, total)
        = nd::Zip::indexed(psi.array())
        .fold((0.0, 0.0, 0.0), |(sa, sb, total), (iy, ix), q| {
            let p = q.norm_sqr();
            let (a, b) = f(ix as f64 * dx, iy as f64 * dx);
            (sa + a * p, sb + b * p, total + p)
        });
    (sa / total, sb / total)
}

/// `(⟨x⟩, ⟨y⟩)` in unwrapped grid coordinates on `[0, n dx)`.
pub fn mean_position(psi: &ComplexGrid, dx: f64) -> (f64, f64) {
    weighted_pair(psi, dx, |x, y| (x, y))
}

/// `(Var x, Var y)` in unwrapped grid coordinates.
///
/// For a packet well inside the domain this is its spatial spread; once a
/// packet straddles the boundary, use [`periodic_mean_position`] to locate it
/// instead.
pub fn position_variance(psi: &ComplexGrid, dx: f64) -> (f64, f64) {
    let (mx, my) = mean_position(psi, dx);
    weighted_pair(psi, dx, |x, y| ((x - mx).powi(2), (y - my).powi(2)))
}

/// Circular mean position on the periodic domain, in `[0, n dx)`.
///
/// Each axis is mapped onto the unit circle, `θ = 2π x / L`, and the mean
/// angle of the `|ψ|²`-weighted distribution is mapped back.
pub fn periodic_mean_position(psi: &ComplexGrid, dx: f64) -> (f64, f64) {
    let l = psi.size() as f64 * dx;
    let (cx, cy) = weighted_pair(psi, dx, |x, y| {
        ((TAU * x / l).cos(), (TAU * y / l).cos())
    });
    let (sx, sy) = weighted_pair(psi, dx, |x, y| {
        ((TAU * x / l).sin(), (TAU * y / l).sin())
    });
    let to_coord = |s: f64, c: f64| (s.atan2(c) / TAU * l).rem_euclid(l);
    (to_coord(sx, cx), to_coord(sy, cy))
}

/// Fraction of the total probability found at physical coordinates satisfying
/// `pred(x, y)`.
pub fn probability_where<F>(psi: &ComplexGrid, dx: f64, mut pred: F) -> f64
where F: FnMut(f64, f64) -> bool
{
    let (inside, _) = weighted_pair(psi, dx, |x, y| {
        (if pred(x, y) { 1.0 } else { 0.0 }, 0.0)
    });
    inside
}
