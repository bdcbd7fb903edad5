//! Miscellaneous tools.
//!
//! Coordinate conversion lives here rather than on
//! [`Engine`][crate::engine::Engine]: every public engine parameter is given in
//! physical units, and converting to grid indices is left to callers.

use std::f64::consts::TAU;
use ndarray as nd;

/// Return `true` if `n` is a non-zero power of two.
pub fn is_power_of_two(n: usize) -> bool { n != 0 && n & (n - 1) == 0 }

/// Convert a physical coordinate to a (fractional) grid coordinate.
pub fn physical_to_grid(x: f64, dx: f64) -> f64 { x / dx }

/// Convert a grid index to its physical coordinate.
pub fn grid_to_physical(i: usize, dx: f64) -> f64 { i as f64 * dx }

/// Shortest separation between two coordinates on a periodic axis of length
/// `domain`, i.e. `min(|Δ|, domain - |Δ|)` with `Δ` first reduced modulo
/// `domain`.
///
/// The result always lies in `[0, domain / 2]`.
pub fn wrapped_delta(a: f64, b: f64, domain: f64) -> f64 {
    let d = (a - b).abs().rem_euclid(domain);
    d.min(domain - d)
}

/// Squared periodic distance between two points in a square periodic domain.
pub fn wrapped_dist_sqr(p: (f64, f64), q: (f64, f64), domain: f64) -> f64 {
    let dx = wrapped_delta(p.0, q.0, domain);
    let dy = wrapped_delta(p.1, q.1, domain);
    dx * dx + dy * dy
}

/// Signed frequency index for position `i` in an unshifted FFT of `n` points:
/// `i` for `i < n / 2`, `i - n` otherwise.
pub fn freq_index(i: usize, n: usize) -> i64 {
    if i < n / 2 { i as i64 } else { i as i64 - n as i64 }
}

/// Generate the array of angular wavenumbers accompanying an unshifted FFT of
/// `n` points at spacing `dx`: `k[i] = 2π freq_index(i) / (n dx)`.
///
/// For `n = 4`, `dx = 1` this is `[0, π/2, -π, -π/2]`.
pub fn wavenumbers(n: usize, dx: f64) -> nd::Array1<f64> {
    let dk = TAU * (n as f64 * dx).recip();
    (0..n).map(|i| freq_index(i, n) as f64 * dk).collect()
}

/// Return a copy of a square array with both axes rotated so that the zero
/// frequency component sits at the center, for display of momentum-space data.
pub fn fft_shift2<A>(x: &nd::Array2<A>) -> nd::Array2<A>
where A: Clone
{
    let (nr, nc) = x.dim();
    let (hr, hc) = (nr / 2, nc / 2);
    nd::Array2::from_shape_fn((nr, nc), |(r, c)| {
        x[[(r + nr - hr) % nr, (c + nc - hc) % nc]].clone()
    })
}
