//! Two-dimensional complex FFT over a [`ComplexGrid`], built from planned
//! one-dimensional transforms by row-column decomposition.
//!
//! Transforms act **in place**. The forward transform is unnormalized and the
//! inverse divides by `n²`, so that `inverse(forward(ψ)) = ψ`:
//! ```text
//! ψ̂[ky, kx] = Σ ψ[y, x] exp(-2πi (kx x + ky y) / n)
//! ψ[y, x]   = (1 / n²) Σ ψ̂[ky, kx] exp(+2πi (kx x + ky y) / n)
//! ```
//! The kinetic propagator is a pure phase, so it commutes with this
//! normalization and the split-operator step never rescales ψ.
//!
//! Output is in unshifted order; index `i` along either axis corresponds to
//! the wavenumber [`wavenumbers`][crate::utils::wavenumbers]`(n, dx)[i]`.

use std::{ fmt, sync::Arc };
use ndarray as nd;
use num_complex::Complex64 as C64;
use rustfft::{ Fft, FftPlanner };
use crate::{ error::{ GridSizeError, ShapeError }, grid::ComplexGrid };

/// Planned 2D FFT for `n`×`n` grids, `n` a power of two.
#[derive(Clone)]
pub struct Fft2 {
    n: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    scratch: Vec<C64>,
    transposed: nd::Array2<C64>,
}

impl fmt::Debug for Fft2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fft2").field("n", &self.n).finish()
    }
}

impl Fft2 {
    /// Plan forward and inverse transforms for `n`×`n` grids.
    pub fn new(n: usize) -> Result<Self, GridSizeError> {
        GridSizeError::check(n)?;
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(n);
        let inverse = planner.plan_fft_inverse(n);
        let scratch_len
            = forward.get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        Ok(Self {
            n,
            forward,
            inverse,
            scratch: vec![C64::default(); scratch_len],
            transposed: nd::Array2::zeros((n, n)),
        })
    }

    /// Number of points along each axis.
    pub fn size(&self) -> usize { self.n }

    /// Forward transform, in place.
    ///
    /// Fails if `grid` is not `n`×`n`, leaving it untouched.
    pub fn forward(&mut self, grid: &mut ComplexGrid) -> Result<(), ShapeError> {
        ShapeError::check(self.n, grid.view().shape())?;
        self.forward_unchecked(grid);
        Ok(())
    }

    /// Inverse transform, in place, including the `1/n²` normalization.
    ///
    /// Fails if `grid` is not `n`×`n`, leaving it untouched.
    pub fn inverse(&mut self, grid: &mut ComplexGrid) -> Result<(), ShapeError> {
        ShapeError::check(self.n, grid.view().shape())?;
        self.inverse_unchecked(grid);
        Ok(())
    }

    /// *Panics if `grid` is not `n`×`n`*.
    pub(crate) fn forward_unchecked(&mut self, grid: &mut ComplexGrid) {
        let plan = Arc::clone(&self.forward);
        self.transform(plan.as_ref(), grid.array_mut());
    }

    /// *Panics if `grid` is not `n`×`n`*.
    pub(crate) fn inverse_unchecked(&mut self, grid: &mut ComplexGrid) {
        let plan = Arc::clone(&self.inverse);
        let data = grid.array_mut();
        self.transform(plan.as_ref(), data);
        let norm = (self.n * self.n) as f64;
        data.map_inplace(|q| { *q /= norm; });
    }

    // rows first, then columns by way of a transposed copy so that every 1D
    // transform runs over contiguous memory
    fn transform(&mut self, plan: &dyn Fft<f64>, data: &mut nd::Array2<C64>) {
        assert_eq!(data.dim(), (self.n, self.n), "Fft2: grid size mismatch");
        process_rows(plan, data, &mut self.scratch);
        self.transposed.assign(&data.t());
        process_rows(plan, &mut self.transposed, &mut self.scratch);
        data.assign(&self.transposed.t());
    }
}

// run `plan` over every row of `a`
fn process_rows(plan: &dyn Fft<f64>, a: &mut nd::Array2<C64>, scratch: &mut [C64]) {
    match a.as_slice_mut() {
        Some(buf) => plan.process_with_scratch(buf, scratch),
        None => {
            let mut row_buf: Vec<C64> = vec![C64::default(); a.ncols()];
            for mut row in a.rows_mut() {
                row_buf.iter_mut().zip(row.iter())
                    .for_each(|(b, r)| { *b = *r; });
                plan.process_with_scratch(&mut row_buf, scratch);
                row.iter_mut().zip(&row_buf)
                    .for_each(|(r, b)| { *r = *b; });
            }
        },
    }
}
