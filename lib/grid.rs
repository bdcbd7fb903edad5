//! Dense square grid of complex amplitudes.
//!
//! Amplitudes are stored in a single contiguous, row-major
//! [`ndarray::Array2`] indexed as `[y, x]`, so that rows are contiguous for both
//! the FFT and renderers scanning the grid line by line.

use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::{ Arr2, error::{ IndexError, NormError, ShapeError } };

/// `n`×`n` array of complex amplitudes, `ψ[y][x]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexGrid {
    n: usize,
    data: nd::Array2<C64>,
}

impl ComplexGrid {
    /// Create a new grid with all amplitudes set to zero.
    pub fn zeros(n: usize) -> Self {
        Self { n, data: nd::Array2::zeros((n, n)) }
    }

    /// Create a new grid by evaluating `f(x, y)` at every pair of grid indices.
    pub fn from_fn<F>(n: usize, mut f: F) -> Self
    where F: FnMut(usize, usize) -> C64
    {
        Self { n, data: nd::Array2::from_shape_fn((n, n), |(y, x)| f(x, y)) }
    }

    /// Wrap an existing square array, indexed as `[y, x]`.
    pub fn from_array(data: nd::Array2<C64>) -> Result<Self, ShapeError> {
        let n = data.nrows();
        ShapeError::check(n, data.shape())?;
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Ok(Self { n, data })
    }

    /// Number of grid points along each axis.
    pub fn size(&self) -> usize { self.n }

    /// Get the amplitude at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Result<C64, IndexError> {
        IndexError::check(x, y, self.n)?;
        Ok(self.data[[y, x]])
    }

    /// Set the amplitude at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, re: f64, im: f64)
        -> Result<(), IndexError>
    {
        IndexError::check(x, y, self.n)?;
        self.data[[y, x]] = C64::new(re, im);
        Ok(())
    }

    /// `|ψ(x, y)|`.
    pub fn amplitude(&self, x: usize, y: usize) -> Result<f64, IndexError> {
        self.get(x, y).map(|q| q.norm())
    }

    /// `arg ψ(x, y)`, in `(-π, π]`.
    pub fn phase(&self, x: usize, y: usize) -> Result<f64, IndexError> {
        self.get(x, y).map(|q| q.arg())
    }

    /// Overwrite every amplitude with those of `other` (deep copy).
    pub fn copy_from(&mut self, other: &Self) -> Result<(), ShapeError> {
        ShapeError::check(self.n, other.data.shape())?;
        self.data.assign(&other.data);
        Ok(())
    }

    /// `Σ |ψ|²` over all cells.
    pub fn norm_sqr_sum(&self) -> f64 {
        self.data.iter().map(|q| q.norm_sqr()).sum()
    }

    /// Divide every amplitude by `sqrt(Σ |ψ|²)`, returning the squared norm
    /// prior to rescaling.
    ///
    /// The grid is left untouched if the squared norm is zero, below the
    /// numerical floor, or not finite.
    pub fn renormalize(&mut self) -> Result<f64, NormError> {
        let norm_sqr = self.norm_sqr_sum();
        NormError::check(norm_sqr)?;
        let norm = norm_sqr.sqrt();
        self.data.map_inplace(|q| { *q /= norm; });
        Ok(norm_sqr)
    }

    /// Set all amplitudes to zero.
    pub fn clear(&mut self) { self.data.fill(C64::zero()); }

    /// `|ψ|²` for every cell, indexed as `[y, x]`.
    pub fn probability_density(&self) -> nd::Array2<f64> {
        self.data.mapv(|q| q.norm_sqr())
    }

    /// Read-only view of the underlying array, indexed as `[y, x]`.
    pub fn view(&self) -> nd::ArrayView2<'_, C64> { self.data.view() }

    pub(crate) fn array(&self) -> &nd::Array2<C64> { &self.data }

    pub(crate) fn array_mut(&mut self) -> &mut nd::Array2<C64> { &mut self.data }

    /// Multiply pointwise by a same-shaped array of factors.
    ///
    /// *Panics if `factors` is not `n`×`n`*.
    pub(crate) fn mul_pointwise<S, A>(&mut self, factors: &Arr2<S>)
    where
        S: nd::Data<Elem = A>,
        A: Copy,
        C64: std::ops::MulAssign<A>,
    {
        nd::Zip::from(&mut self.data).and(factors)
            .for_each(|q, f| { *q *= *f; });
    }
}
