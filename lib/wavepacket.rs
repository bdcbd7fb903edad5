//! Gaussian wavepacket initial states.

use std::f64::consts::TAU;
use num_complex::Complex64 as C64;
use serde::{ Deserialize, Serialize };
use crate::{ config::SimConfig, error::SimError, grid::ComplexGrid };

/// Parameters of a Gaussian wavepacket, all in physical units.
///
/// Unset fields resolve against the simulation domain: the center defaults to
/// the middle of the domain, `(L/2, L/2)`, and the width to `L/20`. Momentum
/// defaults to zero.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wavepacket {
    /// Center `(x, y)`.
    pub center: Option<(f64, f64)>,
    /// Width σ.
    pub width: Option<f64>,
    /// Mean momentum `(px, py)`.
    pub momentum: (f64, f64),
}

/// A [`Wavepacket`] with all defaults filled in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolvedWavepacket {
    pub center: (f64, f64),
    pub width: f64,
    pub momentum: (f64, f64),
}

impl Wavepacket {
    /// Set the center.
    pub fn center(mut self, x: f64, y: f64) -> Self {
        self.center = Some((x, y));
        self
    }

    /// Set the width.
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the mean momentum.
    pub fn momentum(mut self, px: f64, py: f64) -> Self {
        self.momentum = (px, py);
        self
    }

    /// Set the mean momentum from a wavevector, i.e. `p = ħ k`.
    pub fn wavevector(self, kx: f64, ky: f64, hbar: f64) -> Self {
        self.momentum(hbar * kx, hbar * ky)
    }

    /// Fill in defaults against `config` and check that everything is finite
    /// and the width positive.
    pub fn resolve(&self, config: &SimConfig) -> Result<ResolvedWavepacket, SimError> {
        let l = config.domain_size();
        let center = self.center.unwrap_or((l / 2.0, l / 2.0));
        let width = self.width.unwrap_or(l / 20.0);
        SimError::check_packet_param(center.0)?;
        SimError::check_packet_param(center.1)?;
        SimError::check_packet_width(width)?;
        SimError::check_packet_param(self.momentum.0)?;
        SimError::check_packet_param(self.momentum.1)?;
        Ok(ResolvedWavepacket { center, width, momentum: self.momentum })
    }
}

impl ResolvedWavepacket {
    /// Sample the (unnormalized) packet over the grid:
    /// ```text
    /// ψ(x, y) = exp(-((x - x₀)² + (y - y₀)²) / 4σ²) exp(i (px x + py y) / ħ)
    /// ```
    /// Displacements from the center are taken directly, without periodic
    /// wrapping, so a packet whose tail reaches past an edge of the domain is
    /// cut off there rather than continued on the opposite side; the cut is
    /// then renormalized away by the caller. Keep the center a few widths
    /// from the edges for an untruncated packet.
    pub fn sample(&self, config: &SimConfig) -> ComplexGrid {
        let (x0, y0) = self.center;
        let (px, py) = self.momentum;
        let inv_four_var = (4.0 * self.width * self.width).recip();
        let hbar = config.hbar;
        ComplexGrid::from_fn(config.grid_size, |ix, iy| {
            let x = config.coord(ix);
            let y = config.coord(iy);
            let r2 = (x - x0).powi(2) + (y - y0).powi(2);
            let amp = (-r2 * inv_four_var).exp();
            let phase = ((px * x + py * y) / hbar).rem_euclid(TAU);
            amp * C64::cis(phase)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_against_domain() {
        let config = SimConfig::default();
        let packet = Wavepacket::default().resolve(&config).unwrap();
        assert!((packet.center.0 - 3.2).abs() < 1e-12);
        assert!((packet.center.1 - 3.2).abs() < 1e-12);
        assert!((packet.width - 0.32).abs() < 1e-12);
        assert_eq!(packet.momentum, (0.0, 0.0));
    }

    #[test]
    fn rejects_bad_width() {
        let config = SimConfig::default();
        assert!(matches!(
            Wavepacket::default().width(0.0).resolve(&config),
            Err(SimError::BadWavepacketWidth(_)),
        ));
        assert!(matches!(
            Wavepacket::default().momentum(f64::INFINITY, 0.0).resolve(&config),
            Err(SimError::BadWavepacketParam(_)),
        ));
    }

    #[test]
    fn sample_near_edge_is_truncated() {
        let config = SimConfig::default();
        let packet
            = Wavepacket::default().center(6.3, 3.2).width(0.2)
            .resolve(&config).unwrap();
        let grid = packet.sample(&config);
        // one cell past the edge would wrap to x = 0, but is not sampled there
        assert!(grid.amplitude(62, 32).unwrap() > 0.8);
        assert!(grid.amplitude(0, 32).unwrap() < 1e-100);
    }

    #[test]
    fn sample_peaks_at_center_with_plane_wave_phase() {
        let config = SimConfig::default();
        let packet
            = Wavepacket::default().center(3.2, 3.2).width(1.0).momentum(2.0, 0.0)
            .resolve(&config).unwrap();
        let grid = packet.sample(&config);
        assert!((grid.amplitude(32, 32).unwrap() - 1.0).abs() < 1e-12);
        assert!(grid.amplitude(10, 32).unwrap() < grid.amplitude(31, 32).unwrap());
        // phase advances by px dx / ħ per cell along x
        let d = grid.get(33, 32).unwrap() / grid.get(32, 32).unwrap();
        assert!((d.arg() - 0.2).abs() < 1e-9);
    }
}
