//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Discretization](#discretization)
//! - [Time evolution](#time-evolution)
//! - [Measurement](#measurement)
//!
//! # Background
//! The state of a single particle of mass *m* moving in a static potential
//! *V*(*x*, *y*) is described by a wavefunction *ψ*(*x*, *y*, *t*) obeying the
//! time-dependent Schrödinger equation (TDSE)
//! ```text
//!   ∂ψ         ħ²
//! iħ -- = - --- (∂²/∂x² + ∂²/∂y²) ψ + V ψ = (T + V) ψ
//!   ∂t       2 m
//! ```
//! whose formal solution over a time step *δt* is
//! ```text
//! ψ(t + δt) = exp(-i (T + V) δt / ħ) ψ(t)
//! ```
//! Since *T* and *V* do not commute, the exponential cannot be split exactly.
//! However, *V* is diagonal in position space and *T* is diagonal in momentum
//! space, which makes each of them trivial to exponentiate on its own.
//!
//! # Discretization
//! The domain is a square of side *L* = *N* *δx* sampled at
//! ```text
//! x[i] = i δx,  y[j] = j δx,  i, j ∊ {0, ..., N - 1}
//! ```
//! with periodic boundary conditions, i.e. *x* = *L* is identified with
//! *x* = 0. Distances are always taken as the shortest way around, axis by
//! axis:
//! ```text
//! d(a, b) = min(|a - b|, L - |a - b|)
//! ```
//! Probability is normalized as a plain sum over cells, Σ |*ψ*|² = 1, rather
//! than as an integral; the two differ only by the constant factor *δx*².
//!
//! Momentum space is reached with the discrete Fourier transform. For *N*
//! points the transform produces components in unshifted order, where index
//! *i* carries the angular wavenumber
//! ```text
//!        2π f(i)           ⎧ i       if i < N/2
//! k[i] = -------,   f(i) = ⎨
//!         N δx             ⎩ i - N   otherwise
//! ```
//! Getting this mapping wrong does not produce an error, only wrong physics,
//! so it is tested directly.
//!
//! # Time evolution
//! The split-operator (Strang) scheme approximates the propagator
//! symmetrically,
//! ```text
//! exp(-i (T + V) δt / ħ) ≈ exp(-i V δt / 2ħ) exp(-i T δt / ħ) exp(-i V δt / 2ħ)
//! ```
//! with a local error of *O*(*δt*³). The outer factors are applied pointwise in
//! position space via
//! ```text
//! P(x, y) = exp(-i V(x, y) δt / 2ħ)
//! ```
//! and the middle factor is applied pointwise in momentum space via
//! ```text
//! K(kx, ky) = exp(-i ħ (kx² + ky²) δt / 2m)
//! ```
//! with forward and inverse FFTs on either side. Every factor has unit
//! modulus and the FFT pair is unitary up to a constant that is exactly undone
//! by the inverse, so Σ |*ψ*|² is conserved to rounding error without any
//! explicit renormalization.
//!
//! Replacing *δt* with -*iδτ* turns each phase into a real decay factor. Each
//! step then damps high-energy components more strongly than low-energy ones,
//! and repeated (renormalized) imaginary-time steps converge toward the ground
//! state of *V*.
//!
//! # Measurement
//! Position measurements are modelled as unsharp: a detector centered at
//! (*x*₀, *y*₀) with resolution *σ*ₘ responds with weight
//! ```text
//! w(x, y) = exp(-r² / 2σₘ²)
//! ```
//! at each point, and clicks with probability
//! ```text
//! p = Σ w |ψ|²
//! ```
//! (the Born rule for the effect *w*). Conditioned on the outcome, the state
//! becomes
//! ```text
//! click:    ψ → w ψ / ‖w ψ‖
//! no click: ψ → (1 - w) ψ / ‖(1 - w) ψ‖
//! ```
//! Neither update is unitary: a click localizes the particle near the detector
//! while a miss carves a hole in the distribution, and in both cases the
//! observer has gained information. A very small *σ*ₘ, or one far larger than
//! the domain, can leave (numerically) nothing to renormalize; this is
//! reported as an error rather than patched over.
