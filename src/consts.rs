//! Numeric tolerances shared by the polynomial, rational and network layers.

/// Relative distance below which two computed roots are merged into one
/// repeated root.
pub const ROOT_CLUSTER_TOL: f64 = 1e-4;

/// Imaginary parts smaller than this (relative to the root modulus) are
/// snapped to zero for real polynomials.
pub const IMAG_SNAP_TOL: f64 = 1e-10;

/// Relative size of a Euclidean remainder treated as zero by the polynomial
/// GCD used to cancel common factors.
pub const GCD_TOL: f64 = 1e-9;

/// Relative tolerance of approximate equality between rational functions.
pub const APPROX_TOL: f64 = 1e-9;

/// Iteration cap for the Aberth-Ehrlich root finder.
pub const ABERTH_MAX_ITER: usize = 500;

/// Relative correction size at which root iterations stop.
pub const STEP_TOL: f64 = 1e-15;

/// Iteration cap for Newton polishing of clustered roots.
pub const NEWTON_MAX_ITER: usize = 50;

/// Delays closer than this are merged into one delayed term.
pub const DELAY_TOL: f64 = 1e-15;
