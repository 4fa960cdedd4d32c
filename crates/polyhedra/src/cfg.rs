//! Tolerance defaults (internal).
//!
//! Policy
//! - Fixed constants rather than a runtime config. Every comparison of
//!   floating-point coordinates in the crate goes through these.

/// Two vertices closer than this (Euclidean) are the same vertex.
/// Also the slack for "all sides equal" and cap planarity checks.
pub const PRECISION: f64 = 1e-3;

/// Below this a length is treated as zero (degenerate normals, rotation axes).
pub(crate) const ZERO_EPS: f64 = 1e-12;

/// Bisection rounds for the snub solver.
pub(crate) const SOLVER_ITERATIONS: usize = 64;
/// Coarse scan steps over the snub rotation interval before bisection.
pub(crate) const SOLVER_SCAN_STEPS: usize = 90;
