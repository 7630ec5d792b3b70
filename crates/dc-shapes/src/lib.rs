//! # dc-shapes
//!
//! Discretized distribution shapes:
//! - [`XYShape`]: parallel xs/ys arrays with piecewise-linear interpolation
//! - [`ContinuousShape`] / [`DiscreteShape`]: densities and atom masses with
//!   write-once integral caches
//! - [`MixedShape`]: a continuous/discrete pair
//! - [`PointSet`]: the sum type over the three, plus numerical convolution
//!   and pointwise combination

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Continuous piecewise-linear density shape.
pub mod continuous;
/// Algebraic convolution of point sets.
pub mod convolution;
/// Discrete atom-mass shape.
pub mod discrete;
/// Continuous + discrete pair.
pub mod mixed;
/// Sum type over the three shape kinds.
pub mod point_set;
/// Unicode sparkline rendering.
pub mod sparkline;
/// Parallel xs/ys arrays and interpolation primitives.
pub mod xyshape;

pub use continuous::ContinuousShape;
pub use convolution::combine_algebraically;
pub use discrete::DiscreteShape;
pub use mixed::MixedShape;
pub use point_set::PointSet;
pub use xyshape::XYShape;

/// Tolerance for `is_normalized` checks.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-7;
