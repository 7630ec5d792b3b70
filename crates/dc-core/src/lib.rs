//! # dc-core
//!
//! Core types shared by every DistCalc crate:
//! - [`Env`]: per-call resolution/sample budget configuration
//! - [`DistError`]: the closed error taxonomy
//! - [`AlgebraicOp`]: checked scalar algebra used by every combination path

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Per-call configuration record.
pub mod env;
/// Error taxonomy and `Result` alias.
pub mod error;
/// Algebraic operations over scalars, with checked failure modes.
pub mod ops;

pub use env::Env;
pub use error::{DistError, OperationError, Result, XYShapeError};
pub use ops::AlgebraicOp;
