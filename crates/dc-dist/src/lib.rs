//! # dc-dist
//!
//! Distribution representations and the algebra over them:
//! - [`SymbolicDist`]: thirteen closed-form families with exact
//!   pdf/cdf/quantile and analytical combination shortcuts
//! - [`SampleSetDist`]: Monte-Carlo draws with index-correlated mapping and
//!   the KDE conversion pipeline
//! - [`PointSetDist`]: a discretized shape behind the common contract
//! - [`Dist`]: the sum type over the three, implementing [`BaseDist`]
//! - [`operations`]: the strategy-choosing combination layer
//!
//! Randomness is injected: every sampling entry point takes a caller-owned
//! `StdRng`, so seeded runs reproduce exactly.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// The common distribution contract and the `Dist` sum type.
pub mod base;
/// Distribution-level operations and the strategy chooser.
pub mod operations;
/// Point-set distribution adapter.
pub mod point_set;
/// Sample-set distribution and KDE conversion.
pub mod sample_set;
/// Log scoring of forecasts.
pub mod score;
/// Closed-form distribution families.
pub mod symbolic;

pub use base::{BaseDist, Dist};
pub use operations::{
    algebraic_combination, mixture, pointwise_combination_float, Strategy,
    MONTE_CARLO_COST_THRESHOLD,
};
pub use point_set::PointSetDist;
pub use sample_set::SampleSetDist;
pub use score::{log_score_dist_answer, log_score_scalar_answer};
pub use symbolic::{SymbolicDist, XSelection};
