//! Per-call configuration for resolution-bounded operations.

use serde::{Deserialize, Serialize};

use crate::error::{DistError, Result};

/// Default Monte-Carlo sample budget.
pub const DEFAULT_SAMPLE_COUNT: usize = 10_000;
/// Default point-set resolution.
pub const DEFAULT_XY_POINT_LENGTH: usize = 1_000;

/// Resolution/sample budget passed explicitly to any operation that needs it.
///
/// A module-level default exists ([`Env::default`]) but callers always
/// override it per call; nothing in the engine reads ambient configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Env {
    /// Number of Monte-Carlo draws for sample-set conversions.
    pub sample_count: usize,
    /// Number of points for point-set conversions.
    pub xy_point_length: usize,
}

impl Env {
    /// Create a validated environment. Both budgets must be positive.
    pub fn new(sample_count: usize, xy_point_length: usize) -> Result<Self> {
        if sample_count == 0 {
            return Err(DistError::ArgumentError("sample_count must be > 0".into()));
        }
        if xy_point_length == 0 {
            return Err(DistError::ArgumentError("xy_point_length must be > 0".into()));
        }
        Ok(Self { sample_count, xy_point_length })
    }
}

impl Default for Env {
    fn default() -> Self {
        Self { sample_count: DEFAULT_SAMPLE_COUNT, xy_point_length: DEFAULT_XY_POINT_LENGTH }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budgets() {
        let env = Env::default();
        assert_eq!(env.sample_count, 10_000);
        assert_eq!(env.xy_point_length, 1_000);
    }

    #[test]
    fn test_zero_budgets_rejected() {
        assert!(Env::new(0, 100).is_err());
        assert!(Env::new(100, 0).is_err());
        assert!(Env::new(1, 1).is_ok());
    }

    #[test]
    fn test_serde_round_trip() {
        let env = Env { sample_count: 500, xy_point_length: 42 };
        let json = serde_json::to_string(&env).unwrap();
        let back: Env = serde_json::from_str(&json).unwrap();
        assert_eq!(env, back);
    }
}
