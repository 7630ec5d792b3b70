//! Uniform distribution.

use dc_core::error::{DistError, Result};
use rand::rngs::StdRng;
use rand::Rng;

/// Uniform distribution on `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    low: f64,
    high: f64,
}

impl Uniform {
    /// Construct; requires `low < high`, both finite.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(DistError::NonNumericInput(format!(
                "uniform parameters must be finite, got ({low}, {high})"
            )));
        }
        if high <= low {
            return Err(DistError::ArgumentError(
                "High must be larger than low".into(),
            ));
        }
        Ok(Self { low, high })
    }

    /// Lower bound.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// `1/(high-low)` inside the support.
    pub fn pdf(&self, x: f64) -> f64 {
        if x < self.low || x > self.high {
            0.0
        } else {
            1.0 / (self.high - self.low)
        }
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= self.low {
            0.0
        } else if x >= self.high {
            1.0
        } else {
            (x - self.low) / (self.high - self.low)
        }
    }

    /// Quantile at `p`.
    pub fn inv(&self, p: f64) -> f64 {
        self.low + p.clamp(0.0, 1.0) * (self.high - self.low)
    }

    /// `(low + high)/2`.
    pub fn mean(&self) -> f64 {
        0.5 * (self.low + self.high)
    }

    /// `(high - low)²/12`.
    pub fn variance(&self) -> f64 {
        let w = self.high - self.low;
        w * w / 12.0
    }

    /// One draw.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        rng.gen_range(self.low..self.high)
    }

    /// Clamp the support to `[left, right]`; fails when the window leaves no
    /// width.
    pub fn truncate(&self, left: Option<f64>, right: Option<f64>) -> Result<Self> {
        let low = left.map_or(self.low, |l| l.max(self.low));
        let high = right.map_or(self.high, |r| r.min(self.high));
        Self::new(low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_degenerate_rejected() {
        assert!(Uniform::new(1.0, 1.0).is_err());
        assert!(Uniform::new(2.0, 1.0).is_err());
    }

    #[test]
    fn test_moments() {
        let u = Uniform::new(2.0, 6.0).unwrap();
        assert_relative_eq!(u.mean(), 4.0);
        assert_relative_eq!(u.variance(), 16.0 / 12.0);
    }

    #[test]
    fn test_cdf_and_quantile() {
        let u = Uniform::new(0.0, 10.0).unwrap();
        assert_relative_eq!(u.cdf(2.5), 0.25);
        assert_relative_eq!(u.inv(0.25), 2.5);
        assert_relative_eq!(u.cdf(-1.0), 0.0);
        assert_relative_eq!(u.cdf(11.0), 1.0);
    }

    #[test]
    fn test_truncate_clamps() {
        let u = Uniform::new(0.0, 10.0).unwrap();
        let t = u.truncate(Some(3.0), Some(7.0)).unwrap();
        assert_relative_eq!(t.low(), 3.0);
        assert_relative_eq!(t.high(), 7.0);
        // A window outside the support leaves nothing.
        assert!(u.truncate(Some(20.0), None).is_err());
    }
}
