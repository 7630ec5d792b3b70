//! Normal distribution.

use dc_core::error::{DistError, Result};
use rand::rngs::StdRng;
use rand_distr::Distribution;
use rand_distr::Normal as RandNormal;
use statrs::distribution::{Continuous, ContinuousCDF, Normal as StatrsNormal};

/// Normal distribution `N(mean, stdev)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    mean: f64,
    stdev: f64,
}

impl Normal {
    /// Construct; `stdev` must be finite and strictly positive.
    pub fn new(mean: f64, stdev: f64) -> Result<Self> {
        if !mean.is_finite() || !stdev.is_finite() {
            return Err(DistError::NonNumericInput(format!(
                "normal parameters must be finite, got mean={mean}, stdev={stdev}"
            )));
        }
        if stdev <= 0.0 {
            return Err(DistError::ArgumentError(
                "Standard deviation must be strictly greater than 0".into(),
            ));
        }
        Ok(Self { mean, stdev })
    }

    /// Location parameter.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Scale parameter.
    pub fn stdev(&self) -> f64 {
        self.stdev
    }

    #[inline]
    fn statrs(&self) -> StatrsNormal {
        StatrsNormal::new(self.mean, self.stdev).expect("parameters validated at construction")
    }

    /// Density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        self.statrs().pdf(x)
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        self.statrs().cdf(x)
    }

    /// Quantile at `p`.
    pub fn inv(&self, p: f64) -> f64 {
        self.statrs().inverse_cdf(p)
    }

    /// `stdev²`.
    pub fn variance(&self) -> f64 {
        self.stdev * self.stdev
    }

    /// One draw.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        RandNormal::new(self.mean, self.stdev)
            .expect("parameters validated at construction")
            .sample(rng)
    }

    /// Closed-form sum: `N(m1, s1) + N(m2, s2) = N(m1+m2, √(s1²+s2²))`.
    pub fn add(a: &Self, b: &Self) -> Result<Self> {
        Self::new(a.mean + b.mean, (a.variance() + b.variance()).sqrt())
    }

    /// Closed-form difference.
    pub fn subtract(a: &Self, b: &Self) -> Result<Self> {
        Self::new(a.mean - b.mean, (a.variance() + b.variance()).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_invalid_stdev() {
        assert!(Normal::new(0.0, 0.0).is_err());
        assert!(Normal::new(0.0, -1.0).is_err());
        assert!(Normal::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_moments() {
        let n = Normal::new(3.0, 2.0).unwrap();
        assert_relative_eq!(n.mean(), 3.0);
        assert_relative_eq!(n.variance(), 4.0);
    }

    #[test]
    fn test_cdf_inv_round_trip() {
        let n = Normal::new(-1.0, 0.5).unwrap();
        for p in [0.01, 0.2, 0.5, 0.8, 0.99] {
            assert_relative_eq!(n.cdf(n.inv(p)), p, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_closed_form_sum() {
        let a = Normal::new(0.0, 1.0).unwrap();
        let b = Normal::new(0.0, 1.0).unwrap();
        let s = Normal::add(&a, &b).unwrap();
        assert_relative_eq!(s.mean(), 0.0);
        assert_relative_eq!(s.stdev(), std::f64::consts::SQRT_2);
    }
}
