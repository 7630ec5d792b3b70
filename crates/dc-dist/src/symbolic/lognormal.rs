//! Lognormal distribution.

use dc_core::error::{DistError, Result};
use rand::rngs::StdRng;
use rand_distr::{Distribution, LogNormal as RandLogNormal};
use statrs::distribution::{Continuous, ContinuousCDF, LogNormal as StatrsLogNormal};

/// Lognormal distribution: `ln X ~ N(mu, sigma)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lognormal {
    mu: f64,
    sigma: f64,
}

impl Lognormal {
    /// Construct; `sigma` must be finite and strictly positive.
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        if !mu.is_finite() || !sigma.is_finite() {
            return Err(DistError::NonNumericInput(format!(
                "lognormal parameters must be finite, got mu={mu}, sigma={sigma}"
            )));
        }
        if sigma <= 0.0 {
            return Err(DistError::ArgumentError(
                "Lognormal standard deviation must be larger than 0".into(),
            ));
        }
        Ok(Self { mu, sigma })
    }

    /// Log-space mean.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Log-space standard deviation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    #[inline]
    fn statrs(&self) -> StatrsLogNormal {
        StatrsLogNormal::new(self.mu, self.sigma).expect("parameters validated at construction")
    }

    /// Density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            self.statrs().pdf(x)
        }
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            self.statrs().cdf(x)
        }
    }

    /// Quantile at `p`.
    pub fn inv(&self, p: f64) -> f64 {
        self.statrs().inverse_cdf(p)
    }

    /// `exp(mu + sigma²/2)`.
    pub fn mean(&self) -> f64 {
        (self.mu + self.sigma * self.sigma / 2.0).exp()
    }

    /// `(exp(sigma²) - 1) · exp(2mu + sigma²)`.
    pub fn variance(&self) -> f64 {
        let s2 = self.sigma * self.sigma;
        (s2.exp() - 1.0) * (2.0 * self.mu + s2).exp()
    }

    /// One draw.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        RandLogNormal::new(self.mu, self.sigma)
            .expect("parameters validated at construction")
            .sample(rng)
    }

    /// Closed-form product: log-space parameters add.
    pub fn multiply(a: &Self, b: &Self) -> Result<Self> {
        Self::new(a.mu + b.mu, (a.sigma * a.sigma + b.sigma * b.sigma).sqrt())
    }

    /// Closed-form quotient: log-space means subtract.
    pub fn divide(a: &Self, b: &Self) -> Result<Self> {
        Self::new(a.mu - b.mu, (a.sigma * a.sigma + b.sigma * b.sigma).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_invalid_sigma() {
        assert!(Lognormal::new(0.0, 0.0).is_err());
        assert!(Lognormal::new(0.0, -1.0).is_err());
    }

    #[test]
    fn test_moments() {
        let l = Lognormal::new(0.0, 1.0).unwrap();
        assert_relative_eq!(l.mean(), (0.5f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(
            l.variance(),
            (1.0f64.exp() - 1.0) * 1.0f64.exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_quantile_round_trip() {
        let l = Lognormal::new(1.0, 0.5).unwrap();
        for p in [0.05, 0.3, 0.5, 0.7, 0.95] {
            assert_relative_eq!(l.cdf(l.inv(p)), p, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_closed_form_product() {
        let a = Lognormal::new(1.0, 0.3).unwrap();
        let b = Lognormal::new(2.0, 0.4).unwrap();
        let p = Lognormal::multiply(&a, &b).unwrap();
        assert_relative_eq!(p.mu(), 3.0);
        assert_relative_eq!(p.sigma(), 0.5);
        let q = Lognormal::divide(&a, &b).unwrap();
        assert_relative_eq!(q.mu(), -1.0);
    }
}
