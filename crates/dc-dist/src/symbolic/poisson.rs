//! Poisson distribution.

use dc_core::error::{DistError, Result};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Poisson as RandPoisson};
use statrs::distribution::{Discrete, DiscreteCDF, Poisson as StatrsPoisson};

/// Poisson distribution with rate `λ > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poisson {
    lambda: f64,
}

impl Poisson {
    /// Construct; `lambda` must be finite and strictly positive.
    pub fn new(lambda: f64) -> Result<Self> {
        if !lambda.is_finite() {
            return Err(DistError::NonNumericInput(format!(
                "poisson rate must be finite, got {lambda}"
            )));
        }
        if lambda <= 0.0 {
            return Err(DistError::ArgumentError(
                "Poisson rate must be larger than 0".into(),
            ));
        }
        Ok(Self { lambda })
    }

    /// Rate parameter.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    #[inline]
    fn statrs(&self) -> StatrsPoisson {
        StatrsPoisson::new(self.lambda).expect("parameters validated at construction")
    }

    /// Mass at `x`; nonzero only at non-negative integers.
    pub fn pmf(&self, x: f64) -> f64 {
        if x < 0.0 || x.fract() != 0.0 {
            0.0
        } else {
            self.statrs().pmf(x as u64)
        }
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            self.statrs().cdf(x.floor() as u64)
        }
    }

    /// Quantile at `q`.
    pub fn inv(&self, q: f64) -> f64 {
        self.statrs().inverse_cdf(q.clamp(0.0, 1.0)) as f64
    }

    /// `λ`.
    pub fn mean(&self) -> f64 {
        self.lambda
    }

    /// `λ`.
    pub fn variance(&self) -> f64 {
        self.lambda
    }

    /// One draw.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        let draw: f64 = RandPoisson::new(self.lambda)
            .expect("parameters validated at construction")
            .sample(rng);
        draw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_invalid_rate() {
        assert!(Poisson::new(0.0).is_err());
        assert!(Poisson::new(-3.0).is_err());
        assert!(Poisson::new(f64::NAN).is_err());
    }

    #[test]
    fn test_moments() {
        let p = Poisson::new(4.5).unwrap();
        assert_relative_eq!(p.mean(), 4.5);
        assert_relative_eq!(p.variance(), 4.5);
    }

    #[test]
    fn test_pmf_and_cdf_agree() {
        let p = Poisson::new(2.0).unwrap();
        let partial: f64 = (0..=3).map(|k| p.pmf(k as f64)).sum();
        assert_relative_eq!(p.cdf(3.0), partial, epsilon = 1e-12);
        assert_relative_eq!(p.cdf(3.7), partial, epsilon = 1e-12);
        assert_relative_eq!(p.pmf(1.5), 0.0);
    }

    #[test]
    fn test_quantile_bounds_mass() {
        let p = Poisson::new(10.0).unwrap();
        let hi = p.inv(0.9999);
        assert!(p.cdf(hi) >= 0.9999);
    }
}
