//! Beta distribution.

use dc_core::error::{DistError, Result};
use rand::rngs::StdRng;
use rand_distr::{Beta as RandBeta, Distribution};
use statrs::distribution::{Beta as StatrsBeta, Continuous, ContinuousCDF};

/// Beta distribution on `[0, 1]` with shape parameters `alpha, beta > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beta {
    alpha: f64,
    beta: f64,
}

impl Beta {
    /// Construct; both shapes must be finite and strictly positive.
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if !alpha.is_finite() || !beta.is_finite() {
            return Err(DistError::NonNumericInput(format!(
                "beta parameters must be finite, got alpha={alpha}, beta={beta}"
            )));
        }
        if alpha <= 0.0 || beta <= 0.0 {
            return Err(DistError::ArgumentError(
                "Beta distribution parameters must be positive".into(),
            ));
        }
        Ok(Self { alpha, beta })
    }

    /// First shape parameter.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Second shape parameter.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    #[inline]
    fn statrs(&self) -> StatrsBeta {
        StatrsBeta::new(self.alpha, self.beta).expect("parameters validated at construction")
    }

    /// Density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            0.0
        } else {
            self.statrs().pdf(x)
        }
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else if x >= 1.0 {
            1.0
        } else {
            self.statrs().cdf(x)
        }
    }

    /// Quantile at `p`.
    pub fn inv(&self, p: f64) -> f64 {
        self.statrs().inverse_cdf(p)
    }

    /// `α/(α+β)`.
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// `αβ / ((α+β)²(α+β+1))`.
    pub fn variance(&self) -> f64 {
        let s = self.alpha + self.beta;
        self.alpha * self.beta / (s * s * (s + 1.0))
    }

    /// One draw.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        RandBeta::new(self.alpha, self.beta)
            .expect("parameters validated at construction")
            .sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_invalid_parameters_message() {
        let err = Beta::new(0.0, 1.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Argument error: Beta distribution parameters must be positive"
        );
        assert!(Beta::new(1.0, -1.0).is_err());
    }

    #[test]
    fn test_mean() {
        let b = Beta::new(2.0, 6.0).unwrap();
        assert_relative_eq!(b.mean(), 0.25);
    }

    #[test]
    fn test_quantile_round_trip() {
        let b = Beta::new(2.0, 3.0).unwrap();
        for p in [0.1, 0.4, 0.5, 0.9] {
            assert_relative_eq!(b.cdf(b.inv(p)), p, epsilon = 1e-9);
        }
    }
}
