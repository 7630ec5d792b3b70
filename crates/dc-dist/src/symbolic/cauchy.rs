//! Cauchy distribution.

use std::f64::consts::PI;

use dc_core::error::{DistError, Result};
use rand::rngs::StdRng;
use rand_distr::{Cauchy as RandCauchy, Distribution};

/// Cauchy distribution with location `x0` and scale `γ > 0`.
///
/// Mean and variance do not exist; [`Cauchy::mean`] is `NaN` and the
/// variance query fails at the wrapper level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cauchy {
    local: f64,
    scale: f64,
}

impl Cauchy {
    /// Construct; `scale` must be finite and strictly positive.
    pub fn new(local: f64, scale: f64) -> Result<Self> {
        if !local.is_finite() || !scale.is_finite() {
            return Err(DistError::NonNumericInput(format!(
                "cauchy parameters must be finite, got local={local}, scale={scale}"
            )));
        }
        if scale <= 0.0 {
            return Err(DistError::ArgumentError("Cauchy scale must be larger than 0".into()));
        }
        Ok(Self { local, scale })
    }

    /// Location parameter.
    pub fn local(&self) -> f64 {
        self.local
    }

    /// Scale parameter.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.local) / self.scale;
        1.0 / (PI * self.scale * (1.0 + z * z))
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        0.5 + ((x - self.local) / self.scale).atan() / PI
    }

    /// Quantile at `p`.
    pub fn inv(&self, p: f64) -> f64 {
        self.local + self.scale * (PI * (p - 0.5)).tan()
    }

    /// Undefined; `NaN` by convention.
    pub fn mean(&self) -> f64 {
        f64::NAN
    }

    /// One draw.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        RandCauchy::new(self.local, self.scale)
            .expect("parameters validated at construction")
            .sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_invalid_scale() {
        assert!(Cauchy::new(0.0, 0.0).is_err());
    }

    #[test]
    fn test_median_is_location() {
        let c = Cauchy::new(3.0, 2.0).unwrap();
        assert_relative_eq!(c.inv(0.5), 3.0, epsilon = 1e-12);
        assert_relative_eq!(c.cdf(3.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_round_trip() {
        let c = Cauchy::new(-1.0, 0.5).unwrap();
        for p in [0.05, 0.3, 0.5, 0.7, 0.95] {
            assert_relative_eq!(c.cdf(c.inv(p)), p, epsilon = 1e-10);
        }
    }
}
