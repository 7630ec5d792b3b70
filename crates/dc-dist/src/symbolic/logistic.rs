//! Logistic distribution.
//!
//! No statrs counterpart exists; pdf/cdf/quantile are closed-form and
//! sampling uses the inverse transform.

use std::f64::consts::PI;

use dc_core::error::{DistError, Result};
use rand::rngs::StdRng;
use rand::Rng;

/// Logistic distribution with location and scale `s > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Logistic {
    location: f64,
    scale: f64,
}

impl Logistic {
    /// Construct; `scale` must be finite and strictly positive.
    pub fn new(location: f64, scale: f64) -> Result<Self> {
        if !location.is_finite() || !scale.is_finite() {
            return Err(DistError::NonNumericInput(format!(
                "logistic parameters must be finite, got location={location}, scale={scale}"
            )));
        }
        if scale <= 0.0 {
            return Err(DistError::ArgumentError("Scale must be positive".into()));
        }
        Ok(Self { location, scale })
    }

    /// Location parameter.
    pub fn location(&self) -> f64 {
        self.location
    }

    /// Scale parameter.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        let e = (-(x - self.location) / self.scale).exp();
        let d = 1.0 + e;
        e / (self.scale * d * d)
    }

    /// Sigmoid cdf.
    pub fn cdf(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-(x - self.location) / self.scale).exp())
    }

    /// `location + scale · ln(p/(1-p))`.
    pub fn inv(&self, p: f64) -> f64 {
        self.location + self.scale * (p / (1.0 - p)).ln()
    }

    /// The location parameter.
    pub fn mean(&self) -> f64 {
        self.location
    }

    /// `s²π²/3`.
    pub fn variance(&self) -> f64 {
        self.scale * self.scale * PI * PI / 3.0
    }

    /// One draw, by inverse transform.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        let u: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
        self.inv(u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_invalid_scale() {
        assert!(Logistic::new(0.0, 0.0).is_err());
        assert!(Logistic::new(0.0, -1.0).is_err());
    }

    #[test]
    fn test_symmetry() {
        let l = Logistic::new(5.0, 2.0).unwrap();
        assert_relative_eq!(l.cdf(5.0), 0.5);
        assert_relative_eq!(l.mean(), 5.0);
        assert_relative_eq!(l.pdf(4.0), l.pdf(6.0), epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_round_trip() {
        let l = Logistic::new(-2.0, 0.7).unwrap();
        for p in [0.05, 0.3, 0.5, 0.7, 0.95] {
            assert_relative_eq!(l.cdf(l.inv(p)), p, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pdf_is_cdf_derivative() {
        let l = Logistic::new(0.0, 1.0).unwrap();
        let dx = 1e-6;
        for x in [-3.0, -1.0, 0.0, 0.5, 2.0] {
            let numeric = (l.cdf(x + dx) - l.cdf(x - dx)) / (2.0 * dx);
            assert_relative_eq!(l.pdf(x), numeric, epsilon = 1e-6);
        }
    }
}
