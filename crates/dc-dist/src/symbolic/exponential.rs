//! Exponential distribution.

use dc_core::error::{DistError, Result};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Exp as RandExp};

/// Exponential distribution with rate `λ > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    /// Construct; `rate` must be finite and strictly positive.
    pub fn new(rate: f64) -> Result<Self> {
        if !rate.is_finite() {
            return Err(DistError::NonNumericInput(format!(
                "exponential rate must be finite, got {rate}"
            )));
        }
        if rate <= 0.0 {
            return Err(DistError::ArgumentError("Exponential rate must be larger than 0".into()));
        }
        Ok(Self { rate })
    }

    /// Rate parameter.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// `λ e^{-λx}` for `x ≥ 0`.
    pub fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            self.rate * (-self.rate * x).exp()
        }
    }

    /// `1 - e^{-λx}` for `x ≥ 0`.
    pub fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            -(-self.rate * x).exp_m1()
        }
    }

    /// `-ln(1-p)/λ`.
    pub fn inv(&self, p: f64) -> f64 {
        -(-p).ln_1p() / self.rate
    }

    /// `1/λ`.
    pub fn mean(&self) -> f64 {
        1.0 / self.rate
    }

    /// `1/λ²`.
    pub fn variance(&self) -> f64 {
        1.0 / (self.rate * self.rate)
    }

    /// One draw.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        RandExp::new(self.rate).expect("parameters validated at construction").sample(rng)
    }
}
