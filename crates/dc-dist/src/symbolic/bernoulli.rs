//! Bernoulli distribution.

use dc_core::error::{DistError, Result};
use rand::rngs::StdRng;
use rand::Rng;

/// Bernoulli distribution: mass `p` at 1, `1-p` at 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bernoulli {
    p: f64,
}

impl Bernoulli {
    /// Construct; `p` must be a finite probability.
    pub fn new(p: f64) -> Result<Self> {
        if !p.is_finite() {
            return Err(DistError::NonNumericInput(format!(
                "bernoulli probability must be finite, got {p}"
            )));
        }
        if !(0.0..=1.0).contains(&p) {
            return Err(DistError::ArgumentError(
                "Bernoulli parameter must be in [0, 1]".into(),
            ));
        }
        Ok(Self { p })
    }

    /// Success probability.
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Mass at `x`; nonzero only at 0 and 1.
    pub fn pmf(&self, x: f64) -> f64 {
        if x == 0.0 {
            1.0 - self.p
        } else if x == 1.0 {
            self.p
        } else {
            0.0
        }
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else if x < 1.0 {
            1.0 - self.p
        } else {
            1.0
        }
    }

    /// Quantile at `q`: 0 until the mass at 0 is exhausted, then 1.
    pub fn inv(&self, q: f64) -> f64 {
        if q <= 1.0 - self.p {
            0.0
        } else {
            1.0
        }
    }

    /// `p`.
    pub fn mean(&self) -> f64 {
        self.p
    }

    /// `p(1-p)`.
    pub fn variance(&self) -> f64 {
        self.p * (1.0 - self.p)
    }

    /// Smallest support point.
    pub fn min(&self) -> f64 {
        if self.p == 1.0 {
            1.0
        } else {
            0.0
        }
    }

    /// Largest support point.
    pub fn max(&self) -> f64 {
        if self.p == 0.0 {
            0.0
        } else {
            1.0
        }
    }

    /// One draw.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        if rng.gen_bool(self.p) {
            1.0
        } else {
            0.0
        }
    }
}
