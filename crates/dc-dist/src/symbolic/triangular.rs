//! Triangular distribution.

use dc_core::error::{DistError, Result};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Triangular as RandTriangular};

/// Triangular distribution on `[low, high]` with mode `medium`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangular {
    low: f64,
    medium: f64,
    high: f64,
}

impl Triangular {
    /// Construct; requires `low < medium < high`, all finite.
    pub fn new(low: f64, medium: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !medium.is_finite() || !high.is_finite() {
            return Err(DistError::NonNumericInput(format!(
                "triangular parameters must be finite, got ({low}, {medium}, {high})"
            )));
        }
        if !(low < medium && medium < high) {
            return Err(DistError::ArgumentError(
                "Triangular values must be increasing order".into(),
            ));
        }
        Ok(Self { low, medium, high })
    }

    /// Lower bound.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Mode.
    pub fn medium(&self) -> f64 {
        self.medium
    }

    /// Upper bound.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        let (a, c, b) = (self.low, self.medium, self.high);
        if x < a || x > b {
            0.0
        } else if x < c {
            2.0 * (x - a) / ((b - a) * (c - a))
        } else if x == c {
            2.0 / (b - a)
        } else {
            2.0 * (b - x) / ((b - a) * (b - c))
        }
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        let (a, c, b) = (self.low, self.medium, self.high);
        if x <= a {
            0.0
        } else if x <= c {
            (x - a) * (x - a) / ((b - a) * (c - a))
        } else if x < b {
            1.0 - (b - x) * (b - x) / ((b - a) * (b - c))
        } else {
            1.0
        }
    }

    /// Quantile at `p`.
    pub fn inv(&self, p: f64) -> f64 {
        let (a, c, b) = (self.low, self.medium, self.high);
        let split = (c - a) / (b - a);
        if p <= 0.0 {
            a
        } else if p >= 1.0 {
            b
        } else if p < split {
            a + (p * (b - a) * (c - a)).sqrt()
        } else {
            b - ((1.0 - p) * (b - a) * (b - c)).sqrt()
        }
    }

    /// `(a + b + c)/3`.
    pub fn mean(&self) -> f64 {
        (self.low + self.medium + self.high) / 3.0
    }

    /// `(a² + b² + c² − ab − ac − bc)/18`.
    pub fn variance(&self) -> f64 {
        let (a, c, b) = (self.low, self.medium, self.high);
        (a * a + b * b + c * c - a * b - a * c - b * c) / 18.0
    }

    /// One draw.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        RandTriangular::new(self.low, self.high, self.medium)
            .expect("parameters validated at construction")
            .sample(rng)
    }
}
