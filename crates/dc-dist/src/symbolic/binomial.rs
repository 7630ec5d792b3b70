//! Binomial distribution.

use dc_core::error::{DistError, Result};
use rand::rngs::StdRng;
use rand_distr::{Binomial as RandBinomial, Distribution};
use statrs::distribution::{Binomial as StatrsBinomial, Discrete, DiscreteCDF};

/// Binomial distribution: number of successes in `n` trials of probability
/// `p`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binomial {
    n: u64,
    p: f64,
}

impl Binomial {
    /// Construct; `n` must be a non-negative integer and `p` a probability.
    pub fn new(n: f64, p: f64) -> Result<Self> {
        if !n.is_finite() || !p.is_finite() {
            return Err(DistError::NonNumericInput(format!(
                "binomial parameters must be finite, got n={n}, p={p}"
            )));
        }
        if n < 0.0 || n.fract() != 0.0 {
            return Err(DistError::ArgumentError(
                "Binomial n must be a non-negative integer".into(),
            ));
        }
        if !(0.0..=1.0).contains(&p) {
            return Err(DistError::ArgumentError(
                "Binomial p must be in [0, 1]".into(),
            ));
        }
        Ok(Self { n: n as u64, p })
    }

    /// Number of trials.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Success probability.
    pub fn p(&self) -> f64 {
        self.p
    }

    #[inline]
    fn statrs(&self) -> StatrsBinomial {
        StatrsBinomial::new(self.p, self.n).expect("parameters validated at construction")
    }

    /// Mass at `x`; nonzero only at integers in `[0, n]`.
    pub fn pmf(&self, x: f64) -> f64 {
        if x < 0.0 || x > self.n as f64 || x.fract() != 0.0 {
            0.0
        } else {
            self.statrs().pmf(x as u64)
        }
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else if x >= self.n as f64 {
            1.0
        } else {
            self.statrs().cdf(x.floor() as u64)
        }
    }

    /// Quantile at `q`.
    pub fn inv(&self, q: f64) -> f64 {
        self.statrs().inverse_cdf(q.clamp(0.0, 1.0)) as f64
    }

    /// `np`.
    pub fn mean(&self) -> f64 {
        self.n as f64 * self.p
    }

    /// `np(1-p)`.
    pub fn variance(&self) -> f64 {
        self.n as f64 * self.p * (1.0 - self.p)
    }

    /// One draw.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        RandBinomial::new(self.n, self.p)
            .expect("parameters validated at construction")
            .sample(rng) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integer_n_enforced() {
        assert!(Binomial::new(2.5, 0.5).is_err());
        assert!(Binomial::new(-1.0, 0.5).is_err());
        assert!(Binomial::new(10.0, 1.5).is_err());
        assert!(Binomial::new(0.0, 0.5).is_ok());
    }

    #[test]
    fn test_moments() {
        let b = Binomial::new(10.0, 0.3).unwrap();
        assert_relative_eq!(b.mean(), 3.0);
        assert_relative_eq!(b.variance(), 2.1);
    }

    #[test]
    fn test_pmf_sums_to_one() {
        let b = Binomial::new(5.0, 0.4).unwrap();
        let total: f64 = (0..=5).map(|k| b.pmf(k as f64)).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        assert_relative_eq!(b.pmf(2.5), 0.0);
    }

    #[test]
    fn test_cdf_endpoints() {
        let b = Binomial::new(4.0, 0.5).unwrap();
        assert_relative_eq!(b.cdf(-1.0), 0.0);
        assert_relative_eq!(b.cdf(4.0), 1.0);
        assert_relative_eq!(b.cdf(1.0), b.pmf(0.0) + b.pmf(1.0), epsilon = 1e-12);
    }
}
