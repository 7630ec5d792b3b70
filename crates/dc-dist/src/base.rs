//! The common distribution contract and the sum type over representations.

use dc_core::env::Env;
use dc_core::error::{DistError, Result};
use dc_shapes::{PointSet, NORMALIZATION_TOLERANCE};
use rand::rngs::StdRng;
use rand::Rng;

use crate::point_set::PointSetDist;
use crate::sample_set::SampleSetDist;
use crate::symbolic::SymbolicDist;

/// Convolution cost of a point mass.
pub const CONVOLUTION_COST_POINT_MASS: usize = 1;
/// Convolution cost of any other symbolic family.
pub const CONVOLUTION_COST_SYMBOLIC: usize = 1_000;
/// Convolution cost of a continuous or mixed point set.
pub const CONVOLUTION_COST_POINT_SET: usize = 1_000;
/// Convolution cost of a sample set; large enough that sample sets are
/// never chosen for convolution.
pub const CONVOLUTION_COST_SAMPLE_SET: usize = 10_000_000;

/// The polymorphic contract every distribution representation satisfies.
///
/// Implementations are value types: every operation returns a new instance
/// and nothing is mutated in place.
pub trait BaseDist {
    /// Lower support bound.
    fn min(&self) -> f64;
    /// Upper support bound.
    fn max(&self) -> f64;
    /// Mean.
    fn mean(&self) -> f64;
    /// Variance; fails for families where it does not exist.
    fn variance(&self) -> Result<f64>;
    /// Standard deviation, `sqrt(variance)`.
    fn stdev(&self) -> Result<f64> {
        Ok(self.variance()?.sqrt())
    }
    /// Mode. Not implemented for any current representation.
    fn mode(&self) -> Result<f64> {
        Err(DistError::NotYetImplemented)
    }
    /// One draw.
    fn sample(&self, rng: &mut StdRng) -> f64;
    /// `n` draws.
    fn sample_n(&self, rng: &mut StdRng, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
    /// Total probability mass (1 for the exact representations).
    fn integral_sum(&self) -> f64;
    /// True when total mass is 1 within tolerance.
    fn is_normalized(&self) -> bool {
        (self.integral_sum() - 1.0).abs() < NORMALIZATION_TOLERANCE
    }
    /// Scale to unit mass.
    fn normalize(&self) -> Result<Dist>;
    /// Restrict the support to `[left, right]`.
    fn truncate(&self, left: Option<f64>, right: Option<f64>, env: &Env) -> Result<Dist>;
    /// Density (plus discrete mass) at `x`. Sample sets need `env` to
    /// estimate a density first.
    fn pdf(&self, x: f64, env: &Env) -> Result<f64>;
    /// Cumulative probability at `x`.
    fn cdf(&self, x: f64) -> f64;
    /// Quantile at `p`.
    fn inv(&self, p: f64) -> f64;
    /// Convert to the discretized representation.
    fn to_point_set(&self, env: &Env) -> Result<PointSetDist>;
    /// Render the density as a unicode sparkline.
    fn to_sparkline(&self, bucket_count: usize, env: &Env) -> Result<String> {
        self.to_point_set(env)?.to_sparkline(bucket_count)
    }
    /// Fixed heuristic cost of convolving this operand, read only by the
    /// strategy chooser.
    fn expected_convolution_cost(&self) -> usize;
}

/// A distribution in any of the three representations.
#[derive(Debug, Clone, PartialEq)]
pub enum Dist {
    /// Closed-form family.
    Symbolic(SymbolicDist),
    /// Monte-Carlo draws.
    SampleSet(SampleSetDist),
    /// Discretized shape.
    PointSet(PointSetDist),
}

impl From<SymbolicDist> for Dist {
    fn from(d: SymbolicDist) -> Self {
        Dist::Symbolic(d)
    }
}

impl From<SampleSetDist> for Dist {
    fn from(d: SampleSetDist) -> Self {
        Dist::SampleSet(d)
    }
}

impl From<PointSetDist> for Dist {
    fn from(d: PointSetDist) -> Self {
        Dist::PointSet(d)
    }
}

impl Dist {
    /// Same concrete representation and equal value.
    pub fn is_equal(&self, other: &Dist) -> bool {
        self == other
    }

    /// The symbolic family, when this is one.
    pub fn as_symbolic(&self) -> Option<&SymbolicDist> {
        match self {
            Dist::Symbolic(s) => Some(s),
            _ => None,
        }
    }

    /// True for the sample-set representation.
    pub fn is_sample_set(&self) -> bool {
        matches!(self, Dist::SampleSet(_))
    }
}

impl BaseDist for SymbolicDist {
    fn min(&self) -> f64 {
        SymbolicDist::min(self)
    }

    fn max(&self) -> f64 {
        SymbolicDist::max(self)
    }

    fn mean(&self) -> f64 {
        SymbolicDist::mean(self)
    }

    fn variance(&self) -> Result<f64> {
        SymbolicDist::variance(self)
    }

    fn sample(&self, rng: &mut StdRng) -> f64 {
        SymbolicDist::sample(self, rng)
    }

    fn integral_sum(&self) -> f64 {
        1.0
    }

    fn normalize(&self) -> Result<Dist> {
        Ok(Dist::Symbolic(*self))
    }

    fn truncate(&self, left: Option<f64>, right: Option<f64>, env: &Env) -> Result<Dist> {
        // A clamped uniform stays in closed form; everything else is
        // truncated in the discretized representation.
        if let SymbolicDist::Uniform(u) = self {
            return Ok(Dist::Symbolic(SymbolicDist::Uniform(u.truncate(left, right)?)));
        }
        let truncated = BaseDist::to_point_set(self, env)?.truncate(left, right)?;
        Ok(Dist::PointSet(truncated))
    }

    fn pdf(&self, x: f64, _env: &Env) -> Result<f64> {
        Ok(SymbolicDist::pdf(self, x))
    }

    fn cdf(&self, x: f64) -> f64 {
        SymbolicDist::cdf(self, x)
    }

    fn inv(&self, p: f64) -> f64 {
        SymbolicDist::inv(self, p)
    }

    fn to_point_set(&self, env: &Env) -> Result<PointSetDist> {
        Ok(PointSetDist::new(SymbolicDist::to_point_set(self, env)?))
    }

    fn expected_convolution_cost(&self) -> usize {
        match self {
            SymbolicDist::PointMass(_) => CONVOLUTION_COST_POINT_MASS,
            _ => CONVOLUTION_COST_SYMBOLIC,
        }
    }
}

impl BaseDist for SampleSetDist {
    fn min(&self) -> f64 {
        SampleSetDist::min(self)
    }

    fn max(&self) -> f64 {
        SampleSetDist::max(self)
    }

    fn mean(&self) -> f64 {
        SampleSetDist::mean(self)
    }

    fn variance(&self) -> Result<f64> {
        Ok(SampleSetDist::variance(self))
    }

    fn sample(&self, rng: &mut StdRng) -> f64 {
        SampleSetDist::sample(self, rng)
    }

    fn sample_n(&self, rng: &mut StdRng, n: usize) -> Vec<f64> {
        SampleSetDist::sample_n(self, rng, n)
    }

    fn integral_sum(&self) -> f64 {
        1.0
    }

    fn normalize(&self) -> Result<Dist> {
        Ok(Dist::SampleSet(self.clone()))
    }

    fn truncate(&self, left: Option<f64>, right: Option<f64>, _env: &Env) -> Result<Dist> {
        Ok(Dist::SampleSet(SampleSetDist::truncate(self, left, right)?))
    }

    fn pdf(&self, x: f64, env: &Env) -> Result<f64> {
        Ok(BaseDist::to_point_set(self, env)?.pdf(x))
    }

    fn cdf(&self, x: f64) -> f64 {
        SampleSetDist::cdf(self, x)
    }

    fn inv(&self, p: f64) -> f64 {
        SampleSetDist::inv(self, p)
    }

    fn to_point_set(&self, env: &Env) -> Result<PointSetDist> {
        Ok(PointSetDist::new(SampleSetDist::to_point_set(self, env)?))
    }

    fn expected_convolution_cost(&self) -> usize {
        CONVOLUTION_COST_SAMPLE_SET
    }
}

impl BaseDist for PointSetDist {
    fn min(&self) -> f64 {
        PointSetDist::min(self)
    }

    fn max(&self) -> f64 {
        PointSetDist::max(self)
    }

    fn mean(&self) -> f64 {
        PointSetDist::mean(self)
    }

    fn variance(&self) -> Result<f64> {
        Ok(PointSetDist::variance(self))
    }

    fn sample(&self, rng: &mut StdRng) -> f64 {
        // Inverse-CDF of a uniform draw.
        self.inv(rng.gen())
    }

    fn integral_sum(&self) -> f64 {
        PointSetDist::integral_sum(self)
    }

    fn is_normalized(&self) -> bool {
        PointSetDist::is_normalized(self)
    }

    fn normalize(&self) -> Result<Dist> {
        Ok(Dist::PointSet(PointSetDist::normalize(self)?))
    }

    fn truncate(&self, left: Option<f64>, right: Option<f64>, _env: &Env) -> Result<Dist> {
        Ok(Dist::PointSet(PointSetDist::truncate(self, left, right)?))
    }

    fn pdf(&self, x: f64, _env: &Env) -> Result<f64> {
        Ok(PointSetDist::pdf(self, x))
    }

    fn cdf(&self, x: f64) -> f64 {
        PointSetDist::cdf(self, x)
    }

    fn inv(&self, p: f64) -> f64 {
        PointSetDist::inv(self, p)
    }

    fn to_point_set(&self, _env: &Env) -> Result<PointSetDist> {
        Ok(self.clone())
    }

    fn to_sparkline(&self, bucket_count: usize, _env: &Env) -> Result<String> {
        PointSetDist::to_sparkline(self, bucket_count)
    }

    fn expected_convolution_cost(&self) -> usize {
        match self.shape() {
            PointSet::Discrete(d) => d.len(),
            PointSet::Continuous(_) | PointSet::Mixed(_) => CONVOLUTION_COST_POINT_SET,
        }
    }
}

impl BaseDist for Dist {
    fn min(&self) -> f64 {
        match self {
            Dist::Symbolic(d) => BaseDist::min(d),
            Dist::SampleSet(d) => BaseDist::min(d),
            Dist::PointSet(d) => BaseDist::min(d),
        }
    }

    fn max(&self) -> f64 {
        match self {
            Dist::Symbolic(d) => BaseDist::max(d),
            Dist::SampleSet(d) => BaseDist::max(d),
            Dist::PointSet(d) => BaseDist::max(d),
        }
    }

    fn mean(&self) -> f64 {
        match self {
            Dist::Symbolic(d) => BaseDist::mean(d),
            Dist::SampleSet(d) => BaseDist::mean(d),
            Dist::PointSet(d) => BaseDist::mean(d),
        }
    }

    fn variance(&self) -> Result<f64> {
        match self {
            Dist::Symbolic(d) => BaseDist::variance(d),
            Dist::SampleSet(d) => BaseDist::variance(d),
            Dist::PointSet(d) => BaseDist::variance(d),
        }
    }

    fn sample(&self, rng: &mut StdRng) -> f64 {
        match self {
            Dist::Symbolic(d) => BaseDist::sample(d, rng),
            Dist::SampleSet(d) => BaseDist::sample(d, rng),
            Dist::PointSet(d) => BaseDist::sample(d, rng),
        }
    }

    fn sample_n(&self, rng: &mut StdRng, n: usize) -> Vec<f64> {
        match self {
            Dist::Symbolic(d) => BaseDist::sample_n(d, rng, n),
            Dist::SampleSet(d) => BaseDist::sample_n(d, rng, n),
            Dist::PointSet(d) => BaseDist::sample_n(d, rng, n),
        }
    }

    fn integral_sum(&self) -> f64 {
        match self {
            Dist::Symbolic(d) => BaseDist::integral_sum(d),
            Dist::SampleSet(d) => BaseDist::integral_sum(d),
            Dist::PointSet(d) => BaseDist::integral_sum(d),
        }
    }

    fn is_normalized(&self) -> bool {
        match self {
            Dist::Symbolic(d) => BaseDist::is_normalized(d),
            Dist::SampleSet(d) => BaseDist::is_normalized(d),
            Dist::PointSet(d) => BaseDist::is_normalized(d),
        }
    }

    fn normalize(&self) -> Result<Dist> {
        match self {
            Dist::Symbolic(d) => BaseDist::normalize(d),
            Dist::SampleSet(d) => BaseDist::normalize(d),
            Dist::PointSet(d) => BaseDist::normalize(d),
        }
    }

    fn truncate(&self, left: Option<f64>, right: Option<f64>, env: &Env) -> Result<Dist> {
        match self {
            Dist::Symbolic(d) => BaseDist::truncate(d, left, right, env),
            Dist::SampleSet(d) => BaseDist::truncate(d, left, right, env),
            Dist::PointSet(d) => BaseDist::truncate(d, left, right, env),
        }
    }

    fn pdf(&self, x: f64, env: &Env) -> Result<f64> {
        match self {
            Dist::Symbolic(d) => BaseDist::pdf(d, x, env),
            Dist::SampleSet(d) => BaseDist::pdf(d, x, env),
            Dist::PointSet(d) => BaseDist::pdf(d, x, env),
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        match self {
            Dist::Symbolic(d) => BaseDist::cdf(d, x),
            Dist::SampleSet(d) => BaseDist::cdf(d, x),
            Dist::PointSet(d) => BaseDist::cdf(d, x),
        }
    }

    fn inv(&self, p: f64) -> f64 {
        match self {
            Dist::Symbolic(d) => BaseDist::inv(d, p),
            Dist::SampleSet(d) => BaseDist::inv(d, p),
            Dist::PointSet(d) => BaseDist::inv(d, p),
        }
    }

    fn to_point_set(&self, env: &Env) -> Result<PointSetDist> {
        match self {
            Dist::Symbolic(d) => BaseDist::to_point_set(d, env),
            Dist::SampleSet(d) => BaseDist::to_point_set(d, env),
            Dist::PointSet(d) => BaseDist::to_point_set(d, env),
        }
    }

    fn to_sparkline(&self, bucket_count: usize, env: &Env) -> Result<String> {
        match self {
            Dist::Symbolic(d) => BaseDist::to_sparkline(d, bucket_count, env),
            Dist::SampleSet(d) => BaseDist::to_sparkline(d, bucket_count, env),
            Dist::PointSet(d) => BaseDist::to_sparkline(d, bucket_count, env),
        }
    }

    fn expected_convolution_cost(&self) -> usize {
        match self {
            Dist::Symbolic(d) => d.expected_convolution_cost(),
            Dist::SampleSet(d) => d.expected_convolution_cost(),
            Dist::PointSet(d) => d.expected_convolution_cost(),
        }
    }
}
