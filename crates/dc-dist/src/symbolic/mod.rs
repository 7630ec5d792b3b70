//! Closed-form distribution families.
//!
//! Thirteen families, each an immutable parameter struct validated at
//! construction, dispatched through the [`SymbolicDist`] sum type. Exact
//! pdf/cdf/quantile come from statrs where it has the family and from
//! closed-form expressions otherwise; sampling goes through `rand_distr`.

use dc_core::env::Env;
use dc_core::error::{DistError, Result};
use dc_shapes::{ContinuousShape, DiscreteShape, PointSet, XYShape};
use rand::rngs::StdRng;

/// Bernoulli distribution.
pub mod bernoulli;
/// Beta distribution.
pub mod beta;
/// Binomial distribution.
pub mod binomial;
/// Cauchy distribution.
pub mod cauchy;
/// Exponential distribution.
pub mod exponential;
/// Gamma distribution.
pub mod gamma;
/// Logistic distribution.
pub mod logistic;
/// Lognormal distribution.
pub mod lognormal;
/// Normal distribution.
pub mod normal;
/// Point mass.
pub mod point_mass;
/// Poisson distribution.
pub mod poisson;
/// Closed-form combination shortcuts.
pub mod simplify;
/// Triangular distribution.
pub mod triangular;
/// Uniform distribution.
pub mod uniform;

pub use bernoulli::Bernoulli;
pub use beta::Beta;
pub use binomial::Binomial;
pub use cauchy::Cauchy;
pub use exponential::Exponential;
pub use gamma::Gamma;
pub use logistic::Logistic;
pub use lognormal::Lognormal;
pub use normal::Normal;
pub use point_mass::PointMass;
pub use poisson::Poisson;
pub use simplify::try_analytical_simplification;
pub use triangular::Triangular;
pub use uniform::Uniform;

/// Quantile used for the default lower support bound.
pub const MIN_CDF_QUANTILE: f64 = 0.0001;
/// Quantile used for the default upper support bound.
pub const MAX_CDF_QUANTILE: f64 = 0.9999;

/// How to place x coordinates when discretizing a continuous family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XSelection {
    /// Evenly in domain space.
    Linear,
    /// Evenly in quantile space, so points concentrate where mass does.
    #[default]
    ByWeight,
}

/// A closed-form distribution family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SymbolicDist {
    /// Normal.
    Normal(Normal),
    /// Exponential.
    Exponential(Exponential),
    /// Cauchy.
    Cauchy(Cauchy),
    /// Triangular.
    Triangular(Triangular),
    /// Beta.
    Beta(Beta),
    /// Lognormal.
    Lognormal(Lognormal),
    /// Uniform.
    Uniform(Uniform),
    /// Logistic.
    Logistic(Logistic),
    /// Bernoulli.
    Bernoulli(Bernoulli),
    /// Gamma.
    Gamma(Gamma),
    /// Point mass.
    PointMass(PointMass),
    /// Binomial.
    Binomial(Binomial),
    /// Poisson.
    Poisson(Poisson),
}

impl SymbolicDist {
    /// True for the families whose support is a set of atoms.
    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            SymbolicDist::Bernoulli(_)
                | SymbolicDist::PointMass(_)
                | SymbolicDist::Binomial(_)
                | SymbolicDist::Poisson(_)
        )
    }

    /// Density (or mass, for discrete families) at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        match self {
            SymbolicDist::Normal(d) => d.pdf(x),
            SymbolicDist::Exponential(d) => d.pdf(x),
            SymbolicDist::Cauchy(d) => d.pdf(x),
            SymbolicDist::Triangular(d) => d.pdf(x),
            SymbolicDist::Beta(d) => d.pdf(x),
            SymbolicDist::Lognormal(d) => d.pdf(x),
            SymbolicDist::Uniform(d) => d.pdf(x),
            SymbolicDist::Logistic(d) => d.pdf(x),
            SymbolicDist::Bernoulli(d) => d.pmf(x),
            SymbolicDist::Gamma(d) => d.pdf(x),
            SymbolicDist::PointMass(d) => d.pmf(x),
            SymbolicDist::Binomial(d) => d.pmf(x),
            SymbolicDist::Poisson(d) => d.pmf(x),
        }
    }

    /// Cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        match self {
            SymbolicDist::Normal(d) => d.cdf(x),
            SymbolicDist::Exponential(d) => d.cdf(x),
            SymbolicDist::Cauchy(d) => d.cdf(x),
            SymbolicDist::Triangular(d) => d.cdf(x),
            SymbolicDist::Beta(d) => d.cdf(x),
            SymbolicDist::Lognormal(d) => d.cdf(x),
            SymbolicDist::Uniform(d) => d.cdf(x),
            SymbolicDist::Logistic(d) => d.cdf(x),
            SymbolicDist::Bernoulli(d) => d.cdf(x),
            SymbolicDist::Gamma(d) => d.cdf(x),
            SymbolicDist::PointMass(d) => d.cdf(x),
            SymbolicDist::Binomial(d) => d.cdf(x),
            SymbolicDist::Poisson(d) => d.cdf(x),
        }
    }

    /// Quantile at `p`.
    pub fn inv(&self, p: f64) -> f64 {
        match self {
            SymbolicDist::Normal(d) => d.inv(p),
            SymbolicDist::Exponential(d) => d.inv(p),
            SymbolicDist::Cauchy(d) => d.inv(p),
            SymbolicDist::Triangular(d) => d.inv(p),
            SymbolicDist::Beta(d) => d.inv(p),
            SymbolicDist::Lognormal(d) => d.inv(p),
            SymbolicDist::Uniform(d) => d.inv(p),
            SymbolicDist::Logistic(d) => d.inv(p),
            SymbolicDist::Bernoulli(d) => d.inv(p),
            SymbolicDist::Gamma(d) => d.inv(p),
            SymbolicDist::PointMass(d) => d.inv(p),
            SymbolicDist::Binomial(d) => d.inv(p),
            SymbolicDist::Poisson(d) => d.inv(p),
        }
    }

    /// Exact mean; `NaN` for Cauchy, whose mean does not exist.
    pub fn mean(&self) -> f64 {
        match self {
            SymbolicDist::Normal(d) => d.mean(),
            SymbolicDist::Exponential(d) => d.mean(),
            SymbolicDist::Cauchy(d) => d.mean(),
            SymbolicDist::Triangular(d) => d.mean(),
            SymbolicDist::Beta(d) => d.mean(),
            SymbolicDist::Lognormal(d) => d.mean(),
            SymbolicDist::Uniform(d) => d.mean(),
            SymbolicDist::Logistic(d) => d.mean(),
            SymbolicDist::Bernoulli(d) => d.mean(),
            SymbolicDist::Gamma(d) => d.mean(),
            SymbolicDist::PointMass(d) => d.mean(),
            SymbolicDist::Binomial(d) => d.mean(),
            SymbolicDist::Poisson(d) => d.mean(),
        }
    }

    /// Exact variance; fails for Cauchy, whose variance does not exist.
    pub fn variance(&self) -> Result<f64> {
        Ok(match self {
            SymbolicDist::Normal(d) => d.variance(),
            SymbolicDist::Exponential(d) => d.variance(),
            SymbolicDist::Cauchy(_) => {
                return Err(DistError::OtherError(
                    "Cauchy distributions have no variance".into(),
                ))
            }
            SymbolicDist::Triangular(d) => d.variance(),
            SymbolicDist::Beta(d) => d.variance(),
            SymbolicDist::Lognormal(d) => d.variance(),
            SymbolicDist::Uniform(d) => d.variance(),
            SymbolicDist::Logistic(d) => d.variance(),
            SymbolicDist::Bernoulli(d) => d.variance(),
            SymbolicDist::Gamma(d) => d.variance(),
            SymbolicDist::PointMass(d) => d.variance(),
            SymbolicDist::Binomial(d) => d.variance(),
            SymbolicDist::Poisson(d) => d.variance(),
        })
    }

    /// One draw.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        match self {
            SymbolicDist::Normal(d) => d.sample(rng),
            SymbolicDist::Exponential(d) => d.sample(rng),
            SymbolicDist::Cauchy(d) => d.sample(rng),
            SymbolicDist::Triangular(d) => d.sample(rng),
            SymbolicDist::Beta(d) => d.sample(rng),
            SymbolicDist::Lognormal(d) => d.sample(rng),
            SymbolicDist::Uniform(d) => d.sample(rng),
            SymbolicDist::Logistic(d) => d.sample(rng),
            SymbolicDist::Bernoulli(d) => d.sample(rng),
            SymbolicDist::Gamma(d) => d.sample(rng),
            SymbolicDist::PointMass(d) => d.sample(),
            SymbolicDist::Binomial(d) => d.sample(rng),
            SymbolicDist::Poisson(d) => d.sample(rng),
        }
    }

    /// Lower support bound.
    ///
    /// Defaults to the 0.0001 quantile; exact for the families with hard
    /// bounds (Uniform, Triangular, Bernoulli, PointMass) and for the
    /// discrete counting families, which start at 0.
    pub fn min(&self) -> f64 {
        match self {
            SymbolicDist::Uniform(d) => d.low(),
            SymbolicDist::Triangular(d) => d.low(),
            SymbolicDist::Bernoulli(d) => d.min(),
            SymbolicDist::PointMass(d) => d.value(),
            SymbolicDist::Binomial(_) | SymbolicDist::Poisson(_) => 0.0,
            _ => self.inv(MIN_CDF_QUANTILE),
        }
    }

    /// Upper support bound; the 0.9999 quantile unless an exact bound exists.
    pub fn max(&self) -> f64 {
        match self {
            SymbolicDist::Uniform(d) => d.high(),
            SymbolicDist::Triangular(d) => d.high(),
            SymbolicDist::Bernoulli(d) => d.max(),
            SymbolicDist::PointMass(d) => d.value(),
            SymbolicDist::Binomial(d) => d.n() as f64,
            _ => self.inv(MAX_CDF_QUANTILE),
        }
    }

    /// Discretize with the default x placement ([`XSelection::ByWeight`]).
    pub fn to_point_set(&self, env: &Env) -> Result<PointSet> {
        self.to_point_set_with(env, XSelection::default())
    }

    /// Discretize into a point set of `env.xy_point_length` points.
    pub fn to_point_set_with(&self, env: &Env, selection: XSelection) -> Result<PointSet> {
        if self.is_discrete() {
            return self.enumerate_atoms().map(PointSet::Discrete);
        }
        if let SymbolicDist::Uniform(u) = self {
            return uniform_point_set(u, env.xy_point_length).map(PointSet::Continuous);
        }
        let n = env.xy_point_length.max(2);
        let raw: Vec<f64> = match selection {
            XSelection::Linear => {
                let (lo, hi) = (self.min(), self.max());
                let step = (hi - lo) / (n - 1) as f64;
                (0..n).map(|i| lo + step * i as f64).collect()
            }
            XSelection::ByWeight => {
                let span = MAX_CDF_QUANTILE - MIN_CDF_QUANTILE;
                (0..n)
                    .map(|i| self.inv(MIN_CDF_QUANTILE + span * i as f64 / (n - 1) as f64))
                    .collect()
            }
        };
        // Quantiles of a flat cdf region can repeat; keep xs strictly
        // increasing.
        let mut xs: Vec<f64> = Vec::with_capacity(raw.len());
        for x in raw {
            if xs.last().map_or(true, |&last| x > last) {
                xs.push(x);
            }
        }
        let ys: Vec<f64> = xs.iter().map(|&x| self.pdf(x)).collect();
        let shape = ContinuousShape::make(XYShape::new(xs, ys)?)?;
        Ok(PointSet::Continuous(shape))
    }

    /// Enumerate a discrete family's atoms.
    ///
    /// Unbounded counting families (Poisson, and Binomial with large `n`)
    /// are enumerated over a quantile-bounded range.
    fn enumerate_atoms(&self) -> Result<DiscreteShape> {
        let atoms: Vec<(f64, f64)> = match self {
            SymbolicDist::PointMass(d) => vec![(d.value(), 1.0)],
            SymbolicDist::Bernoulli(d) => [(0.0, 1.0 - d.p()), (1.0, d.p())]
                .into_iter()
                .filter(|(_, w)| *w > 0.0)
                .collect(),
            SymbolicDist::Binomial(_) | SymbolicDist::Poisson(_) => {
                let lo = self.inv(MIN_CDF_QUANTILE) as u64;
                let hi = self.inv(MAX_CDF_QUANTILE) as u64;
                (lo..=hi)
                    .map(|k| (k as f64, self.pdf(k as f64)))
                    .filter(|(_, w)| *w > 0.0)
                    .collect()
            }
            _ => {
                return Err(DistError::Unreachable(
                    "enumerate_atoms called on a continuous family".into(),
                ))
            }
        };
        Ok(DiscreteShape::from_weighted_points(atoms)?)
    }
}

/// Discretize a uniform distribution.
///
/// The flat interior gets an even grid; ε-offset points straddling the two
/// discontinuities make the rendered density drop to zero at the bounds
/// instead of interpolating across them.
fn uniform_point_set(u: &Uniform, n: usize) -> Result<ContinuousShape> {
    let (low, high) = (u.low(), u.high());
    let eps = (high - low) * 1e-7;
    let density = 1.0 / (high - low);
    let n = n.max(2);
    let step = (high - low - 2.0 * eps) / (n - 1) as f64;
    let mut points = Vec::with_capacity(n + 2);
    points.push((low - eps, 0.0));
    for i in 0..n {
        points.push((low + eps + step * i as f64, density));
    }
    points.push((high + eps, 0.0));
    Ok(ContinuousShape::make(XYShape::from_zipped(points)?)?)
}
