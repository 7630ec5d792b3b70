//! Distribution-level operations and the strategy chooser.
//!
//! Combining two distributions can run three ways: an exact analytical
//! shortcut (both symbolic, closed form exists), numerical convolution of
//! their point-set forms, or pairwise Monte Carlo over fresh sample sets.
//! [`algebraic_combination`] picks among them with a cost heuristic; callers
//! may force a strategy, and a forced strategy the operands cannot support
//! is an error, never a silent fallback.

use dc_core::env::Env;
use dc_core::error::{DistError, Result};
use dc_core::ops::AlgebraicOp;
use dc_shapes::{combine_algebraically, PointSet};
use rand::rngs::StdRng;

use crate::base::{BaseDist, Dist};
use crate::point_set::PointSetDist;
use crate::sample_set::SampleSetDist;
use crate::symbolic::try_analytical_simplification;

/// Convolve only when `cost(t1) · cost(t2)` stays under this ceiling.
pub const MONTE_CARLO_COST_THRESHOLD: usize = 10_000_000;

/// Where logarithm operands are probed for positive support.
const LOG_DOMAIN_EPSILON: f64 = 1e-10;

/// A combination strategy, forceable by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Exact closed-form shortcut; both operands must be symbolic with an
    /// entry in the simplification table.
    Analytical,
    /// Numerical convolution of point-set forms; the operation must be
    /// convolvable.
    Convolution,
    /// Pairwise combination of fresh sample sets.
    MonteCarlo,
}

/// Combine two distributions under an algebraic operation.
///
/// With `strategy = None` the chooser runs: analytical shortcut if one
/// exists, convolution when neither operand is a sample set, the operation
/// convolves, and the cost product is under
/// [`MONTE_CARLO_COST_THRESHOLD`], Monte Carlo otherwise.
pub fn algebraic_combination(
    env: &Env,
    rng: &mut StdRng,
    op: AlgebraicOp,
    t1: &Dist,
    t2: &Dist,
    strategy: Option<Strategy>,
) -> Result<Dist> {
    if op == AlgebraicOp::Logarithm {
        ensure_positive_support(t1)?;
        ensure_positive_support(t2)?;
    }
    match strategy {
        Some(Strategy::Analytical) => {
            let (Dist::Symbolic(s1), Dist::Symbolic(s2)) = (t1, t2) else {
                return Err(DistError::RequestedStrategyInvalid(
                    "analytical combination requires two symbolic operands".into(),
                ));
            };
            match try_analytical_simplification(s1, s2, op) {
                Some(result) => Ok(Dist::Symbolic(result?)),
                None => Err(DistError::RequestedStrategyInvalid(format!(
                    "no analytical shortcut exists for these operands under {op}"
                ))),
            }
        }
        Some(Strategy::Convolution) => {
            if !op.is_convolvable() {
                return Err(DistError::RequestedStrategyInvalid(format!(
                    "operation {op} cannot be computed by convolution"
                )));
            }
            convolve(env, op, t1, t2)
        }
        Some(Strategy::MonteCarlo) => monte_carlo(env, rng, op, t1, t2),
        None => {
            if let (Dist::Symbolic(s1), Dist::Symbolic(s2)) = (t1, t2) {
                if let Some(result) = try_analytical_simplification(s1, s2, op) {
                    return Ok(Dist::Symbolic(result?));
                }
            }
            let neither_sampled = !t1.is_sample_set() && !t2.is_sample_set();
            let cost = t1.expected_convolution_cost() * t2.expected_convolution_cost();
            if neither_sampled && op.is_convolvable() && cost < MONTE_CARLO_COST_THRESHOLD {
                convolve(env, op, t1, t2)
            } else {
                log::debug!(
                    "falling back to Monte Carlo for {op} (cost product {cost})"
                );
                monte_carlo(env, rng, op, t1, t2)
            }
        }
    }
}

/// Logarithm operands must sit entirely above zero.
fn ensure_positive_support(d: &Dist) -> Result<()> {
    let c = d.cdf(LOG_DOMAIN_EPSILON);
    if c != 0.0 {
        return Err(DistError::LogarithmOfDistributionError(
            "logarithm of a distribution with mass at or below zero".into(),
        ));
    }
    Ok(())
}

fn convolve(env: &Env, op: AlgebraicOp, t1: &Dist, t2: &Dist) -> Result<Dist> {
    let p1 = t1.to_point_set(env)?;
    let p2 = t2.to_point_set(env)?;
    let shape = combine_algebraically(op, p1.shape(), p2.shape())?;
    Ok(Dist::PointSet(PointSetDist::new(shape)))
}

fn monte_carlo(
    env: &Env,
    rng: &mut StdRng,
    op: AlgebraicOp,
    t1: &Dist,
    t2: &Dist,
) -> Result<Dist> {
    let s1 = to_sample_set(env, rng, t1)?;
    let s2 = to_sample_set(env, rng, t2)?;
    let combined = SampleSetDist::map2(&s1, &s2, |a, b| op.apply(a, b))?;
    Ok(Dist::SampleSet(combined))
}

/// Reuse an existing sample set, otherwise draw `env.sample_count` samples.
fn to_sample_set(env: &Env, rng: &mut StdRng, d: &Dist) -> Result<SampleSetDist> {
    match d {
        Dist::SampleSet(s) => Ok(s.clone()),
        _ => SampleSetDist::from_dist(d, env, rng),
    }
}

/// Combine a distribution with a scalar pointwise, transforming y-values.
///
/// Adding or subtracting a constant from every density value would break
/// normalization, so those are rejected outright. Multiply/Divide are linear
/// and carry the integral caches through; Power/Logarithm drop them.
pub fn pointwise_combination_float(
    env: &Env,
    op: AlgebraicOp,
    dist: &Dist,
    f: f64,
) -> Result<Dist> {
    if !f.is_finite() {
        return Err(DistError::NonNumericInput(format!(
            "pointwise operand must be finite, got {f}"
        )));
    }
    let shape = dist.to_point_set(env)?.into_shape();
    let combined = match op {
        AlgebraicOp::Add | AlgebraicOp::Subtract => {
            return Err(DistError::DistributionVerticalShiftIsInvalid)
        }
        AlgebraicOp::Multiply => shape.map_y_with_cache(|y| y * f, |sum| sum * f)?,
        AlgebraicOp::Divide => {
            if f == 0.0 {
                return Err(DistError::Operation(
                    dc_core::error::OperationError::DivisionByZero,
                ));
            }
            shape.map_y_with_cache(|y| y / f, |sum| sum / f)?
        }
        AlgebraicOp::Power | AlgebraicOp::Logarithm => {
            shape.map_y_result(|y| op.apply(y, f))?
        }
    };
    Ok(Dist::PointSet(PointSetDist::new(combined)))
}

/// Weighted mixture of distributions.
///
/// Two genuinely different algorithms: when every operand is a sample set,
/// draws are mixed categorically (preserving the sample representation);
/// otherwise each operand is discretized, scaled by its normalized weight,
/// summed pointwise, and renormalized.
pub fn mixture(env: &Env, rng: &mut StdRng, components: &[(Dist, f64)]) -> Result<Dist> {
    if components.is_empty() {
        return Err(DistError::OtherError(
            "mixture must have at least one component".into(),
        ));
    }
    if let Some((_, w)) = components.iter().find(|(_, w)| *w < 0.0 || !w.is_finite()) {
        return Err(DistError::ArgumentError(format!(
            "mixture weights must be non-negative and finite, got {w}"
        )));
    }
    let total: f64 = components.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return Err(DistError::ArgumentError(
            "mixture weights must sum to a positive value".into(),
        ));
    }

    if components.iter().all(|(d, _)| d.is_sample_set()) {
        let sets: Vec<(&SampleSetDist, f64)> = components
            .iter()
            .map(|(d, w)| match d {
                Dist::SampleSet(s) => (s, *w),
                _ => unreachable!("all components checked to be sample sets"),
            })
            .collect();
        let mixed = SampleSetDist::mixture(&sets, env.sample_count, rng)?;
        return Ok(Dist::SampleSet(mixed));
    }

    let mut acc: Option<PointSet> = None;
    for (d, w) in components {
        let normalized = d.to_point_set(env)?.into_shape().normalize()?;
        let scaled = normalized.scale_by(w / total)?;
        acc = Some(match acc {
            None => scaled,
            Some(sum) => PointSet::combine_pointwise(&sum, &scaled, |a, b| Ok(a + b))?,
        });
    }
    let shape = acc.expect("components is non-empty").normalize()?;
    Ok(Dist::PointSet(PointSetDist::new(shape)))
}

/// Restrict a distribution's support to `[left, right]`.
///
/// A clamped uniform stays symbolic, sample sets filter their draws, and
/// everything else is truncated in point-set form and renormalized.
pub fn truncate(
    env: &Env,
    dist: &Dist,
    left: Option<f64>,
    right: Option<f64>,
) -> Result<Dist> {
    if left.is_none() && right.is_none() {
        return Ok(dist.clone());
    }
    if let (Some(l), Some(r)) = (left, right) {
        if l >= r {
            return Err(DistError::ArgumentError(format!(
                "truncation window is empty: left {l} is not below right {r}"
            )));
        }
    }
    dist.truncate(left, right, env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{Lognormal, Normal, PointMass, SymbolicDist, Uniform};
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn env() -> Env {
        Env::default()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    fn normal(mean: f64, stdev: f64) -> Dist {
        Dist::Symbolic(SymbolicDist::Normal(Normal::new(mean, stdev).unwrap()))
    }

    fn sample_set(n: usize) -> Dist {
        Dist::SampleSet(SampleSetDist::make((0..n).map(|i| i as f64).collect()).unwrap())
    }

    #[test]
    fn test_normal_sum_takes_symbolic_path() {
        let mut r = rng();
        let sum = algebraic_combination(
            &env(),
            &mut r,
            AlgebraicOp::Add,
            &normal(0.0, 1.0),
            &normal(0.0, 1.0),
            None,
        )
        .unwrap();
        assert_eq!(
            sum,
            Dist::Symbolic(SymbolicDist::Normal(
                Normal::new(0.0, std::f64::consts::SQRT_2).unwrap()
            ))
        );
    }

    #[test]
    fn test_sample_set_operand_forces_monte_carlo() {
        let mut r = rng();
        let result = algebraic_combination(
            &env(),
            &mut r,
            AlgebraicOp::Add,
            &sample_set(10_000),
            &normal(0.0, 1.0),
            None,
        )
        .unwrap();
        assert!(matches!(result, Dist::SampleSet(_)));
    }

    #[test]
    fn test_non_convolvable_op_goes_monte_carlo() {
        let mut r = rng();
        let lognormal =
            Dist::Symbolic(SymbolicDist::Lognormal(Lognormal::new(0.0, 0.5).unwrap()));
        let result = algebraic_combination(
            &env(),
            &mut r,
            AlgebraicOp::Power,
            &lognormal,
            &normal(1.0, 0.1),
            None,
        )
        .unwrap();
        assert!(matches!(result, Dist::SampleSet(_)));
    }

    #[test]
    fn test_symbolic_pair_without_shortcut_convolves() {
        let mut r = rng();
        let uniform = Dist::Symbolic(SymbolicDist::Uniform(Uniform::new(0.0, 1.0).unwrap()));
        let result = algebraic_combination(
            &env(),
            &mut r,
            AlgebraicOp::Add,
            &uniform,
            &normal(0.0, 1.0),
            None,
        )
        .unwrap();
        assert!(matches!(result, Dist::PointSet(_)));
        assert_relative_eq!(result.mean(), 0.5, epsilon = 0.02);
    }

    #[test]
    fn test_forced_strategy_is_never_silently_substituted() {
        let mut r = rng();
        // Analytical on operands with no shortcut.
        let uniform = Dist::Symbolic(SymbolicDist::Uniform(Uniform::new(0.0, 1.0).unwrap()));
        let err = algebraic_combination(
            &env(),
            &mut r,
            AlgebraicOp::Add,
            &uniform,
            &normal(0.0, 1.0),
            Some(Strategy::Analytical),
        )
        .unwrap_err();
        assert!(matches!(err, DistError::RequestedStrategyInvalid(_)));

        // Analytical on a sample set.
        let err = algebraic_combination(
            &env(),
            &mut r,
            AlgebraicOp::Add,
            &sample_set(100),
            &normal(0.0, 1.0),
            Some(Strategy::Analytical),
        )
        .unwrap_err();
        assert!(matches!(err, DistError::RequestedStrategyInvalid(_)));

        // Convolution of a non-convolvable operation.
        let err = algebraic_combination(
            &env(),
            &mut r,
            AlgebraicOp::Divide,
            &normal(0.0, 1.0),
            &normal(0.0, 1.0),
            Some(Strategy::Convolution),
        )
        .unwrap_err();
        assert!(matches!(err, DistError::RequestedStrategyInvalid(_)));
    }

    #[test]
    fn test_logarithm_requires_positive_support() {
        let mut r = rng();
        let err = algebraic_combination(
            &env(),
            &mut r,
            AlgebraicOp::Logarithm,
            &normal(0.0, 1.0),
            &Dist::Symbolic(SymbolicDist::PointMass(PointMass::new(2.0).unwrap())),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DistError::LogarithmOfDistributionError(_)));

        // Entirely positive operands pass.
        let uniform = Dist::Symbolic(SymbolicDist::Uniform(Uniform::new(1.0, 4.0).unwrap()));
        let base = Dist::Symbolic(SymbolicDist::PointMass(PointMass::new(2.0).unwrap()));
        assert!(algebraic_combination(
            &env(),
            &mut r,
            AlgebraicOp::Logarithm,
            &uniform,
            &base,
            None
        )
        .is_ok());
    }

    #[test]
    fn test_pointwise_float_rejects_vertical_shift() {
        let err = pointwise_combination_float(&env(), AlgebraicOp::Add, &normal(0.0, 1.0), 2.0)
            .unwrap_err();
        assert_eq!(err, DistError::DistributionVerticalShiftIsInvalid);
    }

    #[test]
    fn test_pointwise_float_multiply_scales_mass() {
        let scaled =
            pointwise_combination_float(&env(), AlgebraicOp::Multiply, &normal(0.0, 1.0), 0.5)
                .unwrap();
        assert_relative_eq!(scaled.integral_sum(), 0.5, epsilon = 1e-3);
    }

    #[test]
    fn test_mixture_of_sample_sets_stays_sampled() {
        let mut r = rng();
        let env = Env::new(100, 1000).unwrap();
        let a = Dist::SampleSet(SampleSetDist::make(vec![0.0; 100]).unwrap());
        let b = Dist::SampleSet(SampleSetDist::make(vec![1.0; 100]).unwrap());
        let m = mixture(&env, &mut r, &[(a, 1.0), (b, 1.0)]).unwrap();
        assert!(matches!(m, Dist::SampleSet(_)));
    }

    #[test]
    fn test_mixture_of_mixed_representations_is_pointwise() {
        let mut r = rng();
        let m = mixture(
            &env(),
            &mut r,
            &[(normal(-10.0, 1.0), 1.0), (normal(10.0, 1.0), 3.0)],
        )
        .unwrap();
        assert!(matches!(m, Dist::PointSet(_)));
        assert!(m.is_normalized());
        // Mass-weighted mean: (-10 + 3·10)/4 = 5.
        assert_relative_eq!(m.mean(), 5.0, epsilon = 0.1);
    }

    #[test]
    fn test_mixture_rejects_negative_weight_and_empty_input() {
        let mut r = rng();
        assert!(matches!(
            mixture(&env(), &mut r, &[(normal(0.0, 1.0), -0.5)]),
            Err(DistError::ArgumentError(_))
        ));
        assert!(matches!(
            mixture(&env(), &mut r, &[]),
            Err(DistError::OtherError(_))
        ));
    }

    #[test]
    fn test_truncate_validates_window() {
        let err = truncate(&env(), &normal(0.0, 1.0), Some(2.0), Some(1.0)).unwrap_err();
        assert!(matches!(err, DistError::ArgumentError(_)));
        let same = truncate(&env(), &normal(0.0, 1.0), None, None).unwrap();
        assert_eq!(same, normal(0.0, 1.0));
    }
}
