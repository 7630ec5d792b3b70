//! Log scoring of forecasts against answers.
//!
//! Both entry points discretize the estimate and score it in point-set
//! form: a distribution answer scores as the KL divergence from the
//! estimate to the answer, a scalar answer as the negative log density at
//! the observed point.

use dc_core::env::Env;
use dc_core::error::{DistError, OperationError, Result};
use dc_shapes::{PointSet, XYShape};

use crate::base::{BaseDist, Dist};

/// Negative log density of `estimate` at the observed `answer`.
pub fn log_score_scalar_answer(env: &Env, estimate: &Dist, answer: f64) -> Result<f64> {
    if !answer.is_finite() {
        return Err(DistError::NonNumericInput(format!(
            "scored answer must be finite, got {answer}"
        )));
    }
    let shape = estimate.to_point_set(env)?.into_shape().normalize()?;
    let density = shape.x_to_y(answer);
    if !density.is_finite() || density <= 0.0 {
        return Err(DistError::Operation(OperationError::PdfInvalid));
    }
    Ok(-density.ln())
}

/// KL divergence `D(answer ‖ estimate)`, optionally relative to a prior.
///
/// With a prior the score is `D(answer ‖ estimate) − D(answer ‖ prior)`:
/// negative when the estimate improves on the prior.
pub fn log_score_dist_answer(
    env: &Env,
    estimate: &Dist,
    answer: &Dist,
    prior: Option<&Dist>,
) -> Result<f64> {
    let answer_shape = answer.to_point_set(env)?.into_shape().normalize()?;
    let estimate_shape = estimate.to_point_set(env)?.into_shape().normalize()?;
    let base = kl_divergence(&answer_shape, &estimate_shape)?;
    match prior {
        None => Ok(base),
        Some(p) => {
            let prior_shape = p.to_point_set(env)?.into_shape().normalize()?;
            Ok(base - kl_divergence(&answer_shape, &prior_shape)?)
        }
    }
}

/// `∫ a(x) ln(a(x)/e(x)) dx` plus the matching sum over atoms.
///
/// Zero answer mass contributes nothing; positive answer mass where the
/// estimate has none makes the divergence undefined.
fn kl_divergence(answer: &PointSet, estimate: &PointSet) -> Result<f64> {
    let am = answer.to_mixed();
    let em = estimate.to_mixed();

    let mut total = 0.0;
    if !am.continuous().is_empty() {
        let integrand = XYShape::combine_pointwise(
            am.continuous().shape(),
            em.continuous().shape(),
            |ay, ey| {
                if ay <= 0.0 {
                    Ok(0.0)
                } else if ey <= 0.0 {
                    Err(OperationError::PdfInvalid)
                } else {
                    Ok(ay * (ay / ey).ln())
                }
            },
        )
        .map_err(DistError::Operation)?;
        total += integrand.trapezoid_integral();
    }

    for (x, aw) in am.discrete().shape().zip() {
        if aw <= 0.0 {
            continue;
        }
        let ew = em.discrete().x_to_y(x);
        if ew <= 0.0 {
            return Err(DistError::Operation(OperationError::PdfInvalid));
        }
        total += aw * (aw / ew).ln();
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{Normal, SymbolicDist, Uniform};
    use approx::assert_relative_eq;

    fn env() -> Env {
        Env::default()
    }

    fn normal(mean: f64, stdev: f64) -> Dist {
        Dist::Symbolic(SymbolicDist::Normal(Normal::new(mean, stdev).unwrap()))
    }

    fn uniform(low: f64, high: f64) -> Dist {
        Dist::Symbolic(SymbolicDist::Uniform(Uniform::new(low, high).unwrap()))
    }

    #[test]
    fn test_scalar_score_is_negative_log_density() {
        let score = log_score_scalar_answer(&env(), &uniform(0.0, 4.0), 1.0).unwrap();
        // Density 1/4 everywhere inside the support.
        assert_relative_eq!(score, 4.0f64.ln(), epsilon = 1e-3);
    }

    #[test]
    fn test_scalar_score_outside_support_is_invalid() {
        let err = log_score_scalar_answer(&env(), &uniform(0.0, 4.0), 10.0).unwrap_err();
        assert_eq!(err, DistError::Operation(OperationError::PdfInvalid));
    }

    #[test]
    fn test_self_score_is_zero() {
        let d = normal(0.0, 1.0);
        let score = log_score_dist_answer(&env(), &d, &d, None).unwrap();
        assert_relative_eq!(score, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_divergence_against_nested_uniforms() {
        // Answer U(1,3) against estimate U(0,4): a/e = 2 on the answer's
        // support, so the divergence is ln 2; a wider estimate scores worse.
        let answer = uniform(1.0, 3.0);
        let near = log_score_dist_answer(&env(), &uniform(0.0, 4.0), &answer, None).unwrap();
        let far = log_score_dist_answer(&env(), &uniform(0.0, 8.0), &answer, None).unwrap();
        assert_relative_eq!(near, 2.0f64.ln(), epsilon = 0.01);
        assert_relative_eq!(far, 4.0f64.ln(), epsilon = 0.01);
    }

    #[test]
    fn test_prior_shifts_the_score() {
        let answer = uniform(1.0, 3.0);
        let estimate = uniform(0.0, 4.0);
        let prior = uniform(0.0, 8.0);
        let relative =
            log_score_dist_answer(&env(), &estimate, &answer, Some(&prior)).unwrap();
        // The estimate improves on the prior: ln 2 - ln 4 < 0.
        assert_relative_eq!(relative, 2.0f64.ln() - 4.0f64.ln(), epsilon = 0.02);
    }

    #[test]
    fn test_answer_mass_outside_estimate_support_is_invalid() {
        let err =
            log_score_dist_answer(&env(), &uniform(0.0, 1.0), &uniform(2.0, 3.0), None)
                .unwrap_err();
        assert_eq!(err, DistError::Operation(OperationError::PdfInvalid));
    }
}
