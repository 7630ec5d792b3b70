//! Closed-form combination shortcuts.
//!
//! [`try_analytical_simplification`] answers `None` when no closed form
//! exists for the operand pair; the strategy chooser then falls through to
//! convolution or Monte Carlo. The table is deliberately small: point-mass
//! arithmetic, normal sums/differences and scalings, and lognormal
//! products/quotients.

use dc_core::error::{DistError, Result};
use dc_core::ops::AlgebraicOp;

use super::{Lognormal, Normal, PointMass, SymbolicDist};

/// Look up a closed form for `d1 op d2`.
pub fn try_analytical_simplification(
    d1: &SymbolicDist,
    d2: &SymbolicDist,
    op: AlgebraicOp,
) -> Option<Result<SymbolicDist>> {
    use SymbolicDist as S;
    match (d1, d2) {
        (S::PointMass(a), S::PointMass(b)) => Some(
            PointMass::combine(op, a, b)
                .map(S::PointMass)
                .map_err(DistError::Operation),
        ),
        (S::Normal(a), S::Normal(b)) => match op {
            AlgebraicOp::Add => Some(Normal::add(a, b).map(S::Normal)),
            AlgebraicOp::Subtract => Some(Normal::subtract(a, b).map(S::Normal)),
            _ => None,
        },
        (S::Normal(n), S::PointMass(p)) => normal_scaled(n, p.value(), op, false),
        (S::PointMass(p), S::Normal(n)) => normal_scaled(n, p.value(), op, true),
        (S::Lognormal(a), S::Lognormal(b)) => match op {
            AlgebraicOp::Multiply => Some(Lognormal::multiply(a, b).map(S::Lognormal)),
            AlgebraicOp::Divide => Some(Lognormal::divide(a, b).map(S::Lognormal)),
            _ => None,
        },
        (S::Lognormal(l), S::PointMass(p)) => lognormal_scaled(l, p.value(), op, false),
        (S::PointMass(p), S::Lognormal(l)) => lognormal_scaled(l, p.value(), op, true),
        _ => None,
    }
}

/// `N(m, s) ∘ c` (or `c ∘ N(m, s)` when `flipped`).
///
/// Add/Subtract shift the mean; Multiply/Divide scale both parameters.
/// Multiplying by zero collapses every draw to zero, so the result is a
/// point mass there rather than a degenerate normal.
fn normal_scaled(
    n: &Normal,
    c: f64,
    op: AlgebraicOp,
    flipped: bool,
) -> Option<Result<SymbolicDist>> {
    let make = |mean: f64, stdev: f64| Some(Normal::new(mean, stdev).map(SymbolicDist::Normal));
    match op {
        AlgebraicOp::Add => make(n.mean() + c, n.stdev()),
        AlgebraicOp::Subtract => {
            if flipped {
                make(c - n.mean(), n.stdev())
            } else {
                make(n.mean() - c, n.stdev())
            }
        }
        AlgebraicOp::Multiply => {
            if c == 0.0 {
                Some(PointMass::new(0.0).map(SymbolicDist::PointMass))
            } else {
                make(n.mean() * c, n.stdev() * c.abs())
            }
        }
        AlgebraicOp::Divide => {
            if flipped {
                // c / N has no closed form.
                None
            } else if c == 0.0 {
                Some(Err(DistError::Operation(
                    dc_core::error::OperationError::DivisionByZero,
                )))
            } else {
                make(n.mean() / c, n.stdev() / c.abs())
            }
        }
        AlgebraicOp::Power | AlgebraicOp::Logarithm => None,
    }
}

/// `Lognormal ∘ c` (or flipped): multiplying by a positive scalar shifts the
/// log-space mean by `ln c`. Non-positive scalars leave the family, so no
/// shortcut applies.
fn lognormal_scaled(
    l: &Lognormal,
    c: f64,
    op: AlgebraicOp,
    flipped: bool,
) -> Option<Result<SymbolicDist>> {
    if c <= 0.0 {
        return None;
    }
    let make = |mu: f64| Some(Lognormal::new(mu, l.sigma()).map(SymbolicDist::Lognormal));
    match op {
        AlgebraicOp::Multiply => make(l.mu() + c.ln()),
        AlgebraicOp::Divide => {
            if flipped {
                make(c.ln() - l.mu())
            } else {
                make(l.mu() - c.ln())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dc_core::error::OperationError;

    fn normal(mean: f64, stdev: f64) -> SymbolicDist {
        SymbolicDist::Normal(Normal::new(mean, stdev).unwrap())
    }

    fn lognormal(mu: f64, sigma: f64) -> SymbolicDist {
        SymbolicDist::Lognormal(Lognormal::new(mu, sigma).unwrap())
    }

    fn point(v: f64) -> SymbolicDist {
        SymbolicDist::PointMass(PointMass::new(v).unwrap())
    }

    #[test]
    fn test_point_mass_arithmetic() {
        let r = try_analytical_simplification(&point(6.0), &point(2.0), AlgebraicOp::Divide)
            .unwrap()
            .unwrap();
        assert_eq!(r, point(3.0));
        let err = try_analytical_simplification(&point(1.0), &point(0.0), AlgebraicOp::Divide)
            .unwrap()
            .unwrap_err();
        assert_eq!(err, DistError::Operation(OperationError::DivisionByZero));
    }

    #[test]
    fn test_normal_sum_and_difference() {
        let r = try_analytical_simplification(&normal(1.0, 3.0), &normal(2.0, 4.0), AlgebraicOp::Add)
            .unwrap()
            .unwrap();
        let SymbolicDist::Normal(n) = r else { panic!("expected normal") };
        assert_relative_eq!(n.mean(), 3.0);
        assert_relative_eq!(n.stdev(), 5.0);
        // No closed form for a normal product.
        assert!(try_analytical_simplification(
            &normal(0.0, 1.0),
            &normal(0.0, 1.0),
            AlgebraicOp::Multiply
        )
        .is_none());
    }

    #[test]
    fn test_normal_point_mass_scaling() {
        let r =
            try_analytical_simplification(&normal(2.0, 1.0), &point(-3.0), AlgebraicOp::Multiply)
                .unwrap()
                .unwrap();
        let SymbolicDist::Normal(n) = r else { panic!("expected normal") };
        assert_relative_eq!(n.mean(), -6.0);
        assert_relative_eq!(n.stdev(), 3.0);

        // Flipped subtraction reverses the mean.
        let r = try_analytical_simplification(&point(10.0), &normal(2.0, 1.0), AlgebraicOp::Subtract)
            .unwrap()
            .unwrap();
        let SymbolicDist::Normal(n) = r else { panic!("expected normal") };
        assert_relative_eq!(n.mean(), 8.0);
    }

    #[test]
    fn test_normal_times_zero_collapses() {
        let r = try_analytical_simplification(&normal(5.0, 2.0), &point(0.0), AlgebraicOp::Multiply)
            .unwrap()
            .unwrap();
        assert_eq!(r, point(0.0));
    }

    #[test]
    fn test_normal_divide_by_zero_fails() {
        let err = try_analytical_simplification(&normal(5.0, 2.0), &point(0.0), AlgebraicOp::Divide)
            .unwrap()
            .unwrap_err();
        assert_eq!(err, DistError::Operation(OperationError::DivisionByZero));
        // Scalar over normal has no closed form.
        assert!(try_analytical_simplification(&point(1.0), &normal(5.0, 2.0), AlgebraicOp::Divide)
            .is_none());
    }

    #[test]
    fn test_lognormal_product_and_quotient() {
        let r = try_analytical_simplification(
            &lognormal(1.0, 0.3),
            &lognormal(2.0, 0.4),
            AlgebraicOp::Multiply,
        )
        .unwrap()
        .unwrap();
        let SymbolicDist::Lognormal(l) = r else { panic!("expected lognormal") };
        assert_relative_eq!(l.mu(), 3.0);
        assert_relative_eq!(l.sigma(), 0.5, epsilon = 1e-12);
        // Addition of lognormals has no closed form.
        assert!(try_analytical_simplification(
            &lognormal(0.0, 1.0),
            &lognormal(0.0, 1.0),
            AlgebraicOp::Add
        )
        .is_none());
    }

    #[test]
    fn test_lognormal_scalar_shift() {
        let c = std::f64::consts::E;
        let r = try_analytical_simplification(&lognormal(1.0, 0.5), &point(c), AlgebraicOp::Multiply)
            .unwrap()
            .unwrap();
        let SymbolicDist::Lognormal(l) = r else { panic!("expected lognormal") };
        assert_relative_eq!(l.mu(), 2.0, epsilon = 1e-12);
        // Non-positive scalars leave the family.
        assert!(try_analytical_simplification(
            &lognormal(1.0, 0.5),
            &point(-1.0),
            AlgebraicOp::Multiply
        )
        .is_none());
    }
}
