//! Checked scalar algebra.
//!
//! Every combination path in the engine (analytical shortcuts, convolution,
//! pairwise Monte Carlo) funnels its scalar arithmetic through
//! [`AlgebraicOp::apply`], so the failure modes are uniform: division by
//! zero, results leaving the real line, and overflow to either infinity.

use std::fmt;

use crate::error::OperationError;

/// An algebraic operation over two distributions (or two scalars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgebraicOp {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`
    Divide,
    /// `a ** b`
    Power,
    /// `log_b(a)`
    Logarithm,
}

impl AlgebraicOp {
    /// Apply the operation to two finite scalars, with checked failure modes.
    pub fn apply(self, a: f64, b: f64) -> Result<f64, OperationError> {
        let raw = match self {
            AlgebraicOp::Add => a + b,
            AlgebraicOp::Subtract => a - b,
            AlgebraicOp::Multiply => a * b,
            AlgebraicOp::Divide => {
                if b == 0.0 {
                    return Err(OperationError::DivisionByZero);
                }
                a / b
            }
            AlgebraicOp::Power => {
                // Negative base with a fractional exponent leaves the reals.
                if a < 0.0 && b.fract() != 0.0 {
                    return Err(OperationError::ComplexNumber);
                }
                a.powf(b)
            }
            AlgebraicOp::Logarithm => {
                if b == 1.0 {
                    return Err(OperationError::DivisionByZero);
                }
                if a == 0.0 {
                    return Err(OperationError::NegativeInfinity);
                }
                if a < 0.0 || b <= 0.0 {
                    return Err(OperationError::ComplexNumber);
                }
                a.ln() / b.ln()
            }
        };
        if raw.is_nan() {
            return Err(OperationError::Other(format!("{} {} {} is not a number", a, self, b)));
        }
        if raw == f64::INFINITY {
            return Err(OperationError::Infinity);
        }
        if raw == f64::NEG_INFINITY {
            return Err(OperationError::NegativeInfinity);
        }
        Ok(raw)
    }

    /// Whether numerical convolution of point sets supports this operation.
    ///
    /// Division, power and logarithm have no convolution path and always go
    /// through Monte Carlo.
    pub fn is_convolvable(self) -> bool {
        matches!(self, AlgebraicOp::Add | AlgebraicOp::Subtract | AlgebraicOp::Multiply)
    }

    /// Whether the operation commutes (`a op b == b op a`).
    pub fn is_commutative(self) -> bool {
        matches!(self, AlgebraicOp::Add | AlgebraicOp::Multiply)
    }
}

impl fmt::Display for AlgebraicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlgebraicOp::Add => "+",
            AlgebraicOp::Subtract => "-",
            AlgebraicOp::Multiply => "*",
            AlgebraicOp::Divide => "/",
            AlgebraicOp::Power => "**",
            AlgebraicOp::Logarithm => "log",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_basic_arithmetic() {
        assert_relative_eq!(AlgebraicOp::Add.apply(2.0, 3.0).unwrap(), 5.0);
        assert_relative_eq!(AlgebraicOp::Subtract.apply(2.0, 3.0).unwrap(), -1.0);
        assert_relative_eq!(AlgebraicOp::Multiply.apply(2.0, 3.0).unwrap(), 6.0);
        assert_relative_eq!(AlgebraicOp::Divide.apply(3.0, 2.0).unwrap(), 1.5);
        assert_relative_eq!(AlgebraicOp::Power.apply(2.0, 10.0).unwrap(), 1024.0);
        assert_relative_eq!(AlgebraicOp::Logarithm.apply(8.0, 2.0).unwrap(), 3.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(AlgebraicOp::Divide.apply(1.0, 0.0), Err(OperationError::DivisionByZero));
    }

    #[test]
    fn test_complex_results() {
        assert_eq!(AlgebraicOp::Power.apply(-2.0, 0.5), Err(OperationError::ComplexNumber));
        assert_eq!(AlgebraicOp::Logarithm.apply(-1.0, 2.0), Err(OperationError::ComplexNumber));
        // Integer exponents of negative bases stay real.
        assert_relative_eq!(AlgebraicOp::Power.apply(-2.0, 3.0).unwrap(), -8.0);
    }

    #[test]
    fn test_logarithm_edge_cases() {
        assert_eq!(AlgebraicOp::Logarithm.apply(5.0, 1.0), Err(OperationError::DivisionByZero));
        assert_eq!(AlgebraicOp::Logarithm.apply(0.0, 2.0), Err(OperationError::NegativeInfinity));
        assert_eq!(AlgebraicOp::Logarithm.apply(5.0, -2.0), Err(OperationError::ComplexNumber));
    }

    #[test]
    fn test_overflow_to_infinity() {
        assert_eq!(AlgebraicOp::Power.apply(10.0, 400.0), Err(OperationError::Infinity));
        assert_eq!(AlgebraicOp::Multiply.apply(1e308, 1e308), Err(OperationError::Infinity));
        assert_eq!(AlgebraicOp::Multiply.apply(-1e308, 1e308), Err(OperationError::NegativeInfinity));
    }

    #[test]
    fn test_convolvable_set() {
        assert!(AlgebraicOp::Add.is_convolvable());
        assert!(AlgebraicOp::Subtract.is_convolvable());
        assert!(AlgebraicOp::Multiply.is_convolvable());
        assert!(!AlgebraicOp::Divide.is_convolvable());
        assert!(!AlgebraicOp::Power.is_convolvable());
        assert!(!AlgebraicOp::Logarithm.is_convolvable());
    }
}
