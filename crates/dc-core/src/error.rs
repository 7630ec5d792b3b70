//! Error types for DistCalc.
//!
//! [`DistError`] is a closed union: every expected failure in the engine is
//! one of these variants, and the `Display` impl is the canonical rendering.
//! Embedding runtimes format errors through it and never re-derive text.

use thiserror::Error;

/// Failure modes of scalar algebraic operations.
///
/// These surface when a pairwise combination hits an argument the operation
/// is not defined for (division by zero, log of a negative, ...).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// Division by zero.
    #[error("Cannot divide by zero")]
    DivisionByZero,

    /// The operation would leave the real line (e.g. log of a negative).
    #[error("Operation returned complex result")]
    ComplexNumber,

    /// The operation overflowed to positive infinity.
    #[error("Operation returned positive infinity")]
    Infinity,

    /// The operation diverged to negative infinity.
    #[error("Operation returned negative infinity")]
    NegativeInfinity,

    /// A sample-map callback must be a number-to-number function.
    #[error("Sample map needs a function that converts a number to a number")]
    SampleMapNeedsNtoNFunction,

    /// A pdf required by a scoring rule is invalid at the queried point.
    #[error("This pdf is invalid")]
    PdfInvalid,

    /// Catch-all with a message.
    #[error("{0}")]
    Other(String),
}

/// Structural failures of parallel xs/ys arrays.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XYShapeError {
    /// xs must be sorted (strictly increasing for continuous shapes).
    #[error("Xs is not sorted")]
    NotSorted,

    /// xs and ys must have the same length.
    #[error("Xs and Ys have unequal lengths: {xs} vs {ys}")]
    UnequalLengths {
        /// Length of the xs array.
        xs: usize,
        /// Length of the ys array.
        ys: usize,
    },

    /// The shape has no points.
    #[error("Xs is empty")]
    Empty,

    /// A coordinate is NaN or infinite.
    #[error("Shape contains a non-finite value at index {0}")]
    NotFinite(usize),
}

/// DistCalc error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistError {
    /// The operation is not implemented for this representation.
    #[error("Function not yet implemented")]
    NotYetImplemented,

    /// Invariant-violation guard: reaching this is a bug, not bad input.
    #[error("Unreachable: {0}")]
    Unreachable(String),

    /// Distributions cannot be pointwise-shifted vertically.
    #[error("Distribution vertical shift is invalid")]
    DistributionVerticalShiftIsInvalid,

    /// A sample set needs more than 5 samples.
    #[error("Too few samples when constructing sample set")]
    TooFewSamples,

    /// Sample-to-point-set conversion produced a degenerate shape.
    #[error("Too few samples to convert to point set")]
    TooFewSamplesForConversionToPointSet,

    /// An input that must be numeric was not.
    #[error("Found a non-number in input: {0}")]
    NonNumericInput(String),

    /// Invalid argument (construction parameters, weights, ...).
    #[error("Argument error: {0}")]
    ArgumentError(String),

    /// The distribution cannot be rendered as a sparkline.
    #[error("{0}")]
    SparklineError(String),

    /// A caller-forced strategy is unsupported by the operand types.
    #[error("Requested strategy invalid: {0}")]
    RequestedStrategyInvalid(String),

    /// Logarithm requires operands with entirely positive support.
    #[error("Logarithm of input error: {0}")]
    LogarithmOfDistributionError(String),

    /// Catch-all with a message.
    #[error("{0}")]
    OtherError(String),

    /// A scalar operation failed inside a combination.
    #[error("Math error: {0}")]
    Operation(#[from] OperationError),

    /// A point-set shape violated its structural invariants.
    #[error("XY shape error: {0}")]
    XYShape(#[from] XYShapeError),
}

/// Result type alias.
pub type Result<T, E = DistError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_rendering() {
        assert_eq!(DistError::TooFewSamples.to_string(), "Too few samples when constructing sample set");
        assert_eq!(
            DistError::Operation(OperationError::DivisionByZero).to_string(),
            "Math error: Cannot divide by zero"
        );
        assert_eq!(
            DistError::XYShape(XYShapeError::UnequalLengths { xs: 3, ys: 2 }).to_string(),
            "XY shape error: Xs and Ys have unequal lengths: 3 vs 2"
        );
    }

    #[test]
    fn test_from_operation_error() {
        fn inner() -> Result<f64> {
            Err(OperationError::ComplexNumber)?
        }
        assert_eq!(inner(), Err(DistError::Operation(OperationError::ComplexNumber)));
    }
}
