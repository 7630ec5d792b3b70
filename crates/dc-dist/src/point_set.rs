//! Point-set distribution: a discretized shape behind the common contract.

use dc_core::error::{DistError, Result};
use dc_shapes::{sparkline, PointSet};

/// A distribution backed by a [`PointSet`] shape.
///
/// Queries normalize on the fly where the shape itself is unnormalized, so
/// `cdf`/`inv`/`sample` behave like a proper distribution regardless of the
/// shape's raw mass.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSetDist {
    shape: PointSet,
}

impl PointSetDist {
    /// Wrap a shape.
    pub fn new(shape: PointSet) -> Self {
        Self { shape }
    }

    /// The underlying shape.
    pub fn shape(&self) -> &PointSet {
        &self.shape
    }

    /// Consume into the underlying shape.
    pub fn into_shape(self) -> PointSet {
        self.shape
    }

    /// Smallest support point.
    pub fn min(&self) -> f64 {
        self.shape.min_x().unwrap_or(f64::NAN)
    }

    /// Largest support point.
    pub fn max(&self) -> f64 {
        self.shape.max_x().unwrap_or(f64::NAN)
    }

    /// Mass-weighted mean of the shape.
    pub fn mean(&self) -> f64 {
        self.shape.mean()
    }

    /// Mass-weighted variance of the shape.
    pub fn variance(&self) -> f64 {
        self.shape.variance()
    }

    /// Continuous density plus discrete mass at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        self.shape.x_to_y(x)
    }

    /// Normalized cumulative probability at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        let total = self.shape.integral_sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.shape.integral_y_at_x(x) / total
    }

    /// Quantile at `p`.
    pub fn inv(&self, p: f64) -> f64 {
        self.shape.integral_x_at_y(p.clamp(0.0, 1.0) * self.shape.integral_sum())
    }

    /// Total mass of the shape.
    pub fn integral_sum(&self) -> f64 {
        self.shape.integral_sum()
    }

    /// Scale the shape to unit mass.
    pub fn normalize(&self) -> Result<Self> {
        Ok(Self::new(self.shape.normalize()?))
    }

    /// True when the shape's mass is 1 within tolerance.
    pub fn is_normalized(&self) -> bool {
        self.shape.is_normalized()
    }

    /// Truncate the support and renormalize the remainder.
    pub fn truncate(&self, left: Option<f64>, right: Option<f64>) -> Result<Self> {
        let truncated = self.shape.truncate(left, right)?;
        if truncated.integral_sum() <= 0.0 {
            return Err(DistError::OtherError(
                "truncation left no mass in the support window".into(),
            ));
        }
        Ok(Self::new(truncated.normalize()?))
    }

    /// Render the continuous density as a unicode sparkline.
    ///
    /// Shapes with no continuous part cannot be rendered.
    pub fn to_sparkline(&self, bucket_count: usize) -> Result<String> {
        let continuous = self.shape.continuous_part().ok_or_else(|| {
            DistError::SparklineError(
                "Cannot find the sparkline of a discrete distribution".into(),
            )
        })?;
        sparkline::create(continuous.shape().ys(), bucket_count)
    }
}
