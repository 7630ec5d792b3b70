//! Continuous piecewise-linear density shape with write-once integral caches.

use std::sync::OnceLock;

use dc_core::error::{DistError, OperationError, Result, XYShapeError};

use crate::xyshape::XYShape;
use crate::NORMALIZATION_TOLERANCE;

/// A piecewise-linear density over strictly increasing xs.
///
/// The cumulative integral and its final value are computed lazily and
/// stored at most once; correctness of the caches rests on the shape being
/// immutable after construction.
#[derive(Debug, Clone)]
pub struct ContinuousShape {
    shape: XYShape,
    integral: OnceLock<XYShape>,
    integral_sum: OnceLock<f64>,
}

impl PartialEq for ContinuousShape {
    fn eq(&self, other: &Self) -> bool {
        // Caches are derived state and do not participate in equality.
        self.shape == other.shape
    }
}

impl ContinuousShape {
    /// Construct from a shape with strictly increasing xs.
    pub fn make(shape: XYShape) -> Result<Self, XYShapeError> {
        shape.ensure_strictly_sorted()?;
        Ok(Self { shape, integral: OnceLock::new(), integral_sum: OnceLock::new() })
    }

    /// Construct with a known total mass, seeding the `integral_sum` cache.
    pub fn make_with_integral_sum(shape: XYShape, sum: f64) -> Result<Self, XYShapeError> {
        let t = Self::make(shape)?;
        let _ = t.integral_sum.set(sum);
        Ok(t)
    }

    /// The empty continuous shape.
    pub fn empty() -> Self {
        Self { shape: XYShape::empty(), integral: OnceLock::new(), integral_sum: OnceLock::new() }
    }

    /// Underlying xs/ys.
    pub fn shape(&self) -> &XYShape {
        &self.shape
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    /// True when the shape has no points.
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Smallest x of the support, if any.
    pub fn min_x(&self) -> Option<f64> {
        self.shape.min_x()
    }

    /// Largest x of the support, if any.
    pub fn max_x(&self) -> Option<f64> {
        self.shape.max_x()
    }

    /// Interpolated density at `x`.
    pub fn x_to_y(&self, x: f64) -> f64 {
        self.shape.y_at_linear(x)
    }

    /// The cumulative integral, computed once.
    pub fn integral(&self) -> &XYShape {
        self.integral.get_or_init(|| self.shape.cumulative_trapezoid())
    }

    /// Total mass under the curve, computed once.
    pub fn integral_sum(&self) -> f64 {
        *self
            .integral_sum
            .get_or_init(|| self.integral().ys().last().copied().unwrap_or(0.0))
    }

    /// Cumulative mass up to `x` (the unnormalized cdf).
    pub fn integral_y_at_x(&self, x: f64) -> f64 {
        let integral = self.integral();
        match (integral.min_x(), integral.max_x()) {
            (Some(lo), Some(hi)) => {
                if x <= lo {
                    0.0
                } else if x >= hi {
                    self.integral_sum()
                } else {
                    integral.y_at_linear(x)
                }
            }
            _ => 0.0,
        }
    }

    /// Inverse of [`integral_y_at_x`](Self::integral_y_at_x): the x at which
    /// cumulative mass reaches `p`. Clamped to the support.
    pub fn integral_x_at_y(&self, p: f64) -> f64 {
        let integral = self.integral();
        let xs = integral.xs();
        let ys = integral.ys();
        if xs.is_empty() {
            return f64::NAN;
        }
        if p <= ys[0] {
            return xs[0];
        }
        let last = ys[ys.len() - 1];
        if p >= last {
            return xs[xs.len() - 1];
        }
        // ys is non-decreasing; find the first index with ys[i] >= p.
        let i = ys.partition_point(|&y| y < p);
        let (x0, x1) = (xs[i - 1], xs[i]);
        let (y0, y1) = (ys[i - 1], ys[i]);
        if y1 == y0 {
            return x0;
        }
        x0 + (p - y0) / (y1 - y0) * (x1 - x0)
    }

    /// True when total mass is 1 within tolerance.
    pub fn is_normalized(&self) -> bool {
        (self.integral_sum() - 1.0).abs() < NORMALIZATION_TOLERANCE
    }

    /// Scale ys so total mass is exactly 1; the result's sum cache is seeded.
    pub fn normalize(&self) -> Result<Self> {
        let sum = self.integral_sum();
        if !sum.is_finite() || sum <= 0.0 {
            return Err(DistError::OtherError(
                "cannot normalize a continuous shape with no mass".into(),
            ));
        }
        let shape = self.shape.map_y(|y| y / sum);
        Ok(Self::make_with_integral_sum(shape, 1.0)?)
    }

    /// Multiply all ys by `k`; the mass cache carries through linearly.
    pub fn scale_by(&self, k: f64) -> Result<Self, XYShapeError> {
        self.map_y_with_cache(|y| y * k, |sum| sum * k)
    }

    /// Transform all ys; both integral caches are dropped because the
    /// transform's effect on mass is unknown.
    pub fn map_y(&self, f: impl Fn(f64) -> f64) -> Result<Self, XYShapeError> {
        Self::make(self.shape.map_y(f))
    }

    /// Fallible variant of [`map_y`](Self::map_y).
    pub fn map_y_result(
        &self,
        f: impl Fn(f64) -> Result<f64, OperationError>,
    ) -> Result<Self> {
        let shape = self.shape.map_y_result(f).map_err(DistError::Operation)?;
        Ok(Self::make(shape)?)
    }

    /// Transform all ys with a known mass transform: if this shape's sum was
    /// already computed, the result's cache is seeded with `cache_f(sum)`.
    pub fn map_y_with_cache(
        &self,
        f: impl Fn(f64) -> f64,
        cache_f: impl Fn(f64) -> f64,
    ) -> Result<Self, XYShapeError> {
        let t = Self::make(self.shape.map_y(f))?;
        if let Some(&sum) = self.integral_sum.get() {
            let _ = t.integral_sum.set(cache_f(sum));
        }
        Ok(t)
    }

    /// Drop mass outside `[left, right]`, inserting interpolated boundary
    /// points. No renormalization.
    pub fn truncate(&self, left: Option<f64>, right: Option<f64>) -> Result<Self, XYShapeError> {
        if self.is_empty() {
            return Ok(Self::empty());
        }
        let lo = left.unwrap_or(f64::NEG_INFINITY);
        let hi = right.unwrap_or(f64::INFINITY);
        let mut points: Vec<(f64, f64)> = Vec::with_capacity(self.len() + 2);
        let in_domain = |x: f64| {
            x >= self.shape.min_x().unwrap_or(x) && x <= self.shape.max_x().unwrap_or(x)
        };
        if lo.is_finite() && in_domain(lo) {
            points.push((lo, self.x_to_y(lo)));
        }
        for (x, y) in self.shape.zip() {
            if x > lo && x < hi {
                points.push((x, y));
            }
        }
        if hi.is_finite() && in_domain(hi) {
            points.push((hi, self.x_to_y(hi)));
        }
        if points.len() < 2 {
            return Ok(Self::empty());
        }
        Ok(Self::make(XYShape::from_zipped(points)?)?)
    }

    /// Resample onto `n` evenly spaced points, rescaled so total mass is
    /// preserved. Returns a clone when the shape is already small enough.
    pub fn downsample(&self, n: usize) -> Result<Self, XYShapeError> {
        if n >= self.len() || self.len() < 2 || n < 2 {
            return Ok(self.clone());
        }
        let lo = self.shape.min_x().unwrap_or(0.0);
        let hi = self.shape.max_x().unwrap_or(0.0);
        let step = (hi - lo) / (n - 1) as f64;
        let xs: Vec<f64> = (0..n).map(|i| lo + step * i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| self.x_to_y(x)).collect();
        let resampled = XYShape::new(xs, ys)?;
        let new_sum = resampled.trapezoid_integral();
        let old_sum = self.integral_sum();
        if new_sum > 0.0 && old_sum > 0.0 {
            let k = old_sum / new_sum;
            Self::make_with_integral_sum(resampled.map_y(|y| y * k), old_sum)
        } else {
            Self::make(resampled)
        }
    }

    /// Mass-weighted mean, `∫x f(x) dx / ∫f(x) dx`.
    ///
    /// Per-segment first moments are exact for piecewise-linear densities.
    pub fn mean(&self) -> f64 {
        let sum = self.integral_sum();
        if sum <= 0.0 {
            return f64::NAN;
        }
        self.raw_moment(Self::segment_first_moment) / sum
    }

    /// Mass-weighted variance.
    pub fn variance(&self) -> f64 {
        let sum = self.integral_sum();
        if sum <= 0.0 {
            return f64::NAN;
        }
        let mean = self.mean();
        self.raw_moment(Self::segment_second_moment) / sum - mean * mean
    }

    fn raw_moment(&self, segment: impl Fn(f64, f64, f64, f64) -> f64) -> f64 {
        let xs = self.shape.xs();
        let ys = self.shape.ys();
        let mut acc = 0.0;
        for i in 1..xs.len() {
            acc += segment(xs[i - 1], xs[i], ys[i - 1], ys[i]);
        }
        acc
    }

    /// `∫ x·y(x) dx` over one linear segment.
    fn segment_first_moment(x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
        (x1 - x0) / 6.0 * (x0 * (2.0 * y0 + y1) + x1 * (y0 + 2.0 * y1))
    }

    /// `∫ x²·y(x) dx` over one linear segment.
    fn segment_second_moment(x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
        (x1 - x0) / 12.0
            * (y0 * (3.0 * x0 * x0 + 2.0 * x0 * x1 + x1 * x1)
                + y1 * (x0 * x0 + 2.0 * x0 * x1 + 3.0 * x1 * x1))
    }
}
