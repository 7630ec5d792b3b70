//! Discrete atom-mass shape.

use std::sync::OnceLock;

use dc_core::error::{DistError, OperationError, Result, XYShapeError};

use crate::xyshape::XYShape;
use crate::NORMALIZATION_TOLERANCE;

/// Probability atoms: xs are locations, ys are masses.
///
/// Atom locations are strictly increasing; duplicate inputs are merged by
/// [`DiscreteShape::from_weighted_points`]. The stepwise cumulative mass and
/// its total are cached write-once, like [`crate::ContinuousShape`].
#[derive(Debug, Clone)]
pub struct DiscreteShape {
    shape: XYShape,
    integral: OnceLock<XYShape>,
    integral_sum: OnceLock<f64>,
}

impl PartialEq for DiscreteShape {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
    }
}

impl DiscreteShape {
    /// Construct from a shape with strictly increasing atom locations.
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

    /// Sort `(location, mass)` pairs and merge duplicate locations.
    pub fn from_weighted_points(mut points: Vec<(f64, f64)>) -> Result<Self, XYShapeError> {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut merged: Vec<(f64, f64)> = Vec::with_capacity(points.len());
        for (x, w) in points {
            match merged.last_mut() {
                Some(last) if last.0 == x => last.1 += w,
                _ => merged.push((x, w)),
            }
        }
        Self::make(XYShape::from_zipped(merged)?)
    }

    /// The empty discrete shape.
    pub fn empty() -> Self {
        Self { shape: XYShape::empty(), integral: OnceLock::new(), integral_sum: OnceLock::new() }
    }

    /// Underlying xs/ys.
    pub fn shape(&self) -> &XYShape {
        &self.shape
    }

    /// Number of atoms.
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    /// True when there are no atoms.
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Smallest atom location, if any.
    pub fn min_x(&self) -> Option<f64> {
        self.shape.min_x()
    }

    /// Largest atom location, if any.
    pub fn max_x(&self) -> Option<f64> {
        self.shape.max_x()
    }

    /// Mass at exactly `x`; zero when no atom sits there.
    pub fn x_to_y(&self, x: f64) -> f64 {
        self.shape.y_at_exact(x)
    }

    /// Stepwise cumulative mass at each atom, computed once.
    pub fn integral(&self) -> &XYShape {
        self.integral.get_or_init(|| self.shape.cumulative_sum())
    }

    /// Total mass, computed once.
    pub fn integral_sum(&self) -> f64 {
        *self.integral_sum.get_or_init(|| self.shape.y_sum())
    }

    /// Mass of atoms at locations ≤ `x`.
    pub fn integral_y_at_x(&self, x: f64) -> f64 {
        let cum = self.integral();
        let i = cum.xs().partition_point(|&xi| xi <= x);
        if i == 0 {
            0.0
        } else {
            cum.ys()[i - 1]
        }
    }

    /// Smallest atom location at which cumulative mass reaches `p`.
    pub fn integral_x_at_y(&self, p: f64) -> f64 {
        let cum = self.integral();
        if cum.is_empty() {
            return f64::NAN;
        }
        let i = cum.ys().partition_point(|&y| y < p);
        let i = i.min(cum.len() - 1);
        cum.xs()[i]
    }

    /// True when total mass is 1 within tolerance.
    pub fn is_normalized(&self) -> bool {
        (self.integral_sum() - 1.0).abs() < NORMALIZATION_TOLERANCE
    }

    /// Scale masses so they sum to exactly 1; the result's cache is seeded.
    pub fn normalize(&self) -> Result<Self> {
        let sum = self.integral_sum();
        if !sum.is_finite() || sum <= 0.0 {
            return Err(DistError::OtherError(
                "cannot normalize a discrete shape with no mass".into(),
            ));
        }
        let shape = self.shape.map_y(|y| y / sum);
        Ok(Self::make_with_integral_sum(shape, 1.0)?)
    }

    /// Multiply all masses by `k`; the mass cache carries through linearly.
    pub fn scale_by(&self, k: f64) -> Result<Self, XYShapeError> {
        let t = Self::make(self.shape.map_y(|y| y * k))?;
        if let Some(&sum) = self.integral_sum.get() {
            let _ = t.integral_sum.set(sum * k);
        }
        Ok(t)
    }

    /// Transform all masses; caches are dropped.
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

    /// Keep atoms inside `[left, right]`. No renormalization.
    pub fn truncate(&self, left: Option<f64>, right: Option<f64>) -> Result<Self, XYShapeError> {
        let lo = left.unwrap_or(f64::NEG_INFINITY);
        let hi = right.unwrap_or(f64::INFINITY);
        let points: Vec<(f64, f64)> =
            self.shape.zip().into_iter().filter(|(x, _)| *x >= lo && *x <= hi).collect();
        Self::make(XYShape::from_zipped(points)?)
    }

    /// Keep the `n` heaviest atoms (total mass shrinks accordingly).
    pub fn downsample(&self, n: usize) -> Result<Self, XYShapeError> {
        if n >= self.len() {
            return Ok(self.clone());
        }
        let mut points = self.shape.zip();
        points.sort_by(|a, b| b.1.total_cmp(&a.1));
        points.truncate(n);
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self::make(XYShape::from_zipped(points)?)
    }

    /// Mass-weighted mean, `Σxy / Σy`.
    pub fn mean(&self) -> f64 {
        let sum = self.integral_sum();
        if sum <= 0.0 {
            return f64::NAN;
        }
        let raw: f64 = self.shape.zip().iter().map(|(x, y)| x * y).sum();
        raw / sum
    }

    /// Mass-weighted variance.
    pub fn variance(&self) -> f64 {
        let sum = self.integral_sum();
        if sum <= 0.0 {
            return f64::NAN;
        }
        let mean = self.mean();
        let raw: f64 = self.shape.zip().iter().map(|(x, y)| x * x * y).sum();
        raw / sum - mean * mean
    }
}
