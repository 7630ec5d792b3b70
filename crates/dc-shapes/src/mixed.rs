//! Continuous + discrete shape pair.

use dc_core::error::{DistError, Result, XYShapeError};

use crate::continuous::ContinuousShape;
use crate::discrete::DiscreteShape;
use crate::NORMALIZATION_TOLERANCE;

/// A distribution shape with both a piecewise-linear density and atoms.
///
/// After [`normalize`](MixedShape::normalize) the two subshapes' integral
/// sums add to 1; mass is redistributed proportionally, so a pair whose
/// continuous part holds 3/4 of the raw mass keeps 3/4 after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedShape {
    continuous: ContinuousShape,
    discrete: DiscreteShape,
}

impl MixedShape {
    /// Pair a continuous and a discrete shape.
    pub fn make(continuous: ContinuousShape, discrete: DiscreteShape) -> Self {
        Self { continuous, discrete }
    }

    /// The continuous part.
    pub fn continuous(&self) -> &ContinuousShape {
        &self.continuous
    }

    /// The discrete part.
    pub fn discrete(&self) -> &DiscreteShape {
        &self.discrete
    }

    /// True when both parts are empty.
    pub fn is_empty(&self) -> bool {
        self.continuous.is_empty() && self.discrete.is_empty()
    }

    /// Smallest x across both parts.
    pub fn min_x(&self) -> Option<f64> {
        match (self.continuous.min_x(), self.discrete.min_x()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Largest x across both parts.
    pub fn max_x(&self) -> Option<f64> {
        match (self.continuous.max_x(), self.discrete.max_x()) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    /// Combined mass of both parts.
    pub fn integral_sum(&self) -> f64 {
        self.continuous.integral_sum() + self.discrete.integral_sum()
    }

    /// True when combined mass is 1 within tolerance.
    pub fn is_normalized(&self) -> bool {
        (self.integral_sum() - 1.0).abs() < NORMALIZATION_TOLERANCE
    }

    /// Scale both parts by the inverse of the combined mass.
    ///
    /// Idempotent: renormalizing a normalized shape changes nothing beyond
    /// float noise. A shape with no mass at all cannot be normalized.
    pub fn normalize(&self) -> Result<Self> {
        let total = self.integral_sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(DistError::OtherError("cannot normalize a shape with no mass".into()));
        }
        let k = 1.0 / total;
        Ok(Self {
            continuous: self.continuous.scale_by(k)?,
            discrete: self.discrete.scale_by(k)?,
        })
    }

    /// Density-plus-mass at `x`, evaluated on the normalized form.
    ///
    /// Queries against unnormalized shapes answer as if [`normalize`]
    /// had run first; the division reuses the write-once mass caches, so
    /// repeated queries do not redo the integral.
    pub fn x_to_y(&self, x: f64) -> f64 {
        let total = self.integral_sum();
        if total <= 0.0 {
            return 0.0;
        }
        (self.continuous.x_to_y(x) + self.discrete.x_to_y(x)) / total
    }

    /// Combined cumulative mass up to `x` (unnormalized).
    pub fn integral_y_at_x(&self, x: f64) -> f64 {
        self.continuous.integral_y_at_x(x) + self.discrete.integral_y_at_x(x)
    }

    /// Inverse of the combined cumulative mass, by bisection.
    ///
    /// The combined cdf is monotone but has steps at atoms; bisection
    /// converges to the atom location in that case.
    pub fn integral_x_at_y(&self, p: f64) -> f64 {
        let (Some(mut lo), Some(mut hi)) = (self.min_x(), self.max_x()) else {
            return f64::NAN;
        };
        if p <= 0.0 {
            return lo;
        }
        if p >= self.integral_sum() {
            return hi;
        }
        for _ in 0..100 {
            let mid = 0.5 * (lo + hi);
            if self.integral_y_at_x(mid) < p {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }

    /// Truncate both parts to `[left, right]`. No renormalization.
    pub fn truncate(&self, left: Option<f64>, right: Option<f64>) -> Result<Self, XYShapeError> {
        Ok(Self {
            continuous: self.continuous.truncate(left, right)?,
            discrete: self.discrete.truncate(left, right)?,
        })
    }

    /// Downsample both parts, splitting the point budget by mass share.
    pub fn downsample(&self, n: usize) -> Result<Self, XYShapeError> {
        let total = self.integral_sum();
        if total <= 0.0 {
            return Ok(self.clone());
        }
        let c_share = self.continuous.integral_sum() / total;
        let c_n = ((n as f64 * c_share).round() as usize).min(n);
        let d_n = n - c_n;
        Ok(Self {
            continuous: self.continuous.downsample(c_n.max(2))?,
            discrete: self.discrete.downsample(d_n.max(1))?,
        })
    }

    /// Mass-weighted mean of the two parts.
    pub fn mean(&self) -> f64 {
        let cs = self.continuous.integral_sum();
        let ds = self.discrete.integral_sum();
        let total = cs + ds;
        if total <= 0.0 {
            return f64::NAN;
        }
        let c = if cs > 0.0 { self.continuous.mean() } else { 0.0 };
        let d = if ds > 0.0 { self.discrete.mean() } else { 0.0 };
        (cs * c + ds * d) / total
    }

    /// Mass-weighted variance of the two parts.
    pub fn variance(&self) -> f64 {
        let cs = self.continuous.integral_sum();
        let ds = self.discrete.integral_sum();
        let total = cs + ds;
        if total <= 0.0 {
            return f64::NAN;
        }
        let second = |sum: f64, mean: f64, var: f64| {
            if sum > 0.0 {
                sum * (var + mean * mean)
            } else {
                0.0
            }
        };
        let raw_second = second(cs, self.continuous.mean(), self.continuous.variance())
            + second(ds, self.discrete.mean(), self.discrete.variance());
        let mean = self.mean();
        raw_second / total - mean * mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xyshape::XYShape;
    use approx::assert_relative_eq;

    fn mixed() -> MixedShape {
        // Continuous mass 1.0 (triangle), discrete mass 1.0 (two atoms).
        let c = ContinuousShape::make(
            XYShape::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]).unwrap(),
        )
        .unwrap();
        let d = DiscreteShape::make(XYShape::new(vec![-1.0, 3.0], vec![0.5, 0.5]).unwrap()).unwrap();
        MixedShape::make(c, d)
    }

    #[test]
    fn test_normalize_sums_to_one() {
        let n = mixed().normalize().unwrap();
        assert_relative_eq!(
            n.continuous().integral_sum() + n.discrete().integral_sum(),
            1.0,
            epsilon = 1e-12
        );
        // Proportional redistribution: both parts held half the raw mass.
        assert_relative_eq!(n.continuous().integral_sum(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(n.discrete().integral_sum(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_idempotent() {
        let n = mixed().normalize().unwrap();
        let n2 = n.normalize().unwrap();
        assert_relative_eq!(n2.integral_sum(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            n.continuous().integral_sum(),
            n2.continuous().integral_sum(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_x_to_y_matches_normalized_query() {
        let m = mixed();
        let n = m.normalize().unwrap();
        for x in [-1.0, 0.5, 1.0, 3.0] {
            assert_relative_eq!(m.x_to_y(x), n.x_to_y(x), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_combined_cdf_and_inverse() {
        let m = mixed().normalize().unwrap();
        assert_relative_eq!(m.integral_y_at_x(-1.0), 0.25, epsilon = 1e-12);
        assert_relative_eq!(m.integral_y_at_x(2.5), 0.75, epsilon = 1e-12);
        assert_relative_eq!(m.integral_y_at_x(3.0), 1.0, epsilon = 1e-12);
        let x = m.integral_x_at_y(0.5);
        assert_relative_eq!(m.integral_y_at_x(x), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_mean_is_mass_weighted() {
        let m = mixed();
        // Continuous mean 1.0, discrete mean 1.0, equal masses.
        assert_relative_eq!(m.mean(), 1.0, epsilon = 1e-12);
    }
}
