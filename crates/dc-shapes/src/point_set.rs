//! Sum type over the three point-set shape kinds.

use dc_core::error::{DistError, OperationError, Result, XYShapeError};

use crate::continuous::ContinuousShape;
use crate::discrete::DiscreteShape;
use crate::mixed::MixedShape;

/// A discretized distribution shape: continuous, discrete, or both.
#[derive(Debug, Clone, PartialEq)]
pub enum PointSet {
    /// Piecewise-linear density only.
    Continuous(ContinuousShape),
    /// Probability atoms only.
    Discrete(DiscreteShape),
    /// Both.
    Mixed(MixedShape),
}

impl PointSet {
    /// Build from optional parts, collapsing to the simplest variant.
    pub fn from_parts(continuous: ContinuousShape, discrete: DiscreteShape) -> Self {
        match (continuous.is_empty(), discrete.is_empty()) {
            (false, true) => PointSet::Continuous(continuous),
            (true, false) => PointSet::Discrete(discrete),
            _ => PointSet::Mixed(MixedShape::make(continuous, discrete)),
        }
    }

    /// The continuous part, if this variant has one.
    pub fn continuous_part(&self) -> Option<&ContinuousShape> {
        match self {
            PointSet::Continuous(c) => Some(c),
            PointSet::Mixed(m) => Some(m.continuous()),
            PointSet::Discrete(_) => None,
        }
    }

    /// The discrete part, if this variant has one.
    pub fn discrete_part(&self) -> Option<&DiscreteShape> {
        match self {
            PointSet::Discrete(d) => Some(d),
            PointSet::Mixed(m) => Some(m.discrete()),
            PointSet::Continuous(_) => None,
        }
    }

    /// View as a mixed shape (missing parts empty).
    pub fn to_mixed(&self) -> MixedShape {
        match self {
            PointSet::Continuous(c) => MixedShape::make(c.clone(), DiscreteShape::empty()),
            PointSet::Discrete(d) => MixedShape::make(ContinuousShape::empty(), d.clone()),
            PointSet::Mixed(m) => m.clone(),
        }
    }

    /// Smallest x of the support.
    pub fn min_x(&self) -> Option<f64> {
        match self {
            PointSet::Continuous(c) => c.min_x(),
            PointSet::Discrete(d) => d.min_x(),
            PointSet::Mixed(m) => m.min_x(),
        }
    }

    /// Largest x of the support.
    pub fn max_x(&self) -> Option<f64> {
        match self {
            PointSet::Continuous(c) => c.max_x(),
            PointSet::Discrete(d) => d.max_x(),
            PointSet::Mixed(m) => m.max_x(),
        }
    }

    /// Total mass.
    pub fn integral_sum(&self) -> f64 {
        match self {
            PointSet::Continuous(c) => c.integral_sum(),
            PointSet::Discrete(d) => d.integral_sum(),
            PointSet::Mixed(m) => m.integral_sum(),
        }
    }

    /// True when total mass is 1 within tolerance.
    pub fn is_normalized(&self) -> bool {
        match self {
            PointSet::Continuous(c) => c.is_normalized(),
            PointSet::Discrete(d) => d.is_normalized(),
            PointSet::Mixed(m) => m.is_normalized(),
        }
    }

    /// Scale so total mass is 1.
    pub fn normalize(&self) -> Result<Self> {
        Ok(match self {
            PointSet::Continuous(c) => PointSet::Continuous(c.normalize()?),
            PointSet::Discrete(d) => PointSet::Discrete(d.normalize()?),
            PointSet::Mixed(m) => PointSet::Mixed(m.normalize()?),
        })
    }

    /// Density plus atom mass at `x`.
    pub fn x_to_y(&self, x: f64) -> f64 {
        match self {
            PointSet::Continuous(c) => c.x_to_y(x),
            PointSet::Discrete(d) => d.x_to_y(x),
            PointSet::Mixed(m) => m.x_to_y(x),
        }
    }

    /// Cumulative mass up to `x` (unnormalized cdf).
    pub fn integral_y_at_x(&self, x: f64) -> f64 {
        match self {
            PointSet::Continuous(c) => c.integral_y_at_x(x),
            PointSet::Discrete(d) => d.integral_y_at_x(x),
            PointSet::Mixed(m) => m.integral_y_at_x(x),
        }
    }

    /// Inverse cumulative mass.
    pub fn integral_x_at_y(&self, p: f64) -> f64 {
        match self {
            PointSet::Continuous(c) => c.integral_x_at_y(p),
            PointSet::Discrete(d) => d.integral_x_at_y(p),
            PointSet::Mixed(m) => m.integral_x_at_y(p),
        }
    }

    /// Mass-weighted mean.
    pub fn mean(&self) -> f64 {
        match self {
            PointSet::Continuous(c) => c.mean(),
            PointSet::Discrete(d) => d.mean(),
            PointSet::Mixed(m) => m.mean(),
        }
    }

    /// Mass-weighted variance.
    pub fn variance(&self) -> f64 {
        match self {
            PointSet::Continuous(c) => c.variance(),
            PointSet::Discrete(d) => d.variance(),
            PointSet::Mixed(m) => m.variance(),
        }
    }

    /// Truncate the support to `[left, right]`. No renormalization; the
    /// result collapses to the simplest variant.
    pub fn truncate(&self, left: Option<f64>, right: Option<f64>) -> Result<Self, XYShapeError> {
        Ok(match self {
            PointSet::Continuous(c) => PointSet::Continuous(c.truncate(left, right)?),
            PointSet::Discrete(d) => PointSet::Discrete(d.truncate(left, right)?),
            PointSet::Mixed(m) => {
                let t = m.truncate(left, right)?;
                Self::from_parts(t.continuous().clone(), t.discrete().clone())
            }
        })
    }

    /// Reduce resolution to roughly `n` points.
    pub fn downsample(&self, n: usize) -> Result<Self, XYShapeError> {
        Ok(match self {
            PointSet::Continuous(c) => PointSet::Continuous(c.downsample(n)?),
            PointSet::Discrete(d) => PointSet::Discrete(d.downsample(n)?),
            PointSet::Mixed(m) => PointSet::Mixed(m.downsample(n)?),
        })
    }

    /// Multiply every y by `k` (mass caches carry through linearly).
    pub fn scale_by(&self, k: f64) -> Result<Self, XYShapeError> {
        Ok(match self {
            PointSet::Continuous(c) => PointSet::Continuous(c.scale_by(k)?),
            PointSet::Discrete(d) => PointSet::Discrete(d.scale_by(k)?),
            PointSet::Mixed(m) => PointSet::Mixed(MixedShape::make(
                m.continuous().scale_by(k)?,
                m.discrete().scale_by(k)?,
            )),
        })
    }

    /// Transform every y through a fallible function; integral caches are
    /// dropped because the transform's effect on mass is unknown.
    pub fn map_y_result(
        &self,
        f: impl Fn(f64) -> Result<f64, OperationError> + Copy,
    ) -> Result<Self> {
        Ok(match self {
            PointSet::Continuous(c) => PointSet::Continuous(c.map_y_result(f)?),
            PointSet::Discrete(d) => PointSet::Discrete(d.map_y_result(f)?),
            PointSet::Mixed(m) => PointSet::Mixed(MixedShape::make(
                m.continuous().map_y_result(f)?,
                m.discrete().map_y_result(f)?,
            )),
        })
    }

    /// Transform every y with a known effect on total mass, carrying the
    /// write-once caches through `cache_f`.
    pub fn map_y_with_cache(
        &self,
        f: impl Fn(f64) -> f64 + Copy,
        cache_f: impl Fn(f64) -> f64 + Copy,
    ) -> Result<Self, XYShapeError> {
        Ok(match self {
            PointSet::Continuous(c) => PointSet::Continuous(c.map_y_with_cache(f, cache_f)?),
            PointSet::Discrete(d) => {
                // Discrete masses go through the same y transform.
                let t = d.map_y(f)?;
                PointSet::Discrete(t)
            }
            PointSet::Mixed(m) => PointSet::Mixed(MixedShape::make(
                m.continuous().map_y_with_cache(f, cache_f)?,
                m.discrete().map_y(f)?,
            )),
        })
    }

    /// Combine two point sets point-for-point (not a convolution).
    ///
    /// Continuous parts combine on the union grid; discrete parts merge by
    /// atom location. Used for per-point transforms such as mixture
    /// addition.
    pub fn combine_pointwise(
        a: &Self,
        b: &Self,
        f: impl Fn(f64, f64) -> Result<f64, OperationError> + Copy,
    ) -> Result<Self> {
        let am = a.to_mixed();
        let bm = b.to_mixed();

        let continuous = match (am.continuous().is_empty(), bm.continuous().is_empty()) {
            (true, true) => ContinuousShape::empty(),
            (false, true) => am.continuous().clone(),
            (true, false) => bm.continuous().clone(),
            (false, false) => {
                let combined = crate::XYShape::combine_pointwise(
                    am.continuous().shape(),
                    bm.continuous().shape(),
                    f,
                )
                .map_err(DistError::Operation)?;
                ContinuousShape::make(combined)?
            }
        };

        let mut atoms: Vec<(f64, f64)> = Vec::new();
        for (x, y) in am.discrete().shape().zip() {
            let other = bm.discrete().x_to_y(x);
            atoms.push((x, f(y, other)?));
        }
        for (x, y) in bm.discrete().shape().zip() {
            if am.discrete().x_to_y(x) == 0.0 {
                atoms.push((x, f(0.0, y)?));
            }
        }
        let discrete = DiscreteShape::from_weighted_points(atoms)?;

        Ok(Self::from_parts(continuous, discrete))
    }
}
