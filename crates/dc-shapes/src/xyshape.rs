//! Parallel xs/ys arrays with piecewise-linear interpolation.
//!
//! `XYShape` is the storage primitive under every point-set shape. It
//! enforces `len(xs) == len(ys)` and finiteness at construction; sortedness
//! is checked by the shape constructors that need it.

use dc_core::error::{OperationError, XYShapeError};

/// Parallel xs/ys arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct XYShape {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl XYShape {
    /// Construct from parallel arrays, validating lengths and finiteness.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, XYShapeError> {
        if xs.len() != ys.len() {
            return Err(XYShapeError::UnequalLengths { xs: xs.len(), ys: ys.len() });
        }
        for (i, (x, y)) in xs.iter().zip(&ys).enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(XYShapeError::NotFinite(i));
            }
        }
        Ok(Self { xs, ys })
    }

    /// Construct from (x, y) pairs.
    pub fn from_zipped(points: Vec<(f64, f64)>) -> Result<Self, XYShapeError> {
        let (xs, ys) = points.into_iter().unzip();
        Self::new(xs, ys)
    }

    /// The empty shape.
    pub fn empty() -> Self {
        Self { xs: Vec::new(), ys: Vec::new() }
    }

    /// x coordinates.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// y coordinates.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// True when the shape has no points.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// First x, if any.
    pub fn min_x(&self) -> Option<f64> {
        self.xs.first().copied()
    }

    /// Last x, if any.
    pub fn max_x(&self) -> Option<f64> {
        self.xs.last().copied()
    }

    /// (x, y) pairs.
    pub fn zip(&self) -> Vec<(f64, f64)> {
        self.xs.iter().copied().zip(self.ys.iter().copied()).collect()
    }

    /// True when xs is strictly increasing.
    pub fn is_strictly_sorted(&self) -> bool {
        self.xs.windows(2).all(|w| w[0] < w[1])
    }

    /// Validate strict x ordering, as required for continuous interpolation.
    pub fn ensure_strictly_sorted(&self) -> Result<(), XYShapeError> {
        if self.is_strictly_sorted() {
            Ok(())
        } else {
            Err(XYShapeError::NotSorted)
        }
    }

    /// Linearly interpolated y at `x`; zero outside the domain.
    pub fn y_at_linear(&self, x: f64) -> f64 {
        match self.xs.len() {
            0 => 0.0,
            1 => {
                if x == self.xs[0] {
                    self.ys[0]
                } else {
                    0.0
                }
            }
            _ => {
                if x < self.xs[0] || x > self.xs[self.xs.len() - 1] {
                    return 0.0;
                }
                match self.xs.binary_search_by(|v| v.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Less)) {
                    Ok(i) => self.ys[i],
                    Err(i) => {
                        // x lies strictly between xs[i-1] and xs[i].
                        let (x0, x1) = (self.xs[i - 1], self.xs[i]);
                        let (y0, y1) = (self.ys[i - 1], self.ys[i]);
                        let t = (x - x0) / (x1 - x0);
                        y0 + t * (y1 - y0)
                    }
                }
            }
        }
    }

    /// Exact y at an atom location, summing duplicates; zero when absent.
    pub fn y_at_exact(&self, x: f64) -> f64 {
        self.xs
            .iter()
            .zip(&self.ys)
            .filter(|(xi, _)| **xi == x)
            .map(|(_, yi)| *yi)
            .sum()
    }

    /// Map a function over all y values.
    pub fn map_y(&self, f: impl Fn(f64) -> f64) -> Self {
        Self { xs: self.xs.clone(), ys: self.ys.iter().map(|&y| f(y)).collect() }
    }

    /// Map a fallible function over all y values.
    pub fn map_y_result(
        &self,
        f: impl Fn(f64) -> Result<f64, OperationError>,
    ) -> Result<Self, OperationError> {
        let ys = self.ys.iter().map(|&y| f(y)).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { xs: self.xs.clone(), ys })
    }

    /// Total mass under the piecewise-linear curve (trapezoid rule).
    pub fn trapezoid_integral(&self) -> f64 {
        self.xs
            .windows(2)
            .zip(self.ys.windows(2))
            .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) * 0.5)
            .sum()
    }

    /// Cumulative trapezoid integral, as a shape over the same xs.
    ///
    /// The result's ys are non-decreasing when the input ys are non-negative.
    pub fn cumulative_trapezoid(&self) -> Self {
        let mut ys = Vec::with_capacity(self.ys.len());
        let mut acc = 0.0;
        for i in 0..self.xs.len() {
            if i > 0 {
                acc += (self.xs[i] - self.xs[i - 1]) * (self.ys[i] + self.ys[i - 1]) * 0.5;
            }
            ys.push(acc);
        }
        Self { xs: self.xs.clone(), ys }
    }

    /// Cumulative sum of ys at each x (stepwise integral of atom masses).
    pub fn cumulative_sum(&self) -> Self {
        let mut acc = 0.0;
        let ys = self
            .ys
            .iter()
            .map(|&y| {
                acc += y;
                acc
            })
            .collect();
        Self { xs: self.xs.clone(), ys }
    }

    /// Sum of ys.
    pub fn y_sum(&self) -> f64 {
        self.ys.iter().sum()
    }

    /// Sorted union of the two shapes' xs, duplicates removed.
    pub fn union_xs(a: &Self, b: &Self) -> Vec<f64> {
        let mut xs: Vec<f64> = a.xs.iter().chain(b.xs.iter()).copied().collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup();
        xs
    }

    /// Combine two shapes point-for-point on the union grid.
    ///
    /// Each operand is linearly interpolated at the other's xs, then `f` is
    /// applied to the paired ys. This is a per-point transform, not a
    /// convolution.
    pub fn combine_pointwise(
        a: &Self,
        b: &Self,
        f: impl Fn(f64, f64) -> Result<f64, OperationError>,
    ) -> Result<Self, OperationError> {
        let xs = Self::union_xs(a, b);
        let ys = xs
            .iter()
            .map(|&x| f(a.y_at_linear(x), b.y_at_linear(x)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { xs, ys })
    }
}
