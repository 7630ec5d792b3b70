//! Algebraic convolution of point-set shapes.
//!
//! Combining two independent distributions under `+`, `-` or `*` decomposes
//! into three kinds of contribution:
//! - discrete ⊛ discrete → discrete (atom pairs)
//! - discrete ⊛ continuous → continuous, in both orientations (the discrete
//!   operand may sit on either side of a non-commutative operation)
//! - continuous ⊛ continuous → continuous (mass-point cross products,
//!   re-gridded onto an even grid)
//!
//! The continuous contributions are summed pointwise; the result's total
//! mass is the product of the operands' integral sums, and that product is
//! seeded into the result's write-once cache.

use dc_core::error::{DistError, Result};
use dc_core::ops::AlgebraicOp;

use crate::continuous::ContinuousShape;
use crate::discrete::DiscreteShape;
use crate::point_set::PointSet;
use crate::xyshape::XYShape;

/// Which side of the operation the discrete operand is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiscreteSide {
    Left,
    Right,
}

/// Convolve two point sets under a convolvable operation.
pub fn combine_algebraically(op: AlgebraicOp, t1: &PointSet, t2: &PointSet) -> Result<PointSet> {
    if !op.is_convolvable() {
        return Err(DistError::Unreachable(format!(
            "operation {op} has no convolution path"
        )));
    }
    let m1 = t1.to_mixed();
    let m2 = t2.to_mixed();
    let (c1, d1) = (m1.continuous(), m1.discrete());
    let (c2, d2) = (m2.continuous(), m2.discrete());

    let mut atoms: Vec<(f64, f64)> = Vec::new();
    let mut polylines: Vec<ContinuousShape> = Vec::new();

    if !d1.is_empty() && !d2.is_empty() {
        atoms.extend(discrete_discrete(op, d1, d2)?);
    }
    if !d1.is_empty() && !c2.is_empty() {
        let (lines, extra) = discrete_continuous(op, d1, c2, DiscreteSide::Left)?;
        polylines.extend(lines);
        atoms.extend(extra);
    }
    if !d2.is_empty() && !c1.is_empty() {
        let (lines, extra) = discrete_continuous(op, d2, c1, DiscreteSide::Right)?;
        polylines.extend(lines);
        atoms.extend(extra);
    }
    if !c1.is_empty() && !c2.is_empty() {
        let target = c1.len().max(c2.len());
        let (line, extra) = continuous_continuous(op, c1, c2, target)?;
        polylines.extend(line);
        atoms.extend(extra);
    }

    let continuous = sum_polylines(polylines)?;
    let discrete = DiscreteShape::from_weighted_points(atoms)?;

    // The exact mass of an independent combination is the product of the
    // operands' masses; the discrete contribution is exact, so any
    // quadrature error lives in the continuous part. Rescale it and seed
    // the caches with the exact values.
    let expected_total = t1.integral_sum() * t2.integral_sum();
    let discrete_mass = discrete.integral_sum();
    let continuous = match continuous {
        Some(c) => {
            let measured = c.integral_sum();
            let expected = (expected_total - discrete_mass).max(0.0);
            if measured > 0.0 && expected > 0.0 {
                let rescaled = c.shape().map_y(|y| y * expected / measured);
                ContinuousShape::make_with_integral_sum(rescaled, expected)?
            } else {
                c
            }
        }
        None => ContinuousShape::empty(),
    };

    Ok(PointSet::from_parts(continuous, discrete))
}

fn discrete_discrete(
    op: AlgebraicOp,
    d1: &DiscreteShape,
    d2: &DiscreteShape,
) -> Result<Vec<(f64, f64)>> {
    let mut out = Vec::with_capacity(d1.len() * d2.len());
    for (x1, w1) in d1.shape().zip() {
        for (x2, w2) in d2.shape().zip() {
            let z = op.apply(x1, x2).map_err(DistError::Operation)?;
            out.push((z, w1 * w2));
        }
    }
    Ok(out)
}

/// Convolve a discrete shape with a continuous one.
///
/// Every operation here is affine in the continuous variable, so each atom
/// maps the polyline to another polyline; the Jacobian of `*a` rescales the
/// density by `1/|a|`. Multiplication by an atom at zero collapses that
/// atom's share of the mass onto a single point, returned separately.
fn discrete_continuous(
    op: AlgebraicOp,
    d: &DiscreteShape,
    c: &ContinuousShape,
    side: DiscreteSide,
) -> Result<(Vec<ContinuousShape>, Vec<(f64, f64)>)> {
    let mut lines = Vec::with_capacity(d.len());
    let mut extra_atoms = Vec::new();
    for (a, w) in d.shape().zip() {
        if op == AlgebraicOp::Multiply && a == 0.0 {
            log::debug!("multiply by atom at zero: collapsing continuous mass onto a point");
            extra_atoms.push((0.0, w * c.integral_sum()));
            continue;
        }
        let apply = |x: f64| match side {
            DiscreteSide::Left => op.apply(a, x),
            DiscreteSide::Right => op.apply(x, a),
        };
        let jacobian = match op {
            AlgebraicOp::Multiply => a.abs(),
            _ => 1.0,
        };
        let mut points = Vec::with_capacity(c.len());
        for (x, y) in c.shape().zip() {
            let z = apply(x).map_err(DistError::Operation)?;
            points.push((z, y * w / jacobian));
        }
        points.sort_by(|p, q| p.0.total_cmp(&q.0));
        lines.push(ContinuousShape::make(XYShape::from_zipped(points)?)?);
    }
    Ok((lines, extra_atoms))
}

/// Convolve two continuous shapes.
///
/// Each shape is reduced to per-segment mass points (midpoint, trapezoid
/// area); the cross products form a weighted point cloud that is re-gridded
/// onto `target_length` even points with linear binning.
fn continuous_continuous(
    op: AlgebraicOp,
    c1: &ContinuousShape,
    c2: &ContinuousShape,
    target_length: usize,
) -> Result<(Option<ContinuousShape>, Vec<(f64, f64)>)> {
    let p1 = mass_points(c1);
    let p2 = mass_points(c2);
    if p1.is_empty() || p2.is_empty() {
        return Ok((None, Vec::new()));
    }

    let mut zs = Vec::with_capacity(p1.len() * p2.len());
    let mut total_w = 0.0;
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &(x1, w1) in &p1 {
        for &(x2, w2) in &p2 {
            let z = op.apply(x1, x2).map_err(DistError::Operation)?;
            let w = w1 * w2;
            lo = lo.min(z);
            hi = hi.max(z);
            total_w += w;
            zs.push((z, w));
        }
    }

    if hi == lo {
        // The whole cloud landed on one point.
        return Ok((None, vec![(lo, total_w)]));
    }

    let n = target_length.max(2);
    let h = (hi - lo) / (n - 1) as f64;
    let mut bins = vec![0.0f64; n];
    for (z, w) in zs {
        let pos = (z - lo) / h;
        let i = (pos.floor() as usize).min(n - 2);
        let frac = pos - i as f64;
        bins[i] += w * (1.0 - frac);
        bins[i + 1] += w * frac;
    }

    let xs: Vec<f64> = (0..n).map(|i| lo + h * i as f64).collect();
    let ys: Vec<f64> = bins.iter().map(|&b| b / h).collect();
    let shape = XYShape::new(xs, ys)?;
    let measured = shape.trapezoid_integral();
    let shape = if measured > 0.0 {
        shape.map_y(|y| y * total_w / measured)
    } else {
        shape
    };
    Ok((Some(ContinuousShape::make(shape)?), Vec::new()))
}

/// Per-segment mass points of a piecewise-linear density.
fn mass_points(c: &ContinuousShape) -> Vec<(f64, f64)> {
    let xs = c.shape().xs();
    let ys = c.shape().ys();
    let mut out = Vec::with_capacity(xs.len().saturating_sub(1));
    for i in 1..xs.len() {
        let area = (xs[i] - xs[i - 1]) * (ys[i] + ys[i - 1]) * 0.5;
        if area > 0.0 {
            out.push((0.5 * (xs[i - 1] + xs[i]), area));
        }
    }
    out
}

/// Pointwise sum of polyline densities on the union grid.
fn sum_polylines(lines: Vec<ContinuousShape>) -> Result<Option<ContinuousShape>> {
    let mut iter = lines.into_iter().filter(|l| !l.is_empty());
    let Some(first) = iter.next() else {
        return Ok(None);
    };
    let mut acc = first.shape().clone();
    for line in iter {
        acc = XYShape::combine_pointwise(&acc, line.shape(), |a, b| Ok(a + b))
            .map_err(DistError::Operation)?;
    }
    Ok(Some(ContinuousShape::make(acc)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform01() -> ContinuousShape {
        ContinuousShape::make(XYShape::new(vec![0.0, 1.0], vec![1.0, 1.0]).unwrap()).unwrap()
    }

    fn die() -> DiscreteShape {
        let sixth = 1.0 / 6.0;
        DiscreteShape::make(
            XYShape::new(
                vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
                vec![sixth, sixth, sixth, sixth, sixth, sixth],
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_two_dice_sum() {
        let a = PointSet::Discrete(die());
        let b = PointSet::Discrete(die());
        let sum = combine_algebraically(AlgebraicOp::Add, &a, &b).unwrap();
        let d = match &sum {
            PointSet::Discrete(d) => d,
            other => panic!("expected discrete result, got {other:?}"),
        };
        assert_eq!(d.len(), 11);
        assert_relative_eq!(d.x_to_y(7.0), 6.0 / 36.0, epsilon = 1e-12);
        assert_relative_eq!(d.x_to_y(2.0), 1.0 / 36.0, epsilon = 1e-12);
        assert_relative_eq!(d.integral_sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_sum_is_triangular() {
        let a = PointSet::Continuous(uniform01());
        let b = PointSet::Continuous(uniform01());
        let sum = combine_algebraically(AlgebraicOp::Add, &a, &b).unwrap();
        assert!(matches!(sum, PointSet::Continuous(_)));
        assert_relative_eq!(sum.integral_sum(), 1.0, epsilon = 1e-9);
        // Mean of U+U is 1; the triangular peak sits there.
        assert_relative_eq!(sum.mean(), 1.0, epsilon = 0.02);
        assert!(sum.x_to_y(1.0) > sum.x_to_y(0.2));
        assert!(sum.x_to_y(1.0) > sum.x_to_y(1.8));
    }

    #[test]
    fn test_discrete_shift_of_continuous() {
        let atom = DiscreteShape::make(XYShape::new(vec![10.0], vec![1.0]).unwrap()).unwrap();
        let c = PointSet::Continuous(uniform01());
        let d = PointSet::Discrete(atom);
        let shifted = combine_algebraically(AlgebraicOp::Add, &c, &d).unwrap();
        assert_relative_eq!(shifted.min_x().unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(shifted.max_x().unwrap(), 11.0, epsilon = 1e-12);
        assert_relative_eq!(shifted.integral_sum(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_subtract_is_direction_sensitive() {
        let atom = DiscreteShape::make(XYShape::new(vec![5.0], vec![1.0]).unwrap()).unwrap();
        let c = PointSet::Continuous(uniform01());
        let d = PointSet::Discrete(atom);
        // 5 - U[0,1] lives on [4, 5]; U[0,1] - 5 lives on [-5, -4].
        let left = combine_algebraically(AlgebraicOp::Subtract, &d, &c).unwrap();
        let right = combine_algebraically(AlgebraicOp::Subtract, &c, &d).unwrap();
        assert_relative_eq!(left.min_x().unwrap(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(right.max_x().unwrap(), -4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_multiply_by_zero_atom_collapses() {
        let atom = DiscreteShape::make(XYShape::new(vec![0.0], vec![1.0]).unwrap()).unwrap();
        let c = PointSet::Continuous(uniform01());
        let product =
            combine_algebraically(AlgebraicOp::Multiply, &c, &PointSet::Discrete(atom)).unwrap();
        let d = match &product {
            PointSet::Discrete(d) => d,
            other => panic!("expected discrete result, got {other:?}"),
        };
        assert_relative_eq!(d.x_to_y(0.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_result_mass_is_product_of_input_masses() {
        let a = PointSet::Continuous(uniform01()).scale_by(0.5).unwrap();
        let b = PointSet::Continuous(uniform01()).scale_by(0.25).unwrap();
        let sum = combine_algebraically(AlgebraicOp::Add, &a, &b).unwrap();
        assert_relative_eq!(sum.integral_sum(), 0.125, epsilon = 1e-9);
    }
}
