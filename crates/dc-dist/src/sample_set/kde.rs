//! Sample → point-set conversion.
//!
//! The pipeline: sort, split heavily repeated values off as discrete atoms,
//! detect log-scaled data, then run a Gaussian KDE (in plain or log space)
//! onto a fixed-length even grid. The split/fold/detection constants are
//! load-bearing: changing them changes which inputs render as atoms versus
//! densities.

use dc_core::error::{DistError, Result};
use dc_shapes::{ContinuousShape, DiscreteShape, PointSet, XYShape};

/// A value must repeat at least `max(20, len/50)` times to become an atom.
const MIN_DISCRETE_REPEATS_BASE: usize = 20;
/// Denominator of the length-proportional repeat threshold.
const DISCRETE_REPEAT_DIVISOR: usize = 50;
/// A continuous remainder smaller than this is folded into the atoms.
const MIN_SAMPLES_FOR_KDE: usize = 5;
/// Log-scale heuristic: `ln(p90/p10) > 3` over the central 80% range.
const LOG_SCALE_RATIO_THRESHOLD: f64 = 3.0;
/// Grid padding in bandwidths on each side of the sample range.
const BANDWIDTH_CUTOFF: f64 = 3.0;

/// Convert raw samples into a queryable point set.
///
/// `continuous_output_length` fixes the KDE grid resolution;
/// `kernel_width` overrides the Silverman bandwidth and
/// `log_scale_override` the automatic log-scale detection.
pub fn samples_to_point_set(
    samples: &[f64],
    continuous_output_length: usize,
    kernel_width: Option<f64>,
    log_scale_override: Option<bool>,
) -> Result<PointSet> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let counted_length = sorted.len();

    let min_repeats = MIN_DISCRETE_REPEATS_BASE.max(counted_length / DISCRETE_REPEAT_DIVISOR);
    let (mut continuous, mut atoms) = split_continuous_and_discrete(&sorted, min_repeats);

    // A handful of leftover continuous samples cannot support a density
    // estimate; fold them into the discrete weighting instead.
    if !continuous.is_empty() && continuous.len() < MIN_SAMPLES_FOR_KDE {
        log::debug!(
            "only {} continuous samples remain, folding into discrete atoms",
            continuous.len()
        );
        fold_into_atoms(&mut atoms, &continuous);
        continuous.clear();
    }
    // All-equal remainders degenerate the same way.
    if !continuous.is_empty() && continuous[0] == continuous[continuous.len() - 1] {
        fold_into_atoms(&mut atoms, &continuous);
        continuous.clear();
    }

    let point_weight = 1.0 / counted_length as f64;

    let continuous_shape = if continuous.is_empty() {
        ContinuousShape::empty()
    } else {
        let log_scale = log_scale_override.unwrap_or_else(|| detect_log_scale(&continuous));
        let density = if log_scale {
            log_kde(&continuous, continuous_output_length, kernel_width)?
        } else {
            kde(&continuous, continuous_output_length, kernel_width)?
        };
        // The kernel estimate integrates to ~1 over the continuous samples;
        // rescale to this subset's share of the total mass exactly.
        let share = continuous.len() as f64 * point_weight;
        let measured = density.trapezoid_integral();
        let shape = if measured > 0.0 {
            density.map_y(|y| y * share / measured)
        } else {
            density
        };
        ContinuousShape::make_with_integral_sum(shape, share)?
    };

    let discrete_shape = DiscreteShape::from_weighted_points(
        atoms
            .iter()
            .map(|&(x, count)| (x, count as f64 * point_weight))
            .collect(),
    )?;

    if continuous_shape.is_empty() && discrete_shape.is_empty() {
        return Err(DistError::TooFewSamplesForConversionToPointSet);
    }
    Ok(PointSet::from_parts(continuous_shape, discrete_shape))
}

/// Split sorted samples into `(continuous remainder, (value, count) atoms)`.
fn split_continuous_and_discrete(
    sorted: &[f64],
    min_repeats: usize,
) -> (Vec<f64>, Vec<(f64, usize)>) {
    let mut continuous = Vec::with_capacity(sorted.len());
    let mut atoms = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        let run = j - i;
        if run >= min_repeats {
            atoms.push((sorted[i], run));
        } else {
            continuous.extend_from_slice(&sorted[i..j]);
        }
        i = j;
    }
    (continuous, atoms)
}

fn fold_into_atoms(atoms: &mut Vec<(f64, usize)>, samples: &[f64]) {
    let mut i = 0;
    while i < samples.len() {
        let mut j = i + 1;
        while j < samples.len() && samples[j] == samples[i] {
            j += 1;
        }
        atoms.push((samples[i], j - i));
        i = j;
    }
}

/// `ln(p90/p10) > 3` over the central 80% range; only meaningful for
/// all-positive samples.
fn detect_log_scale(sorted: &[f64]) -> bool {
    let p10 = quantile_sorted(sorted, 0.10);
    let p90 = quantile_sorted(sorted, 0.90);
    p10 > 0.0 && (p90 / p10).ln() > LOG_SCALE_RATIO_THRESHOLD
}

/// Linear-interpolated quantile of a sorted array.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let i = pos.floor() as usize;
    let j = pos.ceil() as usize;
    if i == j {
        return sorted[i];
    }
    let t = pos - i as f64;
    (1.0 - t) * sorted[i] + t * sorted[j]
}

/// Silverman's nrd0 bandwidth rule.
fn nrd0_bandwidth(sorted: &[f64]) -> f64 {
    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let sd = (sorted.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / n).sqrt();
    let iqr = quantile_sorted(sorted, 0.75) - quantile_sorted(sorted, 0.25);
    let mut lo = sd.min(iqr / 1.34);
    if lo == 0.0 {
        lo = if sd > 0.0 {
            sd
        } else if sorted[0].abs() > 0.0 {
            sorted[0].abs()
        } else {
            1.0
        };
    }
    0.9 * lo * n.powf(-0.2)
}

/// Gaussian KDE of sorted samples onto an even grid of `grid_length` points.
fn kde(sorted: &[f64], grid_length: usize, kernel_width: Option<f64>) -> Result<XYShape> {
    let h = kernel_width.unwrap_or_else(|| nrd0_bandwidth(sorted));
    if !h.is_finite() || h <= 0.0 {
        return Err(DistError::ArgumentError(format!(
            "kernel width must be finite and > 0, got {h}"
        )));
    }
    let n = grid_length.max(2);
    let lo = sorted[0] - BANDWIDTH_CUTOFF * h;
    let hi = sorted[sorted.len() - 1] + BANDWIDTH_CUTOFF * h;
    let step = (hi - lo) / (n - 1) as f64;
    let norm = 1.0 / (sorted.len() as f64 * h * (2.0 * std::f64::consts::PI).sqrt());
    let xs: Vec<f64> = (0..n).map(|i| lo + step * i as f64).collect();
    let ys: Vec<f64> = xs
        .iter()
        .map(|&x| {
            sorted
                .iter()
                .map(|&c| {
                    let z = (x - c) / h;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm
        })
        .collect();
    Ok(XYShape::new(xs, ys)?)
}

/// KDE in log space, mapped back with the `1/x` Jacobian.
fn log_kde(sorted: &[f64], grid_length: usize, kernel_width: Option<f64>) -> Result<XYShape> {
    let logs: Vec<f64> = sorted.iter().map(|&x| x.ln()).collect();
    let log_density = kde(&logs, grid_length, kernel_width)?;
    let xs: Vec<f64> = log_density.xs().iter().map(|&u| u.exp()).collect();
    let ys: Vec<f64> = log_density
        .ys()
        .iter()
        .zip(&xs)
        .map(|(&y, &x)| y / x)
        .collect();
    Ok(XYShape::new(xs, ys)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal as RandNormal};

    #[test]
    fn test_quantile_sorted() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(quantile_sorted(&v, 0.0), 1.0);
        assert_relative_eq!(quantile_sorted(&v, 0.5), 3.0);
        assert_relative_eq!(quantile_sorted(&v, 1.0), 5.0);
        assert_relative_eq!(quantile_sorted(&v, 0.25), 2.0);
    }

    #[test]
    fn test_split_respects_repeat_threshold() {
        // 30 zeros, then 10 distinct values: with min_repeats 20, only the
        // zeros become an atom.
        let mut samples: Vec<f64> = vec![0.0; 30];
        samples.extend((1..=10).map(|i| i as f64));
        let (continuous, atoms) = split_continuous_and_discrete(&samples, 20);
        assert_eq!(atoms, vec![(0.0, 30)]);
        assert_eq!(continuous.len(), 10);
    }

    #[test]
    fn test_pure_normal_samples_give_continuous_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let source = RandNormal::new(2.0, 1.0).unwrap();
        let samples: Vec<f64> = (0..2000).map(|_| source.sample(&mut rng)).collect();
        let ps = samples_to_point_set(&samples, 200, None, None).unwrap();
        assert!(matches!(ps, PointSet::Continuous(_)));
        assert_relative_eq!(ps.integral_sum(), 1.0, epsilon = 1e-9);
        let sample_mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert_relative_eq!(ps.mean(), sample_mean, epsilon = 0.05);
    }

    #[test]
    fn test_repeated_value_becomes_atom() {
        let mut rng = StdRng::seed_from_u64(11);
        let source = RandNormal::new(0.0, 1.0).unwrap();
        let mut samples: Vec<f64> = (0..1000).map(|_| source.sample(&mut rng)).collect();
        samples.extend(std::iter::repeat(5.0).take(500));
        let ps = samples_to_point_set(&samples, 100, None, None).unwrap();
        let atom_mass = ps.discrete_part().expect("expected a discrete part").x_to_y(5.0);
        assert_relative_eq!(atom_mass, 500.0 / 1500.0, epsilon = 1e-12);
        assert_relative_eq!(ps.integral_sum(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_tiny_continuous_remainder_folds_into_atoms() {
        // 40 repeats + 3 stragglers: the stragglers cannot support a KDE.
        let mut samples: Vec<f64> = vec![1.0; 40];
        samples.extend([2.0, 3.0, 4.0]);
        let ps = samples_to_point_set(&samples, 100, None, None).unwrap();
        assert!(matches!(ps, PointSet::Discrete(_)));
        assert_relative_eq!(ps.integral_sum(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(ps.x_to_y(3.0), 1.0 / 43.0, epsilon = 1e-12);
    }

    #[test]
    fn test_log_scale_detection() {
        // Five orders of magnitude: ln(p90/p10) far exceeds 3.
        let wide: Vec<f64> = (1..=1000).map(|i| 10f64.powf(i as f64 / 200.0)).collect();
        assert!(detect_log_scale(&wide));
        // A narrow positive sample does not trigger it.
        let narrow: Vec<f64> = (1..=1000).map(|i| 5.0 + i as f64 / 1000.0).collect();
        assert!(!detect_log_scale(&narrow));
        // Negative values make the ratio meaningless.
        let signed: Vec<f64> = (-500..500).map(|i| i as f64).collect();
        assert!(!detect_log_scale(&signed));
    }

    #[test]
    fn test_log_kde_stays_positive_and_normalized() {
        let mut rng = StdRng::seed_from_u64(3);
        let source = RandNormal::new(0.0, 2.0).unwrap();
        let samples: Vec<f64> = (0..2000)
            .map(|_| -> f64 { source.sample(&mut rng) })
            .map(|x| x.exp())
            .collect();
        let ps = samples_to_point_set(&samples, 200, None, Some(true)).unwrap();
        let c = ps.continuous_part().unwrap();
        assert!(c.min_x().unwrap() > 0.0);
        assert_relative_eq!(ps.integral_sum(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_kernel_width_override() {
        let samples: Vec<f64> = (0..100).map(|i| i as f64 / 10.0).collect();
        let wide = samples_to_point_set(&samples, 50, Some(5.0), None).unwrap();
        let narrow = samples_to_point_set(&samples, 50, Some(0.1), None).unwrap();
        // A wider kernel spreads the support further.
        assert!(wide.min_x().unwrap() < narrow.min_x().unwrap());
    }
}
