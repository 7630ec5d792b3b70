//! Unicode sparkline rendering of a density's y values.

use dc_core::error::{DistError, Result};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render `ys` as a fixed-width bar string, resampled to `bucket_count`
/// buckets and scaled to the tallest bar.
pub fn create(ys: &[f64], bucket_count: usize) -> Result<String> {
    if bucket_count == 0 {
        return Err(DistError::SparklineError("sparkline needs at least one bucket".into()));
    }
    if ys.is_empty() {
        return Err(DistError::SparklineError("cannot render an empty shape".into()));
    }
    let resampled = resample(ys, bucket_count);
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &y in &resampled {
        lo = lo.min(y);
        hi = hi.max(y);
    }
    let span = hi - lo;
    let out = resampled
        .iter()
        .map(|&y| {
            let t = if span > 0.0 { (y - lo) / span } else { 0.0 };
            let i = ((t * (BARS.len() - 1) as f64).round() as usize).min(BARS.len() - 1);
            BARS[i]
        })
        .collect();
    Ok(out)
}

/// Linear resampling of `ys` onto `n` evenly spaced positions.
fn resample(ys: &[f64], n: usize) -> Vec<f64> {
    if ys.len() == 1 {
        return vec![ys[0]; n];
    }
    if n == 1 {
        return vec![ys[ys.len() / 2]];
    }
    (0..n)
        .map(|i| {
            let pos = i as f64 / (n - 1) as f64 * (ys.len() - 1) as f64;
            let j = pos.floor() as usize;
            if j + 1 >= ys.len() {
                ys[ys.len() - 1]
            } else {
                let t = pos - j as f64;
                ys[j] * (1.0 - t) + ys[j + 1] * t
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_shape() {
        let ys: Vec<f64> =
            (0..100).map(|i| (-((i as f64 - 50.0) / 15.0).powi(2)).exp()).collect();
        let s = create(&ys, 20).unwrap();
        assert_eq!(s.chars().count(), 20);
        // The middle is the tallest bar, the edges the lowest.
        let chars: Vec<char> = s.chars().collect();
        assert_eq!(chars[10], '█');
        assert_eq!(chars[0], '▁');
        assert_eq!(chars[19], '▁');
    }

    #[test]
    fn test_flat_input() {
        let s = create(&[1.0, 1.0, 1.0], 5).unwrap();
        assert_eq!(s, "▁▁▁▁▁");
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(create(&[], 5).is_err());
        assert!(create(&[1.0], 0).is_err());
    }
}
