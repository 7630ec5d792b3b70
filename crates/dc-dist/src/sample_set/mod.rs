//! Monte-Carlo sample-set representation.

use dc_core::env::Env;
use dc_core::error::{DistError, OperationError, Result};
use dc_shapes::PointSet;
use rand::rngs::StdRng;
use rand::Rng;

/// Sample → point-set (KDE) conversion pipeline.
pub mod kde;

use kde::quantile_sorted;

/// An empirical distribution: an immutable array of independent draws.
///
/// Construction requires at least [`SampleSetDist::MIN_SAMPLES`] finite
/// samples. The stored order matters: [`sample_n`](SampleSetDist::sample_n)
/// hands back the stored prefix, so two sample sets derived from the same
/// draws stay correlated index-by-index.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSetDist {
    samples: Vec<f64>,
}

impl SampleSetDist {
    /// Minimum number of samples for a valid set.
    pub const MIN_SAMPLES: usize = 6;

    /// Construct from raw draws; fails below the minimum or on non-finite
    /// values.
    pub fn make(samples: Vec<f64>) -> Result<Self> {
        if samples.len() < Self::MIN_SAMPLES {
            return Err(DistError::TooFewSamples);
        }
        if let Some(bad) = samples.iter().find(|s| !s.is_finite()) {
            return Err(DistError::NonNumericInput(format!(
                "samples must be finite, found {bad}"
            )));
        }
        Ok(Self { samples })
    }

    /// Draw `env.sample_count` fresh samples from any distribution.
    pub fn from_dist(dist: &crate::base::Dist, env: &Env, rng: &mut StdRng) -> Result<Self> {
        use crate::base::BaseDist;
        Self::make(dist.sample_n(rng, env.sample_count))
    }

    /// The stored draws, in insertion order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of stored draws.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: construction requires at least 6 samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Smallest stored draw.
    pub fn min(&self) -> f64 {
        self.samples.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest stored draw.
    pub fn max(&self) -> f64 {
        self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Arithmetic mean.
    pub fn mean(&self) -> f64 {
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Population variance, accumulated around the range midpoint.
    ///
    /// Shifting by `(min+max)/2` keeps the squared terms small for samples
    /// far from zero, where the naive `E[x²]−E[x]²` form cancels
    /// catastrophically.
    pub fn variance(&self) -> f64 {
        let shift = 0.5 * (self.min() + self.max());
        let n = self.samples.len() as f64;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for &x in &self.samples {
            let d = x - shift;
            sum += d;
            sum_sq += d * d;
        }
        let mean = sum / n;
        sum_sq / n - mean * mean
    }

    /// Fraction of draws ≤ `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        let count = self.samples.iter().filter(|&&s| s <= x).count();
        count as f64 / self.samples.len() as f64
    }

    /// Linear-interpolated order statistic on a sorted copy.
    pub fn inv(&self, p: f64) -> f64 {
        let mut sorted = self.samples.clone();
        sorted.sort_by(f64::total_cmp);
        quantile_sorted(&sorted, p)
    }

    /// One stored draw, chosen uniformly.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        self.samples[rng.gen_range(0..self.samples.len())]
    }

    /// `n` draws.
    ///
    /// For `n` within the stored length this is the stored prefix, so
    /// same-index draws across related sets stay correlated. Larger requests
    /// fall back to fresh draws with replacement.
    pub fn sample_n(&self, rng: &mut StdRng, n: usize) -> Vec<f64> {
        if n <= self.samples.len() {
            self.samples[..n].to_vec()
        } else {
            (0..n).map(|_| self.sample(rng)).collect()
        }
    }

    /// Drop draws outside `[left, right]`. No renormalization is needed for
    /// unweighted samples; the result re-validates the minimum count.
    pub fn truncate(&self, left: Option<f64>, right: Option<f64>) -> Result<Self> {
        let lo = left.unwrap_or(f64::NEG_INFINITY);
        let hi = right.unwrap_or(f64::INFINITY);
        let kept: Vec<f64> =
            self.samples.iter().copied().filter(|&s| s >= lo && s <= hi).collect();
        Self::make(kept)
    }

    /// Pair same-index draws of two sets through a scalar function, up to
    /// the shorter length.
    pub fn map2(
        a: &Self,
        b: &Self,
        f: impl Fn(f64, f64) -> Result<f64, OperationError>,
    ) -> Result<Self> {
        let mapped = a
            .samples
            .iter()
            .zip(&b.samples)
            .map(|(&x, &y)| f(x, y))
            .collect::<Result<Vec<_>, _>>()
            .map_err(DistError::Operation)?;
        Self::make(mapped)
    }

    /// Three-way version of [`map2`](Self::map2).
    pub fn map3(
        a: &Self,
        b: &Self,
        c: &Self,
        f: impl Fn(f64, f64, f64) -> Result<f64, OperationError>,
    ) -> Result<Self> {
        let mapped = a
            .samples
            .iter()
            .zip(&b.samples)
            .zip(&c.samples)
            .map(|((&x, &y), &z)| f(x, y, z))
            .collect::<Result<Vec<_>, _>>()
            .map_err(DistError::Operation)?;
        Self::make(mapped)
    }

    /// Visit index `i` of every set that has it, passing however many values
    /// exist at that index. The output is as long as the longest input.
    pub fn map_n(
        sets: &[&Self],
        f: impl Fn(&[f64]) -> Result<f64, OperationError>,
    ) -> Result<Self> {
        let longest = sets.iter().map(|s| s.len()).max().unwrap_or(0);
        let mut mapped = Vec::with_capacity(longest);
        let mut row = Vec::with_capacity(sets.len());
        for i in 0..longest {
            row.clear();
            row.extend(sets.iter().filter_map(|s| s.samples.get(i).copied()));
            mapped.push(f(&row).map_err(DistError::Operation)?);
        }
        Self::make(mapped)
    }

    /// Categorical mixture of sample sets.
    ///
    /// Weights are normalized into a category selector; each of the
    /// `intended_length` output slots draws a category and takes that
    /// source's sample at the slot index. Sources are expected to hold at
    /// least `intended_length` draws; a shorter source is an invariant
    /// violation, not an expected failure.
    pub fn mixture(
        components: &[(&Self, f64)],
        intended_length: usize,
        rng: &mut StdRng,
    ) -> Result<Self> {
        if components.is_empty() {
            return Err(DistError::OtherError(
                "mixture must have at least one component".into(),
            ));
        }
        if let Some((_, w)) = components.iter().find(|(_, w)| *w < 0.0 || !w.is_finite()) {
            return Err(DistError::ArgumentError(format!(
                "mixture weights must be non-negative and finite, got {w}"
            )));
        }
        let total: f64 = components.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(DistError::ArgumentError(
                "mixture weights must sum to a positive value".into(),
            ));
        }
        let mut cumulative = Vec::with_capacity(components.len());
        let mut acc = 0.0;
        for (_, w) in components {
            acc += w / total;
            cumulative.push(acc);
        }
        let mut out = Vec::with_capacity(intended_length);
        for i in 0..intended_length {
            let u: f64 = rng.gen();
            let k = cumulative.partition_point(|&c| c < u).min(components.len() - 1);
            let source = components[k].0;
            let sample = source.samples.get(i).copied().ok_or_else(|| {
                DistError::Unreachable(format!(
                    "mixture component {k} has {} samples, needed index {i}",
                    source.len()
                ))
            })?;
            out.push(sample);
        }
        Self::make(out)
    }

    /// Convert through the KDE pipeline (see [`kde`]).
    pub fn to_point_set(&self, env: &Env) -> Result<PointSet> {
        kde::samples_to_point_set(&self.samples, env.xy_point_length, None, None)
    }
}
