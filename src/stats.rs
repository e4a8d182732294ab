use crate::errors::{EngineError, EngineResult};
use statrs::statistics::Statistics;

/// Summary statistics over simulated outcome samples.
///
/// Outcomes are signed net totals (typically negative, representing cost),
/// so the 10th percentile is the "worst case exceeded by 90% of outcomes".
/// All fields derive from one sample; order of the input is irrelevant.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[repr(C)]
pub struct SampleStats {
    pub mean: f64,
    /// 50th percentile.
    pub median: f64,
    /// 10th percentile of outcomes.
    pub worst_case_10: f64,
    /// Fraction of samples strictly greater than zero.
    pub probability_positive: f64,
}

/// Percentile by linear interpolation between order statistics.
///
/// Sorts an owned copy ascending (the input is never mutated), computes the
/// fractional rank `(pct / 100) * (n - 1)`, and interpolates between the
/// two neighboring order statistics weighted by the fractional part.
/// `pct = 0` returns the minimum, `pct = 100` the maximum.
///
/// The empty sample is the one input the engine rejects: percentiles are
/// undefined on it, and a silent NaN would poison every downstream metric.
pub fn percentile(samples: &[f64], pct: f64) -> EngineResult<f64> {
    if samples.is_empty() {
        return Err(EngineError::EmptySample);
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = ((pct / 100.0) * (sorted.len() - 1) as f64).clamp(0.0, (sorted.len() - 1) as f64);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        return Ok(sorted[lower]);
    }

    let weight = rank - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Summarize a sample. Pure function; fails only on an empty sample.
pub fn summarize(samples: &[f64]) -> EngineResult<SampleStats> {
    if samples.is_empty() {
        return Err(EngineError::EmptySample);
    }

    let positive = samples.iter().filter(|v| **v > 0.0).count();

    Ok(SampleStats {
        mean: samples.mean(),
        median: percentile(samples, 50.0)?,
        worst_case_10: percentile(samples, 10.0)?,
        probability_positive: positive as f64 / samples.len() as f64,
    })
}

/// Sample standard deviation (n - 1 denominator). Zero for fewer than two
/// samples rather than NaN, so downstream ratio metrics stay finite.
#[inline]
pub fn std_dev(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    Statistics::std_dev(samples)
}

/// Max minus min of the sample. Zero for fewer than two samples.
#[inline]
pub fn spread(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    Statistics::max(samples) - Statistics::min(samples)
}
