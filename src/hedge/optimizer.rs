use crate::errors::{EngineError, EngineResult};
use crate::hedge::economics::HedgeQuote;
use crate::hedge::simulator::{run_comparison, run_scenario_comparison};
use crate::hedge::{ConsolationScenario, Scenario};
use crate::stats;
use rand::Rng;

/// Hedge-ratio optimization.
///
/// Sweeps candidate ratios over [0, 1], re-running the comparison simulator
/// at each candidate and scoring it against a baseline unhedged run taken
/// once at ratio 0:
///
///   score = w_wc * worst_case_improvement_pct
///         + w_vol * volatility_reduction
///         + w_dd * drawdown_reduction
///         + w_ra * sharpe
///         - w_prem * premium
///
/// The strictly greatest score wins; ties keep the earlier (lower) ratio.
/// Candidate ratios come from integer indices, never accumulated floats,
/// so the final candidate is exactly 1.0 and the tie order is stable.

/// Hedged-sigma floor below which the risk-adjusted-return proxy is
/// defined as zero instead of dividing by near-zero variance.
const SHARPE_MIN_STD: f64 = 0.01;

/// Composite-score weight policy. The two shipped policies are fixed
/// product choices; swapping in an alternative vector changes scoring
/// without touching the sweep or the metrics.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[repr(C)]
pub struct ScoreWeights {
    /// Weight on worst-case improvement, normalized by the baseline
    /// worst case and expressed in percent.
    pub worst_case: f64,
    /// Weight on volatility reduction (percent, floored at 0).
    pub volatility: f64,
    /// Weight on max-drawdown-range reduction (percent, floored at 0).
    pub drawdown: f64,
    /// Weight on the risk-adjusted-return proxy.
    pub risk_adjusted: f64,
    /// Score deduction per premium dollar.
    pub premium_penalty: f64,
}

impl ScoreWeights {
    /// Recurring-expense policy: worst-case protection dominates.
    /// Insurance, not investment.
    pub const RECURRING: Self = Self {
        worst_case: 0.70,
        volatility: 0.20,
        drawdown: 0.10,
        risk_adjusted: 0.0,
        premium_penalty: 0.0,
    };

    /// Consolation policy: subjective protection, so risk-adjusted return
    /// participates and premium cost drags the score.
    pub const CONSOLATION: Self = Self {
        worst_case: 0.40,
        volatility: 0.30,
        drawdown: 0.20,
        risk_adjusted: 0.10,
        premium_penalty: 0.05,
    };
}

/// The winning ratio and its full metric bundle.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[repr(C)]
pub struct OptimizationResult {
    /// Chosen hedge ratio in [0, 1].
    pub optimal_ratio: f64,
    /// Fraction of paired trials where hedged strictly beat unhedged, x100.
    pub win_percentage: f64,
    /// Candidate 10th percentile minus baseline 10th percentile, in
    /// dollars. Positive = less negative = improvement.
    pub worst_case_improvement: f64,
    /// Percent reduction in sample standard deviation, floored at 0.
    pub volatility_reduction: f64,
    /// (hedged mean - unhedged mean) / hedged sigma; 0 below the sigma floor.
    pub sharpe_ratio: f64,
    /// Percent reduction in (max - min) outcome range, floored at 0.
    pub max_drawdown_reduction: f64,
    /// The composite objective that was maximized.
    pub risk_score: f64,
}

/// Per-candidate metrics before scoring.
#[derive(Debug, Clone, Copy)]
struct CandidateMetrics {
    win_percentage: f64,
    worst_case_improvement: f64,
    volatility_reduction: f64,
    sharpe_ratio: f64,
    max_drawdown_reduction: f64,
    premium: f64,
}

/// Simulate one candidate quote and derive the five comparative metrics.
/// Fresh draws per candidate; the baseline worst case is the fixed
/// comparison point established before the sweep.
fn evaluate_candidate<R: Rng + ?Sized>(
    quote: &HedgeQuote,
    event_probability: f64,
    periods: u32,
    runs: usize,
    baseline_worst_case: f64,
    rng: &mut R,
) -> EngineResult<CandidateMetrics> {
    let run = run_comparison(quote, event_probability, periods, runs, rng);

    let hedged_stats = stats::summarize(&run.hedged)?;
    let unhedged_stats = stats::summarize(&run.unhedged)?;

    let wins = run
        .hedged
        .iter()
        .zip(run.unhedged.iter())
        .filter(|(h, u)| h > u)
        .count();
    let win_percentage = wins as f64 / run.hedged.len() as f64 * 100.0;

    let hedged_std = stats::std_dev(&run.hedged);
    let unhedged_std = stats::std_dev(&run.unhedged);
    let volatility_reduction = if unhedged_std > f64::EPSILON {
        ((unhedged_std - hedged_std) / unhedged_std * 100.0).max(0.0)
    } else {
        0.0
    };

    let sharpe_ratio = if hedged_std > SHARPE_MIN_STD {
        (hedged_stats.mean - unhedged_stats.mean) / hedged_std
    } else {
        0.0
    };

    let hedged_range = stats::spread(&run.hedged);
    let unhedged_range = stats::spread(&run.unhedged);
    let max_drawdown_reduction = if unhedged_range > f64::EPSILON {
        ((unhedged_range - hedged_range) / unhedged_range * 100.0).max(0.0)
    } else {
        0.0
    };

    Ok(CandidateMetrics {
        win_percentage,
        worst_case_improvement: hedged_stats.worst_case_10 - baseline_worst_case,
        volatility_reduction,
        sharpe_ratio,
        max_drawdown_reduction,
        premium: quote.premium,
    })
}

/// Composite score under a weight policy. The dollar worst-case improvement
/// is normalized by the magnitude of the baseline worst case so it is
/// comparable to the percentage metrics; a zero baseline scores zero.
fn composite_score(
    metrics: &CandidateMetrics,
    weights: &ScoreWeights,
    baseline_worst_case: f64,
) -> f64 {
    let worst_case_pct = if baseline_worst_case.abs() > f64::EPSILON {
        metrics.worst_case_improvement / baseline_worst_case.abs() * 100.0
    } else {
        0.0
    };

    weights.worst_case * worst_case_pct
        + weights.volatility * metrics.volatility_reduction
        + weights.drawdown * metrics.max_drawdown_reduction
        + weights.risk_adjusted * metrics.sharpe_ratio
        - weights.premium_penalty * metrics.premium
}

fn to_result(ratio: f64, metrics: &CandidateMetrics, risk_score: f64) -> OptimizationResult {
    OptimizationResult {
        optimal_ratio: ratio,
        win_percentage: metrics.win_percentage,
        worst_case_improvement: metrics.worst_case_improvement,
        volatility_reduction: metrics.volatility_reduction,
        sharpe_ratio: metrics.sharpe_ratio,
        max_drawdown_reduction: metrics.max_drawdown_reduction,
        risk_score,
    }
}

/// Sweep evenly spaced ratios `i / steps` for `i in 0..=steps` and return
/// the candidate with the strictly greatest composite score.
pub fn find_optimal_ratio<R: Rng + ?Sized>(
    scenario: &Scenario,
    steps: u32,
    runs_per_step: usize,
    weights: &ScoreWeights,
    rng: &mut R,
) -> EngineResult<OptimizationResult> {
    // Baseline unhedged distribution at ratio 0; every candidate's
    // worst-case improvement is measured against this one run.
    let baseline = run_scenario_comparison(scenario, 0.0, runs_per_step, rng);
    let baseline_worst_case = stats::summarize(&baseline.unhedged)?.worst_case_10;

    let evaluate = |ratio: f64, rng: &mut R| -> EngineResult<OptimizationResult> {
        let quote = scenario.quote(ratio);
        let metrics = evaluate_candidate(
            &quote,
            scenario.event_probability,
            scenario.period_count,
            runs_per_step,
            baseline_worst_case,
            rng,
        )?;
        let risk_score = composite_score(&metrics, weights, baseline_worst_case);
        tracing::debug!(ratio, risk_score, "candidate evaluated");
        Ok(to_result(ratio, &metrics, risk_score))
    };

    // Pure fold over the candidate grid. The 0% candidate anchors it;
    // strictly greater replaces, so ties keep the earlier (lower) ratio.
    let first = evaluate(0.0, rng)?;
    let best = (1..=steps).try_fold(first, |best, i| {
        let candidate = evaluate(i as f64 / steps as f64, rng)?;
        Ok::<_, EngineError>(if candidate.risk_score > best.risk_score {
            candidate
        } else {
            best
        })
    })?;

    tracing::info!(
        ratio = best.optimal_ratio,
        score = best.risk_score,
        "optimal hedge ratio selected"
    );
    Ok(best)
}

/// Consolation sweep: ratios 0.10, 0.15, ..., 1.00. The zero ratio is not
/// a candidate here (no hedge is not a consolation), but the baseline
/// comparison point is still the unhedged run at ratio 0.
pub fn find_optimal_consolation_ratio<R: Rng + ?Sized>(
    scenario: &ConsolationScenario,
    runs_per_step: usize,
    weights: &ScoreWeights,
    rng: &mut R,
) -> EngineResult<OptimizationResult> {
    let zero_quote = scenario.quote(0.0);
    let baseline = run_comparison(
        &zero_quote,
        scenario.event_probability,
        1,
        runs_per_step,
        rng,
    );
    let baseline_worst_case = stats::summarize(&baseline.unhedged)?.worst_case_10;

    let evaluate = |ratio: f64, rng: &mut R| -> EngineResult<OptimizationResult> {
        let quote = scenario.quote(ratio);
        let metrics = evaluate_candidate(
            &quote,
            scenario.event_probability,
            1,
            runs_per_step,
            baseline_worst_case,
            rng,
        )?;
        let risk_score = composite_score(&metrics, weights, baseline_worst_case);
        tracing::debug!(ratio, risk_score, "consolation candidate evaluated");
        Ok(to_result(ratio, &metrics, risk_score))
    };

    let first = evaluate(0.10, rng)?;
    let best = (3..=20u32).try_fold(first, |best, i| {
        let candidate = evaluate(i as f64 * 0.05, rng)?;
        Ok::<_, EngineError>(if candidate.risk_score > best.risk_score {
            candidate
        } else {
            best
        })
    })?;

    tracing::info!(
        ratio = best.optimal_ratio,
        score = best.risk_score,
        "optimal consolation ratio selected"
    );
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hedgeable() -> Scenario {
        // Cheap contract relative to event probability: hedging should pay.
        Scenario {
            baseline_cost: 100.0,
            adverse_cost: 200.0,
            event_probability: 0.4,
            period_count: 12,
            contract_price: 0.30,
            fee_rate: 0.02,
        }
    }

    #[test]
    fn test_result_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let result =
            find_optimal_ratio(&hedgeable(), 10, 400, &ScoreWeights::RECURRING, &mut rng).unwrap();
        assert!(
            (0.0..=1.0).contains(&result.optimal_ratio),
            "ratio={}",
            result.optimal_ratio
        );
        assert!(
            (0.0..=100.0).contains(&result.win_percentage),
            "win%={}",
            result.win_percentage
        );
    }

    #[test]
    fn test_hedgeable_scenario_prefers_hedging() {
        let mut rng = StdRng::seed_from_u64(42);
        let result =
            find_optimal_ratio(&hedgeable(), 10, 400, &ScoreWeights::RECURRING, &mut rng).unwrap();
        assert!(result.optimal_ratio > 0.0, "ratio={}", result.optimal_ratio);
        assert!(result.risk_score > 0.0, "score={}", result.risk_score);
        assert!(
            result.volatility_reduction >= 0.0 && result.max_drawdown_reduction >= 0.0,
            "reductions are floored at zero"
        );
    }

    #[test]
    fn test_degenerate_scenario_keeps_first_candidate() {
        // baseline == adverse: no exposure, every candidate is a no-op and
        // scores exactly zero, so the tie policy keeps the lowest ratio.
        let flat = Scenario {
            baseline_cost: 100.0,
            adverse_cost: 100.0,
            event_probability: 0.5,
            period_count: 6,
            contract_price: 0.5,
            fee_rate: 0.02,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let result =
            find_optimal_ratio(&flat, 20, 200, &ScoreWeights::RECURRING, &mut rng).unwrap();
        assert_eq!(result.optimal_ratio, 0.0);
        assert_eq!(result.risk_score, 0.0);
    }

    #[test]
    fn test_candidate_ratios_are_grid_points() {
        let mut rng = StdRng::seed_from_u64(3);
        let steps = 20u32;
        let result =
            find_optimal_ratio(&hedgeable(), steps, 200, &ScoreWeights::RECURRING, &mut rng)
                .unwrap();
        let scaled = result.optimal_ratio * steps as f64;
        assert!(
            (scaled - scaled.round()).abs() < 1e-9,
            "ratio {} is not on the sweep grid",
            result.optimal_ratio
        );
    }

    #[test]
    fn test_consolation_sweep_range() {
        let scenario = ConsolationScenario {
            entry_cost: 250.0,
            consolation_target: 150.0,
            event_probability: 0.25,
            contract_price: 0.20,
            fee_rate: 0.02,
        };
        let mut rng = StdRng::seed_from_u64(42);
        let result =
            find_optimal_consolation_ratio(&scenario, 400, &ScoreWeights::CONSOLATION, &mut rng)
                .unwrap();
        assert!(
            (0.1..=1.0).contains(&result.optimal_ratio),
            "ratio={}",
            result.optimal_ratio
        );
        assert!((0.0..=100.0).contains(&result.win_percentage));
        // Ratios step by 0.05 from the 0.10 floor.
        let scaled = result.optimal_ratio / 0.05;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }

    #[test]
    fn test_weight_policies() {
        let w = ScoreWeights::RECURRING;
        assert_eq!((w.worst_case, w.volatility, w.drawdown), (0.70, 0.20, 0.10));
        assert_eq!(w.premium_penalty, 0.0);

        let c = ScoreWeights::CONSOLATION;
        assert_eq!(
            (c.worst_case, c.volatility, c.drawdown, c.risk_adjusted),
            (0.40, 0.30, 0.20, 0.10)
        );
        assert!(c.premium_penalty > 0.0, "consolation scoring charges for premium");
    }
}
