use crate::hedge::economics::HedgeQuote;
use crate::hedge::{ConsolationScenario, Scenario};
use rand::Rng;

/// Monte Carlo comparison of hedged vs unhedged outcomes.
///
/// Each trial accumulates a running total over `periods` independent
/// Bernoulli draws: event occurs with probability p, adding the quote's
/// if-event outcome, else the if-no-event outcome. Hedged and unhedged
/// totals share the same draws, so the pair is directly comparable per
/// trial. Trials are independent and identically distributed.
///
/// The quote is deterministic for a fixed scenario and ratio, so it is
/// computed once; only the draws vary. Randomness is an injected `Rng` so
/// tests can drive the simulation with a seeded source while production
/// call sites pass `rand::thread_rng()`.

/// Parallel outcome sequences, one entry per trial. Signed net totals,
/// typically negative (costs).
#[derive(Debug, Clone, serde::Serialize)]
pub struct ComparisonRun {
    pub hedged: Vec<f64>,
    pub unhedged: Vec<f64>,
}

/// Run paired hedged/unhedged trials from a fixed quote.
pub fn run_comparison<R: Rng + ?Sized>(
    quote: &HedgeQuote,
    event_probability: f64,
    periods: u32,
    runs: usize,
    rng: &mut R,
) -> ComparisonRun {
    let mut hedged = Vec::with_capacity(runs);
    let mut unhedged = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut hedged_total = 0.0_f64;
        let mut unhedged_total = 0.0_f64;

        for _ in 0..periods {
            if rng.gen::<f64>() < event_probability {
                hedged_total += quote.hedged_if_event;
                unhedged_total += quote.unhedged_if_event;
            } else {
                hedged_total += quote.hedged_if_no_event;
                unhedged_total += quote.unhedged_if_no_event;
            }
        }

        hedged.push(hedged_total);
        unhedged.push(unhedged_total);
    }

    ComparisonRun { hedged, unhedged }
}

/// Comparison for a recurring-expense scenario at a given hedge ratio.
pub fn run_scenario_comparison<R: Rng + ?Sized>(
    scenario: &Scenario,
    hedge_ratio: f64,
    runs: usize,
    rng: &mut R,
) -> ComparisonRun {
    let quote = scenario.quote(hedge_ratio);
    run_comparison(
        &quote,
        scenario.event_probability,
        scenario.period_count,
        runs,
        rng,
    )
}

/// Comparison for a single-event consolation scenario. One period: the
/// branches are the win/lose consolation payoffs.
pub fn run_consolation_comparison<R: Rng + ?Sized>(
    scenario: &ConsolationScenario,
    hedge_ratio: f64,
    runs: usize,
    rng: &mut R,
) -> ComparisonRun {
    let quote = scenario.quote(hedge_ratio);
    run_comparison(&quote, scenario.event_probability, 1, runs, rng)
}

/// Hedged-only convenience wrapper.
#[allow(dead_code)]
pub fn run_monte_carlo<R: Rng + ?Sized>(
    scenario: &Scenario,
    hedge_ratio: f64,
    runs: usize,
    rng: &mut R,
) -> Vec<f64> {
    run_scenario_comparison(scenario, hedge_ratio, runs, rng).hedged
}
