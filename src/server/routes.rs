use crate::errors::{EngineError, EngineResult};
use crate::hedge::economics::{
    compute_consolation, compute_hedge, ConsolationParams, HedgeParams,
};
use crate::hedge::optimizer::{find_optimal_consolation_ratio, find_optimal_ratio, ScoreWeights};
use crate::hedge::simulator::{run_consolation_comparison, run_scenario_comparison};
use crate::hedge::{ConsolationScenario, Scenario};
use crate::state::AppState;
use crate::stats;
use axum::extract::State;
use axum::response::Json;
use portable_atomic::Ordering::Relaxed;
use std::sync::Arc;

/// Request/response boundary of the engine.
///
/// The engine beneath is deliberately permissive arithmetic with no input
/// checks; these handlers own the caller-side validation instead and reject
/// out-of-range scenarios before any computation. Responses embed an
/// `"error"` field on rejection, in the shape the dashboard expects.

#[derive(serde::Deserialize)]
pub struct QuoteRequest {
    pub baseline_cost: f64,
    pub adverse_cost: f64,
    pub hedge_ratio: f64,
    pub contract_price: f64,
    pub fee_rate: f64,
}

#[derive(serde::Deserialize)]
pub struct ConsolationQuoteRequest {
    pub entry_cost: f64,
    pub consolation_target: f64,
    pub hedge_ratio: f64,
    pub contract_price: f64,
    pub fee_rate: f64,
}

#[derive(serde::Deserialize)]
pub struct SimulateRequest {
    pub scenario: Scenario,
    pub hedge_ratio: f64,
    pub runs: Option<usize>,
}

#[derive(serde::Deserialize)]
pub struct ConsolationSimulateRequest {
    pub scenario: ConsolationScenario,
    pub hedge_ratio: f64,
    pub runs: Option<usize>,
}

#[derive(serde::Deserialize)]
pub struct OptimizeRequest {
    pub scenario: Scenario,
    pub steps: Option<u32>,
    pub runs_per_step: Option<usize>,
}

#[derive(serde::Deserialize)]
pub struct ConsolationOptimizeRequest {
    pub scenario: ConsolationScenario,
    pub runs_per_step: Option<usize>,
}

// ── Boundary validation (ordered guard clauses, first violation wins) ──

fn validate_contract(contract_price: f64, fee_rate: f64) -> EngineResult<()> {
    if !(contract_price > 0.0 && contract_price < 1.0) {
        return Err(EngineError::Validation(
            "contract_price must be strictly between 0 and 1".into(),
        ));
    }
    if !(fee_rate >= 0.0 && fee_rate < 1.0) {
        return Err(EngineError::Validation(
            "fee_rate must be in [0, 1)".into(),
        ));
    }
    Ok(())
}

fn validate_ratio(hedge_ratio: f64) -> EngineResult<()> {
    if !(0.0..=1.0).contains(&hedge_ratio) {
        return Err(EngineError::Validation(
            "hedge_ratio must be in [0, 1]".into(),
        ));
    }
    Ok(())
}

fn validate_probability(probability: f64) -> EngineResult<()> {
    if !(probability > 0.0 && probability < 1.0) {
        return Err(EngineError::Validation(
            "event_probability must be strictly between 0 and 1".into(),
        ));
    }
    Ok(())
}

fn validate_scenario(scenario: &Scenario) -> EngineResult<()> {
    if !(scenario.baseline_cost > 0.0) {
        return Err(EngineError::Validation("baseline_cost must be positive".into()));
    }
    if !(scenario.adverse_cost > 0.0) {
        return Err(EngineError::Validation("adverse_cost must be positive".into()));
    }
    if scenario.period_count == 0 {
        return Err(EngineError::Validation("period_count must be at least 1".into()));
    }
    validate_probability(scenario.event_probability)?;
    validate_contract(scenario.contract_price, scenario.fee_rate)
}

fn validate_consolation(scenario: &ConsolationScenario) -> EngineResult<()> {
    if !(scenario.entry_cost > 0.0) {
        return Err(EngineError::Validation("entry_cost must be positive".into()));
    }
    if !(scenario.consolation_target > 0.0) {
        return Err(EngineError::Validation(
            "consolation_target must be positive".into(),
        ));
    }
    validate_probability(scenario.event_probability)?;
    validate_contract(scenario.contract_price, scenario.fee_rate)
}

fn resolve_runs(requested: Option<usize>, default: usize, max: usize) -> EngineResult<usize> {
    let runs = requested.unwrap_or(default);
    if runs == 0 {
        return Err(EngineError::Validation("runs must be at least 1".into()));
    }
    if runs > max {
        return Err(EngineError::Validation(format!(
            "runs must not exceed {max}"
        )));
    }
    Ok(runs)
}

fn reject(state: &AppState, error: &EngineError) -> Json<serde_json::Value> {
    state.counters.requests_rejected.fetch_add(1, Relaxed);
    tracing::warn!(error = %error, "request rejected");
    Json(serde_json::json!({ "error": error.to_string() }))
}

fn run_stamp() -> (String, String) {
    (
        uuid::Uuid::new_v4().to_string(),
        chrono::Utc::now().to_rfc3339(),
    )
}

fn validate_quote_request(req: &QuoteRequest) -> EngineResult<()> {
    if !(req.baseline_cost > 0.0) {
        return Err(EngineError::Validation("baseline_cost must be positive".into()));
    }
    if !(req.adverse_cost > 0.0) {
        return Err(EngineError::Validation("adverse_cost must be positive".into()));
    }
    validate_ratio(req.hedge_ratio)?;
    validate_contract(req.contract_price, req.fee_rate)
}

fn validate_consolation_quote_request(req: &ConsolationQuoteRequest) -> EngineResult<()> {
    if !(req.entry_cost > 0.0) {
        return Err(EngineError::Validation("entry_cost must be positive".into()));
    }
    if !(req.consolation_target > 0.0) {
        return Err(EngineError::Validation(
            "consolation_target must be positive".into(),
        ));
    }
    validate_ratio(req.hedge_ratio)?;
    validate_contract(req.contract_price, req.fee_rate)
}

// ── Handlers ──

/// POST /api/hedge/quote -- deterministic quote, no simulation
pub async fn post_hedge_quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuoteRequest>,
) -> Json<serde_json::Value> {
    if let Err(e) = validate_quote_request(&req) {
        return reject(&state, &e);
    }

    state.counters.quotes_served.fetch_add(1, Relaxed);
    let quote = compute_hedge(&HedgeParams {
        baseline_cost: req.baseline_cost,
        adverse_cost: req.adverse_cost,
        hedge_ratio: req.hedge_ratio,
        contract_price: req.contract_price,
        fee_rate: req.fee_rate,
    });
    Json(serde_json::json!({ "quote": quote }))
}

/// POST /api/consolation/quote
pub async fn post_consolation_quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConsolationQuoteRequest>,
) -> Json<serde_json::Value> {
    if let Err(e) = validate_consolation_quote_request(&req) {
        return reject(&state, &e);
    }

    state.counters.quotes_served.fetch_add(1, Relaxed);
    let quote = compute_consolation(&ConsolationParams {
        entry_cost: req.entry_cost,
        consolation_target: req.consolation_target,
        hedge_ratio: req.hedge_ratio,
        contract_price: req.contract_price,
        fee_rate: req.fee_rate,
    });
    Json(serde_json::json!({ "quote": quote }))
}

/// POST /api/hedge/simulate -- Monte Carlo comparison for one ratio
pub async fn post_hedge_simulate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SimulateRequest>,
) -> Json<serde_json::Value> {
    let runs = match validate_scenario(&req.scenario)
        .and_then(|_| validate_ratio(req.hedge_ratio))
        .and_then(|_| {
            resolve_runs(
                req.runs,
                state.config.default_simulation_runs,
                state.config.max_simulation_runs,
            )
        }) {
        Ok(runs) => runs,
        Err(e) => return reject(&state, &e),
    };

    let scenario = req.scenario;
    let hedge_ratio = req.hedge_ratio;
    let joined = tokio::task::spawn_blocking(move || {
        let run = run_scenario_comparison(&scenario, hedge_ratio, runs, &mut rand::thread_rng());
        let hedged_stats = stats::summarize(&run.hedged)?;
        let unhedged_stats = stats::summarize(&run.unhedged)?;
        Ok::<_, EngineError>((run, hedged_stats, unhedged_stats))
    })
    .await;

    let (run, hedged_stats, unhedged_stats) = match joined {
        Ok(Ok(out)) => out,
        Ok(Err(e)) => return reject(&state, &e),
        Err(e) => {
            tracing::error!(error = %e, "simulation task failed");
            return Json(serde_json::json!({ "error": "simulation task failed" }));
        }
    };

    state.counters.simulations_run.fetch_add(1, Relaxed);
    state.counters.trials_simulated.fetch_add(runs as u64, Relaxed);

    let (run_id, generated_at) = run_stamp();
    Json(serde_json::json!({
        "run_id": run_id,
        "generated_at": generated_at,
        "hedge_ratio": hedge_ratio,
        "runs": runs,
        "quote": scenario.quote(hedge_ratio),
        "hedged": run.hedged,
        "unhedged": run.unhedged,
        "hedged_stats": hedged_stats,
        "unhedged_stats": unhedged_stats,
    }))
}

/// POST /api/consolation/simulate
pub async fn post_consolation_simulate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConsolationSimulateRequest>,
) -> Json<serde_json::Value> {
    let runs = match validate_consolation(&req.scenario)
        .and_then(|_| validate_ratio(req.hedge_ratio))
        .and_then(|_| {
            resolve_runs(
                req.runs,
                state.config.default_simulation_runs,
                state.config.max_simulation_runs,
            )
        }) {
        Ok(runs) => runs,
        Err(e) => return reject(&state, &e),
    };

    let scenario = req.scenario;
    let hedge_ratio = req.hedge_ratio;
    let joined = tokio::task::spawn_blocking(move || {
        let run = run_consolation_comparison(&scenario, hedge_ratio, runs, &mut rand::thread_rng());
        let hedged_stats = stats::summarize(&run.hedged)?;
        let unhedged_stats = stats::summarize(&run.unhedged)?;
        Ok::<_, EngineError>((run, hedged_stats, unhedged_stats))
    })
    .await;

    let (run, hedged_stats, unhedged_stats) = match joined {
        Ok(Ok(out)) => out,
        Ok(Err(e)) => return reject(&state, &e),
        Err(e) => {
            tracing::error!(error = %e, "simulation task failed");
            return Json(serde_json::json!({ "error": "simulation task failed" }));
        }
    };

    state.counters.simulations_run.fetch_add(1, Relaxed);
    state.counters.trials_simulated.fetch_add(runs as u64, Relaxed);

    let (run_id, generated_at) = run_stamp();
    Json(serde_json::json!({
        "run_id": run_id,
        "generated_at": generated_at,
        "hedge_ratio": hedge_ratio,
        "runs": runs,
        "quote": scenario.quote(hedge_ratio),
        "hedged": run.hedged,
        "unhedged": run.unhedged,
        "hedged_stats": hedged_stats,
        "unhedged_stats": unhedged_stats,
    }))
}

/// POST /api/hedge/optimize -- full ratio sweep
pub async fn post_hedge_optimize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OptimizeRequest>,
) -> Json<serde_json::Value> {
    let steps = req.steps.unwrap_or(state.config.default_optimizer_steps);
    let check = validate_scenario(&req.scenario).and_then(|_| {
        if steps == 0 {
            return Err(EngineError::Validation("steps must be at least 1".into()));
        }
        resolve_runs(
            req.runs_per_step,
            state.config.default_runs_per_step,
            state.config.max_simulation_runs,
        )
    });
    let runs_per_step = match check {
        Ok(runs) => runs,
        Err(e) => return reject(&state, &e),
    };

    let scenario = req.scenario;
    let joined = tokio::task::spawn_blocking(move || {
        find_optimal_ratio(
            &scenario,
            steps,
            runs_per_step,
            &ScoreWeights::RECURRING,
            &mut rand::thread_rng(),
        )
    })
    .await;

    let result = match joined {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => return reject(&state, &e),
        Err(e) => {
            tracing::error!(error = %e, "optimization task failed");
            return Json(serde_json::json!({ "error": "optimization task failed" }));
        }
    };

    state.counters.optimizations_run.fetch_add(1, Relaxed);
    state
        .counters
        .trials_simulated
        .fetch_add((steps as u64 + 2) * runs_per_step as u64, Relaxed);

    let (run_id, generated_at) = run_stamp();
    Json(serde_json::json!({
        "run_id": run_id,
        "generated_at": generated_at,
        "steps": steps,
        "runs_per_step": runs_per_step,
        "result": result,
    }))
}

/// POST /api/consolation/optimize
pub async fn post_consolation_optimize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConsolationOptimizeRequest>,
) -> Json<serde_json::Value> {
    let check = validate_consolation(&req.scenario).and_then(|_| {
        resolve_runs(
            req.runs_per_step,
            state.config.default_runs_per_step,
            state.config.max_simulation_runs,
        )
    });
    let runs_per_step = match check {
        Ok(runs) => runs,
        Err(e) => return reject(&state, &e),
    };

    let scenario = req.scenario;
    let joined = tokio::task::spawn_blocking(move || {
        find_optimal_consolation_ratio(
            &scenario,
            runs_per_step,
            &ScoreWeights::CONSOLATION,
            &mut rand::thread_rng(),
        )
    })
    .await;

    let result = match joined {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => return reject(&state, &e),
        Err(e) => {
            tracing::error!(error = %e, "optimization task failed");
            return Json(serde_json::json!({ "error": "optimization task failed" }));
        }
    };

    state.counters.optimizations_run.fetch_add(1, Relaxed);
    // Baseline run plus the 19-point consolation grid.
    state
        .counters
        .trials_simulated
        .fetch_add(20 * runs_per_step as u64, Relaxed);

    let (run_id, generated_at) = run_stamp();
    Json(serde_json::json!({
        "run_id": run_id,
        "generated_at": generated_at,
        "runs_per_step": runs_per_step,
        "result": result,
    }))
}

/// GET /api/counters -- performance counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "quotes_served": state.counters.quotes_served.load(Relaxed),
        "simulations_run": state.counters.simulations_run.load(Relaxed),
        "optimizations_run": state.counters.optimizations_run.load(Relaxed),
        "trials_simulated": state.counters.trials_simulated.load(Relaxed),
        "requests_rejected": state.counters.requests_rejected.load(Relaxed),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Scenario {
        Scenario {
            baseline_cost: 100.0,
            adverse_cost: 140.0,
            event_probability: 0.3,
            period_count: 12,
            contract_price: 0.35,
            fee_rate: 0.02,
        }
    }

    #[test]
    fn test_valid_scenario_passes() {
        assert!(validate_scenario(&scenario()).is_ok());
    }

    #[test]
    fn test_probability_endpoints_rejected() {
        let mut s = scenario();
        s.event_probability = 0.0;
        assert!(validate_scenario(&s).is_err());
        s.event_probability = 1.0;
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn test_fee_rate_one_rejected() {
        // fee_rate = 1 would divide by zero in the economics module.
        let mut s = scenario();
        s.fee_rate = 1.0;
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn test_nan_inputs_rejected() {
        let mut s = scenario();
        s.baseline_cost = f64::NAN;
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn test_ratio_bounds() {
        assert!(validate_ratio(0.0).is_ok());
        assert!(validate_ratio(1.0).is_ok());
        assert!(validate_ratio(-0.1).is_err());
        assert!(validate_ratio(1.1).is_err());
    }

    #[test]
    fn test_run_cap() {
        assert_eq!(resolve_runs(None, 1000, 5000).unwrap(), 1000);
        assert_eq!(resolve_runs(Some(5000), 1000, 5000).unwrap(), 5000);
        assert!(resolve_runs(Some(5001), 1000, 5000).is_err());
        assert!(resolve_runs(Some(0), 1000, 5000).is_err());
    }
}
