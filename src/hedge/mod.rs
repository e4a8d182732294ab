pub mod economics;
pub mod optimizer;
pub mod simulator;

use crate::hedge::economics::{
    compute_consolation, compute_hedge, ConsolationParams, HedgeParams, HedgeQuote,
};

/// Fixed parameters of a recurring-expense hedging scenario.
///
/// One period = one billing cycle in which the adverse event either occurs
/// (the expense is `adverse_cost`) or does not (`baseline_cost`). The
/// contract pays $1 per share when the event occurs, bought at
/// `contract_price`, with `fee_rate` retained by the market on settlement.
///
/// Range expectations (enforced at the API boundary, not here):
/// costs > 0, 0 < event_probability < 1, 0 < contract_price < 1,
/// 0 <= fee_rate < 1, period_count >= 1.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    pub baseline_cost: f64,
    pub adverse_cost: f64,
    pub event_probability: f64,
    pub period_count: u32,
    pub contract_price: f64,
    pub fee_rate: f64,
}

impl Scenario {
    /// Quote the hedge position for a given ratio of exposure covered.
    /// Deterministic; only the Bernoulli draws downstream vary.
    #[inline]
    pub fn quote(&self, hedge_ratio: f64) -> HedgeQuote {
        compute_hedge(&HedgeParams {
            baseline_cost: self.baseline_cost,
            adverse_cost: self.adverse_cost,
            hedge_ratio,
            contract_price: self.contract_price,
            fee_rate: self.fee_rate,
        })
    }
}

/// Fixed parameters of a single-event consolation hedge: a sunk entry cost
/// plus a desired payout if the adverse event happens. One period only.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ConsolationScenario {
    pub entry_cost: f64,
    pub consolation_target: f64,
    pub event_probability: f64,
    pub contract_price: f64,
    pub fee_rate: f64,
}

impl ConsolationScenario {
    #[inline]
    pub fn quote(&self, hedge_ratio: f64) -> HedgeQuote {
        compute_consolation(&ConsolationParams {
            entry_cost: self.entry_cost,
            consolation_target: self.consolation_target,
            hedge_ratio,
            contract_price: self.contract_price,
            fee_rate: self.fee_rate,
        })
    }
}
