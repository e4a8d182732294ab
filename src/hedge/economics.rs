/// Closed-form hedge economics for binary-outcome contracts.
///
/// Recurring-expense mode:
///
///   payout    = 1 - f
///   contracts = (adverse - baseline) * r / payout
///   premium   = contracts * c
///
///   hedged_if_event    = -adverse - premium + contracts * payout
///   hedged_if_no_event = -baseline - premium
///
/// Consolation mode:
///
///   contracts = target * r / payout
///   hedged_if_event    = -entry + contracts * payout - premium
///   hedged_if_no_event = -entry - premium
///
/// where r = hedge ratio, c = contract price, f = fee rate.
///
/// All inputs are f64. Pure functions, no side effects, no allocations.
/// Deliberately permissive: inverted costs yield negative contract counts,
/// extreme prices are not clamped. Validation belongs to the caller.

/// Recurring-expense inputs. Stack-allocated.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct HedgeParams {
    pub baseline_cost: f64,   // Expense when the event does NOT occur
    pub adverse_cost: f64,    // Expense when it does
    pub hedge_ratio: f64,     // Fraction of the exposure covered, [0, 1]
    pub contract_price: f64,  // Price per $1-payout share (e.g. 0.35)
    pub fee_rate: f64,        // Fraction retained on settlement (e.g. 0.02)
}

/// Consolation inputs. Stack-allocated.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ConsolationParams {
    pub entry_cost: f64,         // Sunk cost paid regardless of outcome
    pub consolation_target: f64, // Desired payout if the event occurs
    pub hedge_ratio: f64,
    pub contract_price: f64,
    pub fee_rate: f64,
}

/// Quoted position plus the four outcome totals. Shared by both modes;
/// in consolation mode the two unhedged outcomes are equal.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[repr(C)]
pub struct HedgeQuote {
    /// Number of shares bought. Negative when inputs are inverted.
    pub contracts: f64,
    /// contracts * contract_price, sunk whether or not the event occurs.
    pub premium: f64,
    pub hedged_if_event: f64,
    pub hedged_if_no_event: f64,
    pub unhedged_if_event: f64,
    pub unhedged_if_no_event: f64,
}

/// Quote a recurring-expense hedge.
///
/// Sizes the position so that `hedge_ratio` of the extra exposure
/// (adverse - baseline) is recovered per winning share net of fees.
/// At ratio 0 the hedged outcomes equal the unhedged outcomes exactly.
///
/// This is a **pure function**: same inputs always produce same output.
#[inline]
pub fn compute_hedge(params: &HedgeParams) -> HedgeQuote {
    let payout = 1.0 - params.fee_rate;
    let additional_exposure = params.adverse_cost - params.baseline_cost;

    let contracts = additional_exposure * params.hedge_ratio / payout;
    let premium = contracts * params.contract_price;

    HedgeQuote {
        contracts,
        premium,
        hedged_if_event: -params.adverse_cost - premium + contracts * payout,
        hedged_if_no_event: -params.baseline_cost - premium,
        unhedged_if_event: -params.adverse_cost,
        unhedged_if_no_event: -params.baseline_cost,
    }
}

/// Quote a single-event consolation hedge.
///
/// The entry cost is sunk either way, so the unhedged outcome does not vary
/// by event; the position converts `hedge_ratio` of the consolation target
/// into shares redeemed net of fees when the event occurs.
///
/// This is a **pure function**: same inputs always produce same output.
#[inline]
pub fn compute_consolation(params: &ConsolationParams) -> HedgeQuote {
    let payout = 1.0 - params.fee_rate;
    let target = params.consolation_target * params.hedge_ratio;

    let contracts = target / payout;
    let premium = contracts * params.contract_price;

    HedgeQuote {
        contracts,
        premium,
        hedged_if_event: -params.entry_cost + contracts * payout - premium,
        hedged_if_no_event: -params.entry_cost - premium,
        unhedged_if_event: -params.entry_cost,
        unhedged_if_no_event: -params.entry_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recurring(baseline: f64, adverse: f64, ratio: f64, price: f64, fee: f64) -> HedgeQuote {
        compute_hedge(&HedgeParams {
            baseline_cost: baseline,
            adverse_cost: adverse,
            hedge_ratio: ratio,
            contract_price: price,
            fee_rate: fee,
        })
    }

    #[test]
    fn test_known_recurring_quote() {
        let q = recurring(100.0, 120.0, 0.8, 0.35, 0.02);
        assert!((q.contracts - 16.3265306122).abs() < 1e-6, "contracts={}", q.contracts);
        assert!((q.premium - 5.7142857143).abs() < 1e-6, "premium={}", q.premium);
        assert!((q.hedged_if_event - -109.7142857143).abs() < 1e-6);
        assert!((q.hedged_if_no_event - -105.7142857143).abs() < 1e-6);
        assert_eq!(q.unhedged_if_event, -120.0);
        assert_eq!(q.unhedged_if_no_event, -100.0);
    }

    #[test]
    fn test_zero_ratio_matches_unhedged() {
        let q = recurring(100.0, 150.0, 0.0, 0.4, 0.02);
        assert_eq!(q.contracts, 0.0);
        assert_eq!(q.premium, 0.0);
        assert_eq!(q.hedged_if_event, q.unhedged_if_event);
        assert_eq!(q.hedged_if_no_event, q.unhedged_if_no_event);
    }

    #[test]
    fn test_inverted_costs_go_negative() {
        // adverse < baseline is nonsense the caller should have rejected;
        // the arithmetic still flows through and signals it with a negative
        // position rather than an error.
        let q = recurring(120.0, 100.0, 0.5, 0.3, 0.02);
        assert!(q.contracts < 0.0, "contracts={}", q.contracts);
        assert!(q.premium < 0.0, "premium={}", q.premium);
    }

    #[test]
    fn test_fee_rate_monotonicity() {
        // Shrinking payout grows both the share count and the premium.
        let lo = recurring(100.0, 120.0, 0.8, 0.35, 0.01);
        let hi = recurring(100.0, 120.0, 0.8, 0.35, 0.05);
        assert!(hi.contracts > lo.contracts);
        assert!(hi.premium > lo.premium);
    }

    #[test]
    fn test_pure_and_bit_identical() {
        let params = HedgeParams {
            baseline_cost: 87.3,
            adverse_cost: 141.9,
            hedge_ratio: 0.63,
            contract_price: 0.41,
            fee_rate: 0.02,
        };
        assert_eq!(compute_hedge(&params), compute_hedge(&params));

        let cparams = ConsolationParams {
            entry_cost: 250.0,
            consolation_target: 180.0,
            hedge_ratio: 0.63,
            contract_price: 0.41,
            fee_rate: 0.02,
        };
        assert_eq!(compute_consolation(&cparams), compute_consolation(&cparams));
    }

    #[test]
    fn test_consolation_quote() {
        let q = compute_consolation(&ConsolationParams {
            entry_cost: 200.0,
            consolation_target: 100.0,
            hedge_ratio: 0.5,
            contract_price: 0.25,
            fee_rate: 0.02,
        });
        // contracts = 50 / 0.98, premium = contracts * 0.25
        let contracts = 50.0 / 0.98;
        let premium = contracts * 0.25;
        assert!((q.contracts - contracts).abs() < 1e-12);
        assert!((q.premium - premium).abs() < 1e-12);
        // Event: entry sunk, consolation received net of premium.
        assert!((q.hedged_if_event - (-200.0 + 50.0 - premium)).abs() < 1e-12);
        assert!((q.hedged_if_no_event - (-200.0 - premium)).abs() < 1e-12);
        // Unhedged outcome never varies by event in this mode.
        assert_eq!(q.unhedged_if_event, -200.0);
        assert_eq!(q.unhedged_if_no_event, -200.0);
    }

    #[test]
    fn test_consolation_zero_ratio_matches_unhedged() {
        let q = compute_consolation(&ConsolationParams {
            entry_cost: 300.0,
            consolation_target: 150.0,
            hedge_ratio: 0.0,
            contract_price: 0.3,
            fee_rate: 0.05,
        });
        assert_eq!(q.contracts, 0.0);
        assert_eq!(q.hedged_if_event, -300.0);
        assert_eq!(q.hedged_if_no_event, -300.0);
    }
}
