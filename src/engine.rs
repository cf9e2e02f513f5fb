//! The rebalance engine: demand pass, budget clamp, ratio pass.
//!
//! [`compute`] is a pure function. It never fails and never panics: inputs
//! that skip validation (zero prices, negative budgets, NaN ratios) produce a
//! well-defined but meaningless plan rather than an error. Callers are
//! expected to run [`validate_request`](crate::validate_request) first.

use log::debug;

use crate::holding::Holding;
use crate::result::{BatchResult, HoldingResult};

/// Compute integer purchase quantities that move `holdings` toward their
/// target ratios using at most `budget`.
///
/// Results come back in input order.
///
/// # Example
///
/// ```
/// use topup::{compute, Holding};
///
/// let holdings = [
///     Holding::new("Equity", 10_000.0, 0, 50.0),
///     Holding::new("Bonds", 5_000.0, 0, 50.0),
/// ];
/// let plan = compute(&holdings, 100_000.0);
///
/// assert_eq!(plan.results[0].buy_quantity, 5);
/// assert_eq!(plan.results[1].buy_quantity, 10);
/// assert_eq!(plan.budget_remaining, 0.0);
/// ```
pub fn compute(holdings: &[Holding], budget: f64) -> BatchResult {
    let total_held: f64 = holdings.iter().map(Holding::held_value).sum();
    let target_total = total_held + budget;

    let desired: Vec<u64> = holdings
        .iter()
        .map(|h| desired_quantity(h, target_total))
        .collect();
    let total_desired: f64 = holdings
        .iter()
        .zip(&desired)
        .map(|(h, &qty)| qty as f64 * h.current_price)
        .sum();

    let buy = clamp_to_budget(&desired, total_desired, budget);

    let mut results: Vec<HoldingResult> = holdings
        .iter()
        .zip(buy)
        .map(|(h, buy_quantity)| {
            let held_value = h.held_value();
            let final_quantity = h.held_quantity.saturating_add(buy_quantity);
            HoldingResult {
                name: h.name.clone(),
                current_price: h.current_price,
                held_quantity: h.held_quantity,
                held_value,
                target_ratio: h.target_ratio,
                current_ratio: share_of(held_value, total_held),
                buy_quantity,
                buy_amount: buy_quantity as f64 * h.current_price,
                final_quantity,
                final_value: final_quantity as f64 * h.current_price,
                final_ratio: 0.0,
            }
        })
        .collect();

    let total_buy: f64 = results.iter().map(|r| r.buy_amount).sum();
    let total_final: f64 = results.iter().map(|r| r.final_value).sum();
    for r in &mut results {
        r.final_ratio = share_of(r.final_value, total_final);
    }

    debug!(
        "plan: {} holdings, held={total_held}, desired={total_desired}, bought={total_buy}, budget={budget}",
        results.len()
    );

    BatchResult {
        results,
        total_held_value: total_held,
        total_buy_amount: total_buy,
        total_final_value: total_final,
        budget_remaining: budget - total_buy,
    }
}

/// Demand pass for one holding: whole units needed to close the gap between
/// its current value and its share of `target_total`. Never negative.
fn desired_quantity(h: &Holding, target_total: f64) -> u64 {
    let target_value = target_total * (h.target_ratio / 100.0);
    let gap = target_value - h.held_value();
    if gap > 0.0 && h.current_price > 0.0 {
        // `as` saturates and maps NaN to 0
        (gap / h.current_price).floor() as u64
    } else {
        0
    }
}

/// Budget-clamp pass. Scales every quantity by one factor and re-floors when
/// the unconstrained spend exceeds the budget; otherwise passes through.
///
/// With whole-unit prices and budgets the clamped spend never exceeds the
/// budget. With fractional amounts, float rounding in the scale and the sums
/// can leave the total a few ulps above it.
fn clamp_to_budget(desired: &[u64], total_desired: f64, budget: f64) -> Vec<u64> {
    if total_desired > budget && total_desired > 0.0 {
        let scale = budget / total_desired;
        debug!("clamp: desired spend {total_desired} exceeds budget {budget}, scale={scale:.6}");
        desired
            .iter()
            .map(|&qty| (qty as f64 * scale).floor() as u64)
            .collect()
    } else {
        desired.to_vec()
    }
}

/// `part / total` in percent, or 0 when the total is not positive.
#[inline]
fn share_of(part: f64, total: f64) -> f64 {
    if total > 0.0 { part / total * 100.0 } else { 0.0 }
}
