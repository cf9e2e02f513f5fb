//! End-to-end planning scenarios: validated input through to the plan.

use topup::{Holding, HoldingDraft, ValidationError, Worksheet, compute};

fn plan_from(ws: &Worksheet) -> topup::BatchResult {
    let request = ws.to_request().unwrap();
    compute(&request.holdings, request.budget)
}

// ============================================================================
// Fresh portfolio
// ============================================================================

#[test]
fn fresh_even_split_spends_everything() {
    let ws = Worksheet::new(
        "100,000",
        vec![
            HoldingDraft::new("Equity", "10,000", "", "50"),
            HoldingDraft::new("Bonds", "5,000", "", "50"),
        ],
    );
    let plan = plan_from(&ws);

    assert_eq!(plan.total_held_value, 0.0);
    assert_eq!(plan.results[0].buy_quantity, 5);
    assert_eq!(plan.results[0].buy_amount, 50_000.0);
    assert_eq!(plan.results[1].buy_quantity, 10);
    assert_eq!(plan.results[1].buy_amount, 50_000.0);
    assert_eq!(plan.total_buy_amount, 100_000.0);
    assert_eq!(plan.budget_remaining, 0.0);
    assert_eq!(plan.results[0].final_ratio, 50.0);
    assert_eq!(plan.results[1].final_ratio, 50.0);
    assert!(plan.results.iter().all(|r| r.current_ratio == 0.0));
}

#[test]
fn budget_below_unit_price_buys_nothing() {
    let ws = Worksheet::new("500", vec![HoldingDraft::new("Equity", "1000", "0", "100")]);
    let plan = plan_from(&ws);

    assert_eq!(plan.results[0].buy_quantity, 0);
    assert_eq!(plan.total_buy_amount, 0.0);
    assert_eq!(plan.budget_remaining, 500.0);
    assert!(plan.is_empty_plan());
}

// ============================================================================
// Existing positions
// ============================================================================

#[test]
fn zero_target_holding_is_held_not_bought() {
    let plan = compute(
        &[
            Holding::new("Legacy", 2_000.0, 40, 0.0),
            Holding::new("Core", 1_000.0, 10, 100.0),
        ],
        80_000.0,
    );

    let legacy = &plan.results[0];
    assert_eq!(legacy.buy_quantity, 0);
    assert_eq!(legacy.final_quantity, 40);
    assert_eq!(legacy.final_value, 80_000.0);
    assert!(legacy.final_ratio > 0.0);

    // Core: target_total = 90_000 + 80_000 = 170_000 → wants 160 more units
    // (160_000 > 80_000) → scaled by 0.5 → 80 units
    assert_eq!(plan.results[1].buy_quantity, 80);
    assert_eq!(plan.total_buy_amount, 80_000.0);
    assert_eq!(plan.budget_remaining, 0.0);
}

#[test]
fn monthly_top_up_moves_toward_target() {
    // 80/20 actual vs 60/40 target
    let plan = compute(
        &[
            Holding::new("Stocks", 100.0, 800, 60.0),
            Holding::new("Bonds", 100.0, 200, 40.0),
        ],
        12_500.0,
    );

    // Stocks are overweight: all money goes to bonds, whose 250-unit
    // demand is halved to fit the budget
    assert_eq!(plan.results[0].buy_quantity, 0);
    assert_eq!(plan.results[1].buy_quantity, 125);
    assert!(plan.results[1].final_ratio > plan.results[1].current_ratio);
    assert!((plan.results[0].current_ratio - 80.0).abs() < 1e-9);
}

// ============================================================================
// Validation gate
// ============================================================================

#[test]
fn mismatched_ratios_never_reach_the_engine() {
    let ws = Worksheet::new(
        "100000",
        vec![
            HoldingDraft::new("A", "100", "", "50"),
            HoldingDraft::new("B", "100", "", "49.9"),
        ],
    );
    match ws.to_request() {
        Err(ValidationError::RatioSumMismatch { sum }) => assert!((sum - 99.9).abs() < 1e-9),
        other => panic!("expected ratio mismatch, got {other:?}"),
    }
}

#[test]
fn ratio_sum_tolerance_accepts_rounding() {
    let ws = Worksheet::new(
        "90000",
        vec![
            HoldingDraft::new("A", "100", "", "33.333"),
            HoldingDraft::new("B", "100", "", "33.333"),
            HoldingDraft::new("C", "100", "", "33.334"),
        ],
    );
    assert!(ws.to_request().is_ok());
}

#[test]
fn amounts_beyond_f64_range_are_rejected() {
    let huge = "9".repeat(400);

    let ws = Worksheet::new(huge.as_str(), vec![HoldingDraft::new("A", "1000", "", "100")]);
    assert_eq!(ws.to_request(), Err(ValidationError::MissingBudget));

    let ws = Worksheet::new("100000", vec![HoldingDraft::new("A", huge.as_str(), "", "100")]);
    assert_eq!(
        ws.to_request(),
        Err(ValidationError::InvalidPrice { name: "A".into() })
    );
}
