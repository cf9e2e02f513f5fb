//! Input parsing and validation.
//!
//! Everything here runs before [`compute`](crate::compute). Text fields are
//! parsed the way a form would accept them: amounts and quantities keep only
//! their ASCII digits (so `"1,234,000"` is 1234000), ratios are decimals.

use crate::error::ValidationError;
use crate::holding::{Holding, PlanRequest};
use crate::worksheet::HoldingDraft;

/// Absolute tolerance, in percentage points, for the "ratios sum to 100" check.
pub const RATIO_SUM_TOLERANCE: f64 = 0.01;

/// Keep only the ASCII digits of `s`.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Parse a monetary amount typed with optional grouping.
///
/// Returns `None` when no digits are present or the amount overflows `f64`.
pub fn parse_amount(s: &str) -> Option<f64> {
    let digits = digits_only(s);
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a unit count typed with optional grouping. Blank means 0.
///
/// Counts too large for `u64` saturate.
pub fn parse_quantity(s: &str) -> u64 {
    let digits = digits_only(s);
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Parse a target ratio in percent. A trailing `%` is allowed.
///
/// Returns `None` for blank, non-numeric, or non-finite input. Negative
/// values parse; rejecting them is [`validate_drafts`]'s job.
pub fn parse_ratio(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim_end();
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Check that target ratios add up to 100 within [`RATIO_SUM_TOLERANCE`].
pub fn check_ratio_sum(sum: f64) -> Result<(), ValidationError> {
    if (sum - 100.0).abs() > RATIO_SUM_TOLERANCE || !sum.is_finite() {
        return Err(ValidationError::RatioSumMismatch { sum });
    }
    Ok(())
}

/// Parse and validate raw form rows into a [`PlanRequest`].
///
/// Checks run in a fixed order and stop at the first failure: budget, then
/// each row top to bottom (name, price, ratio), then the empty list, then the
/// ratio sum.
pub fn validate_drafts(
    budget: &str,
    rows: &[HoldingDraft],
) -> Result<PlanRequest, ValidationError> {
    let budget = match parse_amount(budget) {
        Some(b) if b > 0.0 => b,
        _ => return Err(ValidationError::MissingBudget),
    };

    let mut holdings = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let name = row.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName { row: i + 1 });
        }

        let price = match parse_amount(&row.price) {
            Some(p) if p > 0.0 => p,
            _ => {
                return Err(ValidationError::InvalidPrice {
                    name: name.to_string(),
                });
            }
        };

        let ratio = match parse_ratio(&row.ratio) {
            Some(r) if r >= 0.0 => r,
            _ => {
                return Err(ValidationError::InvalidRatio {
                    name: name.to_string(),
                });
            }
        };

        holdings.push(Holding::new(name, price, parse_quantity(&row.qty), ratio));
    }

    if holdings.is_empty() {
        return Err(ValidationError::EmptyHoldings);
    }

    let request = PlanRequest::new(holdings, budget);
    check_ratio_sum(request.ratio_sum())?;
    Ok(request)
}

/// Validate an already-typed request, as received over the wire.
///
/// Same rules and order as [`validate_drafts`]; non-finite numbers are
/// rejected as the field they appear in.
pub fn validate_request(request: &PlanRequest) -> Result<(), ValidationError> {
    if !(request.budget.is_finite() && request.budget > 0.0) {
        return Err(ValidationError::MissingBudget);
    }

    for (i, h) in request.holdings.iter().enumerate() {
        let name = h.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName { row: i + 1 });
        }
        if !(h.current_price.is_finite() && h.current_price > 0.0) {
            return Err(ValidationError::InvalidPrice {
                name: name.to_string(),
            });
        }
        if !(h.target_ratio.is_finite() && h.target_ratio >= 0.0) {
            return Err(ValidationError::InvalidRatio {
                name: name.to_string(),
            });
        }
    }

    if request.holdings.is_empty() {
        return Err(ValidationError::EmptyHoldings);
    }

    check_ratio_sum(request.ratio_sum())
}
