//! The editable holdings list.
//!
//! A [`Worksheet`] is what a user maintains between runs: raw text fields,
//! exactly as typed or as read from a portable file. Nothing is parsed until
//! [`Worksheet::to_request`] is called.

use std::fmt;

use crate::error::ValidationError;
use crate::holding::PlanRequest;
use crate::validate::{RATIO_SUM_TOLERANCE, parse_ratio, validate_drafts};

/// One unparsed holding row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoldingDraft {
    pub name: String,
    pub price: String,
    pub qty: String,
    pub ratio: String,
}

impl HoldingDraft {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        qty: impl Into<String>,
        ratio: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            qty: qty.into(),
            ratio: ratio.into(),
        }
    }
}

/// Starter rows for a fresh worksheet: names and ratios, no prices yet.
const PRESETS: [(&str, &str); 4] = [
    ("KODEX 200", "40"),
    ("TIGER S&P500", "30"),
    ("KODEX Nasdaq100", "20"),
    ("TIGER Short-Term Bond", "10"),
];

/// Where the live ratio total stands relative to 100%.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatioBadge {
    /// Within tolerance of 100%
    Complete,
    /// Below 100%
    Under,
    /// Above 100%
    Over,
}

impl RatioBadge {
    pub fn for_sum(sum: f64) -> Self {
        if (sum - 100.0).abs() < RATIO_SUM_TOLERANCE {
            RatioBadge::Complete
        } else if sum < 100.0 {
            RatioBadge::Under
        } else {
            RatioBadge::Over
        }
    }
}

impl fmt::Display for RatioBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatioBadge::Complete => write!(f, "OK"),
            RatioBadge::Under => write!(f, "UNDER"),
            RatioBadge::Over => write!(f, "OVER"),
        }
    }
}

/// Budget text plus an ordered list of holding rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Worksheet {
    pub budget: String,
    pub rows: Vec<HoldingDraft>,
}

impl Worksheet {
    pub fn new(budget: impl Into<String>, rows: Vec<HoldingDraft>) -> Self {
        Self {
            budget: budget.into(),
            rows,
        }
    }

    /// A worksheet pre-filled with the four starter rows (40/30/20/10).
    pub fn with_presets() -> Self {
        let rows = PRESETS
            .iter()
            .map(|&(name, ratio)| HoldingDraft::new(name, "", "", ratio))
            .collect();
        Self::new("", rows)
    }

    /// Append a row at the end.
    pub fn add(&mut self, row: HoldingDraft) {
        self.rows.push(row);
    }

    /// Remove the first row whose trimmed name equals `name`.
    pub fn remove(&mut self, name: &str) -> Option<HoldingDraft> {
        let name = name.trim();
        let idx = self.rows.iter().position(|r| r.name.trim() == name)?;
        Some(self.rows.remove(idx))
    }

    /// Live ratio total: unparseable ratios count as 0.
    pub fn ratio_sum(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| parse_ratio(&r.ratio).unwrap_or(0.0))
            .sum()
    }

    pub fn ratio_badge(&self) -> RatioBadge {
        RatioBadge::for_sum(self.ratio_sum())
    }

    /// Parse and validate every field into an engine request.
    pub fn to_request(&self) -> Result<PlanRequest, ValidationError> {
        validate_drafts(&self.budget, &self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_sum_to_hundred() {
        let ws = Worksheet::with_presets();
        assert_eq!(ws.rows.len(), 4);
        assert_eq!(ws.ratio_sum(), 100.0);
        assert_eq!(ws.ratio_badge(), RatioBadge::Complete);
        assert!(ws.rows.iter().all(|r| r.price.is_empty() && r.qty.is_empty()));
    }

    #[test]
    fn presets_need_prices() {
        let mut ws = Worksheet::with_presets();
        ws.budget = "500,000".into();
        assert_eq!(
            ws.to_request(),
            Err(ValidationError::InvalidPrice {
                name: "KODEX 200".into()
            })
        );
    }

    #[test]
    fn add_and_remove() {
        let mut ws = Worksheet::default();
        ws.add(HoldingDraft::new("A", "100", "1", "50"));
        ws.add(HoldingDraft::new("B", "200", "", "50"));
        assert_eq!(ws.rows.len(), 2);

        let removed = ws.remove(" A ").unwrap();
        assert_eq!(removed.price, "100");
        assert_eq!(ws.rows.len(), 1);
        assert_eq!(ws.rows[0].name, "B");

        assert!(ws.remove("missing").is_none());
    }

    #[test]
    fn ratio_sum_ignores_garbage() {
        let ws = Worksheet::new(
            "",
            vec![
                HoldingDraft::new("A", "", "", "60"),
                HoldingDraft::new("B", "", "", "??"),
                HoldingDraft::new("C", "", "", ""),
            ],
        );
        assert_eq!(ws.ratio_sum(), 60.0);
        assert_eq!(ws.ratio_badge(), RatioBadge::Under);
    }

    #[test]
    fn badge_states() {
        assert_eq!(RatioBadge::for_sum(100.0), RatioBadge::Complete);
        assert_eq!(RatioBadge::for_sum(99.0), RatioBadge::Under);
        assert_eq!(RatioBadge::for_sum(100.5), RatioBadge::Over);
        assert_eq!(RatioBadge::Over.to_string(), "OVER");
    }

    #[test]
    fn to_request_parses_fields() {
        let ws = Worksheet::new(
            "1,000,000",
            vec![
                HoldingDraft::new("A", "10,000", "3", "50"),
                HoldingDraft::new("B", "5,000", "", "50"),
            ],
        );
        let req = ws.to_request().unwrap();
        assert_eq!(req.budget, 1_000_000.0);
        assert_eq!(req.holdings[0].held_quantity, 3);
        assert_eq!(req.holdings[1].current_price, 5_000.0);
    }
}
