//! Output types produced by [`compute`](crate::compute).

/// Per-holding outcome of one plan computation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoldingResult {
    pub name: String,
    pub current_price: f64,
    pub held_quantity: u64,
    /// `current_price × held_quantity`
    pub held_value: f64,
    pub target_ratio: f64,
    /// Share of the pre-purchase total, in percent (0 when nothing is held)
    pub current_ratio: f64,
    /// Units to buy this period
    pub buy_quantity: u64,
    /// `buy_quantity × current_price`
    pub buy_amount: f64,
    /// `held_quantity + buy_quantity`
    pub final_quantity: u64,
    /// `final_quantity × current_price`
    pub final_value: f64,
    /// Share of the post-purchase total, in percent
    pub final_ratio: f64,
}

impl HoldingResult {
    /// True if this holding receives no new money.
    pub fn is_idle(&self) -> bool {
        self.buy_quantity == 0
    }

    /// Signed distance of the final share from the target, in percentage points.
    pub fn drift(&self) -> f64 {
        self.final_ratio - self.target_ratio
    }
}

/// The engine's complete output for one batch.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchResult {
    /// One entry per input holding, in input order
    pub results: Vec<HoldingResult>,
    pub total_held_value: f64,
    pub total_buy_amount: f64,
    pub total_final_value: f64,
    /// Unspent budget left by integer-unit flooring
    pub budget_remaining: f64,
}

impl BatchResult {
    /// Total number of units bought across all holdings.
    pub fn total_buy_quantity(&self) -> u64 {
        self.results.iter().map(|r| r.buy_quantity).sum()
    }

    /// True if the plan buys nothing at all.
    pub fn is_empty_plan(&self) -> bool {
        self.results.iter().all(HoldingResult::is_idle)
    }

    /// Largest absolute drift between final and target ratio, in percentage points.
    pub fn max_drift(&self) -> f64 {
        self.results
            .iter()
            .map(|r| r.drift().abs())
            .fold(0.0, f64::max)
    }
}
