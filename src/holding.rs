//! Input types: one holding and a full plan request.

/// One portfolio asset entry as fed to the engine.
///
/// `current_price` is a plain monetary amount in the portfolio's single
/// currency. Prices are integer-valued in practice but nothing here depends
/// on that.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Holding {
    /// Display label (non-empty after validation)
    pub name: String,
    /// Current price per unit
    pub current_price: f64,
    /// Units currently owned
    #[cfg_attr(feature = "serde", serde(default))]
    pub held_quantity: u64,
    /// Desired share of the post-purchase portfolio, in percent (0..=100)
    pub target_ratio: f64,
}

impl Holding {
    pub fn new(
        name: impl Into<String>,
        current_price: f64,
        held_quantity: u64,
        target_ratio: f64,
    ) -> Self {
        Self {
            name: name.into(),
            current_price,
            held_quantity,
            target_ratio,
        }
    }

    /// `current_price × held_quantity`.
    #[inline]
    pub fn held_value(&self) -> f64 {
        self.current_price * self.held_quantity as f64
    }
}

/// The engine's input document: an ordered holdings list and a budget.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanRequest {
    pub holdings: Vec<Holding>,
    /// Amount of new money to spend this period
    #[cfg_attr(feature = "serde", serde(alias = "monthly_budget"))]
    pub budget: f64,
}

impl PlanRequest {
    pub fn new(holdings: Vec<Holding>, budget: f64) -> Self {
        Self { holdings, budget }
    }

    /// Sum of all target ratios, in percent.
    pub fn ratio_sum(&self) -> f64 {
        self.holdings.iter().map(|h| h.target_ratio).sum()
    }
}
