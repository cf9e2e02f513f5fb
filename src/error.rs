//! Validation errors reported before the engine runs.

/// Reasons a plan request is rejected.
///
/// Each variant carries exactly what a user needs to fix the input; the
/// `Display` text is meant to be shown as-is.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationError {
    /// Budget is absent or not positive.
    #[error("enter a positive budget for this period")]
    MissingBudget,
    /// A holding has an empty name (1-based row number).
    #[error("holding #{row} has no name")]
    MissingName { row: usize },
    /// A holding's price is absent or not positive.
    #[error("\"{name}\" needs a current price greater than zero")]
    InvalidPrice { name: String },
    /// A holding's ratio is not a number or is negative.
    #[error("\"{name}\" needs a target ratio of 0% or more")]
    InvalidRatio { name: String },
    /// No holdings at all.
    #[error("add at least one holding")]
    EmptyHoldings,
    /// Target ratios do not add up to 100%.
    #[error("target ratios must sum to 100% (currently {sum:.1}%)")]
    RatioSumMismatch { sum: f64 },
}
