//! # topup
//!
//! Monthly top-up planner: given what you hold, what each holding should
//! weigh, and how much new money you have, compute how many whole units of
//! each holding to buy.
//!
//! ## Features
//!
//! - **Buy-only**: overweight holdings get zero, never a sale
//! - **Budget-safe**: total spend never exceeds the budget; excess demand is
//!   scaled down proportionally and re-floored to whole units
//! - **Pure**: [`compute`] has no state and no I/O
//! - **Portable files**: versioned JSON export/import of the holdings list
//!   (requires the `portable` feature)
//!
//! ## Quick Start
//!
//! ```
//! use topup::{compute, validate_request, Holding, PlanRequest};
//!
//! let request = PlanRequest::new(
//!     vec![
//!         Holding::new("KODEX 200", 35_000.0, 10, 60.0),
//!         Holding::new("TIGER Short-Term Bond", 105_000.0, 1, 40.0),
//!     ],
//!     500_000.0,
//! );
//! validate_request(&request).unwrap();
//!
//! let plan = compute(&request.holdings, request.budget);
//! assert!(plan.total_buy_amount <= request.budget);
//! assert_eq!(plan.budget_remaining, request.budget - plan.total_buy_amount);
//! ```
//!
//! ## Working from form input
//!
//! Raw text (as typed, with thousands separators) goes through a
//! [`Worksheet`]:
//!
//! ```
//! use topup::{HoldingDraft, ValidationError, Worksheet};
//!
//! let mut ws = Worksheet::new("1,000,000", vec![]);
//! ws.add(HoldingDraft::new("Equity", "10,000", "", "70"));
//! ws.add(HoldingDraft::new("Bonds", "5,000", "4", "20"));
//!
//! assert_eq!(
//!     ws.to_request(),
//!     Err(ValidationError::RatioSumMismatch { sum: 90.0 })
//! );
//! ```
//!
//! ## Algorithm
//!
//! | Pass | Effect |
//! |------|--------|
//! | **Demand** | `floor((target share of held + budget − held value) / price)`, min 0 |
//! | **Clamp** | if demand costs more than the budget, multiply every quantity by `budget / demand` and floor again |
//! | **Ratio** | each holding's share of the post-purchase total |

mod engine;
mod error;
mod holding;
#[cfg(feature = "portable")]
pub mod portable;
pub mod report;
mod result;
pub mod validate;
mod worksheet;

// Re-export public API
pub use engine::compute;
pub use error::ValidationError;
pub use holding::{Holding, PlanRequest};
#[cfg(feature = "portable")]
pub use portable::{ImportError, PortableFile};
pub use report::AllocationChart;
pub use result::{BatchResult, HoldingResult};
pub use validate::{RATIO_SUM_TOLERANCE, validate_drafts, validate_request};
pub use worksheet::{HoldingDraft, RatioBadge, Worksheet};
