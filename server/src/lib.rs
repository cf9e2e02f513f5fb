//! topup-server: the purchase planner behind an HTTP boundary.
//!
//! `POST /api/rebalance` takes a plan request and answers with the plan;
//! `GET /health` is a liveness probe.

pub mod api;
pub mod config;
pub mod error;

pub use api::app_router;
