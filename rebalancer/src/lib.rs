//! topup-rebalancer: command-line front end for the topup planner.
//!
//! Keeps a worksheet (the portable JSON file) on disk, edits it, validates it,
//! and computes purchase plans either in process or through a `topup-server`
//! instance, appending every step to a JSONL audit trail.

pub mod audit;
pub mod config;
pub mod error;
pub mod gateway;
pub mod workflow;
