//! JSONL audit trail.
//!
//! Each command appends events to an audit.jsonl file, one JSON object per
//! line. The trail is write-only: nothing in the crate reads it back.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use topup::{BatchResult, ValidationError};

use crate::error::Result;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Log a computed plan.
pub fn log_plan_computed(
    audit: &mut AuditLog,
    worksheet_file: &str,
    source: &str,
    budget: f64,
    plan: &BatchResult,
) -> Result<()> {
    let buys: Vec<_> = plan
        .results
        .iter()
        .filter(|r| r.buy_quantity > 0)
        .map(|r| {
            serde_json::json!({
                "name": r.name,
                "qty": r.buy_quantity,
                "amount": r.buy_amount,
            })
        })
        .collect();

    audit.log(
        "plan_computed",
        serde_json::json!({
            "worksheet": worksheet_file,
            "engine": source,
            "budget": budget,
            "buys": buys,
            "total_buy_amount": plan.total_buy_amount,
            "budget_remaining": plan.budget_remaining,
        }),
    )
}

/// Log a portable file imported into a worksheet.
pub fn log_worksheet_imported(
    audit: &mut AuditLog,
    source: &str,
    dest: &str,
    rows: usize,
) -> Result<()> {
    audit.log(
        "worksheet_imported",
        serde_json::json!({
            "source": source,
            "dest": dest,
            "rows": rows,
        }),
    )
}

/// Log a worksheet written to disk.
pub fn log_worksheet_exported(audit: &mut AuditLog, dest: &str, rows: usize) -> Result<()> {
    audit.log(
        "worksheet_exported",
        serde_json::json!({
            "dest": dest,
            "rows": rows,
        }),
    )
}

/// Log a rejected worksheet.
pub fn log_validation_failed(
    audit: &mut AuditLog,
    worksheet_file: &str,
    err: &ValidationError,
) -> Result<()> {
    audit.log(
        "validation_failed",
        serde_json::json!({
            "worksheet": worksheet_file,
            "reason": err.to_string(),
        }),
    )
}
