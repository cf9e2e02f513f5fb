//! Command implementations: load worksheet → act → write back → audit.
//!
//! Every command that rewrites a worksheet goes through the portable export,
//! so files on disk are always normalised.

use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use rustc_hash::FxHashSet;
use topup::portable::{PortableFile, default_file_name};
use topup::{AllocationChart, BatchResult, HoldingDraft, RatioBadge, Worksheet};

use crate::audit::{self, AuditLog};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::{LocalEngine, PlanGateway, RemoteEngine};

/// Options for `plan`.
#[derive(Debug, Default)]
pub struct PlanOptions {
    /// Budget text overriding the worksheet's own.
    pub budget: Option<String>,
    /// Service base URL overriding `[remote] url`.
    pub remote: Option<String>,
    /// Print the output document instead of the table.
    pub json: bool,
}

/// Outcome of `check` on a worksheet that passed validation.
#[derive(Debug)]
pub struct CheckReport {
    pub ratio_sum: f64,
    pub badge: RatioBadge,
    pub duplicates: Vec<String>,
}

/// Run `f` against the audit log, if auditing is enabled.
fn with_audit(config: &Config, f: impl FnOnce(&mut AuditLog) -> Result<()>) -> Result<()> {
    if !config.logging.enabled {
        return Ok(());
    }
    let mut log = AuditLog::open(&config.audit_path())?;
    f(&mut log)
}

fn save(ws: &Worksheet, path: &Path) -> Result<()> {
    ws.save(path).map_err(|e| Error::WorksheetWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn save_and_audit(config: &Config, ws: &Worksheet, path: &Path) -> Result<()> {
    save(ws, path)?;
    info!("Wrote {} ({} holdings)", path.display(), ws.rows.len());
    with_audit(config, |log| {
        audit::log_worksheet_exported(log, &path.display().to_string(), ws.rows.len())
    })
}

/// Names (trimmed) that appear on more than one row, in first-seen order.
pub fn duplicate_names(ws: &Worksheet) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut reported = FxHashSet::default();
    let mut dups = Vec::new();
    for row in &ws.rows {
        let name = row.name.trim();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name) && reported.insert(name) {
            dups.push(name.to_string());
        }
    }
    dups
}

/// File name `init` uses when none is given.
pub fn default_worksheet_path() -> String {
    default_file_name(chrono::Local::now().date_naive())
}

/// Write a starter worksheet with the preset holdings.
pub fn run_init(config: &Config, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", path.display()))
            .default(false)
            .interact()
            .map_err(|e| Error::Aborted(format!("confirmation prompt failed: {e}")))?;
        if !confirmed {
            return Err(Error::Aborted(format!("kept existing {}", path.display())));
        }
    }

    let ws = Worksheet::with_presets();
    save_and_audit(config, &ws, path)?;
    println!(
        "Created {} with {} holdings. Fill in prices, quantities and a budget.",
        path.display(),
        ws.rows.len()
    );
    Ok(())
}

/// Append a holding row.
pub fn run_add(config: &Config, path: &Path, draft: HoldingDraft) -> Result<()> {
    let name = draft.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Worksheet("holding name must not be empty".into()));
    }

    let mut ws = Worksheet::load(path)?;
    if ws.rows.iter().any(|r| r.name.trim() == name) {
        return Err(Error::Worksheet(format!("holding '{name}' already exists")));
    }
    ws.add(draft);
    save_and_audit(config, &ws, path)?;
    println!(
        "Added {name}. Ratio sum: {:.1}% [{}]",
        ws.ratio_sum(),
        ws.ratio_badge()
    );
    Ok(())
}

/// Remove the holding named `name`.
pub fn run_remove(config: &Config, path: &Path, name: &str) -> Result<()> {
    let mut ws = Worksheet::load(path)?;
    let removed = ws
        .remove(name)
        .ok_or_else(|| Error::Worksheet(format!("no holding named '{}'", name.trim())))?;
    save_and_audit(config, &ws, path)?;
    println!(
        "Removed {}. Ratio sum: {:.1}% [{}]",
        removed.name.trim(),
        ws.ratio_sum(),
        ws.ratio_badge()
    );
    Ok(())
}

/// Validate a worksheet without computing anything.
pub fn run_check(config: &Config, path: &Path) -> Result<CheckReport> {
    let ws = Worksheet::load(path)?;
    let ratio_sum = ws.ratio_sum();
    let badge = ws.ratio_badge();
    println!("Ratio sum: {ratio_sum:.1}% [{badge}]");

    let duplicates = duplicate_names(&ws);
    for name in &duplicates {
        warn!("Duplicate holding name: {name}");
        println!("WARNING: '{name}' appears more than once");
    }

    if let Err(e) = ws.to_request() {
        with_audit(config, |log| {
            audit::log_validation_failed(log, &path.display().to_string(), &e)
        })?;
        return Err(e.into());
    }

    println!("Worksheet OK: {} holdings", ws.rows.len());
    Ok(CheckReport {
        ratio_sum,
        badge,
        duplicates,
    })
}

/// Validate, compute and print a purchase plan.
pub fn run_plan(config: &Config, path: &Path, opts: &PlanOptions) -> Result<BatchResult> {
    let mut ws = Worksheet::load(path)?;
    if let Some(budget) = &opts.budget {
        ws.budget = budget.clone();
    }

    let request = match ws.to_request() {
        Ok(r) => r,
        Err(e) => {
            with_audit(config, |log| {
                audit::log_validation_failed(log, &path.display().to_string(), &e)
            })?;
            return Err(e.into());
        }
    };

    let remote_url = opts.remote.as_ref().or(config.remote.url.as_ref());
    let gateway: Box<dyn PlanGateway> = match remote_url {
        Some(url) => Box::new(RemoteEngine::new(
            url,
            Duration::from_secs(config.remote.timeout_secs),
        )?),
        None => Box::new(LocalEngine),
    };

    info!(
        "Computing plan for {} holdings, budget {} ({})",
        request.holdings.len(),
        request.budget,
        gateway.name()
    );
    let plan = gateway.plan(&request)?;

    with_audit(config, |log| {
        audit::log_plan_computed(
            log,
            &path.display().to_string(),
            gateway.name(),
            request.budget,
            &plan,
        )
    })?;

    if opts.json {
        let json = serde_json::to_string_pretty(&plan)
            .map_err(|e| Error::Worksheet(format!("failed to encode plan: {e}")))?;
        println!("{json}");
    } else {
        println!("{plan}");
        if config.display.show_chart {
            println!("{}", AllocationChart::new(&plan, config.display.chart_width));
        }
        if plan.is_empty_plan() {
            println!("Nothing to buy: the budget does not cover a single underweight unit.");
        }
    }
    Ok(plan)
}

/// Import a portable file into `dest`. `dest` is only written after `src`
/// parses successfully.
pub fn run_import(config: &Config, src: &Path, dest: &Path) -> Result<usize> {
    let file = PortableFile::load(src)?;

    let mut ws = if dest.exists() {
        Worksheet::load(dest)?
    } else {
        Worksheet::default()
    };
    let rows = ws.apply(file);
    save(&ws, dest)?;

    info!("Imported {rows} holdings from {}", src.display());
    with_audit(config, |log| {
        audit::log_worksheet_imported(
            log,
            &src.display().to_string(),
            &dest.display().to_string(),
            rows,
        )
    })?;
    println!(
        "Imported {rows} holdings into {}. Ratio sum: {:.1}% [{}]",
        dest.display(),
        ws.ratio_sum(),
        ws.ratio_badge()
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_reported_once_in_order() {
        let ws = Worksheet::new(
            "",
            vec![
                HoldingDraft::new("A", "1", "", "10"),
                HoldingDraft::new("B", "1", "", "10"),
                HoldingDraft::new(" A ", "1", "", "10"),
                HoldingDraft::new("B", "1", "", "10"),
                HoldingDraft::new("A", "1", "", "10"),
                HoldingDraft::new("", "1", "", "10"),
                HoldingDraft::new("", "1", "", "10"),
            ],
        );
        assert_eq!(duplicate_names(&ws), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn no_duplicates_in_presets() {
        assert!(duplicate_names(&Worksheet::with_presets()).is_empty());
    }

    #[test]
    fn default_path_is_dated_json() {
        let p = default_worksheet_path();
        assert!(p.starts_with("portfolio-"));
        assert!(p.ends_with(".json"));
    }
}
