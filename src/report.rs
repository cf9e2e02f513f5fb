//! Terminal projections of a [`BatchResult`].
//!
//! Pure formatting: nothing here changes a plan. `Display` on `BatchResult`
//! prints the per-holding table and the totals; [`AllocationChart`] prints a
//! target-vs-final bar chart.

use std::fmt;

use crate::result::BatchResult;

/// Format an amount rounded to whole units with `,` thousands separators.
///
/// ```
/// assert_eq!(topup::report::group_thousands(1_234_567.0), "1,234,567");
/// assert_eq!(topup::report::group_thousands(-500.0), "-500");
/// ```
pub fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn name_width(result: &BatchResult) -> usize {
    result
        .results
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4)
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = name_width(self);

        writeln!(f, "PURCHASE PLAN:")?;
        writeln!(
            f,
            "  {:w$} {:>12} {:>8} {:>7} {:>6} {:>14} {:>7} {:>7}",
            "Name", "Price", "Held", "Now%", "Buy", "Amount", "Final%", "Target%"
        )?;
        for r in &self.results {
            writeln!(
                f,
                "  {:w$} {:>12} {:>8} {:>6.1}% {:>6} {:>14} {:>6.1}% {:>6.1}%{}",
                r.name,
                group_thousands(r.current_price),
                r.held_quantity,
                r.current_ratio,
                r.buy_quantity,
                group_thousands(r.buy_amount),
                r.final_ratio,
                r.target_ratio,
                if r.target_ratio == 0.0 { "  (no new buys)" } else { "" },
            )?;
        }

        writeln!(f)?;
        writeln!(f, "  Held value:      {:>16}", group_thousands(self.total_held_value))?;
        writeln!(f, "  Purchase total:  {:>16}", group_thousands(self.total_buy_amount))?;
        writeln!(f, "  Final value:     {:>16}", group_thousands(self.total_final_value))?;
        writeln!(f, "  Budget left:     {:>16}", group_thousands(self.budget_remaining))?;
        Ok(())
    }
}

/// Target vs. final allocation as horizontal bars.
///
/// Bars are scaled so the largest ratio in the plan (or 1%, whichever is
/// larger) spans `width` cells.
pub struct AllocationChart<'a> {
    result: &'a BatchResult,
    width: usize,
}

impl<'a> AllocationChart<'a> {
    pub fn new(result: &'a BatchResult, width: usize) -> Self {
        Self { result, width }
    }

    fn bar_len(&self, ratio: f64, max_ratio: f64) -> usize {
        let cells = (ratio / max_ratio * self.width as f64).round();
        if cells.is_finite() && cells > 0.0 {
            (cells as usize).min(self.width)
        } else {
            0
        }
    }
}

impl fmt::Display for AllocationChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = name_width(self.result);
        let max_ratio = self
            .result
            .results
            .iter()
            .map(|r| r.target_ratio.max(r.final_ratio))
            .fold(1.0, f64::max);

        writeln!(f, "ALLOCATION (target ░ / final █):")?;
        for r in &self.result.results {
            let target = self.bar_len(r.target_ratio, max_ratio);
            let actual = self.bar_len(r.final_ratio, max_ratio);
            writeln!(
                f,
                "  {:w$} {:<width$} {:>5.1}%",
                r.name,
                "░".repeat(target),
                r.target_ratio,
                width = self.width,
            )?;
            writeln!(
                f,
                "  {:w$} {:<width$} {:>5.1}%",
                "",
                "█".repeat(actual),
                r.final_ratio,
                width = self.width,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Holding, compute};

    fn plan() -> BatchResult {
        compute(
            &[
                Holding::new("Equity", 10_000.0, 0, 50.0),
                Holding::new("Bonds", 5_000.0, 0, 50.0),
                Holding::new("Gold", 1_000.0, 3, 0.0),
            ],
            100_000.0,
        )
    }

    #[test]
    fn thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_000.0), "1,000");
        assert_eq!(group_thousands(35_000.4), "35,000");
        assert_eq!(group_thousands(1_000_000.0), "1,000,000");
        assert_eq!(group_thousands(-12_345.0), "-12,345");
    }

    #[test]
    fn table_lists_every_holding_and_totals() {
        let s = format!("{}", plan());
        assert!(s.contains("PURCHASE PLAN"));
        assert!(s.contains("Equity"));
        assert!(s.contains("Bonds"));
        assert!(s.contains("10,000"));
        assert!(s.contains("Budget left"));
    }

    #[test]
    fn table_flags_zero_target() {
        let s = format!("{}", plan());
        let gold = s.lines().find(|l| l.contains("Gold")).unwrap();
        assert!(gold.contains("no new buys"));
        let equity = s.lines().find(|l| l.contains("Equity")).unwrap();
        assert!(!equity.contains("no new buys"));
    }

    #[test]
    fn chart_scales_to_largest_ratio() {
        let result = plan();
        let s = AllocationChart::new(&result, 20).to_string();
        let lines: Vec<&str> = s.lines().collect();
        // header + two lines per holding
        assert_eq!(lines.len(), 1 + 2 * 3);
        // Equity target 50% is the largest ratio → full bar
        assert_eq!(lines[1].matches('░').count(), 20);
        // Gold target 0% → empty bar
        assert_eq!(lines[5].matches('░').count(), 0);
    }

    #[test]
    fn chart_of_empty_plan() {
        let result = BatchResult::default();
        let s = AllocationChart::new(&result, 10).to_string();
        assert_eq!(s.lines().count(), 1);
    }
}
