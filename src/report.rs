//! Plain-text rendering of a dashboard view for terminals.

use crate::aggregate::CategoryCount;
use crate::dashboard::{DashboardView, Panel};
use crate::error::Result;
use crate::filter::{FilterColumn, FilterOptions};
use crate::presentation::{format_currency, format_share};
use crate::table;
use std::fmt::Write;

const BAR_WIDTH: usize = 30;
const RULE: &str = "────────────────────────────────────────────────────────────";

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.max(1))
}

fn section<T>(out: &mut String, panel: &Panel<T>) -> Result<bool> {
    writeln!(out, "\n{}", panel.chart.title)?;
    if let Some(notice) = &panel.notice {
        writeln!(out, "  {}", notice)?;
        return Ok(false);
    }
    Ok(true)
}

fn category_rows(out: &mut String, counts: &[CategoryCount], with_share: bool) -> Result<()> {
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0) as f64;
    let width = counts.iter().map(|c| c.category.chars().count()).max().unwrap_or(0);
    for c in counts {
        let share = if with_share { format!(" {:>6}", format_share(c.share)) } else { String::new() };
        writeln!(
            out,
            "  {:<width$} {:>7}{} {}",
            c.category,
            c.count,
            share,
            bar(c.count as f64, max),
            width = width
        )?;
    }
    Ok(())
}

/// Describe the selection, collapsing columns that still hold every value
pub fn describe_selection(view: &DashboardView, options: &FilterOptions) -> String {
    FilterColumn::ALL
        .iter()
        .map(|&column| {
            let selected = view.selection.values(column);
            let value = if selected == options.values(column) {
                "all".to_string()
            } else if selected.is_empty() {
                "none".to_string()
            } else {
                selected.join(", ")
            };
            format!("{}: {}", column, value)
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn render_text(view: &DashboardView, options: &FilterOptions, table_rows: usize) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "Salary Dashboard (annual salary in USD)")?;
    writeln!(out, "Filters  {}", describe_selection(view, options))?;
    writeln!(out, "{}", RULE)?;
    for metric in &view.metric_displays {
        writeln!(out, "  {:<20} {}", metric.label, metric.value)?;
    }
    writeln!(out, "{}", RULE)?;

    if section(&mut out, &view.top_roles)? {
        let data = &view.top_roles.data;
        let max = data.first().map(|r| r.mean_usd).unwrap_or(0.0);
        let width = data.iter().map(|r| r.role.chars().count()).max().unwrap_or(0);
        for row in data {
            writeln!(
                out,
                "  {:<width$} {:>12} {}",
                row.role,
                format_currency(row.mean_usd),
                bar(row.mean_usd, max),
                width = width
            )?;
        }
    }

    if section(&mut out, &view.salary_histogram)? {
        let data = &view.salary_histogram.data;
        let max = data.iter().map(|b| b.count).max().unwrap_or(0) as f64;
        for bin in data {
            writeln!(
                out,
                "  {:>12} – {:<12} {:>6} {}",
                format_currency(bin.lower),
                format_currency(bin.upper),
                bin.count,
                bar(bin.count as f64, max)
            )?;
        }
    }

    if section(&mut out, &view.remote_work)? {
        category_rows(&mut out, &view.remote_work.data, true)?;
    }

    if section(&mut out, &view.country_means)? {
        let data = &view.country_means.data;
        if data.is_empty() {
            writeln!(out, "  (no records for this role)")?;
        }
        let max = data.values().copied().fold(0.0, f64::max);
        for (country, mean) in data {
            writeln!(out, "  {:<4} {:>12} {}", country, format_currency(*mean), bar(*mean, max))?;
        }
    }

    if section(&mut out, &view.seniority)? {
        category_rows(&mut out, &view.seniority.data, false)?;
    }

    if section(&mut out, &view.company_size)? {
        category_rows(&mut out, &view.company_size.data, true)?;
    }

    if table_rows > 0 {
        writeln!(out, "\nDetailed Data ({} rows)", view.rows.len())?;
        let frame = table::preview(&view.rows, table_rows)?;
        writeln!(out, "{}", frame)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dashboard::Dashboard;
    use crate::record::SalaryRecord;

    fn dashboard() -> Dashboard {
        let records = vec![
            SalaryRecord::new(2023, "Senior", "CLT", "Grande", "Data Analyst", 100_000.0, "Remoto", "USA"),
            SalaryRecord::new(2024, "Junior", "CLT", "Pequena", "B", 50_000.0, "Presencial", "BRA"),
        ];
        Dashboard::new(records, DashboardConfig::default())
    }

    #[test]
    fn test_render_text_contains_metrics_and_charts() {
        let dashboard = dashboard();
        let view = dashboard.render(&dashboard.default_selection());
        let text = render_text(&view, dashboard.options(), 0).unwrap();

        assert!(text.contains("$75,000"));
        assert!(text.contains("Top 10 Roles by Average Salary"));
        assert!(text.contains("Average Data Analyst Salary by Country"));
        assert!(text.contains("year: all"));
        assert!(!text.contains("Detailed Data"));
    }

    #[test]
    fn test_render_text_empty_view_shows_notices() {
        let dashboard = dashboard();
        let mut selection = dashboard.default_selection();
        selection.clear(FilterColumn::Year);
        let view = dashboard.render(&selection);
        let text = render_text(&view, dashboard.options(), 5).unwrap();

        assert!(text.contains("year: none"));
        assert!(text.contains("No data available for the selected filters."));
        assert!(text.contains("Detailed Data (0 rows)"));
    }

    #[test]
    fn test_describe_partial_selection() {
        let dashboard = dashboard();
        let mut selection = dashboard.default_selection();
        selection.set(FilterColumn::Seniority, ["Junior"]).unwrap();
        let view = dashboard.render(&selection);

        assert_eq!(
            describe_selection(&view, dashboard.options()),
            "year: all | seniority: Junior | contract: all | company-size: all"
        );
    }
}
