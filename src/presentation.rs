//! Chart and metric presentation
//!
//! Declarative descriptions handed to whatever renders the dashboard. Nothing
//! here computes data; it only labels, colours and formats it.

use crate::aggregate::{CategoryCount, SummaryMetrics};
use crate::config::DashboardConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    HorizontalBar,
    Histogram,
    Donut,
    Choropleth,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryColor {
    pub category: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColorScheme {
    /// Renderer default palette
    Auto,
    /// Gradient between the given stops
    Continuous { stops: Vec<String> },
    /// Named continuous scale of the charting library
    Named { scale: String },
    Single { color: String },
    Discrete { colors: Vec<CategoryColor> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub colors: ColorScheme,
    /// Shown instead of the chart when the Filtered View is empty
    pub empty_notice: String,
}

pub fn top_roles_chart(config: &DashboardConfig) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::HorizontalBar,
        title: format!("Top {} Roles by Average Salary", config.top_roles),
        x_label: "Average annual salary (USD)".to_string(),
        y_label: String::new(),
        colors: ColorScheme::Continuous {
            stops: vec!["#54e04a".to_string(), "#006400".to_string()],
        },
        empty_notice: "No data available for the selected filters.".to_string(),
    }
}

pub fn salary_histogram_chart() -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Histogram,
        title: "Annual Salary Distribution".to_string(),
        x_label: "Salary range (USD)".to_string(),
        y_label: String::new(),
        colors: ColorScheme::Auto,
        empty_notice: "No data to display in the salary distribution chart.".to_string(),
    }
}

pub fn remote_work_chart() -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Donut,
        title: "Work Type Proportions".to_string(),
        x_label: "Work type".to_string(),
        y_label: "Records".to_string(),
        colors: ColorScheme::Auto,
        empty_notice: "No data to display in the work type chart.".to_string(),
    }
}

pub fn country_chart(config: &DashboardConfig) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Choropleth,
        title: format!("Average {} Salary by Country", config.focus_role),
        x_label: "Country".to_string(),
        y_label: "Average salary (USD)".to_string(),
        colors: ColorScheme::Named {
            scale: "rdylgn".to_string(),
        },
        empty_notice: "No data to display in the country chart.".to_string(),
    }
}

pub fn seniority_chart() -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: "Seniority Distribution".to_string(),
        x_label: "Seniority level".to_string(),
        y_label: String::new(),
        colors: ColorScheme::Single {
            color: "indianred".to_string(),
        },
        empty_notice: "No data to display in the seniority chart.".to_string(),
    }
}

/// Company sizes use the fixed colour map; sizes outside it get the fallback
pub fn company_size_chart(config: &DashboardConfig, counts: &[CategoryCount]) -> ChartSpec {
    let colors = counts
        .iter()
        .map(|c| CategoryColor {
            category: c.category.clone(),
            color: config.company_size_color(&c.category).to_string(),
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Donut,
        title: "Company Size Distribution".to_string(),
        x_label: "Company size".to_string(),
        y_label: "Records".to_string(),
        colors: ColorScheme::Discrete { colors },
        empty_notice: "No data to display in the company size chart.".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDisplay {
    pub label: String,
    pub value: String,
}

pub fn metric_displays(metrics: &SummaryMetrics) -> Vec<MetricDisplay> {
    vec![
        MetricDisplay {
            label: "Average Salary".to_string(),
            value: format_currency(metrics.average_salary),
        },
        MetricDisplay {
            label: "Maximum Salary".to_string(),
            value: format_currency(metrics.max_salary),
        },
        MetricDisplay {
            label: "Total Records".to_string(),
            value: metrics.record_count.to_string(),
        },
        MetricDisplay {
            label: "Most Frequent Role".to_string(),
            value: metrics.top_role.clone(),
        },
    ]
}

/// Whole dollars with thousands separators, e.g. `$1,234,568`
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Share of total as a percentage with one decimal, e.g. `66.7%`
pub fn format_share(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(90_000.0), "$90,000");
        assert_eq!(format_currency(1_234_567.6), "$1,234,568");
        assert_eq!(format_currency(-1500.0), "-$1,500");
    }

    #[test]
    fn test_metric_displays() {
        let metrics = SummaryMetrics {
            average_salary: 90_000.0,
            max_salary: 120_000.0,
            record_count: 3,
            top_role: "A".to_string(),
        };
        let values: Vec<String> = metric_displays(&metrics).into_iter().map(|m| m.value).collect();
        assert_eq!(values, vec!["$90,000", "$120,000", "3", "A"]);

        let empty: Vec<String> = metric_displays(&SummaryMetrics::empty())
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(empty, vec!["$0", "$0", "0", ""]);
    }

    #[test]
    fn test_company_size_colors_with_fallback() {
        let config = DashboardConfig::default();
        let counts = vec![
            CategoryCount { category: "Grande".into(), count: 3, share: 0.6 },
            CategoryCount { category: "Startup".into(), count: 2, share: 0.4 },
        ];
        let chart = company_size_chart(&config, &counts);

        match chart.colors {
            ColorScheme::Discrete { colors } => {
                assert_eq!(colors[0].color, "#05502a");
                assert_eq!(colors[1].color, config.fallback_color);
            }
            other => panic!("expected discrete colours, got {:?}", other),
        }
    }

    #[test]
    fn test_country_chart_names_focus_role() {
        let mut config = DashboardConfig::default();
        config.focus_role = "Data Scientist".to_string();
        assert_eq!(country_chart(&config).title, "Average Data Scientist Salary by Country");
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(2.0 / 3.0), "66.7%");
        assert_eq!(format_share(1.0), "100.0%");
    }
}
