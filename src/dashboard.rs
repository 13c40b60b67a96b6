//! Dashboard pipeline
//!
//! Owns the immutable record set and recomputes the whole view from scratch
//! for a given selection: Filter Engine first, then every derived aggregate
//! independently from the Filtered View.

use crate::aggregate::{self, CategoryCount, HistogramBin, RoleSalary, SummaryMetrics};
use crate::config::DashboardConfig;
use crate::filter::{self, FilterOptions, FilterSelection};
use crate::presentation::{self, ChartSpec, MetricDisplay};
use crate::record::SalaryRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One chart: its declarative spec plus the data it plots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel<T> {
    pub chart: ChartSpec,
    pub data: T,
    /// Set when the Filtered View is empty
    pub notice: Option<String>,
}

impl<T> Panel<T> {
    fn new(chart: ChartSpec, data: T, view_is_empty: bool) -> Self {
        let notice = view_is_empty.then(|| chart.empty_notice.clone());
        Self { chart, data, notice }
    }
}

/// Everything shown on screen for one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub generated_at: DateTime<Utc>,
    pub selection: FilterSelection,
    pub metrics: SummaryMetrics,
    pub metric_displays: Vec<MetricDisplay>,
    pub top_roles: Panel<Vec<RoleSalary>>,
    pub salary_histogram: Panel<Vec<HistogramBin>>,
    pub remote_work: Panel<Vec<CategoryCount>>,
    pub country_means: Panel<BTreeMap<String, f64>>,
    pub seniority: Panel<Vec<CategoryCount>>,
    pub company_size: Panel<Vec<CategoryCount>>,
    /// The Filtered View itself, for tabular display
    pub rows: Vec<SalaryRecord>,
}

pub struct Dashboard {
    records: Vec<SalaryRecord>,
    options: FilterOptions,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(records: Vec<SalaryRecord>, config: DashboardConfig) -> Self {
        let options = FilterOptions::from_records(&records);
        info!(
            "Dashboard ready: {} records, {} years, {} seniority levels, {} contract types, {} company sizes",
            records.len(),
            options.years.len(),
            options.seniorities.len(),
            options.contracts.len(),
            options.company_sizes.len()
        );
        Self {
            records,
            options,
            config,
        }
    }

    pub fn records(&self) -> &[SalaryRecord] {
        &self.records
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// All observed values selected in every column
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection::from_options(&self.options)
    }

    pub fn render(&self, selection: &FilterSelection) -> DashboardView {
        let view = filter::apply(&self.records, selection);
        debug!("Filtered view: {} of {} records", view.len(), self.records.len());
        let empty = view.is_empty();

        let metrics = aggregate::summary_metrics(&view);
        let top_roles = aggregate::top_roles_by_mean(&view, self.config.top_roles);
        let histogram = aggregate::salary_histogram(&view, self.config.histogram_bins);
        let remote = aggregate::remote_work_counts(&view);
        let countries = aggregate::country_means_for_role(&view, &self.config.focus_role);
        let seniority = aggregate::seniority_counts(&view);
        let sizes = aggregate::company_size_counts(&view);
        debug!(
            "Aggregates: {} roles, {} bins, {} work types, {} countries, {} seniority levels, {} company sizes",
            top_roles.len(),
            histogram.len(),
            remote.len(),
            countries.len(),
            seniority.len(),
            sizes.len()
        );

        DashboardView {
            generated_at: Utc::now(),
            selection: selection.clone(),
            metric_displays: presentation::metric_displays(&metrics),
            metrics,
            top_roles: Panel::new(presentation::top_roles_chart(&self.config), top_roles, empty),
            salary_histogram: Panel::new(presentation::salary_histogram_chart(), histogram, empty),
            remote_work: Panel::new(presentation::remote_work_chart(), remote, empty),
            country_means: Panel::new(presentation::country_chart(&self.config), countries, empty),
            seniority: Panel::new(presentation::seniority_chart(), seniority, empty),
            company_size: Panel::new(
                presentation::company_size_chart(&self.config, &sizes),
                sizes,
                empty,
            ),
            rows: view,
        }
    }
}
