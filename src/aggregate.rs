//! Derived Aggregates
//!
//! Pure functions of the Filtered View. Each one is total: an empty view
//! yields the documented fallback instead of an error.
//!
//! Grouping is an explicit fold keyed by category that remembers the order in
//! which groups were first seen, so every tie-break below is "first
//! encountered wins".

use crate::record::SalaryRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The four headline metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub average_salary: f64,
    pub max_salary: f64,
    pub record_count: usize,
    /// Most frequent role, empty when the view is empty
    pub top_role: String,
}

impl SummaryMetrics {
    /// Fallback values for an empty view
    pub fn empty() -> Self {
        Self {
            average_salary: 0.0,
            max_salary: 0.0,
            record_count: 0,
            top_role: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSalary {
    pub role: String,
    pub mean_usd: f64,
}

/// One histogram bar. `upper` is exclusive except on the last bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
    /// Fraction of the view in this category
    pub share: f64,
}

/// Ordering applied to category counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountOrder {
    /// Largest count first, ties by first encounter
    Descending,
    /// First encounter
    Encounter,
}

#[derive(Debug, Default, Clone, Copy)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Group-by-key fold that keeps groups in first-encounter order
struct GroupFold<A> {
    index: HashMap<String, usize>,
    groups: Vec<(String, A)>,
}

impl<A: Default> GroupFold<A> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str) -> &mut A {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                let idx = self.groups.len();
                self.index.insert(key.to_string(), idx);
                self.groups.push((key.to_string(), A::default()));
                idx
            }
        };
        &mut self.groups[idx].1
    }

    fn into_groups(self) -> Vec<(String, A)> {
        self.groups
    }
}

fn count_by<'a, F>(view: &'a [SalaryRecord], key: F) -> Vec<(String, usize)>
where
    F: Fn(&'a SalaryRecord) -> &'a str,
{
    let mut fold = GroupFold::<usize>::new();
    for record in view {
        *fold.entry(key(record)) += 1;
    }
    fold.into_groups()
}

fn mean_by<'a, F>(view: impl IntoIterator<Item = &'a SalaryRecord>, key: F) -> Vec<(String, MeanAcc)>
where
    F: Fn(&'a SalaryRecord) -> &'a str,
{
    let mut fold = GroupFold::<MeanAcc>::new();
    for record in view {
        fold.entry(key(record)).push(record.usd);
    }
    fold.into_groups()
}

pub fn summary_metrics(view: &[SalaryRecord]) -> SummaryMetrics {
    if view.is_empty() {
        return SummaryMetrics::empty();
    }

    let total: f64 = view.iter().map(|r| r.usd).sum();
    let max_salary = view.iter().map(|r| r.usd).fold(f64::MIN, f64::max);

    // Strict comparison keeps the earliest role on ties
    let mut top_role = String::new();
    let mut top_count = 0;
    for (role, count) in count_by(view, |r| r.role.as_str()) {
        if count > top_count {
            top_count = count;
            top_role = role;
        }
    }

    SummaryMetrics {
        average_salary: total / view.len() as f64,
        max_salary,
        record_count: view.len(),
        top_role,
    }
}

/// Roles with the highest mean salary, descending, at most `limit` rows.
///
/// Sorting is stable, so roles with equal means stay in first-encounter order.
pub fn top_roles_by_mean(view: &[SalaryRecord], limit: usize) -> Vec<RoleSalary> {
    let mut roles: Vec<RoleSalary> = mean_by(view, |r| r.role.as_str())
        .into_iter()
        .map(|(role, acc)| RoleSalary {
            role,
            mean_usd: acc.mean(),
        })
        .collect();

    roles.sort_by(|a, b| b.mean_usd.total_cmp(&a.mean_usd));
    roles.truncate(limit);
    roles
}

/// Equal-width histogram of salaries over the observed min..max.
///
/// Returns no bins for an empty view. If every salary is the same the range
/// has zero width and a single bin holds the whole view.
pub fn salary_histogram(view: &[SalaryRecord], bins: usize) -> Vec<HistogramBin> {
    if view.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = view.iter().map(|r| r.usd).fold(f64::MAX, f64::min);
    let max = view.iter().map(|r| r.usd).fold(f64::MIN, f64::max);

    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: view.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| min + i as f64 * width).collect();
    edges.push(max);

    // Bin membership is decided against the reported edges
    let mut counts = vec![0usize; bins];
    for record in view {
        let idx = edges.partition_point(|edge| *edge <= record.usd).saturating_sub(1);
        counts[idx.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: edges[i],
            upper: edges[i + 1],
            count,
        })
        .collect()
}

fn category_counts<'a, F>(view: &'a [SalaryRecord], key: F, order: CountOrder) -> Vec<CategoryCount>
where
    F: Fn(&'a SalaryRecord) -> &'a str,
{
    let total = view.len();
    let mut counts: Vec<CategoryCount> = count_by(view, key)
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category,
            count,
            share: count as f64 / total as f64,
        })
        .collect();

    if order == CountOrder::Descending {
        counts.sort_by(|a, b| b.count.cmp(&a.count));
    }
    counts
}

/// Records per remote-work type, largest first
pub fn remote_work_counts(view: &[SalaryRecord]) -> Vec<CategoryCount> {
    category_counts(view, |r| r.remote.as_str(), CountOrder::Descending)
}

/// Records per seniority level, in first-encounter order
pub fn seniority_counts(view: &[SalaryRecord]) -> Vec<CategoryCount> {
    category_counts(view, |r| r.seniority.as_str(), CountOrder::Encounter)
}

/// Records per company size, largest first
pub fn company_size_counts(view: &[SalaryRecord]) -> Vec<CategoryCount> {
    category_counts(view, |r| r.company_size.as_str(), CountOrder::Descending)
}

/// Mean salary per country among records whose role is exactly `role`.
///
/// Keyed by ISO3 code; empty when no record has that role.
pub fn country_means_for_role(view: &[SalaryRecord], role: &str) -> BTreeMap<String, f64> {
    mean_by(view.iter().filter(|r| r.role == role), |r| r.country_iso3.as_str())
        .into_iter()
        .map(|(country, acc)| (country, acc.mean()))
        .collect()
}
