//! Filter Engine
//!
//! Narrows the full record set to the Filtered View. A record passes when its
//! year, seniority, contract and company size are each in the matching
//! allowed set. An empty allowed set excludes everything.

use crate::error::{ExplorerError, Result};
use crate::record::SalaryRecord;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The four filterable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FilterColumn {
    #[value(alias = "ano")]
    Year,
    #[value(alias = "senioridade")]
    Seniority,
    #[value(alias = "contrato")]
    Contract,
    #[value(aliases = ["company_size", "tamanho_empresa"])]
    CompanySize,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 4] = [
        FilterColumn::Year,
        FilterColumn::Seniority,
        FilterColumn::Contract,
        FilterColumn::CompanySize,
    ];

    /// Header of the column in the source table
    pub fn header(&self) -> &'static str {
        match self {
            FilterColumn::Year => "ano",
            FilterColumn::Seniority => "senioridade",
            FilterColumn::Contract => "contrato",
            FilterColumn::CompanySize => "tamanho_empresa",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterColumn::Year => "year",
            FilterColumn::Seniority => "seniority",
            FilterColumn::Contract => "contract",
            FilterColumn::CompanySize => "company-size",
        }
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Distinct values observed per filterable column, sorted.
///
/// These are the choices offered by the multi-select inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub seniorities: Vec<String>,
    pub contracts: Vec<String>,
    pub company_sizes: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[SalaryRecord]) -> Self {
        Self {
            years: records.iter().map(|r| r.year).sorted().dedup().collect(),
            seniorities: distinct(records.iter().map(|r| r.seniority.as_str())),
            contracts: distinct(records.iter().map(|r| r.contract.as_str())),
            company_sizes: distinct(records.iter().map(|r| r.company_size.as_str())),
        }
    }

    /// Observed values of `column`, rendered as strings
    pub fn values(&self, column: FilterColumn) -> Vec<String> {
        match column {
            FilterColumn::Year => self.years.iter().map(|y| y.to_string()).collect(),
            FilterColumn::Seniority => self.seniorities.clone(),
            FilterColumn::Contract => self.contracts.clone(),
            FilterColumn::CompanySize => self.company_sizes.clone(),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values.sorted().dedup().map(str::to_string).collect()
}

#[derive(Debug, Clone, Copy)]
enum Edit {
    Replace,
    Insert,
    Remove,
}

/// The four sets of currently allowed values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub seniorities: BTreeSet<String>,
    pub contracts: BTreeSet<String>,
    pub company_sizes: BTreeSet<String>,
}

impl FilterSelection {
    /// Default selection: every observed value of every column
    pub fn all_observed(records: &[SalaryRecord]) -> Self {
        Self::from_options(&FilterOptions::from_records(records))
    }

    pub fn from_options(options: &FilterOptions) -> Self {
        Self {
            years: options.years.iter().copied().collect(),
            seniorities: options.seniorities.iter().cloned().collect(),
            contracts: options.contracts.iter().cloned().collect(),
            company_sizes: options.company_sizes.iter().cloned().collect(),
        }
    }

    pub fn matches(&self, record: &SalaryRecord) -> bool {
        self.years.contains(&record.year)
            && self.seniorities.contains(&record.seniority)
            && self.contracts.contains(&record.contract)
            && self.company_sizes.contains(&record.company_size)
    }

    /// Replace the allowed set of `column`. Years must parse as integers;
    /// on error the selection is left untouched.
    pub fn set<I, S>(&mut self, column: FilterColumn, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.edit(column, values, Edit::Replace)
    }

    pub fn add<I, S>(&mut self, column: FilterColumn, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.edit(column, values, Edit::Insert)
    }

    pub fn remove<I, S>(&mut self, column: FilterColumn, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.edit(column, values, Edit::Remove)
    }

    pub fn clear(&mut self, column: FilterColumn) {
        match column {
            FilterColumn::Year => self.years.clear(),
            FilterColumn::Seniority => self.seniorities.clear(),
            FilterColumn::Contract => self.contracts.clear(),
            FilterColumn::CompanySize => self.company_sizes.clear(),
        }
    }

    /// Restore `column` to all observed values
    pub fn reset(&mut self, column: FilterColumn, options: &FilterOptions) {
        let defaults = Self::from_options(options);
        match column {
            FilterColumn::Year => self.years = defaults.years,
            FilterColumn::Seniority => self.seniorities = defaults.seniorities,
            FilterColumn::Contract => self.contracts = defaults.contracts,
            FilterColumn::CompanySize => self.company_sizes = defaults.company_sizes,
        }
    }

    pub fn is_default(&self, options: &FilterOptions) -> bool {
        *self == Self::from_options(options)
    }

    /// Allowed values of `column`, rendered as strings
    pub fn values(&self, column: FilterColumn) -> Vec<String> {
        match column {
            FilterColumn::Year => self.years.iter().map(|y| y.to_string()).collect(),
            FilterColumn::Seniority => self.seniorities.iter().cloned().collect(),
            FilterColumn::Contract => self.contracts.iter().cloned().collect(),
            FilterColumn::CompanySize => self.company_sizes.iter().cloned().collect(),
        }
    }

    fn edit<I, S>(&mut self, column: FilterColumn, values: I, edit: Edit) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .collect();

        match column {
            FilterColumn::Year => {
                let years = values
                    .iter()
                    .map(|v| parse_year(v))
                    .collect::<Result<Vec<_>>>()?;
                apply_edit(&mut self.years, years, edit);
            }
            FilterColumn::Seniority => apply_edit(&mut self.seniorities, values, edit),
            FilterColumn::Contract => apply_edit(&mut self.contracts, values, edit),
            FilterColumn::CompanySize => apply_edit(&mut self.company_sizes, values, edit),
        }
        Ok(())
    }
}

fn apply_edit<T: Ord>(set: &mut BTreeSet<T>, values: Vec<T>, edit: Edit) {
    match edit {
        Edit::Replace => {
            set.clear();
            set.extend(values);
        }
        Edit::Insert => set.extend(values),
        Edit::Remove => {
            for value in &values {
                set.remove(value);
            }
        }
    }
}

fn parse_year(value: &str) -> Result<i32> {
    value
        .parse::<i32>()
        .map_err(|_| ExplorerError::Command(format!("Invalid year '{}': expected an integer", value)))
}

/// Apply the selection to `records`, preserving input order.
///
/// Never fails: an empty result is a valid Filtered View.
pub fn apply(records: &[SalaryRecord], selection: &FilterSelection) -> Vec<SalaryRecord> {
    records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect()
}
