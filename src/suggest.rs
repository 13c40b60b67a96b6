//! "Did you mean" hints for filter values that were never observed.
//!
//! Unknown values are still accepted into a selection; they simply match no
//! record. These hints only help the user spot a typo.

use crate::filter::{FilterColumn, FilterOptions};
use std::fmt;

pub const SUGGESTION_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue {
    pub column: FilterColumn,
    pub value: String,
    pub suggestion: Option<String>,
}

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no record has {} '{}'", self.column, self.value)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Closest candidate by Jaro-Winkler similarity, if any clears the threshold
pub fn closest<'a>(value: &str, candidates: &'a [String]) -> Option<&'a str> {
    let needle = normalize(value);
    candidates
        .iter()
        .map(|c| (c, strsim::jaro_winkler(&needle, &normalize(c))))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c.as_str())
}

/// Values of `column` that are not among the observed options
pub fn unknown_values<S: AsRef<str>>(
    options: &FilterOptions,
    column: FilterColumn,
    values: &[S],
) -> Vec<UnknownValue> {
    let observed = options.values(column);
    values
        .iter()
        .map(|v| v.as_ref().trim())
        .filter(|v| !observed.iter().any(|o| o.as_str() == *v))
        .map(|v| UnknownValue {
            column,
            value: v.to_string(),
            suggestion: closest(v, &observed).map(str::to_string),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> FilterOptions {
        FilterOptions {
            years: vec![2023, 2024],
            seniorities: vec!["Executivo".into(), "Júnior".into(), "Pleno".into(), "Sênior".into()],
            contracts: vec!["Integral".into()],
            company_sizes: vec!["Grande".into(), "Média".into(), "Pequena".into()],
        }
    }

    #[test]
    fn test_closest_handles_accents_and_case() {
        let candidates = options().seniorities;
        assert_eq!(closest("senior", &candidates), Some("Sênior"));
        assert_eq!(closest("JUNIOR", &candidates), Some("Júnior"));
        assert_eq!(closest("Intern", &candidates), None);
    }

    #[test]
    fn test_unknown_values() {
        let unknown = unknown_values(&options(), FilterColumn::CompanySize, &["Grande", "Pequna"]);

        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].value, "Pequna");
        assert_eq!(unknown[0].suggestion.as_deref(), Some("Pequena"));
        assert_eq!(
            unknown[0].to_string(),
            "no record has company-size 'Pequna' (did you mean 'Pequena'?)"
        );
    }

    #[test]
    fn test_known_years_are_not_reported() {
        assert!(unknown_values(&options(), FilterColumn::Year, &["2023"]).is_empty());
        assert_eq!(unknown_values(&options(), FilterColumn::Year, &["2019"]).len(), 1);
    }
}
