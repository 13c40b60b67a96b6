//! Dashboard configuration
//!
//! Built-in defaults, optionally overridden by a JSON file, then by
//! environment variables, then by command-line flags. Validation runs once
//! on the merged result.

use crate::error::{ExplorerError, Result};
use crate::loader::DEFAULT_SOURCE_URL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const ENV_SOURCE: &str = "SALARY_EXPLORER_SOURCE";
pub const ENV_FOCUS_ROLE: &str = "SALARY_EXPLORER_FOCUS_ROLE";

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub source: Option<String>,
    pub focus_role: Option<String>,
    pub histogram_bins: Option<usize>,
    pub top_roles: Option<usize>,
    pub table_rows: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// File path or http(s) URL of the CSV source
    pub source: String,

    pub histogram_bins: usize,

    /// Rows in the ranked role table
    pub top_roles: usize,

    /// Role whose per-country mean salary is mapped
    pub focus_role: String,

    /// Fixed colour per company-size category
    pub company_size_colors: BTreeMap<String, String>,

    /// Colour for company sizes missing from `company_size_colors`
    pub fallback_color: String,

    /// Rows of the filtered table shown in text reports
    pub table_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let company_size_colors = [("Pequena", "#dbdf10"), ("Média", "#DA7C03"), ("Grande", "#05502a")]
            .into_iter()
            .map(|(size, color)| (size.to_string(), color.to_string()))
            .collect();

        Self {
            source: DEFAULT_SOURCE_URL.to_string(),
            histogram_bins: 30,
            top_roles: 10,
            focus_role: "Data Analyst".to_string(),
            company_size_colors,
            fallback_color: "#9e9e9e".to_string(),
            table_rows: 20,
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ExplorerError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Merge defaults, the optional JSON file, the environment seen through
    /// `env` and the command-line overrides, in that order, then validate.
    pub fn resolve<F>(file: Option<&Path>, env: F, overrides: &ConfigOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match file {
            Some(path) => Self::read(path)?,
            None => Self::default(),
        };
        config.apply_env_from(env);
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(source) = &overrides.source {
            self.source = source.clone();
        }
        if let Some(role) = &overrides.focus_role {
            self.focus_role = role.clone();
        }
        if let Some(bins) = overrides.histogram_bins {
            self.histogram_bins = bins;
        }
        if let Some(top) = overrides.top_roles {
            self.top_roles = top;
        }
        if let Some(rows) = overrides.table_rows {
            self.table_rows = rows;
        }
    }

    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup(ENV_SOURCE).filter(|s| !s.trim().is_empty()) {
            self.source = source.trim().to_string();
        }
        if let Some(role) = lookup(ENV_FOCUS_ROLE).filter(|s| !s.trim().is_empty()) {
            self.focus_role = role.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            return Err(ExplorerError::Config("histogram_bins must be at least 1".to_string()));
        }
        if self.top_roles == 0 {
            return Err(ExplorerError::Config("top_roles must be at least 1".to_string()));
        }
        if self.source.trim().is_empty() {
            return Err(ExplorerError::Config("source must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn company_size_color(&self, size: &str) -> &str {
        self.company_size_colors
            .get(size)
            .map(String::as_str)
            .unwrap_or(self.fallback_color.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();

        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.top_roles, 10);
        assert_eq!(config.focus_role, "Data Analyst");
        assert_eq!(config.company_size_color("Grande"), "#05502a");
        assert_eq!(config.company_size_color("Gigante"), "#9e9e9e");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{ "focus_role": "Data Scientist", "histogram_bins": 12 }"#).unwrap();

        assert_eq!(config.focus_role, "Data Scientist");
        assert_eq!(config.histogram_bins, 12);
        assert_eq!(config.top_roles, 10);
        assert_eq!(config.company_size_colors.len(), 3);
    }

    #[test]
    fn test_load_rejects_zero_bins() {
        let path = std::env::temp_dir().join("salary_explorer_zero_bins.json");
        std::fs::write(&path, r#"{ "histogram_bins": 0 }"#).unwrap();

        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(matches!(err, ExplorerError::Config(_)));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_env_overrides() {
        let mut config = DashboardConfig::default();
        config.apply_env_from(|key| match key {
            ENV_SOURCE => Some("data/salaries.csv".to_string()),
            ENV_FOCUS_ROLE => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config.source, "data/salaries.csv");
        assert_eq!(config.focus_role, "Data Analyst");
    }

    fn write_config(name: &str, json: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_resolve_precedence() {
        let path = write_config(
            "salary_explorer_resolve_precedence.json",
            r#"{ "focus_role": "Data Engineer", "source": "file.csv", "top_roles": 5, "histogram_bins": 12 }"#,
        );
        let env = |key: &str| match key {
            ENV_FOCUS_ROLE => Some("Data Scientist".to_string()),
            ENV_SOURCE => Some("env.csv".to_string()),
            _ => None,
        };
        let overrides = ConfigOverrides {
            source: Some("cli.csv".to_string()),
            ..ConfigOverrides::default()
        };

        let config = DashboardConfig::resolve(Some(&path), env, &overrides).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.source, "cli.csv");
        assert_eq!(config.focus_role, "Data Scientist");
        assert_eq!(config.top_roles, 5);
        assert_eq!(config.histogram_bins, 12);
        assert_eq!(config.table_rows, 20);
    }

    #[test]
    fn test_resolve_without_file_or_env() {
        let config = DashboardConfig::resolve(None, |_: &str| None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_resolve_validates_merged_result() {
        let path = write_config("salary_explorer_resolve_zero.json", r#"{ "top_roles": 5 }"#);
        let overrides = ConfigOverrides {
            top_roles: Some(0),
            ..ConfigOverrides::default()
        };

        let result = DashboardConfig::resolve(Some(&path), |_: &str| None, &overrides);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ExplorerError::Config(_))));

        let overrides = ConfigOverrides {
            histogram_bins: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(matches!(
            DashboardConfig::resolve(None, |_: &str| None, &overrides),
            Err(ExplorerError::Config(_))
        ));
    }
}
