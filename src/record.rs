//! Salary Record - one employment observation from the source table

use serde::{Deserialize, Serialize};

/// Source headers and the record field each one maps to.
///
/// The dataset ships with Portuguese headers; the English field names are
/// accepted as well so exported frames and hand-written fixtures both load.
pub const SOURCE_COLUMNS: [(&str, &str); 8] = [
    ("ano", "year"),
    ("senioridade", "seniority"),
    ("contrato", "contract"),
    ("tamanho_empresa", "company_size"),
    ("cargo", "role"),
    ("usd", "usd"),
    ("remoto", "remote"),
    ("residencia_iso3", "country_iso3"),
];

/// A single salary observation. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    #[serde(alias = "ano")]
    pub year: i32,

    #[serde(alias = "senioridade")]
    pub seniority: String,

    #[serde(alias = "contrato")]
    pub contract: String,

    #[serde(alias = "tamanho_empresa")]
    pub company_size: String,

    #[serde(alias = "cargo")]
    pub role: String,

    /// Annual salary in USD
    pub usd: f64,

    #[serde(alias = "remoto")]
    pub remote: String,

    #[serde(alias = "residencia_iso3")]
    pub country_iso3: String,
}

impl SalaryRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        seniority: impl Into<String>,
        contract: impl Into<String>,
        company_size: impl Into<String>,
        role: impl Into<String>,
        usd: f64,
        remote: impl Into<String>,
        country_iso3: impl Into<String>,
    ) -> Self {
        Self {
            year,
            seniority: seniority.into(),
            contract: contract.into(),
            company_size: company_size.into(),
            role: role.into(),
            usd,
            remote: remote.into(),
            country_iso3: country_iso3.into(),
        }
    }
}
