//! Source loader
//!
//! Reads the salary table once at startup, either from a local CSV file or
//! over HTTP, and validates it into typed records. Nothing downstream
//! re-checks the schema.

use crate::error::{ExplorerError, Result};
use crate::record::{SalaryRecord, SOURCE_COLUMNS};
use csv::{ReaderBuilder, Trim};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/vqrca/dashboard_salarios_dados/refs/heads/main/dados-imersao-final.csv";

lazy_static! {
    static ref ISO3_CODE: Regex = Regex::new(r"^[A-Z]{3}$").expect("ISO3 pattern compiles");
}

/// Where the salary table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs, anything else is a path
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }

    pub async fn load(&self) -> Result<Vec<SalaryRecord>> {
        match self {
            DataSource::File(path) => read_file(path),
            DataSource::Url(url) => {
                info!("Fetching salary table from {}", url);
                let body = reqwest::get(url.as_str())
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                debug!("Fetched {} bytes", body.len());
                parse_records(body.as_bytes())
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<SalaryRecord>> {
    let path = path.as_ref();
    info!("Reading salary table from {}", path.display());
    let file = std::fs::File::open(path)?;
    parse_records(file)
}

/// Parse and validate CSV text into records.
///
/// Fails on missing required columns, unparsable values and negative or
/// non-finite salaries. Malformed country codes only produce a warning.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<SalaryRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<&str> = SOURCE_COLUMNS
        .iter()
        .filter(|(source, field)| !headers.iter().any(|h| h == *source || h == *field))
        .map(|(source, _)| *source)
        .collect();
    if !missing.is_empty() {
        return Err(ExplorerError::Schema(format!(
            "Missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    let mut bad_countries = 0usize;
    for row in rdr.deserialize::<SalaryRecord>() {
        let record = row?;
        let line = records.len() + 2;

        if !record.usd.is_finite() || record.usd < 0.0 {
            return Err(ExplorerError::Schema(format!(
                "Line {}: salary must be a non-negative number, got {}",
                line, record.usd
            )));
        }
        if !ISO3_CODE.is_match(&record.country_iso3) {
            debug!("Line {}: unexpected country code '{}'", line, record.country_iso3);
            bad_countries += 1;
        }
        records.push(record);
    }

    if bad_countries > 0 {
        warn!("{} record(s) have a country code that is not ISO3", bad_countries);
    }
    info!("Loaded {} salary records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
ano,senioridade,contrato,tamanho_empresa,cargo,salario,usd,remoto,residencia_iso3
2023,Sênior,Integral,Grande,Data Engineer,100000,100000.0,Remoto,USA
2024,Júnior,Integral,Pequena,Data Analyst,250000,50000.0,Presencial,BRA
";

    #[test]
    fn test_parse_records_ignores_extra_columns() {
        let records = parse_records(CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].role, "Data Engineer");
        assert_eq!(records[1].year, 2024);
        assert_eq!(records[1].usd, 50_000.0);
        assert_eq!(records[1].country_iso3, "BRA");
    }

    #[test]
    fn test_parse_records_accepts_english_headers() {
        let csv = "year,seniority,contract,company_size,role,usd,remote,country_iso3\n\
                   2023,Senior,CLT,Grande,A,1.5,Remoto,USA\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0].company_size, "Grande");
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let csv = "ano,senioridade,contrato,cargo,usd,remoto,residencia_iso3\n";
        let err = parse_records(csv.as_bytes()).unwrap_err();

        match err {
            ExplorerError::Schema(msg) => assert!(msg.contains("tamanho_empresa")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let csv = "ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto,residencia_iso3\n\
                   2023,Sênior,Integral,Grande,A,-1,Remoto,USA\n";
        assert!(matches!(parse_records(csv.as_bytes()), Err(ExplorerError::Schema(_))));
    }

    #[test]
    fn test_non_iso3_country_is_kept() {
        let csv = "ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto,residencia_iso3\n\
                   2023,Sênior,Integral,Grande,A,10,Remoto,usa\n\
                   2023,Sênior,Integral,Grande,B,20,Remoto,\n\
                   2023,Sênior,Integral,Grande,C,30,Remoto,BRA\n";
        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].country_iso3, "usa");
        assert_eq!(records[1].country_iso3, "");
        assert_eq!(records[2].country_iso3, "BRA");
        assert!(!ISO3_CODE.is_match(&records[0].country_iso3));
        assert!(!ISO3_CODE.is_match(&records[1].country_iso3));
    }

    #[test]
    fn test_unparsable_year_is_csv_error() {
        let csv = "ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto,residencia_iso3\n\
                   later,Sênior,Integral,Grande,A,10,Remoto,USA\n";
        assert!(matches!(parse_records(csv.as_bytes()), Err(ExplorerError::Csv(_))));
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let csv = "ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto,residencia_iso3\n";
        assert!(parse_records(csv.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse(DEFAULT_SOURCE_URL),
            DataSource::Url(DEFAULT_SOURCE_URL.to_string())
        );
        assert_eq!(
            DataSource::parse(" data/salaries.csv "),
            DataSource::File(PathBuf::from("data/salaries.csv"))
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = std::env::temp_dir().join("salary_explorer_loader_test.csv");
        std::fs::write(&path, CSV).unwrap();

        let records = DataSource::File(path.clone()).load().await.unwrap();
        assert_eq!(records.len(), 2);

        std::fs::remove_file(&path).ok();
    }
}
