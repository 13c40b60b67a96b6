//! Tabular form of the Filtered View, for display and CSV export.
//!
//! Columns keep the source headers so an exported file loads back as a source.

use crate::error::Result;
use crate::filter::FilterColumn;
use crate::record::SalaryRecord;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

fn strings<F>(records: &[SalaryRecord], field: F) -> Vec<String>
where
    F: Fn(&SalaryRecord) -> &str,
{
    records.iter().map(|r| field(r).to_string()).collect()
}

pub fn to_frame(records: &[SalaryRecord]) -> Result<DataFrame> {
    let years: Vec<i32> = records.iter().map(|r| r.year).collect();
    let usd: Vec<f64> = records.iter().map(|r| r.usd).collect();

    let df = DataFrame::new(vec![
        Series::new(FilterColumn::Year.header(), years),
        Series::new(FilterColumn::Seniority.header(), strings(records, |r| r.seniority.as_str())),
        Series::new(FilterColumn::Contract.header(), strings(records, |r| r.contract.as_str())),
        Series::new(FilterColumn::CompanySize.header(), strings(records, |r| r.company_size.as_str())),
        Series::new("cargo", strings(records, |r| r.role.as_str())),
        Series::new("usd", usd),
        Series::new("remoto", strings(records, |r| r.remote.as_str())),
        Series::new("residencia_iso3", strings(records, |r| r.country_iso3.as_str())),
    ])?;
    Ok(df)
}

/// First `rows` records as a frame
pub fn preview(records: &[SalaryRecord], rows: usize) -> Result<DataFrame> {
    to_frame(&records[..rows.min(records.len())])
}

pub fn write_csv(records: &[SalaryRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut df = to_frame(records)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    info!("Exported {} rows to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;

    fn records() -> Vec<SalaryRecord> {
        vec![
            SalaryRecord::new(2023, "Sênior", "Integral", "Grande", "Data Engineer", 100_000.0, "Remoto", "USA"),
            SalaryRecord::new(2024, "Júnior", "Integral", "Média", "Data Analyst", 52_500.5, "Híbrido", "BRA"),
        ]
    }

    #[test]
    fn test_frame_uses_source_headers() {
        let df = to_frame(&records()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names(),
            vec!["ano", "senioridade", "contrato", "tamanho_empresa", "cargo", "usd", "remoto", "residencia_iso3"]
        );
    }

    #[test]
    fn test_preview_clamps_rows() {
        assert_eq!(preview(&records(), 1).unwrap().height(), 1);
        assert_eq!(preview(&records(), 50).unwrap().height(), 2);
        assert_eq!(preview(&[], 5).unwrap().height(), 0);
    }

    #[test]
    fn test_exported_csv_loads_back() {
        let path = std::env::temp_dir().join("salary_explorer_table_export.csv");
        write_csv(&records(), &path).unwrap();

        let loaded = loader::read_file(&path).unwrap();
        assert_eq!(loaded, records());

        std::fs::remove_file(&path).ok();
    }
}
