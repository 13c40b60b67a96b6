use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Command error: {0}")]
    Command(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Table error: {0}")]
    Table(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
