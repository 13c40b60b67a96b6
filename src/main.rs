use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use salary_explorer::config::{ConfigOverrides, DashboardConfig};
use salary_explorer::dashboard::Dashboard;
use salary_explorer::filter::FilterColumn;
use salary_explorer::loader::DataSource;
use salary_explorer::{report, session, suggest, table};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "salary-explorer")]
#[command(about = "Explore data-field salaries through filters, summary metrics and charts")]
struct Args {
    /// CSV file path or http(s) URL (default: the public salary dataset)
    #[arg(short, long)]
    source: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Years to include (repeatable; default: all observed)
    #[arg(long)]
    year: Vec<String>,

    /// Seniority levels to include (repeatable; default: all observed)
    #[arg(long)]
    seniority: Vec<String>,

    /// Contract types to include (repeatable; default: all observed)
    #[arg(long)]
    contract: Vec<String>,

    /// Company sizes to include (repeatable; default: all observed)
    #[arg(long)]
    company_size: Vec<String>,

    /// Role mapped in the per-country chart
    #[arg(long)]
    focus_role: Option<String>,

    /// Number of salary histogram bins
    #[arg(long)]
    bins: Option<usize>,

    /// Rows in the ranked role chart
    #[arg(long)]
    top_roles: Option<usize>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Rows of the filtered table to print in text output
    #[arg(short, long)]
    rows: Option<usize>,

    /// Write the filtered table to this CSV file
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Start a line-oriented session instead of printing one report
    #[arg(short, long)]
    interactive: bool,
}

fn resolve_config(args: &Args) -> Result<DashboardConfig> {
    let overrides = ConfigOverrides {
        source: args.source.clone(),
        focus_role: args.focus_role.clone(),
        histogram_bins: args.bins,
        top_roles: args.top_roles,
        table_rows: args.rows,
    };
    DashboardConfig::resolve(args.config.as_deref(), |key| std::env::var(key).ok(), &overrides)
        .context("Invalid configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    info!("Salary explorer starting...");
    let source = DataSource::parse(&config.source);
    let records = source
        .load()
        .await
        .with_context(|| format!("Failed to load salary table from {}", source))?;
    let dashboard = Dashboard::new(records, config);

    if args.interactive {
        let stdin = std::io::stdin();
        session::run(&dashboard, stdin.lock(), std::io::stdout())?;
        return Ok(());
    }

    let mut selection = dashboard.default_selection();
    let requested = [
        (FilterColumn::Year, &args.year),
        (FilterColumn::Seniority, &args.seniority),
        (FilterColumn::Contract, &args.contract),
        (FilterColumn::CompanySize, &args.company_size),
    ];
    for (column, values) in requested {
        if values.is_empty() {
            continue;
        }
        for unknown in suggest::unknown_values(dashboard.options(), column, values) {
            warn!("{}", unknown);
        }
        selection.set(column, values)?;
    }

    let view = dashboard.render(&selection);
    match args.format {
        OutputFormat::Text => {
            let text = report::render_text(&view, dashboard.options(), dashboard.config().table_rows)?;
            print!("{}", text);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }

    if let Some(path) = &args.export_csv {
        table::write_csv(&view.rows, path)
            .with_context(|| format!("Failed to export {}", path.display()))?;
    }

    Ok(())
}
