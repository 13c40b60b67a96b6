//! Interactive session
//!
//! Line-oriented control surface for the four filters. Every command that
//! changes the selection re-renders the whole dashboard.

use crate::dashboard::{Dashboard, DashboardView};
use crate::error::{ExplorerError, Result};
use crate::filter::{FilterColumn, FilterSelection};
use crate::report;
use crate::suggest::{self, UnknownValue};
use crate::table;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "salary-explorer", no_binary_name = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Replace the allowed values of a column (no values selects nothing)
    Set {
        column: FilterColumn,
        values: Vec<String>,
    },
    /// Allow more values in a column
    Add {
        column: FilterColumn,
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Disallow values in a column
    Remove {
        column: FilterColumn,
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Allow no values in a column
    Clear { column: FilterColumn },
    /// Select every observed value again, in one column or all of them
    Reset { column: Option<FilterColumn> },
    /// List the observed values of each column
    Options,
    /// Render the dashboard for the current selection
    Show,
    /// Print rows of the filtered table
    Table { rows: Option<usize> },
    /// Write the filtered table to a CSV file
    Export { path: PathBuf },
    /// Print the dashboard as JSON
    Json,
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Output(String),
    Quit,
}

pub struct Session<'a> {
    dashboard: &'a Dashboard,
    selection: FilterSelection,
}

impl<'a> Session<'a> {
    pub fn new(dashboard: &'a Dashboard) -> Self {
        Self {
            dashboard,
            selection: dashboard.default_selection(),
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn execute(&mut self, line: &str) -> Result<Outcome> {
        let args = shlex::split(line).ok_or_else(|| ExplorerError::Command("Invalid quoting".to_string()))?;
        let parsed = match SessionLine::try_parse_from(args) {
            Ok(parsed) => parsed,
            Err(e) if matches!(
                e.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
            {
                return Ok(Outcome::Output(e.to_string()));
            }
            Err(e) => return Err(ExplorerError::Command(e.to_string())),
        };

        match parsed.command {
            SessionCommand::Set { column, values } => {
                let hints = self.hints(column, &values);
                self.selection.set(column, &values)?;
                self.refresh(hints)
            }
            SessionCommand::Add { column, values } => {
                let hints = self.hints(column, &values);
                self.selection.add(column, &values)?;
                self.refresh(hints)
            }
            SessionCommand::Remove { column, values } => {
                self.selection.remove(column, &values)?;
                self.refresh(Vec::new())
            }
            SessionCommand::Clear { column } => {
                self.selection.clear(column);
                self.refresh(Vec::new())
            }
            SessionCommand::Reset { column } => {
                match column {
                    Some(column) => self.selection.reset(column, self.dashboard.options()),
                    None => self.selection = self.dashboard.default_selection(),
                }
                self.refresh(Vec::new())
            }
            SessionCommand::Options => Ok(Outcome::Output(self.describe_options())),
            SessionCommand::Show => self.refresh(Vec::new()),
            SessionCommand::Table { rows } => {
                let view = self.view();
                let rows = rows.unwrap_or(self.dashboard.config().table_rows);
                let frame = table::preview(&view.rows, rows)?;
                Ok(Outcome::Output(format!("{} matching rows\n{}", view.rows.len(), frame)))
            }
            SessionCommand::Export { path } => {
                let view = self.view();
                table::write_csv(&view.rows, &path)?;
                Ok(Outcome::Output(format!(
                    "Exported {} rows to {}",
                    view.rows.len(),
                    path.display()
                )))
            }
            SessionCommand::Json => Ok(Outcome::Output(serde_json::to_string_pretty(&self.view())?)),
            SessionCommand::Quit => Ok(Outcome::Quit),
        }
    }

    fn view(&self) -> DashboardView {
        self.dashboard.render(&self.selection)
    }

    fn hints(&self, column: FilterColumn, values: &[String]) -> Vec<UnknownValue> {
        suggest::unknown_values(self.dashboard.options(), column, values)
    }

    fn refresh(&self, hints: Vec<UnknownValue>) -> Result<Outcome> {
        let mut out = String::new();
        for hint in &hints {
            warn!("{}", hint);
            out.push_str(&format!("warning: {}\n", hint));
        }
        out.push_str(&report::render_text(&self.view(), self.dashboard.options(), 0)?);
        Ok(Outcome::Output(out))
    }

    fn describe_options(&self) -> String {
        let options = self.dashboard.options();
        FilterColumn::ALL
            .iter()
            .map(|&column| format!("{}: {}", column, options.values(column).join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Run a session over `input` until `quit` or end of input
pub fn run<R: BufRead, W: Write>(dashboard: &Dashboard, input: R, mut out: W) -> Result<()> {
    info!("Starting interactive session");
    let mut session = Session::new(dashboard);

    if let Outcome::Output(text) = session.execute("show")? {
        write!(out, "{}", text)?;
    }
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            match session.execute(line) {
                Ok(Outcome::Quit) => break,
                Ok(Outcome::Output(text)) => writeln!(out, "{}", text)?,
                Err(err) => writeln!(out, "{}", err)?,
            }
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}
