pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod loader;
pub mod presentation;
pub mod record;
pub mod report;
pub mod session;
pub mod suggest;
pub mod table;

pub use dashboard::{Dashboard, DashboardView};
pub use error::{ExplorerError, Result};
pub use filter::{FilterColumn, FilterOptions, FilterSelection};
pub use record::SalaryRecord;
