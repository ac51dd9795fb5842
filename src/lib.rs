pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod exec;
pub mod format;
pub mod install;
pub mod logging;
pub mod url;
pub mod utils;

pub use db::{ThingsDatabase, ThingsStore};
pub use error::{CliError, CliResult};
