use clap::Parser;
use colored::*;
use tracing::debug;

use skill_utils::cli::{self, Session};
use skill_utils::config::{ThingsConfig, DATABASE_ENV};
use skill_utils::logging;
use skill_utils::url::SystemDispatcher;
use skill_utils::ThingsDatabase;

fn main() {
    let cli = cli::Cli::parse();

    if let Err(e) = logging::init(cli.verbose).and_then(|_| logging::install_interrupt_handler()) {
        eprintln!("{} {:#}", "warning:".yellow(), e);
    }

    let config = ThingsConfig::from_env();
    let dispatcher = SystemDispatcher::new(config.app_name.clone());

    let database = config
        .database_path
        .as_deref()
        .map(ThingsDatabase::open)
        .transpose();

    let mut session = match &database {
        Ok(Some(db)) => Session::new(db, &dispatcher),
        Ok(None) => Session::without_store(missing_database_hint(&config, None), &dispatcher),
        Err(e) => {
            debug!("could not open Things database: {:#}", e);
            Session::without_store(missing_database_hint(&config, Some(e)), &dispatcher)
        }
    };
    session.json = cli.json;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = cli::handle_command(cli.command, &session, &mut out) {
        if e.is_broken_pipe() {
            std::process::exit(0);
        }
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(e.exit_code());
    }
}

fn missing_database_hint(config: &ThingsConfig, error: Option<&anyhow::Error>) -> String {
    let reason = match error {
        Some(e) => format!("{:#}", e),
        None => format!("Things database not found (looked for {})", config.describe_search_location()),
    };
    format!(
        "{}. Install Things 3 or set {} to the path of its main.sqlite.",
        reason, DATABASE_ENV
    )
}
