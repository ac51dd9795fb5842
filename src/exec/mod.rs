use std::io::Write;
use std::process::Command as ProcessCommand;

use anyhow::{anyhow, Result};
use colored::*;
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

/// Whether the runner prints the plan or carries it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    DryRun,
    Apply,
}

impl RunMode {
    pub fn from_apply_flag(apply: bool) -> Self {
        if apply {
            RunMode::Apply
        } else {
            RunMode::DryRun
        }
    }
}

/// Runs one argv to completion and reports its exit code.
///
/// `Ok(None)` means the process ended without a code (killed by a signal).
pub trait CommandExecutor {
    fn run(&mut self, argv: &[String]) -> Result<Option<i32>>;
}

/// Spawns real processes with the terminal's stdio, so `sudo` can prompt.
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn run(&mut self, argv: &[String]) -> Result<Option<i32>> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| anyhow!("Cannot run an empty command"))?;

        debug!("spawning {:?}", argv);
        let status = ProcessCommand::new(program)
            .args(args)
            .status()
            .map_err(|e| anyhow!("Failed to start {}: {}", program, e))?;

        Ok(status.code())
    }
}

/// Renders an argv as a single line a shell would accept.
pub fn shell_quote(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| shell_escape::escape(arg.as_str().into()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prints every command as `$ ...`, then runs them in order when applying.
///
/// The first command that exits non-zero stops the sequence; later commands
/// are never started.
pub fn run_commands(
    commands: &[Vec<String>],
    mode: RunMode,
    executor: &mut dyn CommandExecutor,
    out: &mut dyn Write,
) -> CliResult<()> {
    for argv in commands {
        writeln!(out, "{} {}", "$".green().bold(), shell_quote(argv))?;
    }

    if mode == RunMode::DryRun {
        writeln!(out, "Dry-run only. Re-run with --apply to install.")?;
        return Ok(());
    }

    let total = commands.len();
    for (i, argv) in commands.iter().enumerate() {
        let code = executor.run(argv)?;
        if code != Some(0) {
            info!("command {} of {} failed, skipping the rest", i + 1, total);
            return Err(CliError::CommandFailed {
                index: i + 1,
                total,
                command: shell_quote(argv),
                code,
            });
        }
    }

    Ok(())
}
