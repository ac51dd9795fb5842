pub mod args;
pub mod detect;
pub mod packages;

use std::io::Write;

use tracing::debug;

use crate::error::{CliError, CliResult};
use crate::exec::{run_commands, CommandExecutor, RunMode};
use args::InstallArgs;
use detect::{detect_manager, HostFacts, HostProbe};
use packages::{build_install_commands, normalize_utils};

pub use detect::{OsRelease, Platform, SystemProbe};
pub use packages::PackageManager;

/// Host collaborators the installer needs; swapped for fakes in tests.
pub struct InstallContext<'a> {
    pub facts: HostFacts,
    pub probe: &'a dyn HostProbe,
    pub executor: &'a mut dyn CommandExecutor,
}

pub fn handle_install(args: &InstallArgs, ctx: &mut InstallContext, out: &mut dyn Write) -> CliResult<()> {
    let utils = normalize_utils(&args.utils);
    if utils.is_empty() {
        writeln!(out, "No utilities requested.")?;
        return Ok(());
    }

    let missing: Vec<String> = if args.include_installed {
        utils
    } else {
        utils
            .into_iter()
            .filter(|util| {
                let present = ctx.probe.has_executable(util);
                if present {
                    debug!("{} already on PATH, skipping", util);
                }
                !present
            })
            .collect()
    };

    if missing.is_empty() {
        writeln!(out, "All utilities already available.")?;
        return Ok(());
    }

    let manager = detect_manager(&ctx.facts, ctx.probe).ok_or(CliError::NoPackageManager)?;
    let commands = build_install_commands(manager, &missing, !args.no_sudo);

    writeln!(out, "Manager: {}", manager)?;
    writeln!(out, "Utilities: {}", missing.join(", "))?;

    run_commands(
        &commands,
        RunMode::from_apply_flag(args.apply),
        ctx.executor,
        out,
    )
}
