use clap::Parser;
use colored::*;

use skill_utils::exec::SystemExecutor;
use skill_utils::install::args::InstallArgs;
use skill_utils::install::detect::HostFacts;
use skill_utils::install::{handle_install, InstallContext, SystemProbe};
use skill_utils::logging;

fn main() {
    let args = InstallArgs::parse();

    if let Err(e) = logging::init(args.verbose).and_then(|_| logging::install_interrupt_handler()) {
        eprintln!("{} {:#}", "warning:".yellow(), e);
    }

    let mut executor = SystemExecutor;
    let mut ctx = InstallContext {
        facts: HostFacts::gather(),
        probe: &SystemProbe,
        executor: &mut executor,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = handle_install(&args, &mut ctx, &mut out) {
        if e.is_broken_pipe() {
            std::process::exit(0);
        }
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}
