use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "install-utils",
    version,
    about = "Install utilities with an OS-aware package manager (dry-run by default).",
    long_about = None
)]
pub struct InstallArgs {
    /// Utilities to install; repeat values or separate them with commas
    #[arg(long, required = true, num_args = 1..)]
    pub utils: Vec<String>,

    /// Run the install commands instead of printing them
    #[arg(long)]
    pub apply: bool,

    /// Do not prefix commands with sudo
    #[arg(long)]
    pub no_sudo: bool,

    /// Include utilities even if they are already on PATH
    #[arg(long)]
    pub include_installed: bool,

    /// Print debug logging to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
