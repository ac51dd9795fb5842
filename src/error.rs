use thiserror::Error;

/// Errors that end a CLI invocation. Each variant maps to one exit code.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Unable to detect a supported package manager.")]
    NoPackageManager,

    #[error("{message}")]
    MissingDependency { message: String },

    #[error("{0}")]
    Validation(String),

    #[error("command {index} of {total} failed ({}): {command}", describe_status(.code))]
    CommandFailed {
        index: usize,
        total: usize,
        command: String,
        code: Option<i32>,
    },

    #[error("Interrupted")]
    Interrupted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn validation(message: impl Into<String>) -> Self {
        CliError::Validation(message.into())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NoPackageManager => 1,
            CliError::MissingDependency { .. } => 1,
            CliError::Validation(_) => 2,
            CliError::CommandFailed { code, .. } => match code {
                Some(code) if *code != 0 => *code,
                _ => 1,
            },
            CliError::Interrupted => 130,
            CliError::Other(_) => 1,
        }
    }

    /// True when the error only means stdout went away (e.g. piped into `head`).
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            CliError::Other(err) => err.chain().any(|cause| {
                cause
                    .downcast_ref::<std::io::Error>()
                    .map_or(false, |io| io.kind() == std::io::ErrorKind::BrokenPipe)
            }),
            _ => false,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::Interrupted {
            return CliError::Interrupted;
        }
        CliError::Other(err.into())
    }
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

pub type CliResult<T> = std::result::Result<T, CliError>;
