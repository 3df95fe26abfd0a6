use super::config::ConfigError;
use crate::core::flags::FlagsError;
use crate::core::models::toolchain::MissingCompilers;
use crate::core::tools::process::ToolError;
use std::path::PathBuf;
use thiserror::Error;

/// Checks that must hold before anything expensive runs. All of them are fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreconditionFailure {
    #[error("HOME is not set; cannot derive the install destination")]
    MissingHome,

    #[error("No directory {}. Maybe you want to use the --clone flag", dir.display())]
    MissingSourceDirectory { dir: PathBuf },

    #[error("Don't know how to compile on host {host}")]
    UnknownHost { host: String },

    #[error(transparent)]
    MissingCompilers(#[from] MissingCompilers),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Precondition(#[from] PreconditionFailure),

    #[error("Invalid build request: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Flags(#[from] FlagsError),

    #[error("'{command}' failed with {}{}", describe_code(*code), describe_log(log.as_ref()))]
    Delegated {
        command: String,
        code: Option<i32>,
        log: Option<PathBuf>,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("exit status {}", c),
        None => "no exit status (terminated by signal)".to_string(),
    }
}

fn describe_log(log: Option<&PathBuf>) -> String {
    log.map(|p| format!("; see {}", p.display()))
        .unwrap_or_default()
}

impl EngineError {
    pub fn is_precondition(&self) -> bool {
        matches!(self, EngineError::Precondition(_))
    }
}
