use crate::core::energy::EnergyError;
use crate::core::io::mdout::MdoutError;
use crate::core::io::xvg::XvgError;
use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unable to find executable '{program}' on PATH")]
    MissingExecutable { program: String },

    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "'{program}' exited with {}; see {}",
        code.map_or_else(|| "a signal".to_string(), |c| format!("status {}", c)),
        stderr_log.display()
    )]
    ProcessFailed {
        program: String,
        code: Option<i32>,
        stderr_log: PathBuf,
    },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse GROMACS output '{}': {source}", path.display())]
    Xvg {
        path: PathBuf,
        #[source]
        source: XvgError,
    },

    #[error("Failed to parse AMBER output '{}': {source}", path.display())]
    Mdout {
        path: PathBuf,
        #[source]
        source: MdoutError,
    },

    #[error(transparent)]
    Energy(#[from] EnergyError),

    #[error("Invalid input set: {0}")]
    Input(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
