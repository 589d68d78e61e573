use crate::error::{CliError, Result};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Console verbosity. `-q` silences everything, each `-v` opens one more level.
fn console_level(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// The log file always keeps engine command lines (logged at DEBUG), even when
/// the console is quiet.
fn file_level(verbosity: u8) -> LevelFilter {
    if verbosity >= 3 {
        LevelFilter::TRACE
    } else {
        LevelFilter::DEBUG
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(CliError::Io)
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(open_log_file(path)?)
                .with_ansi(false)
                .with_target(true)
                .with_filter(file_level(verbosity)),
        ),
        None => None,
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .with_filter(console_level(verbosity, quiet));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
