use super::error::EngineError;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use tracing::{debug, trace};

/// A program and its arguments, independent of `std::process::Command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for a in args {
            self = self.arg(a);
        }
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for a in &self.args {
            write!(f, " {}", a.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Files the captured output of every subprocess of an evaluation is appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessLogs {
    pub stdout: PathBuf,
    pub stderr: PathBuf,
}

impl ProcessLogs {
    /// `<prefix>_stdout.txt` and `<prefix>_stderr.txt` inside `dir`.
    pub fn in_dir(dir: &Path, prefix: &str) -> Self {
        Self {
            stdout: dir.join(format!("{}_stdout.txt", prefix)),
            stderr: dir.join(format!("{}_stderr.txt", prefix)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

fn append_log(path: &Path, text: &str) -> Result<(), EngineError> {
    let io_err = |source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    file.write_all(text.as_bytes()).map_err(io_err)
}

/// Runs `command` to completion and appends its output to `logs`.
///
/// `stdin`, when given, is written to the child's standard input. A non-zero exit
/// status is returned as [`EngineError::ProcessFailed`] pointing at the stderr log.
pub fn run_subprocess(
    command: &CommandLine,
    logs: &ProcessLogs,
    stdin: Option<&str>,
    working_dir: Option<&Path>,
) -> Result<ProcessOutput, EngineError> {
    debug!("Running `{}`", command);
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|source| EngineError::Spawn {
        program: command.program.clone(),
        source,
    })?;

    // stdin is written while stdout/stderr are drained.
    let writer = match (stdin, child.stdin.take()) {
        (Some(input), Some(mut pipe)) => {
            let input = input.to_owned();
            Some(thread::spawn(move || pipe.write_all(input.as_bytes())))
        }
        _ => None,
    };

    let output = child.wait_with_output().map_err(|source| EngineError::Spawn {
        program: command.program.clone(),
        source,
    })?;

    if let Some(handle) = writer {
        match handle.join() {
            Ok(Err(e)) => trace!("'{}' closed stdin early: {}", command.program, e),
            Err(_) => trace!("stdin writer for '{}' panicked", command.program),
            Ok(Ok(())) => {}
        }
    }

    let result = ProcessOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    append_log(&logs.stdout, &result.stdout)?;
    append_log(&logs.stderr, &result.stderr)?;

    if !output.status.success() {
        return Err(EngineError::ProcessFailed {
            program: command.to_string(),
            code: result.code,
            stderr_log: logs.stderr.clone(),
        });
    }
    debug!("`{}` finished with status {:?}", command.program, result.code);
    Ok(result)
}

/// Resolves `program` against `PATH` (or checks it directly when it is a path).
pub fn locate(program: &str) -> Result<PathBuf, EngineError> {
    which::which(program).map_err(|_| EngineError::MissingExecutable {
        program: program.to_string(),
    })
}

pub fn is_available(program: &str) -> bool {
    which::which(program).is_ok()
}
