use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open log file {path}: {source}", path = path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One external program run: what, where, and where its output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: &str, cwd: &Path) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            log_file: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Redirects both stdout and stderr into `path`, truncating it first.
    pub fn log_to(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    /// Shell-quoted rendering for logs and error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quotes `word` only when a shell would otherwise split or expand it, so plain
/// `-DNAME=VALUE` arguments stay readable.
pub(crate) fn quote(word: &str) -> String {
    if !word.is_empty() && !word.chars().any(needs_quoting) {
        return word.to_string();
    }
    shlex::try_quote(word)
        .map(|q| q.into_owned())
        .unwrap_or_else(|_| word.to_string())
}

fn needs_quoting(c: char) -> bool {
    c.is_whitespace() || "'\"\\$`;&|<>()*?[]{}!#~".contains(c)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolOutcome {
    pub code: Option<i32>, // None when terminated by a signal
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait ToolRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutcome, ToolError>;
}

/// Runs invocations as real child processes and waits for each to finish.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutcome, ToolError> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).current_dir(&invocation.cwd);

        if let Some(path) = &invocation.log_file {
            let log_err = |source| ToolError::LogFile {
                path: path.clone(),
                source,
            };
            let stdout = File::create(path).map_err(log_err)?;
            let stderr = stdout.try_clone().map_err(log_err)?;
            command
                .stdout(Stdio::from(stdout))
                .stderr(Stdio::from(stderr));
        }

        debug!(
            cwd = %invocation.cwd.display(),
            "spawning: {}",
            invocation.command_line()
        );

        let status = command.status().map_err(|source| ToolError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        debug!(code = ?status.code(), "{} finished", invocation.program);
        Ok(ToolOutcome {
            code: status.code(),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Records every invocation instead of running it. Exit codes can be scripted per
    /// program name; anything unscripted succeeds.
    #[derive(Default)]
    pub(crate) struct RecordingRunner {
        pub(crate) calls: RefCell<Vec<Invocation>>,
        codes: HashMap<String, i32>,
    }

    impl RecordingRunner {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn failing(mut self, program: &str, code: i32) -> Self {
            self.codes.insert(program.to_string(), code);
            self
        }

        pub(crate) fn programs(&self) -> Vec<String> {
            self.calls
                .borrow()
                .iter()
                .map(|c| format!("{} {}", c.program, c.args.first().cloned().unwrap_or_default()))
                .collect()
        }
    }

    impl ToolRunner for RecordingRunner {
        fn run(&self, invocation: &Invocation) -> Result<ToolOutcome, ToolError> {
            self.calls.borrow_mut().push(invocation.clone());
            Ok(ToolOutcome {
                code: Some(*self.codes.get(&invocation.program).unwrap_or(&0)),
            })
        }
    }
}
