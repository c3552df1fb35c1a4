//! Command type for building executable commands

use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};
use tracing::debug;

/// A command to be executed
///
/// This is a builder for creating commands that can be converted to
/// `std::process::Command` when needed. Unlike `std::process::Command`,
/// this type is `Clone`, renders to a shell-quoted string for display,
/// and can be reused multiple times.
#[derive(Debug, Clone)]
pub struct Command {
    /// The program to execute
    program: String,
    /// The arguments to pass to the program
    args: Vec<String>,
    /// Environment variables to set, in insertion order
    env: Vec<(String, String)>,
    /// Working directory for the command
    current_dir: Option<PathBuf>,
}

impl Command {
    /// Create a new command for the given program
    pub fn new<S: AsRef<str>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: Vec::new(),
            env: Vec::new(),
            current_dir: None,
        }
    }

    /// Create a command that runs `cmd` through an interactive bash shell
    pub fn shell<S: AsRef<str>>(cmd: S) -> Self {
        let mut command = Command::new("/bin/bash");
        command.arg("-ic").arg(cmd);
        command
    }

    /// Add an argument to the command
    pub fn arg<S: AsRef<str>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Add multiple arguments to the command
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.arg(arg);
        }
        self
    }

    /// Set an environment variable
    pub fn env<K, V>(&mut self, key: K, val: V) -> &mut Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.env
            .push((key.as_ref().to_owned(), val.as_ref().to_owned()));
        self
    }

    /// Set the working directory for the command
    pub fn current_dir<P: AsRef<Path>>(&mut self, dir: P) -> &mut Self {
        self.current_dir = Some(dir.as_ref().to_owned());
        self
    }

    /// Get the program name
    pub fn get_program(&self) -> &str {
        &self.program
    }

    /// Get the arguments
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the environment variables
    pub fn get_envs(&self) -> &[(String, String)] {
        &self.env
    }

    /// Get the current directory
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Prepare this command for execution as a `std::process::Command`
    pub fn prepare(&self) -> StdCommand {
        let mut cmd = StdCommand::new(&self.program);
        cmd.args(&self.args);
        for (key, val) in &self.env {
            cmd.env(key, val);
        }
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run the command and capture its stdout
    ///
    /// A non-zero exit status is an error; stderr passes through to the
    /// terminal.
    pub fn capture(&self) -> Result<String> {
        debug!("capturing output of: {}", self);
        let output = self
            .prepare()
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| Error::Io {
                command: self.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::NonZeroExit {
                command: self.to_string(),
                code: output.status.code().unwrap_or(-1),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| Error::InvalidOutput {
            command: self.to_string(),
        })
    }

    /// Run the command interactively, inheriting stdin/stdout/stderr
    ///
    /// Returns whether the command exited successfully; the caller decides
    /// whether a failure is fatal.
    pub fn run_interactive(&self) -> Result<bool> {
        debug!("running interactively: {}", self);
        let status = self.prepare().status().map_err(|source| Error::Io {
            command: self.to_string(),
            source,
        })?;
        Ok(status.success())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Quote a string for display as part of a shell command line
pub(crate) fn shell_quote(s: &str) -> String {
    if !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@,".contains(c))
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}
