//! Handing a built invocation to the operating system.
//!
//! These helpers only translate a [`Command`] into a
//! [`std::process::Command`] and run it in the three usual ways. Timeouts,
//! signals, and output streaming are left to the caller.

use std::process::{self, Child, ExitStatus, Stdio};

use tracing::debug;

use crate::Command;
use crate::error::{CommandError, ProcessError};

impl Command {
    /// Builds a [`std::process::Command`] with the program, arguments, and
    /// environment of this invocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_mapper_core::*;
    ///
    /// let schema = CommandSchema::builder("echo")
    ///     .argument(ArgumentSchema::new("words").repeats())
    ///     .build()
    ///     .unwrap();
    /// let mut echo = Command::new(schema).with_env("LANG", "C");
    /// echo.set_argument("words", vec!["hello", "world"]).unwrap();
    ///
    /// let process = echo.to_process().unwrap();
    /// assert_eq!(process.get_program(), "echo");
    /// assert_eq!(process.get_args().collect::<Vec<_>>(), vec!["hello", "world"]);
    /// ```
    pub fn to_process(&self) -> Result<process::Command, CommandError> {
        let argv = self.argv()?;
        let mut process = process::Command::new(&argv[0]);
        process.args(&argv[1..]);
        process.envs(self.env());
        Ok(process)
    }

    /// Runs the command to completion with inherited stdio.
    pub fn run(&self) -> Result<ExitStatus, ProcessError> {
        let mut process = self.to_process()?;
        debug!(command = %self.name(), "Running command");
        Ok(process.status()?)
    }

    /// Runs the command to completion and returns its standard output.
    pub fn capture(&self) -> Result<String, ProcessError> {
        let mut process = self.to_process()?;
        debug!(command = %self.name(), "Capturing command output");
        let output = process.stderr(Stdio::inherit()).output()?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Starts the command and returns the live child handle.
    pub fn spawn(&self) -> Result<Child, ProcessError> {
        let mut process = self.to_process()?;
        debug!(command = %self.name(), "Spawning command");
        Ok(process.spawn()?)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use crate::{ArgumentSchema, Command, CommandSchema, ProcessError};

    fn echo() -> Command {
        let schema = CommandSchema::builder("echo")
            .argument(ArgumentSchema::new("words").repeats())
            .build()
            .unwrap();
        Command::new(schema)
    }

    #[test]
    fn test_capture_echo() {
        let mut echo = echo();
        echo.set_argument("words", vec!["hello", "there"]).unwrap();
        assert_eq!(echo.capture().unwrap(), "hello there\n");
    }

    #[test]
    fn test_run_reports_argument_errors() {
        let err = echo().run().unwrap_err();
        assert!(matches!(err, ProcessError::Command(_)));
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let mut echo = echo().with_path("/nonexistent/bin/echo");
        echo.set_argument("words", "x").unwrap();
        assert!(matches!(echo.spawn().unwrap_err(), ProcessError::Io(_)));
    }
}
