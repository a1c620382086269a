//! Typed external command construction and execution.
//!
//! Every packaging, signing and notarization step is expressed as a
//! [`ToolCommand`] and executed through a [`CommandRunner`], so the whole
//! pipeline has exactly one place where processes are spawned and where a
//! non-zero exit turns into an error.

use crate::bundler::{
    Error, Result,
    builder::tool_detection::resolve_tool,
};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// An external command: program plus ordered argument tokens.
///
/// Arguments are appended explicitly, so optional flags are plain
/// conditional calls rather than string templating.
///
/// # Examples
///
/// ```
/// use kodegen_bundler_pkg::bundler::ToolCommand;
///
/// let scripts: Option<&str> = None;
/// let mut cmd = ToolCommand::new("pkgbuild");
/// cmd.arg("--root").arg("build/pkg/root");
/// if let Some(scripts) = scripts {
///     cmd.arg("--scripts").arg(scripts);
/// }
/// assert_eq!(cmd.to_string(), "pkgbuild --root build/pkg/root");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
    redacted: Vec<usize>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    /// Starts a command for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            redacted: Vec::new(),
            timeout: None,
        }
    }

    /// Appends one argument.
    pub fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.arg(arg);
        }
        self
    }

    /// Appends an argument that is masked in logs and error messages.
    pub fn secret_arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.redacted.push(self.args.len());
        self.arg(arg)
    }

    /// Bounds how long the command may run.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    /// Program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments in order.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Time bound, if any.
    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// True if `flag` appears as an argument.
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    /// The argument following `flag`, if present.
    pub fn value_of(&self, flag: &str) -> Option<&OsStr> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(OsString::as_os_str)
    }

    /// The last argument (output path for the packaging tools).
    pub fn last_arg(&self) -> Option<&OsStr> {
        self.args.last().map(OsString::as_os_str)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for (i, arg) in self.args.iter().enumerate() {
            if self.redacted.contains(&i) {
                f.write_str(" ****")?;
                continue;
            }
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured output of a successful command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

/// Runs external commands, failing on non-zero exit.
///
/// [`SystemRunner`] is the real implementation. Tests substitute a recording
/// runner to observe the exact command sequence.
pub trait CommandRunner {
    /// Runs `command` to completion.
    ///
    /// # Errors
    ///
    /// - [`Error::ToolNotFound`] if the program cannot be located
    /// - [`Error::CommandSpawn`] if the process cannot be started
    /// - [`Error::CommandTimeout`] if the command exceeds its time bound
    /// - [`Error::CommandFailed`] if the command exits unsuccessfully
    fn run(&self, command: &ToolCommand) -> impl Future<Output = Result<CommandOutput>> + Send;
}

/// Runs commands as child processes of the current process.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, command: &ToolCommand) -> Result<CommandOutput> {
        let program = resolve_tool(command.program())?;
        log::debug!("Running: {}", command);

        let mut child = tokio::process::Command::new(&program);
        child.args(command.get_args()).kill_on_drop(true);

        let output = match command.get_timeout() {
            Some(limit) => tokio::time::timeout(limit, child.output())
                .await
                .map_err(|_| Error::CommandTimeout {
                    command: command.to_string(),
                    timeout: limit,
                })?,
            None => child.output().await,
        }
        .map_err(|error| Error::CommandSpawn {
            command: command.to_string(),
            error,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        for line in stdout.lines() {
            log::debug!("{}: {}", command.program(), line);
        }

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: command.to_string(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_and_redacts() {
        let mut cmd = ToolCommand::new("xcrun");
        cmd.args(["notarytool", "submit", "My App.pkg", "--password"])
            .secret_arg("hunter2");
        assert_eq!(
            cmd.to_string(),
            "xcrun notarytool submit \"My App.pkg\" --password ****"
        );
    }

    #[test]
    fn test_value_of_and_last_arg() {
        let mut cmd = ToolCommand::new("productbuild");
        cmd.args(["--version", "1.0", "--resources", "res", "out.pkg"]);
        assert_eq!(cmd.value_of("--version"), Some(OsStr::new("1.0")));
        assert_eq!(cmd.value_of("--sign"), None);
        assert!(cmd.has_arg("--resources"));
        assert_eq!(cmd.last_arg(), Some(OsStr::new("out.pkg")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_reports_failure() {
        let mut cmd = ToolCommand::new("sh");
        cmd.args(["-c", "echo boom >&2; exit 3"]);
        let err = SystemRunner.run(&cmd).await.unwrap_err();
        match err {
            Error::CommandFailed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_enforces_timeout() {
        let mut cmd = ToolCommand::new("sleep");
        cmd.arg("5").timeout(Duration::from_millis(100));
        let err = SystemRunner.run(&cmd).await.unwrap_err();
        assert!(matches!(err, Error::CommandTimeout { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_captures_stdout() {
        let mut cmd = ToolCommand::new("sh");
        cmd.args(["-c", "echo '{\"status\":\"Accepted\"}'"]);
        let output = SystemRunner.run(&cmd).await.unwrap();
        assert_eq!(output.stdout.trim(), "{\"status\":\"Accepted\"}");
    }
}
