use crate::audit::AuditLogger;
use crate::config::GitConfig;
use crate::error::{GitError, GitResult};
use std::fmt;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

/// A git subcommand and its arguments
///
/// Arguments are handed to the process as-is; nothing goes through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    verb: String,
    args: Vec<String>,
}

impl GitCommand {
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            args: Vec::new(),
        }
    }

    /// Parse a whitespace separated command line such as `"fetch origin --tags"`.
    ///
    /// The command string should not include the "git" prefix.
    pub fn parse(command: &str) -> GitResult<Self> {
        let mut parts = command.split_whitespace();
        let verb = parts
            .next()
            .ok_or_else(|| GitError::InvalidCommand("Empty command".to_string()))?;

        Ok(Self::new(verb).args(parts))
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

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Render the full command line as it runs against `cwd`
    pub fn command_line(&self, cwd: Option<&Path>) -> String {
        match cwd {
            Some(dir) => format!(
                "git -C {} {}",
                quote(&dir.display().to_string()),
                self.tail()
            ),
            None => format!("git {}", self.tail()),
        }
    }

    fn tail(&self) -> String {
        std::iter::once(self.verb.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", self.tail())
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(char::is_whitespace) {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

/// Runs git commands and hands back their output lines
///
/// `cwd` binds the command to a directory (`git -C <cwd>`); `None` runs it in
/// the process working directory. A non-zero exit must surface as
/// [`GitError::CommandFailed`] carrying the combined output.
pub trait CommandRunner {
    fn run(&self, command: &GitCommand, cwd: Option<&Path>) -> GitResult<Vec<String>>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &GitCommand, cwd: Option<&Path>) -> GitResult<Vec<String>> {
        (**self).run(command, cwd)
    }
}

/// Executes git commands as child processes
#[derive(Debug, Clone, Default)]
pub struct GitExecutor {
    config: GitConfig,
    audit: Option<AuditLogger>,
}

impl GitExecutor {
    /// Create a GitExecutor with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GitConfig) -> Self {
        Self {
            config,
            audit: None,
        }
    }

    /// Record every executed command in `logger`
    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn config(&self) -> &GitConfig {
        &self.config
    }

    /// Execute a git command and return its combined stdout/stderr lines
    pub fn execute(&self, command: &GitCommand, cwd: Option<&Path>) -> GitResult<Vec<String>> {
        if command.verb().trim().is_empty() {
            return Err(GitError::InvalidCommand("Empty command".to_string()));
        }

        let mut cmd = self.build(command, cwd);

        // Both streams share one pipe so the output keeps git's own ordering
        let (mut reader, writer) = io::pipe()?;
        cmd.stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);

        let mut child = cmd
            .spawn()
            .map_err(|e| GitError::Spawn(format!("{}: {}", self.config.binary, e)))?;
        // The parent's copies of the write end must be closed before reading
        drop(cmd);

        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        let status = child.wait()?;

        if self.config.settle_delay_micros > 0 {
            thread::sleep(Duration::from_micros(self.config.settle_delay_micros));
        }

        self.process_output(&raw, status, command, cwd)
    }

    fn build(&self, command: &GitCommand, cwd: Option<&Path>) -> Command {
        let mut cmd = Command::new(&self.config.binary);
        if let Some(dir) = cwd {
            cmd.arg("-C").arg(dir);
        }
        cmd.arg(command.verb()).args(command.arguments());

        #[cfg(unix)]
        cmd.env("LC_ALL", &self.config.locale);

        cmd
    }

    /// Turn raw process output into lines, failing on a non-zero exit
    fn process_output(
        &self,
        raw: &[u8],
        status: ExitStatus,
        command: &GitCommand,
        cwd: Option<&Path>,
    ) -> GitResult<Vec<String>> {
        let text = String::from_utf8_lossy(raw);
        let exit_code = status.code().unwrap_or(-1);

        if let Some(logger) = &self.audit {
            // Audit failures never fail the command itself
            if let Err(e) = logger.log_command(
                &command.to_string(),
                cwd.unwrap_or_else(|| Path::new(".")),
                exit_code,
            ) {
                eprintln!(
                    "Warning: could not write {}: {}",
                    logger.log_path().display(),
                    e
                );
            }
        }

        if !status.success() {
            return Err(GitError::CommandFailed {
                command: command.command_line(cwd),
                output: text.trim_end().to_string(),
                exit_code,
            });
        }

        Ok(text.lines().map(str::to_string).collect())
    }
}

impl CommandRunner for GitExecutor {
    fn run(&self, command: &GitCommand, cwd: Option<&Path>) -> GitResult<Vec<String>> {
        self.execute(command, cwd)
    }
}
