//! Running external commands (git, mostly) and collecting their output.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Options for a single command invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Expected-to-fail probe: failures are logged at debug level only
    pub silent: bool,
    /// Extra environment variables for the child process
    pub env: Vec<(String, String)>,
}

impl RunOptions {
    /// Options for probe calls whose failure is an answer, not an error
    #[must_use]
    pub const fn silent() -> Self {
        Self {
            silent: true,
            env: Vec::new(),
        }
    }

    /// Add an environment variable
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    /// Whether the process exited with status 0
    pub success: bool,
    /// Stdout lines followed by stderr lines
    pub lines: Vec<String>,
}

impl Output {
    /// Successful output with the given lines
    #[must_use]
    pub fn ok<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            success: true,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Failed output with the given lines
    #[must_use]
    pub fn failed<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            success: false,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines on success, [`Error::Process`] labelled `label` otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if the command exited unsuccessfully
    pub fn into_result(self, label: &str) -> Result<Vec<String>> {
        if self.success {
            Ok(self.lines)
        } else {
            Err(Error::Process {
                label: label.to_string(),
                lines: self.lines,
            })
        }
    }

    /// First non-empty line, trimmed
    #[must_use]
    pub fn first_line(&self) -> Option<&str> {
        self.lines
            .iter()
            .map(|line| line.trim())
            .find(|line| !line.is_empty())
    }
}

/// Something that can run a version-control command
///
/// `args` never include the program name; the executor decides which binary
/// runs them. Failing to start the process is an `Err`; a non-zero exit is
/// `Ok` with `success == false`.
pub trait Executor: std::fmt::Debug {
    /// Run a command to completion
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started
    fn run(&self, args: &[&str], options: &RunOptions) -> Result<Output>;
}

impl<T: Executor + ?Sized> Executor for &T {
    fn run(&self, args: &[&str], options: &RunOptions) -> Result<Output> {
        (**self).run(args, options)
    }
}

impl<T: Executor + ?Sized> Executor for Arc<T> {
    fn run(&self, args: &[&str], options: &RunOptions) -> Result<Output> {
        (**self).run(args, options)
    }
}

/// Executor shareable with worker threads
pub type SharedExecutor = Arc<dyn Executor + Send + Sync>;

/// Runs the `git` binary inside a working directory
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    workdir: PathBuf,
}

impl GitCli {
    /// Run `git` in the given working directory
    #[must_use]
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: "git".to_string(),
            workdir: workdir.into(),
        }
    }

    /// Use a different binary (tests point this at stubs)
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, args: &[&str], options: &RunOptions) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            // Never block on a credential prompt; there is no terminal to answer it.
            .env("GIT_TERMINAL_PROMPT", "0");
        for (key, value) in &options.env {
            command.env(key, value);
        }
        command
    }
}

impl Executor for GitCli {
    fn run(&self, args: &[&str], options: &RunOptions) -> Result<Output> {
        debug!(program = %self.program, ?args, "Running command");

        let output = self
            .command(args, options)
            .output()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let lines: Vec<String> = stdout
            .lines()
            .chain(stderr.lines())
            .map(str::to_string)
            .collect();
        let success = output.status.success();

        if !success {
            if options.silent {
                debug!(?args, status = ?output.status.code(), "Probe returned non-zero");
            } else {
                warn!(
                    ?args,
                    status = ?output.status.code(),
                    output = %lines.join("\n"),
                    "Command failed"
                );
            }
        }

        Ok(Output { success, lines })
    }
}

/// Run a command on a worker thread and deliver the result as a message
///
/// `wrap` turns the result into whatever message type the receiving event
/// loop drains, so completions are applied on that loop and never race with
/// other state changes.
pub fn spawn<E, T, F>(
    executor: E,
    args: Vec<String>,
    options: RunOptions,
    sender: Sender<T>,
    wrap: F,
) -> JoinHandle<()>
where
    E: Executor + Send + 'static,
    T: Send + 'static,
    F: FnOnce(Result<Output>) -> T + Send + 'static,
{
    std::thread::spawn(move || {
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        let result = executor.run(&argv, &options);
        if sender.send(wrap(result)).is_err() {
            debug!(?args, "Receiver gone before command finished");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::ScriptedExecutor;
    use std::sync::mpsc;
    use tempfile::TempDir;

    #[test]
    fn test_git_cli_reports_success_and_lines() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let git = GitCli::new(temp.path());
        let output = git.run(&["--version"], &RunOptions::default())?;
        assert!(output.success);
        assert!(output.first_line().is_some_and(|l| l.starts_with("git version")));
        Ok(())
    }

    #[test]
    fn test_git_cli_nonzero_exit_is_not_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let git = GitCli::new(temp.path());
        // Not a repository, so rev-parse exits non-zero
        let output = git.run(&["rev-parse", "--git-dir"], &RunOptions::silent())?;
        assert!(!output.success);
        assert!(!output.lines.is_empty());
        Ok(())
    }

    #[test]
    fn test_git_cli_missing_binary_is_spawn_error() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let git = GitCli::new(temp.path()).with_program("rejoin-no-such-binary");
        let result = git.run(&["status"], &RunOptions::default());
        assert!(matches!(result, Err(Error::Spawn { .. })));
        Ok(())
    }

    #[test]
    fn test_spawn_delivers_result_through_channel() -> Result<(), Box<dyn std::error::Error>> {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond(&["status"], Output::ok(["clean"]));

        let (tx, rx) = mpsc::channel();
        let handle = spawn(
            Arc::clone(&executor),
            vec!["status".to_string()],
            RunOptions::default(),
            tx,
            |result| result.map(|out| out.lines),
        );
        let lines = rx.recv()??;
        handle.join().map_err(|_| "worker panicked")?;

        assert_eq!(lines, vec!["clean".to_string()]);
        assert_eq!(executor.calls(), vec![vec!["status".to_string()]]);
        Ok(())
    }

    #[test]
    fn test_output_first_line_skips_blank() {
        let output = Output::ok(["", "  main  "]);
        assert_eq!(output.first_line(), Some("main"));
        assert_eq!(Output::default().first_line(), None);
    }

    #[test]
    fn test_into_result_labels_failure() -> Result<(), Box<dyn std::error::Error>> {
        assert!(matches!(Output::ok(["x"]).into_result("Probe"), Ok(lines) if lines == ["x"]));
        let failed = Output::failed(["fatal: bad"]).into_result("Stage a.txt");
        let Err(Error::Process { label, lines }) = failed else {
            return Err("Expected a process error".into());
        };
        assert_eq!(label, "Stage a.txt");
        assert_eq!(lines, ["fatal: bad"]);
        Ok(())
    }

    #[test]
    fn test_run_options_env() {
        let options = RunOptions::default().with_env("GIT_EDITOR", "true");
        assert!(!options.silent);
        assert_eq!(
            options.env,
            vec![("GIT_EDITOR".to_string(), "true".to_string())]
        );
    }
}
