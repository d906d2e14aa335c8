// src/system/executor.rs

use crate::CancellationToken;
use std::ffi::{OsStr, OsString};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command as StdCommand, ExitStatus, Stdio};
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Failure running a child process.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The program does not exist.
    #[error("Command '{0}' was not found.")]
    NotFound(String),
    /// Spawning or waiting failed.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    /// The program ran and failed.
    #[error("Command '{command}' exited with {status}.")]
    NonZeroExitStatus {
        /// Rendered command line.
        command: String,
        /// Exit status as printed by the OS.
        status: String,
    },
    /// Captured output was not UTF-8.
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        /// Rendered command line.
        command: String,
        /// Decoding error.
        #[source]
        source: std::string::FromUtf8Error,
    },
    /// Stopped by Ctrl+C.
    #[error("Command '{0}' was interrupted.")]
    Interrupted(String),
}

/// Returns `Err(Interrupted)` once the token has been raised.
pub fn check_for_cancellation(
    cancellation_token: &CancellationToken,
    command: &str,
) -> Result<(), ExecutionError> {
    if cancellation_token.load(Ordering::SeqCst) {
        Err(ExecutionError::Interrupted(command.to_string()))
    } else {
        Ok(())
    }
}

/// Renders a program and its arguments as a copy-pasteable shell line.
pub fn display_command(program: &OsStr, args: &[OsString]) -> String {
    let words: Vec<String> = std::iter::once(program)
        .chain(args.iter().map(OsString::as_os_str))
        .map(|w| w.to_string_lossy().into_owned())
        .collect();
    shlex::try_join(words.iter().map(String::as_str)).unwrap_or_else(|_| words.join(" "))
}

/// Spawns child processes for one invocation: always in the same working
/// directory and watching the same cancellation token.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    cwd: PathBuf,
    cancellation_token: CancellationToken,
}

impl ProcessRunner {
    /// A runner whose children start in `cwd`.
    pub fn new(cwd: impl Into<PathBuf>, cancellation_token: CancellationToken) -> Self {
        Self {
            cwd: cwd.into(),
            cancellation_token,
        }
    }

    /// Working directory given to every child.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Runs `program` with inherited stdio and waits for it to finish.
    ///
    /// A non-zero exit is an error. If the token is raised while the child is
    /// running, the child is killed and `Interrupted` is returned.
    pub fn run<P, I, S>(&self, program: P, args: I) -> Result<(), ExecutionError>
    where
        P: AsRef<OsStr>,
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = program.as_ref();
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let command_line = display_command(program, &args);
        check_for_cancellation(&self.cancellation_token, &command_line)?;
        log::debug!("Running `{}` in '{}'", command_line, self.cwd.display());

        let clean_cwd = dunce::simplified(&self.cwd);
        let spawned = StdCommand::new(program)
            .args(&args)
            .current_dir(clean_cwd)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn();

        // Shell built-ins like `dir` only exist inside cmd.exe.
        let child = match spawned {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
                log::debug!("'{}' not found. Retrying with cmd /C.", command_line);
                StdCommand::new("cmd")
                    .arg("/C")
                    .arg(program)
                    .args(&args)
                    .current_dir(clean_cwd)
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .spawn()
                    .map_err(|e| spawn_error(&command_line, e))?
            }
            Err(e) => return Err(spawn_error(&command_line, e)),
        };

        let status = self.wait_with_cancellation(child, &command_line)?;
        if status.success() {
            Ok(())
        } else {
            Err(ExecutionError::NonZeroExitStatus {
                command: command_line,
                status: status.to_string(),
            })
        }
    }

    /// Runs `program` and returns its standard output. Stderr goes to the terminal.
    ///
    /// Cancellation works as in [`run`](Self::run). Stdout is drained on a
    /// separate thread so a large listing cannot block the child.
    pub fn capture<P, I, S>(&self, program: P, args: I) -> Result<String, ExecutionError>
    where
        P: AsRef<OsStr>,
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = program.as_ref();
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let command_line = display_command(program, &args);
        check_for_cancellation(&self.cancellation_token, &command_line)?;
        log::debug!("Capturing `{}` in '{}'", command_line, self.cwd.display());

        let mut child = StdCommand::new(program)
            .args(&args)
            .current_dir(dunce::simplified(&self.cwd))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| spawn_error(&command_line, e))?;

        let reader = child.stdout.take().map(|mut stdout| {
            thread::spawn(move || {
                let mut buffer = Vec::new();
                stdout.read_to_end(&mut buffer).map(|_| buffer)
            })
        });

        let status = self.wait_with_cancellation(child, &command_line)?;
        let stdout = match reader {
            Some(handle) => handle
                .join()
                .map_err(|_| {
                    ExecutionError::CommandFailed(
                        command_line.clone(),
                        std::io::Error::other("stdout reader panicked"),
                    )
                })?
                .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?,
            None => Vec::new(),
        };

        if !status.success() {
            return Err(ExecutionError::NonZeroExitStatus {
                command: command_line,
                status: status.to_string(),
            });
        }

        String::from_utf8(stdout).map_err(|e| ExecutionError::InvalidUtf8Output {
            command: command_line,
            source: e,
        })
    }

    fn wait_with_cancellation(
        &self,
        mut child: Child,
        command_line: &str,
    ) -> Result<ExitStatus, ExecutionError> {
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    // The child usually dies from the same Ctrl+C before we poll.
                    if !status.success() {
                        check_for_cancellation(&self.cancellation_token, command_line)?;
                    }
                    return Ok(status);
                }
                Ok(None) => {
                    if self.cancellation_token.load(Ordering::SeqCst) {
                        log::debug!(
                            "Cancellation requested, killing child process (PID: {})...",
                            child.id()
                        );
                        if let Err(e) = child.kill() {
                            log::warn!("Failed to kill child process {}: {}", child.id(), e);
                        }
                        child.wait().ok();
                        return Err(ExecutionError::Interrupted(command_line.to_string()));
                    }
                    thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    return Err(ExecutionError::CommandFailed(command_line.to_string(), e));
                }
            }
        }
    }
}

fn spawn_error(command_line: &str, e: std::io::Error) -> ExecutionError {
    if e.kind() == ErrorKind::NotFound {
        ExecutionError::NotFound(command_line.to_string())
    } else {
        ExecutionError::CommandFailed(command_line.to_string(), e)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use tempfile::tempdir;

    fn runner(cwd: &Path) -> ProcessRunner {
        ProcessRunner::new(cwd, Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn test_run_success_and_failure() {
        let dir = tempdir().unwrap();
        let runner = runner(dir.path());

        assert!(runner.run("true", Vec::<&str>::new()).is_ok());
        let err = runner.run("false", Vec::<&str>::new()).unwrap_err();
        assert!(matches!(err, ExecutionError::NonZeroExitStatus { .. }));
    }

    #[test]
    fn test_run_uses_runner_cwd() {
        let dir = tempdir().unwrap();
        runner(dir.path())
            .run("sh", ["-c", "echo here > marker.txt"])
            .unwrap();
        assert!(dir.path().join("marker.txt").is_file());
    }

    #[test]
    fn test_capture_returns_stdout() {
        let dir = tempdir().unwrap();
        let out = runner(dir.path())
            .capture("sh", ["-c", "printf 'a==1\\nb==2\\n'"])
            .unwrap();
        assert_eq!(out, "a==1\nb==2\n");
    }

    #[test]
    fn test_missing_program_is_not_found() {
        let dir = tempdir().unwrap();
        let err = runner(dir.path())
            .run("crowbar-no-such-program-xyz", Vec::<&str>::new())
            .unwrap_err();
        assert!(matches!(err, ExecutionError::NotFound(_)));
    }

    #[test]
    fn test_raised_token_stops_before_spawning() {
        let dir = tempdir().unwrap();
        let runner = ProcessRunner::new(dir.path(), Arc::new(AtomicBool::new(true)));
        let err = runner
            .run("sh", ["-c", "echo ran > marker.txt"])
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Interrupted(_)));
        assert!(!dir.path().join("marker.txt").exists());
    }

    #[test]
    fn test_capture_stops_when_token_is_raised() {
        let dir = tempdir().unwrap();
        let token = Arc::new(AtomicBool::new(false));
        let runner = ProcessRunner::new(dir.path(), token.clone());

        let raiser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            token.store(true, Ordering::SeqCst);
        });
        let err = runner
            .capture("sh", ["-c", "sleep 5; echo late"])
            .unwrap_err();
        raiser.join().unwrap();
        assert!(matches!(err, ExecutionError::Interrupted(_)));
    }

    #[test]
    fn test_capture_large_output_does_not_block() {
        let dir = tempdir().unwrap();
        let out = runner(dir.path())
            .capture("sh", ["-c", "i=0; while [ $i -lt 20000 ]; do echo pkg$i==1.0; i=$((i+1)); done"])
            .unwrap();
        assert_eq!(out.lines().count(), 20000);
    }

    #[test]
    fn test_display_command_quotes_spaces() {
        let line = display_command(
            OsStr::new("/opt/my env/bin/pip"),
            &[OsString::from("install"), OsString::from("requests")],
        );
        assert_eq!(
            shlex::split(&line).unwrap(),
            vec!["/opt/my env/bin/pip", "install", "requests"]
        );
    }
}
