use crate::error::ControlError;
use log::{debug, warn};
use std::{
    io::{self, Read},
    process::{Child, Command, Stdio},
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Raw result of one external command. A non-zero exit is not an error at
/// this level; callers decide what it means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ControlError>;
}

pub(crate) fn command_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Runs commands as child processes, killing any that outlive `timeout`.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn timed_out(&self, program: &str) -> ControlError {
        ControlError::TimedOut {
            tool: program.to_string(),
            timeout_ms: self.timeout.as_millis().min(u128::from(u64::MAX)) as u64,
        }
    }
}

fn spawn_error(program: &str, err: io::Error) -> ControlError {
    match err.kind() {
        io::ErrorKind::NotFound => ControlError::ToolNotFound {
            tool: program.to_string(),
        },
        _ => ControlError::Io(format!("failed to start {program}: {err}")),
    }
}

/// Kills the child and waits on it so no zombie is left behind.
fn reap(child: &mut Child) {
    if let Err(err) = child.kill() {
        debug!("kill of pid {} failed: {err}", child.id());
    }
    let _ = child.wait();
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ControlError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| spawn_error(program, err))?;

        // Drain stdout off-thread so a chatty child never blocks on a full pipe.
        let (stdout_tx, stdout_rx) = mpsc::channel();
        match child.stdout.take() {
            Some(mut stdout) => {
                thread::spawn(move || {
                    let mut buffer = Vec::new();
                    let _ = stdout.read_to_end(&mut buffer);
                    let _ = stdout_tx.send(buffer);
                });
            }
            None => drop(stdout_tx),
        }

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(err) => {
                    reap(&mut child);
                    return Err(err.into());
                }
            }
            if Instant::now() >= deadline {
                reap(&mut child);
                return Err(self.timed_out(program));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        let stdout = stdout_rx
            .recv_timeout(remaining.max(POLL_INTERVAL))
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();

        Ok(CommandOutput {
            stdout,
            // Killed by a signal.
            exit_code: status.code().unwrap_or(-1),
        })
    }
}

#[derive(Debug, Clone)]
enum Availability {
    Ready,
    Disabled {
        reason: ControlError,
        until: Option<Instant>,
    },
}

/// One external executable plus its availability. A missing tool stays
/// disabled for the session; a tool that timed out is retried after
/// `cooldown`.
#[derive(Debug, Clone)]
pub struct Tool {
    program: String,
    cooldown: Duration,
    availability: Availability,
}

impl Tool {
    pub fn new(program: impl Into<String>, cooldown: Duration) -> Self {
        Self {
            program: program.into(),
            cooldown,
            availability: Availability::Ready,
        }
    }

    pub fn is_available(&self) -> bool {
        self.blocked_at(Instant::now()).is_none()
    }

    fn blocked_at(&self, now: Instant) -> Option<&ControlError> {
        match &self.availability {
            Availability::Ready => None,
            Availability::Disabled {
                reason,
                until: None,
            } => Some(reason),
            Availability::Disabled {
                reason,
                until: Some(until),
            } if now < *until => Some(reason),
            Availability::Disabled { .. } => None,
        }
    }

    pub fn run(
        &mut self,
        runner: &dyn CommandRunner,
        args: &[String],
    ) -> Result<CommandOutput, ControlError> {
        let now = Instant::now();
        if let Some(reason) = self.blocked_at(now) {
            return Err(reason.clone());
        }

        debug!("running `{}`", command_line(&self.program, args));
        match runner.run(&self.program, args) {
            Ok(output) => {
                self.availability = Availability::Ready;
                Ok(output)
            }
            Err(err) if err.is_unavailable() => {
                let until = match &err {
                    ControlError::ToolNotFound { .. } => None,
                    _ => Some(now + self.cooldown),
                };
                warn!("disabling `{}`: {err}", self.program);
                self.availability = Availability::Disabled {
                    reason: err.clone(),
                    until,
                };
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Like [`Tool::run`], but a non-zero exit becomes `CommandFailed`.
    pub fn output(
        &mut self,
        runner: &dyn CommandRunner,
        args: &[String],
    ) -> Result<String, ControlError> {
        let output = self.run(runner, args)?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(ControlError::CommandFailed(output.exit_code))
        }
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::{command_line, CommandOutput, CommandRunner};
    use crate::error::ControlError;
    use std::{
        cell::RefCell,
        collections::{HashMap, HashSet},
    };

    /// Records every invocation and answers from a table keyed by the full
    /// command line. Unknown commands succeed with empty output.
    #[derive(Default)]
    pub(crate) struct ScriptedRunner {
        replies: RefCell<HashMap<String, Result<CommandOutput, ControlError>>>,
        missing: RefCell<HashSet<String>>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedRunner {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn reply(&self, line: &str, stdout: &str) {
            self.replies.borrow_mut().insert(
                line.to_string(),
                Ok(CommandOutput {
                    stdout: stdout.to_string(),
                    exit_code: 0,
                }),
            );
        }

        pub(crate) fn reply_args(&self, program: &str, args: &[String], stdout: &str) {
            self.reply(&command_line(program, args), stdout);
        }

        pub(crate) fn exit(&self, line: &str, exit_code: i32) {
            self.replies.borrow_mut().insert(
                line.to_string(),
                Ok(CommandOutput {
                    stdout: String::new(),
                    exit_code,
                }),
            );
        }

        pub(crate) fn fail(&self, line: &str, err: ControlError) {
            self.replies.borrow_mut().insert(line.to_string(), Err(err));
        }

        pub(crate) fn remove_program(&self, program: &str) {
            self.missing.borrow_mut().insert(program.to_string());
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        pub(crate) fn clear_calls(&self) {
            self.calls.borrow_mut().clear();
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ControlError> {
            let line = command_line(program, args);
            self.calls.borrow_mut().push(line.clone());
            if self.missing.borrow().contains(program) {
                return Err(ControlError::ToolNotFound {
                    tool: program.to_string(),
                });
            }
            self.replies
                .borrow()
                .get(&line)
                .cloned()
                .unwrap_or(Ok(CommandOutput {
                    stdout: String::new(),
                    exit_code: 0,
                }))
        }
    }
}
