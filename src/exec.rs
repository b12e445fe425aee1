//! Subprocess execution: argv-style invocation with captured output and an
//! optional timeout.
//!
//! Commands are always spawned from an argument vector. No shell is involved,
//! so file paths containing quotes, spaces, or metacharacters are passed
//! through untouched.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
/// A fully-substituted command ready to spawn.
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args,
        }
    }

    /// Human-readable rendering for diagnostics only; never executed.
    pub fn display(&self) -> String {
        let mut s = self.program.clone();
        for a in &self.args {
            s.push(' ');
            if a.contains(' ') {
                s.push('"');
                s.push_str(a);
                s.push('"');
            } else {
                s.push_str(a);
            }
        }
        s
    }
}

#[derive(Debug)]
/// Captured output of one invocation.
pub struct ExecOutput {
    /// Stdout lines followed by stderr lines, in read order within each
    /// stream. Tools under check write their reports to stdout.
    pub lines: Vec<String>,
    /// Exit code, `None` when the process was killed by a signal (or by the
    /// timeout below).
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

/// Run a command to completion, capturing stdout and stderr.
///
/// With a timeout, the child is polled and killed once the deadline passes;
/// partial output read so far is still returned with `timed_out` set. A spawn
/// failure (program not found, permission denied) surfaces as the `Err` case.
pub fn run_command(spec: &CommandSpec, timeout: Option<Duration>) -> std::io::Result<ExecOutput> {
    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Drain both pipes on their own threads so a chatty tool can never fill
    // one pipe while we block on the other.
    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();
    let stdout_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(pipe) = stdout_pipe.as_mut() {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    });
    let stderr_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(pipe) = stderr_pipe.as_mut() {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    });

    let mut timed_out = false;
    let status = match timeout {
        None => Some(child.wait()?),
        Some(limit) => {
            let deadline = Instant::now() + limit;
            loop {
                match child.try_wait()? {
                    Some(status) => break Some(status),
                    None if Instant::now() >= deadline => {
                        timed_out = true;
                        let _ = child.kill();
                        let _ = child.wait();
                        break None;
                    }
                    None => thread::sleep(Duration::from_millis(10)),
                }
            }
        }
    };

    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();

    let mut lines: Vec<String> = String::from_utf8_lossy(&stdout)
        .lines()
        .map(str::to_string)
        .collect();
    lines.extend(String::from_utf8_lossy(&stderr).lines().map(str::to_string));

    Ok(ExecOutput {
        lines,
        exit_code: status.and_then(|s| s.code()),
        timed_out,
    })
}

/// Whether `program` resolves on PATH. Used to warn once up front instead of
/// producing one spawn failure per file.
pub fn tool_available(program: &str) -> bool {
    which::which(program).is_ok()
}
