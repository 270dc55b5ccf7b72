//! End-to-end testing of hook binaries.
//!
//! [`HookRunner`] runs a hook the way Claude Code does: as a subprocess with
//! the JSON request on stdin. Output that looks like a JSON object is parsed
//! so assertions can index into it directly.
//!
//! ```no_run
//! use claude_code_hook::testing::HookRunner;
//! use serde_json::json;
//!
//! # async fn demo() -> std::io::Result<()> {
//! let run = HookRunner::new("target/debug/my-hook")
//!     .run(&json!({
//!         "hook_event_name": "SessionStart",
//!         "session_id": "test",
//!         "transcript_path": "/tmp/test.json",
//!         "cwd": "/tmp",
//!         "source": "startup"
//!     }))
//!     .await?;
//!
//! assert_eq!(run.status, 0);
//! assert_eq!(run.stdout.json()["hookSpecificOutput"]["hookEventName"], "SessionStart");
//! # Ok(())
//! # }
//! ```

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

static NULL: Value = Value::Null;

/// One captured output stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Captured {
    /// The stream held a JSON object.
    Json(Value),
    Text(String),
}

impl Captured {
    fn from_bytes(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes).into_owned();
        if text.trim_start().starts_with('{') {
            if let Ok(value) = serde_json::from_str(&text) {
                return Self::Json(value);
            }
        }
        Self::Text(text)
    }

    /// The parsed object, or `Value::Null` for plain text.
    pub fn json(&self) -> &Value {
        match self {
            Self::Json(value) => value,
            Self::Text(_) => &NULL,
        }
    }

    /// True for an empty or whitespace-only stream.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    pub fn text(&self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Exit status and output of one hook run.
#[derive(Debug, Clone, PartialEq)]
pub struct HookRun {
    /// Exit code; `-1` when the process was killed by a signal.
    pub status: i32,
    pub stdout: Captured,
    pub stderr: Captured,
}

impl HookRun {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Builder for running a hook binary.
#[derive(Debug, Clone)]
pub struct HookRunner {
    program: PathBuf,
    args: Vec<OsString>,
    envs: Vec<(OsString, Option<OsString>)>,
}

impl HookRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_owned()));
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_owned(), Some(value.as_ref().to_owned())));
        self
    }

    pub fn env_remove(mut self, key: impl AsRef<OsStr>) -> Self {
        self.envs.push((key.as_ref().to_owned(), None));
        self
    }

    /// Pipe `input` as JSON and wait for the hook to exit.
    pub async fn run(&self, input: &Value) -> io::Result<HookRun> {
        self.run_raw(input.to_string().as_bytes()).await
    }

    /// Pipe arbitrary bytes, e.g. malformed JSON.
    pub async fn run_raw(&self, stdin: &[u8]) -> io::Result<HookRun> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &self.envs {
            match value {
                Some(value) => command.env(key, value),
                None => command.env_remove(key),
            };
        }

        let mut child = command.spawn()?;
        if let Some(mut pipe) = child.stdin.take() {
            // A hook that exits before reading everything closes the pipe early.
            if let Err(err) = pipe.write_all(stdin).await {
                if err.kind() != io::ErrorKind::BrokenPipe {
                    return Err(err);
                }
            }
        }
        let output = child.wait_with_output().await?;

        Ok(HookRun {
            status: output.status.code().unwrap_or(-1),
            stdout: Captured::from_bytes(&output.stdout),
            stderr: Captured::from_bytes(&output.stderr),
        })
    }
}
