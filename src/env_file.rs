//! Environment persistence for `SessionStart` hooks.
//!
//! Claude Code hands `SessionStart` hooks a file path in `CLAUDE_ENV_FILE`;
//! every line appended there is sourced into later Bash tool calls.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::config::HookConfig;
use crate::error::{HookError, Result};

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid name pattern"));

pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Escape `value` for use between single quotes: `'` becomes `'\''`.
pub fn escape_single_quoted(value: &str) -> String {
    value.replace('\'', r"'\''")
}

/// `export NAME='value'\n`
pub fn export_line(name: &str, value: &str) -> Result<String> {
    if !is_valid_name(name) {
        return Err(HookError::EnvVarNameInvalid(name.to_string()));
    }
    Ok(format!("export {name}='{}'\n", escape_single_quoted(value)))
}

/// An append-only file of shell `export` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The configured `CLAUDE_ENV_FILE`, or `CapabilityUnavailable` outside
    /// `SessionStart`.
    pub fn from_config(config: &HookConfig) -> Result<Self> {
        config
            .env_file
            .clone()
            .map(Self::new)
            .ok_or(HookError::CapabilityUnavailable)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `export` line, creating the file if needed.
    pub async fn persist(&self, name: &str, value: &str) -> Result<()> {
        let line = export_line(name, value)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(name, path = %self.path.display(), "Persisted environment variable");
        Ok(())
    }
}

/// Persist through the `CLAUDE_ENV_FILE` of the current process.
pub async fn persist_env_var(name: &str, value: &str) -> Result<()> {
    // Name first: an invalid name must not depend on the environment.
    if !is_valid_name(name) {
        return Err(HookError::EnvVarNameInvalid(name.to_string()));
    }
    let config = HookConfig::from_env();
    EnvFile::from_config(&config)?.persist(name, value).await
}
