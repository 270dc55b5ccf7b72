// CLI Parser - Clap derive definitions
// One subcommand per lifecycle event; each runs the matching reference hook

use clap::{Parser, Subcommand};

use crate::models::HookEvent;

/// Reference Claude Code hooks, one per lifecycle event
#[derive(Parser, Debug)]
#[command(name = "claude-code-hook")]
#[command(version)]
#[command(about = "Validated Claude Code hooks: JSON request on stdin, JSON answer on stdout")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Deny Write tool calls, allow everything else
    PreToolUse,

    /// Add context when a Bash command was interrupted
    PostToolUse,

    /// Log the notification message
    Notification,

    /// Block dangerous prompts, add context to test-related ones
    UserPromptSubmit,

    /// Ask Claude to verify its changes before stopping
    Stop,

    /// Ask a subagent for a summary before stopping
    SubagentStop,

    /// Log the compaction trigger
    PreCompact,

    /// Add context for the session source and persist environment variables
    SessionStart {
        /// Variable to export for later Bash calls, as NAME=VALUE (repeatable)
        #[arg(long = "export", value_name = "NAME=VALUE", value_parser = parse_export)]
        exports: Vec<(String, String)>,
    },

    /// Log why the session ended
    SessionEnd,

    /// Accept any event and log it
    Generic,
}

impl Command {
    /// The event this subcommand handles; `None` for `generic`.
    pub fn event(&self) -> Option<HookEvent> {
        match self {
            Self::PreToolUse => Some(HookEvent::PreToolUse),
            Self::PostToolUse => Some(HookEvent::PostToolUse),
            Self::Notification => Some(HookEvent::Notification),
            Self::UserPromptSubmit => Some(HookEvent::UserPromptSubmit),
            Self::Stop => Some(HookEvent::Stop),
            Self::SubagentStop => Some(HookEvent::SubagentStop),
            Self::PreCompact => Some(HookEvent::PreCompact),
            Self::SessionStart { .. } => Some(HookEvent::SessionStart),
            Self::SessionEnd => Some(HookEvent::SessionEnd),
            Self::Generic => None,
        }
    }
}

/// Split `NAME=VALUE` at the first `=`. The name is checked when persisted.
pub fn parse_export(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got {s:?}"))
}

// ============================================================================
// Tests
// ============================================================================
