use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::FieldReader;

// ============================================================================
// HookEvent
// ============================================================================

/// Lifecycle points at which Claude Code runs hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookEvent {
    PreToolUse,
    PostToolUse,
    Notification,
    UserPromptSubmit,
    Stop,
    SubagentStop,
    PreCompact,
    SessionStart,
    SessionEnd,
}

impl HookEvent {
    pub const ALL: [HookEvent; 9] = [
        Self::PreToolUse,
        Self::PostToolUse,
        Self::Notification,
        Self::UserPromptSubmit,
        Self::Stop,
        Self::SubagentStop,
        Self::PreCompact,
        Self::SessionStart,
        Self::SessionEnd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreToolUse => "PreToolUse",
            Self::PostToolUse => "PostToolUse",
            Self::Notification => "Notification",
            Self::UserPromptSubmit => "UserPromptSubmit",
            Self::Stop => "Stop",
            Self::SubagentStop => "SubagentStop",
            Self::PreCompact => "PreCompact",
            Self::SessionStart => "SessionStart",
            Self::SessionEnd => "SessionEnd",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| format!("Unknown hook event: {s}"))
    }
}

// ============================================================================
// PermissionMode
// ============================================================================

/// Permission mode Claude Code was in when the hook fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionMode {
    Default,
    Plan,
    AcceptEdits,
    BypassPermissions,
}

// ============================================================================
// Envelope
// ============================================================================

/// Fields every hook payload carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub hook_event_name: String,
    /// Unique identifier for the session.
    pub session_id: String,
    /// Path to the conversation transcript.
    pub transcript_path: String,
    /// Working directory when the hook was invoked.
    pub cwd: String,
}

impl Envelope {
    /// Reads the envelope fields. With `expected` set, `hook_event_name` must
    /// equal that event's literal tag.
    pub(crate) fn read(fields: &mut FieldReader, expected: Option<HookEvent>) -> Option<Self> {
        let hook_event_name = match expected {
            Some(event) => fields.literal("hook_event_name", event.as_str()),
            None => fields.required("hook_event_name"),
        };
        let session_id = fields.required("session_id");
        let transcript_path = fields.required("transcript_path");
        let cwd = fields.required("cwd");

        Some(Self {
            hook_event_name: hook_event_name?,
            session_id: session_id?,
            transcript_path: transcript_path?,
            cwd: cwd?,
        })
    }

    /// The event tag as a known lifecycle event, if it is one.
    pub fn event(&self) -> Option<HookEvent> {
        self.hook_event_name.parse().ok()
    }
}
