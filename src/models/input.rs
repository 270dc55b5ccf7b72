//! Hook input payloads, one per lifecycle event.
//!
//! Each type is built by a validating constructor ([`HookInput::parse`]) that
//! checks the event tag, reads every field and reports all mismatches at once.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::envelope::{Envelope, HookEvent, PermissionMode};
use super::tools::{JsonObject, PostToolCall, PreToolCall};
use super::validation::{finish_with, FieldReader, SchemaViolation};

/// A payload Claude Code sends to a hook on stdin.
pub trait HookInput: Sized + fmt::Debug + Send + 'static {
    /// Literal `hook_event_name` the payload must carry; `None` accepts any.
    const EVENT: Option<HookEvent>;

    fn parse(value: Value) -> Result<Self, SchemaViolation>;

    fn envelope(&self) -> &Envelope;
}

// ============================================================================
// PreToolUse / PostToolUse
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PreToolUseInput {
    pub envelope: Envelope,
    pub permission_mode: Option<PermissionMode>,
    pub tool: PreToolCall,
}

impl HookInput for PreToolUseInput {
    const EVENT: Option<HookEvent> = Some(HookEvent::PreToolUse);

    fn parse(value: Value) -> Result<Self, SchemaViolation> {
        let mut fields = FieldReader::new(value)?;
        let envelope = Envelope::read(&mut fields, Self::EVENT);
        let permission_mode = fields.optional("permission_mode");
        let tool_name = fields.required::<String>("tool_name");
        let tool_input = fields.required_raw("tool_input");
        let tool = match (tool_name, tool_input) {
            (Some(name), Some(input)) => PreToolCall::read(&mut fields, name, input),
            _ => None,
        };

        fields.finish(|| {
            Some(Self {
                envelope: envelope?,
                permission_mode,
                tool: tool?,
            })
        })
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostToolUseInput {
    pub envelope: Envelope,
    pub permission_mode: Option<PermissionMode>,
    pub tool: PostToolCall,
}

impl HookInput for PostToolUseInput {
    const EVENT: Option<HookEvent> = Some(HookEvent::PostToolUse);

    fn parse(value: Value) -> Result<Self, SchemaViolation> {
        let mut fields = FieldReader::new(value)?;
        let envelope = Envelope::read(&mut fields, Self::EVENT);
        let permission_mode = fields.optional("permission_mode");
        let tool_name = fields.required::<String>("tool_name");
        let tool_input = fields.required_raw("tool_input");
        let tool_response = fields.required_raw("tool_response");
        let tool = match (tool_name, tool_input, tool_response) {
            (Some(name), Some(input), Some(response)) => {
                PostToolCall::read(&mut fields, name, input, response)
            }
            _ => None,
        };

        fields.finish(|| {
            Some(Self {
                envelope: envelope?,
                permission_mode,
                tool: tool?,
            })
        })
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

// ============================================================================
// Notification / UserPromptSubmit
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationInput {
    pub envelope: Envelope,
    /// Message intended for the user, e.g. "Claude is waiting for your input".
    pub message: String,
}

impl HookInput for NotificationInput {
    const EVENT: Option<HookEvent> = Some(HookEvent::Notification);

    fn parse(value: Value) -> Result<Self, SchemaViolation> {
        let mut fields = FieldReader::new(value)?;
        let envelope = Envelope::read(&mut fields, Self::EVENT);
        let message = fields.required("message");

        fields.finish(|| {
            Some(Self {
                envelope: envelope?,
                message: message?,
            })
        })
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserPromptSubmitInput {
    pub envelope: Envelope,
    pub permission_mode: Option<PermissionMode>,
    /// The prompt as submitted by the user.
    pub prompt: String,
}

impl HookInput for UserPromptSubmitInput {
    const EVENT: Option<HookEvent> = Some(HookEvent::UserPromptSubmit);

    fn parse(value: Value) -> Result<Self, SchemaViolation> {
        let mut fields = FieldReader::new(value)?;
        let envelope = Envelope::read(&mut fields, Self::EVENT);
        let permission_mode = fields.optional("permission_mode");
        let prompt = fields.required("prompt");

        fields.finish(|| {
            Some(Self {
                envelope: envelope?,
                permission_mode,
                prompt: prompt?,
            })
        })
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

// ============================================================================
// Stop / SubagentStop
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StopInput {
    pub envelope: Envelope,
    pub permission_mode: Option<PermissionMode>,
    /// Set when Claude is already continuing because of a stop hook. Check it
    /// to avoid keeping Claude running forever.
    pub stop_hook_active: bool,
}

impl HookInput for StopInput {
    const EVENT: Option<HookEvent> = Some(HookEvent::Stop);

    fn parse(value: Value) -> Result<Self, SchemaViolation> {
        let mut fields = FieldReader::new(value)?;
        let envelope = Envelope::read(&mut fields, Self::EVENT);
        let permission_mode = fields.optional("permission_mode");
        let stop_hook_active = fields.required("stop_hook_active");

        fields.finish(|| {
            Some(Self {
                envelope: envelope?,
                permission_mode,
                stop_hook_active: stop_hook_active?,
            })
        })
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubagentStopInput {
    pub envelope: Envelope,
    pub stop_hook_active: bool,
}

impl HookInput for SubagentStopInput {
    const EVENT: Option<HookEvent> = Some(HookEvent::SubagentStop);

    fn parse(value: Value) -> Result<Self, SchemaViolation> {
        let mut fields = FieldReader::new(value)?;
        let envelope = Envelope::read(&mut fields, Self::EVENT);
        let stop_hook_active = fields.required("stop_hook_active");

        fields.finish(|| {
            Some(Self {
                envelope: envelope?,
                stop_hook_active: stop_hook_active?,
            })
        })
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

// ============================================================================
// PreCompact
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TriggerTag {
    Auto,
    Manual,
}

/// What started a compaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompactTrigger {
    /// The context window filled up.
    Auto,
    /// The user ran `/compact`, optionally with instructions.
    Manual { custom_instructions: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreCompactInput {
    pub envelope: Envelope,
    pub trigger: CompactTrigger,
}

impl HookInput for PreCompactInput {
    const EVENT: Option<HookEvent> = Some(HookEvent::PreCompact);

    fn parse(value: Value) -> Result<Self, SchemaViolation> {
        let mut fields = FieldReader::new(value)?;
        let envelope = Envelope::read(&mut fields, Self::EVENT);
        let trigger = match fields.required::<TriggerTag>("trigger") {
            Some(TriggerTag::Auto) => Some(CompactTrigger::Auto),
            Some(TriggerTag::Manual) => fields
                .required::<String>("custom_instructions")
                .map(|text| CompactTrigger::Manual {
                    custom_instructions: Some(text).filter(|text| !text.is_empty()),
                }),
            None => None,
        };

        fields.finish(|| {
            Some(Self {
                envelope: envelope?,
                trigger: trigger?,
            })
        })
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

// ============================================================================
// SessionStart / SessionEnd
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionSource {
    /// Fresh start.
    Startup,
    /// `--resume`, `--continue` or `/resume`.
    Resume,
    /// `/clear`.
    Clear,
    /// Restart after compaction.
    Compact,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionStartInput {
    pub envelope: Envelope,
    pub source: SessionSource,
}

impl HookInput for SessionStartInput {
    const EVENT: Option<HookEvent> = Some(HookEvent::SessionStart);

    fn parse(value: Value) -> Result<Self, SchemaViolation> {
        let mut fields = FieldReader::new(value)?;
        let envelope = Envelope::read(&mut fields, Self::EVENT);
        let source = fields.required("source");

        fields.finish(|| {
            Some(Self {
                envelope: envelope?,
                source: source?,
            })
        })
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEndReason {
    Clear,
    Logout,
    PromptInputExit,
    Other,
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionEndInput {
    pub envelope: Envelope,
    pub reason: SessionEndReason,
}

impl HookInput for SessionEndInput {
    const EVENT: Option<HookEvent> = Some(HookEvent::SessionEnd);

    fn parse(value: Value) -> Result<Self, SchemaViolation> {
        let mut fields = FieldReader::new(value)?;
        let envelope = Envelope::read(&mut fields, Self::EVENT);
        let reason = fields.required("reason");

        fields.finish(|| {
            Some(Self {
                envelope: envelope?,
                reason: reason?,
            })
        })
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

// ============================================================================
// Generic
// ============================================================================

/// Any event: the envelope plus whatever else the payload carried.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericInput {
    pub envelope: Envelope,
    pub extra: JsonObject,
}

impl HookInput for GenericInput {
    const EVENT: Option<HookEvent> = None;

    fn parse(value: Value) -> Result<Self, SchemaViolation> {
        let mut fields = FieldReader::new(value)?;
        let envelope = Envelope::read(&mut fields, None);
        let (extra, issues) = fields.into_rest();

        finish_with(issues, || {
            Some(Self {
                envelope: envelope?,
                extra,
            })
        })
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tools::ToolKind;
    use serde_json::json;

    fn envelope(event: &str) -> Value {
        json!({
            "hook_event_name": event,
            "session_id": "test-session",
            "transcript_path": "/tmp/transcript.json",
            "cwd": "/tmp"
        })
    }

    fn with(event: &str, extra: Value) -> Value {
        let mut value = envelope(event);
        let object = value.as_object_mut().unwrap();
        for (key, v) in extra.as_object().unwrap() {
            object.insert(key.clone(), v.clone());
        }
        value
    }

    // -------------------------------------------------------------------------
    // Event tags
    // -------------------------------------------------------------------------

    #[test]
    fn test_pre_tool_use_rejects_post_tool_use_tag() {
        let value = with(
            "PostToolUse",
            json!({"tool_name": "Read", "tool_input": {"file_path": "/a"}}),
        );
        let err = PreToolUseInput::parse(value).unwrap_err();
        assert!(err.mentions("hook_event_name"));
    }

    #[test]
    fn test_missing_envelope_fields_are_all_reported() {
        let err = NotificationInput::parse(json!({
            "hook_event_name": "Notification",
            "message": "hi"
        }))
        .unwrap_err();
        assert!(err.mentions("session_id"));
        assert!(err.mentions("transcript_path"));
        assert!(err.mentions("cwd"));
    }

    #[test]
    fn test_non_object_payload() {
        let err = StopInput::parse(json!("Stop")).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert!(err.issues[0].message.contains("expected object"));
    }

    // -------------------------------------------------------------------------
    // Per-event fields
    // -------------------------------------------------------------------------

    #[test]
    fn test_pre_tool_use_parses_known_tool() {
        let input = PreToolUseInput::parse(with(
            "PreToolUse",
            json!({
                "permission_mode": "acceptEdits",
                "tool_name": "Write",
                "tool_input": {"file_path": "/tmp/test.txt", "content": "test content"}
            }),
        ))
        .unwrap();
        assert_eq!(input.permission_mode, Some(PermissionMode::AcceptEdits));
        assert_eq!(input.tool.kind(), ToolKind::Write);
        assert_eq!(input.envelope.hook_event_name, "PreToolUse");
    }

    #[test]
    fn test_pre_tool_use_missing_tool_input() {
        let err = PreToolUseInput::parse(with("PreToolUse", json!({"tool_name": "Read"})))
            .unwrap_err();
        assert!(err.mentions("tool_input"));
    }

    #[test]
    fn test_pre_tool_use_invalid_permission_mode() {
        let err = PreToolUseInput::parse(with(
            "PreToolUse",
            json!({
                "permission_mode": "yolo",
                "tool_name": "Read",
                "tool_input": {"file_path": "/a"}
            }),
        ))
        .unwrap_err();
        assert!(err.mentions("permission_mode"));
    }

    #[test]
    fn test_post_tool_use_requires_tool_response() {
        let err = PostToolUseInput::parse(with(
            "PostToolUse",
            json!({"tool_name": "mcp__x__y", "tool_input": {}}),
        ))
        .unwrap_err();
        assert!(err.mentions("tool_response"));
    }

    #[test]
    fn test_stop_wrong_type_is_not_coerced() {
        let err = StopInput::parse(with("Stop", json!({"stop_hook_active": "false"}))).unwrap_err();
        assert!(err.mentions("stop_hook_active"));
    }

    #[test]
    fn test_stop_without_permission_mode() {
        let input = StopInput::parse(with("Stop", json!({"stop_hook_active": false}))).unwrap();
        assert!(!input.stop_hook_active);
        assert!(input.permission_mode.is_none());
    }

    #[test]
    fn test_pre_compact_auto() {
        let input = PreCompactInput::parse(with("PreCompact", json!({"trigger": "auto"}))).unwrap();
        assert_eq!(input.trigger, CompactTrigger::Auto);
    }

    #[test]
    fn test_pre_compact_manual_with_instructions() {
        let input = PreCompactInput::parse(with(
            "PreCompact",
            json!({"trigger": "manual", "custom_instructions": "Keep the API notes"}),
        ))
        .unwrap();
        assert_eq!(
            input.trigger,
            CompactTrigger::Manual {
                custom_instructions: Some("Keep the API notes".to_string())
            }
        );
    }

    #[test]
    fn test_pre_compact_manual_empty_instructions_is_absent() {
        let input = PreCompactInput::parse(with(
            "PreCompact",
            json!({"trigger": "manual", "custom_instructions": ""}),
        ))
        .unwrap();
        assert_eq!(
            input.trigger,
            CompactTrigger::Manual {
                custom_instructions: None
            }
        );
    }

    #[test]
    fn test_pre_compact_unknown_trigger() {
        let err = PreCompactInput::parse(with("PreCompact", json!({"trigger": "scheduled"})))
            .unwrap_err();
        assert!(err.mentions("trigger"));
    }

    #[test]
    fn test_session_start_sources() {
        for (raw, expected) in [
            ("startup", SessionSource::Startup),
            ("resume", SessionSource::Resume),
            ("clear", SessionSource::Clear),
            ("compact", SessionSource::Compact),
        ] {
            let input =
                SessionStartInput::parse(with("SessionStart", json!({"source": raw}))).unwrap();
            assert_eq!(input.source, expected);
        }
    }

    #[test]
    fn test_session_end_prompt_input_exit() {
        let input = SessionEndInput::parse(with(
            "SessionEnd",
            json!({"reason": "prompt_input_exit"}),
        ))
        .unwrap();
        assert_eq!(input.reason, SessionEndReason::PromptInputExit);
    }

    #[test]
    fn test_unknown_extra_fields_are_ignored() {
        let input = UserPromptSubmitInput::parse(with(
            "UserPromptSubmit",
            json!({"prompt": "hello", "brand_new_field": [1, 2, 3]}),
        ))
        .unwrap();
        assert_eq!(input.prompt, "hello");
    }

    #[test]
    fn test_generic_keeps_extra_fields() {
        let input = GenericInput::parse(with(
            "SomeFutureEvent",
            json!({"payload": {"a": 1}, "flag": true}),
        ))
        .unwrap();
        assert_eq!(input.envelope.hook_event_name, "SomeFutureEvent");
        assert_eq!(input.extra.len(), 2);
        assert_eq!(input.extra["payload"]["a"], 1);
        assert!(!input.extra.contains_key("session_id"));
    }

    #[test]
    fn test_generic_still_requires_envelope() {
        let err = GenericInput::parse(json!({"hook_event_name": "X"})).unwrap_err();
        assert!(err.mentions("session_id"));
    }
}
