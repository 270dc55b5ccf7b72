//! Hook output payloads.
//!
//! Outputs are plain serde types with the documented defaults applied during
//! deserialization. [`HookOutput::parse`] re-reads a serialized output and
//! applies the checks serde alone cannot express.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::envelope::HookEvent;
use super::tools::JsonObject;
use super::validation::{decode_at, finish_with, kind_of, Issue, SchemaViolation};

/// A value a hook may print on stdout.
pub trait HookOutput: Serialize + DeserializeOwned + fmt::Debug + Send + 'static {
    /// Records semantic problems that survive deserialization.
    fn check(&self, _issues: &mut Vec<Issue>) {}

    /// Re-reads flattened parts of `value` on their own. Serde reports errors
    /// inside `#[serde(flatten)]` fields at the root; this recovers the field.
    fn locate_flattened(_value: &Value, _issues: &mut Vec<Issue>) {}

    fn parse(value: Value) -> Result<Self, SchemaViolation> {
        if !value.is_object() {
            return Err(SchemaViolation::single(
                "",
                format!("Invalid input: expected object, received {}", kind_of(&value)),
            ));
        }
        let output: Self = match decode_at("", value.clone()) {
            Ok(output) => output,
            Err(issue) => {
                let mut issues = Vec::new();
                if issue.path.is_empty() {
                    Self::locate_flattened(&value, &mut issues);
                }
                if issues.is_empty() {
                    issues.push(issue);
                }
                return Err(SchemaViolation::new(issues));
            }
        };

        let mut issues = Vec::new();
        output.check(&mut issues);
        finish_with(issues, || Some(output))
    }
}

fn default_true() -> bool {
    true
}

fn locate_common(value: &Value, issues: &mut Vec<Issue>) {
    if let Err(issue) = decode_at::<CommonOutput>("", value.clone()) {
        issues.push(issue);
    }
}

fn locate_decision(value: &Value, issues: &mut Vec<Issue>) {
    match decode_at::<DecisionFields>("", value.clone()) {
        Ok(fields) => {
            if let Err(message) = Decision::try_from(fields) {
                issues.push(Issue::new("reason", message));
            }
        }
        Err(issue) => issues.push(issue),
    }
}

// ============================================================================
// CommonOutput
// ============================================================================

/// Fields every output may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonOutput {
    /// Hide stdout from transcript mode.
    #[serde(default)]
    pub suppress_output: bool,

    /// Warning shown to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,

    /// `false` stops Claude after all hooks have run, overriding any block
    /// decision.
    #[serde(rename = "continue", default = "default_true")]
    pub continue_processing: bool,

    /// Printed to the terminal when `continue` is false. Claude never sees it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

impl Default for CommonOutput {
    fn default() -> Self {
        Self {
            suppress_output: false,
            system_message: None,
            continue_processing: true,
            stop_reason: None,
        }
    }
}

impl CommonOutput {
    /// Stop processing, showing `reason` to the user.
    pub fn stop(reason: impl Into<String>) -> Self {
        Self {
            continue_processing: false,
            stop_reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = Some(message.into());
        self
    }

    pub fn suppressed(mut self) -> Self {
        self.suppress_output = true;
        self
    }

    fn check_common(&self, issues: &mut Vec<Issue>) {
        if self.continue_processing && self.stop_reason.is_some() {
            issues.push(Issue::new(
                "stopReason",
                "Invalid input: `stopReason` is only allowed when `continue` is false",
            ));
        }
    }
}

impl HookOutput for CommonOutput {
    fn check(&self, issues: &mut Vec<Issue>) {
        self.check_common(issues);
    }
}

pub type NotificationOutput = CommonOutput;
pub type PreCompactOutput = CommonOutput;
pub type SessionEndOutput = CommonOutput;
pub type GenericOutput = CommonOutput;

// ============================================================================
// Decision
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Allow,
    Block,
}

/// Wire form of [`Decision`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionFields {
    #[serde(default)]
    pub decision: Option<DecisionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Verdict for events that can block. An absent `decision` reads as allow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DecisionFields", into = "DecisionFields")]
pub enum Decision {
    #[default]
    Allow,
    Block {
        reason: String,
    },
}

impl Decision {
    pub fn block(reason: impl Into<String>) -> Self {
        Self::Block {
            reason: reason.into(),
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Block { reason } => Some(reason),
        }
    }
}

impl TryFrom<DecisionFields> for Decision {
    type Error = String;

    fn try_from(fields: DecisionFields) -> Result<Self, Self::Error> {
        match (fields.decision, fields.reason) {
            (None | Some(DecisionKind::Allow), _) => Ok(Self::Allow),
            (Some(DecisionKind::Block), Some(reason)) => Ok(Self::Block { reason }),
            (Some(DecisionKind::Block), None) => {
                Err("Invalid input: `reason` is required when `decision` is \"block\"".to_string())
            }
        }
    }
}

impl From<Decision> for DecisionFields {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allow => Self {
                decision: Some(DecisionKind::Allow),
                reason: None,
            },
            Decision::Block { reason } => Self {
                decision: Some(DecisionKind::Block),
                reason: Some(reason),
            },
        }
    }
}

// ============================================================================
// Hook-specific payloads
// ============================================================================

/// Extra context handed to Claude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOutput {
    pub hook_event_name: HookEvent,
    pub additional_context: String,
}

impl ContextOutput {
    fn check(&self, expected: HookEvent, issues: &mut Vec<Issue>) {
        check_event_name(self.hook_event_name, expected, issues);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionDecision {
    /// Bypass the permission system.
    Allow,
    /// Ask the user to confirm in the UI.
    Ask,
    /// Prevent the tool call.
    Deny,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionOutput {
    pub hook_event_name: HookEvent,
    pub permission_decision: PermissionDecision,
    /// Shown to the user; Claude only sees it on deny.
    pub permission_decision_reason: String,
    /// Replacement tool arguments, applied before the call runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_input: Option<JsonObject>,
}

fn check_event_name(actual: HookEvent, expected: HookEvent, issues: &mut Vec<Issue>) {
    if actual != expected {
        issues.push(Issue::new(
            "hookSpecificOutput.hookEventName",
            format!("Invalid input: expected \"{expected}\", received \"{actual}\""),
        ));
    }
}

// ============================================================================
// PreToolUse
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreToolUseOutput {
    pub hook_specific_output: PermissionOutput,
    #[serde(flatten)]
    pub common: CommonOutput,
}

impl PreToolUseOutput {
    fn with_decision(decision: PermissionDecision, reason: impl Into<String>) -> Self {
        Self {
            hook_specific_output: PermissionOutput {
                hook_event_name: HookEvent::PreToolUse,
                permission_decision: decision,
                permission_decision_reason: reason.into(),
                updated_input: None,
            },
            common: CommonOutput::default(),
        }
    }

    pub fn allow(reason: impl Into<String>) -> Self {
        Self::with_decision(PermissionDecision::Allow, reason)
    }

    pub fn ask(reason: impl Into<String>) -> Self {
        Self::with_decision(PermissionDecision::Ask, reason)
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self::with_decision(PermissionDecision::Deny, reason)
    }

    pub fn with_updated_input(mut self, input: JsonObject) -> Self {
        self.hook_specific_output.updated_input = Some(input);
        self
    }
}

impl HookOutput for PreToolUseOutput {
    fn locate_flattened(value: &Value, issues: &mut Vec<Issue>) {
        locate_common(value, issues);
    }

    fn check(&self, issues: &mut Vec<Issue>) {
        let permission = &self.hook_specific_output;
        check_event_name(permission.hook_event_name, HookEvent::PreToolUse, issues);
        if permission.permission_decision == PermissionDecision::Deny
            && permission.updated_input.is_some()
        {
            issues.push(Issue::new(
                "hookSpecificOutput.updatedInput",
                "Invalid input: `updatedInput` is not allowed when `permissionDecision` is \"deny\"",
            ));
        }
        self.common.check_common(issues);
    }
}

// ============================================================================
// PostToolUse / UserPromptSubmit
// ============================================================================

macro_rules! context_decision_output {
    ($(#[$meta:meta])* $name:ident => $event:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            #[serde(flatten)]
            pub decision: Decision,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub hook_specific_output: Option<ContextOutput>,
            #[serde(flatten)]
            pub common: CommonOutput,
        }

        impl $name {
            pub fn allow() -> Self {
                Self::default()
            }

            pub fn block(reason: impl Into<String>) -> Self {
                Self {
                    decision: Decision::block(reason),
                    ..Self::default()
                }
            }

            /// Adds context for Claude to consider.
            pub fn with_context(mut self, context: impl Into<String>) -> Self {
                self.hook_specific_output = Some(ContextOutput {
                    hook_event_name: $event,
                    additional_context: context.into(),
                });
                self
            }
        }

        impl HookOutput for $name {
            fn locate_flattened(value: &Value, issues: &mut Vec<Issue>) {
                locate_decision(value, issues);
                locate_common(value, issues);
            }

            fn check(&self, issues: &mut Vec<Issue>) {
                if let Some(context) = &self.hook_specific_output {
                    context.check($event, issues);
                }
                self.common.check_common(issues);
            }
        }
    };
}

context_decision_output! {
    /// Feedback after a tool ran. `block` prompts Claude with the reason.
    PostToolUseOutput => HookEvent::PostToolUse
}

context_decision_output! {
    /// `block` erases the prompt from context and shows the reason to the user.
    UserPromptSubmitOutput => HookEvent::UserPromptSubmit
}

// ============================================================================
// Stop / SubagentStop
// ============================================================================

/// `block` keeps Claude working; the reason tells it how to proceed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopOutput {
    #[serde(flatten)]
    pub decision: Decision,
    #[serde(flatten)]
    pub common: CommonOutput,
}

impl StopOutput {
    pub fn allow() -> Self {
        Self::default()
    }

    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::block(reason),
            common: CommonOutput::default(),
        }
    }
}

impl HookOutput for StopOutput {
    fn locate_flattened(value: &Value, issues: &mut Vec<Issue>) {
        locate_decision(value, issues);
        locate_common(value, issues);
    }

    fn check(&self, issues: &mut Vec<Issue>) {
        self.common.check_common(issues);
    }
}

pub type SubagentStopOutput = StopOutput;

// ============================================================================
// SessionStart
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStartOutput {
    /// Multiple hooks' contexts are concatenated by the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_specific_output: Option<ContextOutput>,
    #[serde(flatten)]
    pub common: CommonOutput,
}

impl SessionStartOutput {
    pub fn with_context(context: impl Into<String>) -> Self {
        Self {
            hook_specific_output: Some(ContextOutput {
                hook_event_name: HookEvent::SessionStart,
                additional_context: context.into(),
            }),
            common: CommonOutput::default(),
        }
    }
}

impl HookOutput for SessionStartOutput {
    fn locate_flattened(value: &Value, issues: &mut Vec<Issue>) {
        locate_common(value, issues);
    }

    fn check(&self, issues: &mut Vec<Issue>) {
        if let Some(context) = &self.hook_specific_output {
            context.check(HookEvent::SessionStart, issues);
        }
        self.common.check_common(issues);
    }
}
