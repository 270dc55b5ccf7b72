pub mod envelope;
pub mod input;
pub mod output;
pub mod tools;
pub mod validation;

pub use envelope::{Envelope, HookEvent, PermissionMode};
pub use input::{
    CompactTrigger, GenericInput, HookInput, NotificationInput, PostToolUseInput, PreCompactInput,
    PreToolUseInput, SessionEndInput, SessionEndReason, SessionSource, SessionStartInput,
    StopInput, SubagentStopInput, UserPromptSubmitInput,
};
pub use output::{
    CommonOutput, ContextOutput, Decision, GenericOutput, HookOutput, NotificationOutput,
    PermissionDecision, PermissionOutput, PostToolUseOutput, PreCompactOutput, PreToolUseOutput,
    SessionEndOutput, SessionStartOutput, StopOutput, SubagentStopOutput, UserPromptSubmitOutput,
};
pub use tools::{JsonObject, OtherToolExchange, OtherToolInput, PostToolCall, PreToolCall, ToolKind};
pub use validation::{Issue, SchemaViolation};
