//! Reference hooks run by the `claude-code-hook` binary.
//!
//! The decision logic is kept in plain functions so it can be tested without
//! going through stdin and stdout.

use tracing::info;

use crate::hooks::HookContext;
use crate::models::input::{
    CompactTrigger, GenericInput, NotificationInput, PostToolUseInput, PreCompactInput,
    PreToolUseInput, SessionEndInput, SessionSource, SessionStartInput, StopInput,
    SubagentStopInput, UserPromptSubmitInput,
};
use crate::models::output::{
    GenericOutput, NotificationOutput, PostToolUseOutput, PreCompactOutput, PreToolUseOutput,
    SessionEndOutput, SessionStartOutput, StopOutput, SubagentStopOutput, UserPromptSubmitOutput,
};
use crate::models::tools::{PostToolCall, PreToolCall};

const DANGEROUS_PROMPTS: [&str; 2] = ["delete production", "drop database"];

// ============================================================================
// Decisions
// ============================================================================

pub fn pre_tool_use_decision(input: &PreToolUseInput) -> PreToolUseOutput {
    match &input.tool {
        PreToolCall::Write(_) => PreToolUseOutput::deny("Write operations are blocked by this hook"),
        _ => PreToolUseOutput::allow("Tool is allowed"),
    }
}

pub fn post_tool_use_decision(input: &PostToolUseInput) -> PostToolUseOutput {
    match &input.tool {
        PostToolCall::Bash(exchange) if exchange.tool_response.interrupted => {
            PostToolUseOutput::allow().with_context("Command was interrupted")
        }
        _ => PostToolUseOutput::allow(),
    }
}

pub fn user_prompt_submit_decision(input: &UserPromptSubmitInput) -> UserPromptSubmitOutput {
    let prompt = input.prompt.to_lowercase();

    if DANGEROUS_PROMPTS.iter().any(|pattern| prompt.contains(pattern)) {
        return UserPromptSubmitOutput::block(
            "Dangerous operations blocked in production environment",
        );
    }

    if prompt.contains("test") {
        return UserPromptSubmitOutput::allow()
            .with_context("You are working on tests. Prioritize test-related suggestions.");
    }

    UserPromptSubmitOutput::allow()
}

/// Blocks once; a stop already driven by a stop hook goes through.
pub fn stop_decision(stop_hook_active: bool, reason: &str) -> StopOutput {
    if stop_hook_active {
        StopOutput::allow()
    } else {
        StopOutput::block(reason)
    }
}

pub fn session_start_context(source: SessionSource) -> &'static str {
    match source {
        SessionSource::Startup => "Fresh session started",
        SessionSource::Resume => "Resuming previous session",
        SessionSource::Clear => "Session cleared, starting fresh",
        SessionSource::Compact => "Session restarted after compaction",
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn pre_tool_use(
    input: PreToolUseInput,
    _ctx: HookContext,
) -> anyhow::Result<Option<PreToolUseOutput>> {
    Ok(Some(pre_tool_use_decision(&input)))
}

pub async fn post_tool_use(
    input: PostToolUseInput,
    _ctx: HookContext,
) -> anyhow::Result<Option<PostToolUseOutput>> {
    match &input.tool {
        PostToolCall::Write(exchange) => info!("Modified: {}", exchange.tool_input.file_path),
        PostToolCall::Edit(exchange) => info!("Modified: {}", exchange.tool_input.file_path),
        _ => {}
    }
    Ok(Some(post_tool_use_decision(&input)))
}

pub async fn notification(
    input: NotificationInput,
    _ctx: HookContext,
) -> anyhow::Result<Option<NotificationOutput>> {
    info!("[NOTIFICATION] {}", input.message);
    Ok(None)
}

pub async fn user_prompt_submit(
    input: UserPromptSubmitInput,
    _ctx: HookContext,
) -> anyhow::Result<Option<UserPromptSubmitOutput>> {
    Ok(Some(user_prompt_submit_decision(&input)))
}

pub async fn stop(input: StopInput, _ctx: HookContext) -> anyhow::Result<Option<StopOutput>> {
    Ok(Some(stop_decision(
        input.stop_hook_active,
        "Please verify the changes before stopping",
    )))
}

pub async fn subagent_stop(
    input: SubagentStopInput,
    _ctx: HookContext,
) -> anyhow::Result<Option<SubagentStopOutput>> {
    Ok(Some(stop_decision(
        input.stop_hook_active,
        "Please provide a summary of completed work",
    )))
}

pub async fn pre_compact(
    input: PreCompactInput,
    _ctx: HookContext,
) -> anyhow::Result<Option<PreCompactOutput>> {
    match &input.trigger {
        CompactTrigger::Auto => info!("[COMPACT] Auto compaction triggered"),
        CompactTrigger::Manual {
            custom_instructions,
        } => info!(
            "[COMPACT] Manual compaction with instructions: {}",
            custom_instructions.as_deref().unwrap_or("none")
        ),
    }
    Ok(None)
}

/// Adds context for the session source, then persists each `(name, value)`
/// pair to `CLAUDE_ENV_FILE`.
pub async fn session_start(
    input: SessionStartInput,
    ctx: HookContext,
    exports: Vec<(String, String)>,
) -> anyhow::Result<Option<SessionStartOutput>> {
    for (name, value) in &exports {
        ctx.persist_env_var(name, value).await?;
    }
    Ok(Some(SessionStartOutput::with_context(session_start_context(
        input.source,
    ))))
}

pub async fn session_end(
    input: SessionEndInput,
    _ctx: HookContext,
) -> anyhow::Result<Option<SessionEndOutput>> {
    info!("[SESSION_END] Reason: {:?}", input.reason);
    Ok(None)
}

pub async fn generic(
    input: GenericInput,
    _ctx: HookContext,
) -> anyhow::Result<Option<GenericOutput>> {
    info!(
        event = %input.envelope.hook_event_name,
        fields = input.extra.len(),
        "Received hook event"
    );
    Ok(None)
}
