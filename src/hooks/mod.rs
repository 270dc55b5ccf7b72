//! One entry point per lifecycle event.
//!
//! Each function pairs the event's input type with its output type, so a hook
//! binary only supplies the handler:
//!
//! ```no_run
//! use claude_code_hook::hooks::{self, HookContext};
//! use claude_code_hook::models::{StopInput, StopOutput};
//!
//! #[tokio::main]
//! async fn main() {
//!     hooks::stop(|input: StopInput, _ctx: HookContext| async move {
//!         if input.stop_hook_active {
//!             return anyhow::Ok(None);
//!         }
//!         Ok(Some(StopOutput::block("Run the tests before stopping")))
//!     })
//!     .await;
//! }
//! ```

pub mod pipeline;

pub use pipeline::{HookContext, Outcome, Pipeline, Stage};

use std::future::Future;

use crate::config::{HookConfig, LogConfig};
use crate::logging;
use crate::models::input::{
    GenericInput, NotificationInput, PostToolUseInput, PreCompactInput, PreToolUseInput,
    SessionEndInput, SessionStartInput, StopInput, SubagentStopInput, UserPromptSubmitInput,
};
use crate::models::output::{
    GenericOutput, NotificationOutput, PostToolUseOutput, PreCompactOutput, PreToolUseOutput,
    SessionEndOutput, SessionStartOutput, StopOutput, SubagentStopOutput, UserPromptSubmitOutput,
};
use crate::models::{HookInput, HookOutput};

/// Run `handler` as this process's hook: configuration and logging come from
/// the environment, the request from stdin, the answer goes to stdout. Any
/// failure is reported on stderr and exits the process with status 1.
pub async fn dispatch<I, O, F, Fut>(handler: F)
where
    I: HookInput,
    O: HookOutput,
    F: FnOnce(I, HookContext) -> Fut,
    Fut: Future<Output = anyhow::Result<Option<O>>>,
{
    logging::init(&LogConfig::from_env());
    let pipeline = Pipeline::new(HookConfig::from_env());

    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    if let Err(err) = pipeline.run(&mut stdin, &mut stdout, handler).await {
        let stage = err
            .stage()
            .map(|stage| stage.to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string());
        tracing::error!(stage, "Hook execution failed");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

macro_rules! hook_surface {
    ($($(#[$meta:meta])* $name:ident($input:ty) -> $output:ty;)+) => {
        $(
            $(#[$meta])*
            pub async fn $name<F, Fut>(handler: F)
            where
                F: FnOnce($input, HookContext) -> Fut,
                Fut: Future<Output = anyhow::Result<Option<$output>>>,
            {
                dispatch::<$input, $output, F, Fut>(handler).await
            }
        )+
    };
}

hook_surface! {
    /// Before a tool runs. The output can allow, deny or ask about the call.
    pre_tool_use(PreToolUseInput) -> PreToolUseOutput;

    /// After a tool finished successfully.
    post_tool_use(PostToolUseInput) -> PostToolUseOutput;

    /// When Claude Code sends a notification.
    notification(NotificationInput) -> NotificationOutput;

    /// When the user submits a prompt, before Claude sees it.
    user_prompt_submit(UserPromptSubmitInput) -> UserPromptSubmitOutput;

    /// When the main agent finishes responding.
    stop(StopInput) -> StopOutput;

    /// When a subagent (Task tool call) finishes responding.
    subagent_stop(SubagentStopInput) -> SubagentStopOutput;

    /// Before a compaction.
    pre_compact(PreCompactInput) -> PreCompactOutput;

    /// When a session starts or resumes. The only event whose context can
    /// persist environment variables.
    session_start(SessionStartInput) -> SessionStartOutput;

    /// When a session ends.
    session_end(SessionEndInput) -> SessionEndOutput;

    /// Any event, including ones this crate does not know yet.
    generic(GenericInput) -> GenericOutput;
}
