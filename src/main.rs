//! claude-code-hook: reference hooks for every Claude Code lifecycle event.
//!
//! Register a subcommand as a hook command in settings.json, e.g.
//! `claude-code-hook pre-tool-use`. The process reads one JSON request from
//! stdin and prints at most one JSON answer on stdout.

use clap::Parser;

use claude_code_hook::{builtin, hooks, Cli, Command};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::PreToolUse => hooks::pre_tool_use(builtin::pre_tool_use).await,
        Command::PostToolUse => hooks::post_tool_use(builtin::post_tool_use).await,
        Command::Notification => hooks::notification(builtin::notification).await,
        Command::UserPromptSubmit => {
            hooks::user_prompt_submit(builtin::user_prompt_submit).await
        }
        Command::Stop => hooks::stop(builtin::stop).await,
        Command::SubagentStop => hooks::subagent_stop(builtin::subagent_stop).await,
        Command::PreCompact => hooks::pre_compact(builtin::pre_compact).await,
        Command::SessionStart { exports } => {
            hooks::session_start(|input, ctx| builtin::session_start(input, ctx, exports)).await
        }
        Command::SessionEnd => hooks::session_end(builtin::session_end).await,
        Command::Generic => hooks::generic(builtin::generic).await,
    }
}
