pub mod builtin;
pub mod cli;
pub mod config;
pub mod env_file;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod models;
pub mod stdin;
pub mod testing;

pub use cli::{Cli, Command};
pub use config::{HookConfig, LogConfig};
pub use env_file::{persist_env_var, EnvFile};
pub use error::{HookError, Result};
pub use hooks::{
    dispatch, generic, notification, post_tool_use, pre_compact, pre_tool_use, session_end,
    session_start, stop, subagent_stop, user_prompt_submit, HookContext, Outcome, Pipeline, Stage,
};
pub use models::{HookEvent, HookInput, HookOutput, SchemaViolation};
