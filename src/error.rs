use thiserror::Error;

use crate::hooks::pipeline::Stage;
use crate::models::validation::SchemaViolation;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("stdin exceeded maximum buffer size of {limit} bytes")]
    InputTooLarge { limit: usize },

    #[error("No data was sent over stdin")]
    EmptyInput,

    #[error("stdin was not valid JSON: {source}")]
    MalformedJson {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("Input validation failed:\n{violation}")]
    InputSchemaViolation {
        violation: SchemaViolation,
        raw: String,
    },

    #[error("Output validation failed:\n{violation}")]
    OutputSchemaViolation {
        violation: SchemaViolation,
        value: serde_json::Value,
    },

    #[error("Hook handler failed: {0}")]
    UserLogicFailure(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Invalid environment variable name: {0:?}. Must match ^[A-Za-z_][A-Za-z0-9_]*$")]
    EnvVarNameInvalid(String),

    #[error("CLAUDE_ENV_FILE is only set in `SessionStart` hooks")]
    CapabilityUnavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HookError {
    /// Pipeline stage this error terminates, if it belongs to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::InputTooLarge { .. }
            | Self::EmptyInput
            | Self::MalformedJson { .. }
            | Self::InputSchemaViolation { .. } => Some(Stage::ValidatingInput),
            Self::UserLogicFailure(_) => Some(Stage::RunningUserLogic),
            Self::OutputSchemaViolation { .. } => Some(Stage::ValidatingOutput),
            Self::EnvVarNameInvalid(_) | Self::CapabilityUnavailable => None,
            Self::Io(_) | Self::Json(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HookError>;
