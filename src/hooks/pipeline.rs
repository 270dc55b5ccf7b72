//! The path every hook invocation takes: read stdin, validate the input,
//! run the handler, validate its output, print it.

use std::fmt;
use std::future::Future;

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, info_span, Instrument};

use crate::config::HookConfig;
use crate::env_file::{self, EnvFile};
use crate::error::{HookError, Result};
use crate::models::{HookInput, HookOutput};
use crate::stdin::read_request;

/// Where an invocation is. Failure is possible from every stage; there is
/// no way back to an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidatingInput,
    RunningUserLogic,
    ValidatingOutput,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ValidatingInput => "VALIDATING_INPUT",
            Self::RunningUserLogic => "RUNNING_USER_LOGIC",
            Self::ValidatingOutput => "VALIDATING_OUTPUT",
        })
    }
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler returned nothing; stdout was left untouched.
    Empty,
    /// The JSON line written to stdout, without its newline.
    Written(String),
}

/// What a handler gets besides its input.
#[derive(Debug, Clone)]
pub struct HookContext {
    event: String,
    config: HookConfig,
}

impl HookContext {
    pub fn new(event: impl Into<String>, config: HookConfig) -> Self {
        Self {
            event: event.into(),
            config,
        }
    }

    /// `hook_event_name` of the validated input.
    pub fn event_name(&self) -> &str {
        &self.event
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// The `CLAUDE_ENV_FILE` target. Only `SessionStart` hooks get one.
    pub fn env_file(&self) -> Result<EnvFile> {
        EnvFile::from_config(&self.config)
    }

    /// Append `export NAME='value'` for later Bash tool calls.
    pub async fn persist_env_var(&self, name: &str, value: &str) -> Result<()> {
        if !env_file::is_valid_name(name) {
            return Err(HookError::EnvVarNameInvalid(name.to_string()));
        }
        self.env_file()?.persist(name, value).await
    }
}

pub struct Pipeline {
    config: HookConfig,
}

impl Pipeline {
    pub fn new(config: HookConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Run one invocation. At most one line is written to `writer`, and only
    /// after the output has been validated.
    pub async fn run<I, O, F, Fut, R, W>(
        &self,
        reader: &mut R,
        writer: &mut W,
        handler: F,
    ) -> Result<Outcome>
    where
        I: HookInput,
        O: HookOutput,
        F: FnOnce(I, HookContext) -> Fut,
        Fut: Future<Output = anyhow::Result<Option<O>>>,
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let event = I::EVENT.map(|event| event.as_str()).unwrap_or("Generic");
        info!(event, "Hook execution started");

        let input = self.read_input::<I, R>(reader).await?;

        debug!(stage = %Stage::RunningUserLogic, "Running handler");
        let context = HookContext::new(input.envelope().hook_event_name.clone(), self.config.clone());
        let output = handler(input, context)
            .instrument(info_span!("handler", event))
            .await
            .map_err(|err| {
                error!(stage = %Stage::RunningUserLogic, error = %format!("{err:#}"), "Handler failed");
                HookError::UserLogicFailure(err.into())
            })?;

        debug!(stage = %Stage::ValidatingOutput, "Validating output");
        let Some(output) = output else {
            info!("Handler returned no output");
            info!(event, "Hook execution complete");
            return Ok(Outcome::Empty);
        };

        let value = serde_json::to_value(&output)?;
        let validated = match O::parse(value.clone()) {
            Ok(validated) => validated,
            Err(violation) => {
                error!(stage = %Stage::ValidatingOutput, output = %value, "Output validation failed:\n{violation}");
                return Err(HookError::OutputSchemaViolation { violation, value });
            }
        };

        let line = serde_json::to_string(&validated)?;
        info!(output = %line, "Sending output");
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        info!(event, "Hook execution complete");
        Ok(Outcome::Written(line))
    }

    async fn read_input<I, R>(&self, reader: &mut R) -> Result<I>
    where
        I: HookInput,
        R: AsyncRead + Unpin,
    {
        debug!(stage = %Stage::ValidatingInput, limit = self.config.max_input_bytes, "Reading stdin");
        let raw = read_request(reader, self.config.max_input_bytes).await?;
        debug!(bytes = raw.len(), "Read stdin");

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(source) => {
                error!(stage = %Stage::ValidatingInput, raw = %raw, "stdin is not valid JSON: {source}");
                return Err(HookError::MalformedJson { source, raw });
            }
        };

        match I::parse(value) {
            Ok(input) => {
                debug!(?input, "Input parsed");
                Ok(input)
            }
            Err(violation) => {
                error!(stage = %Stage::ValidatingInput, raw = %raw, "Input validation failed:\n{violation}");
                Err(HookError::InputSchemaViolation { violation, raw })
            }
        }
    }
}
