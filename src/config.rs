use std::path::PathBuf;

/// Default stdin limit: 10 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

pub const MAX_INPUT_BYTES_VAR: &str = "CLAUDE_CODE_HOOK_STDIN_MAX_BUF_LEN";
pub const ENV_FILE_VAR: &str = "CLAUDE_ENV_FILE";
pub const LOG_FILE_VAR: &str = "CLAUDE_CODE_HOOK_LOG_FILE";
pub const LOG_FILTER_VAR: &str = "CLAUDE_CODE_HOOK_LOG";

/// Applies to every crate, so a hook binary's own records are kept.
const DEFAULT_LOG_FILTER: &str = "info";

/// Per-process settings for the validation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
    /// Upper bound on bytes read from stdin.
    pub max_input_bytes: usize,
    /// Target of environment persistence. Only set for `SessionStart` hooks.
    pub env_file: Option<PathBuf>,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            env_file: None,
        }
    }
}

impl HookConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_input_bytes = match lookup(MAX_INPUT_BYTES_VAR) {
            None => DEFAULT_MAX_INPUT_BYTES,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "Ignoring invalid {MAX_INPUT_BYTES_VAR}, using {DEFAULT_MAX_INPUT_BYTES}"
                    );
                    DEFAULT_MAX_INPUT_BYTES
                }
            },
        };

        Self {
            max_input_bytes,
            env_file: non_empty_path(lookup(ENV_FILE_VAR)),
        }
    }
}

/// Where diagnostics go and how verbose they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log file; `None` logs to stderr only.
    pub file: Option<PathBuf>,
    /// `EnvFilter` directive.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: Some(Self::default_log_path()),
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let file = non_empty_path(lookup(LOG_FILE_VAR)).unwrap_or_else(Self::default_log_path);
        let filter = lookup(LOG_FILTER_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            file: Some(file),
            filter,
        }
    }

    /// ~/.claude/hooks.log, or /tmp/claude/hooks.log without a home directory.
    pub fn default_log_path() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".claude"))
            .unwrap_or_else(|| PathBuf::from("/tmp/claude"))
            .join("hooks.log")
    }
}

fn non_empty_path(value: Option<String>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = HookConfig::from_lookup(lookup(&[]));
        assert_eq!(config.max_input_bytes, 10 * 1024 * 1024);
        assert!(config.env_file.is_none());
        assert_eq!(config, HookConfig::default());
    }

    #[test]
    fn test_max_input_bytes_from_env() {
        let config = HookConfig::from_lookup(lookup(&[(MAX_INPUT_BYTES_VAR, "4096")]));
        assert_eq!(config.max_input_bytes, 4096);
    }

    #[test]
    fn test_invalid_max_input_bytes_falls_back() {
        for raw in ["lots", "-5", "0", ""] {
            let config = HookConfig::from_lookup(lookup(&[(MAX_INPUT_BYTES_VAR, raw)]));
            assert_eq!(config.max_input_bytes, DEFAULT_MAX_INPUT_BYTES, "value {raw:?}");
        }
    }

    #[test]
    fn test_env_file_empty_is_unset() {
        let config = HookConfig::from_lookup(lookup(&[(ENV_FILE_VAR, "")]));
        assert!(config.env_file.is_none());

        let config = HookConfig::from_lookup(lookup(&[(ENV_FILE_VAR, "/tmp/env.sh")]));
        assert_eq!(config.env_file, Some(PathBuf::from("/tmp/env.sh")));
    }

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::from_lookup(lookup(&[]));
        assert_eq!(config.filter, "info");
        let path = config.file.unwrap();
        assert!(path.ends_with("hooks.log"));
        assert!(path.to_string_lossy().contains("claude"));
    }

    #[test]
    fn test_log_config_overrides() {
        let config = LogConfig::from_lookup(lookup(&[
            (LOG_FILE_VAR, "/var/log/hooks.log"),
            (LOG_FILTER_VAR, "debug"),
        ]));
        assert_eq!(config.file, Some(PathBuf::from("/var/log/hooks.log")));
        assert_eq!(config.filter, "debug");
    }
}
