//! Integration tests for the hook binary
//!
//! Each test runs `claude-code-hook <event>` as Claude Code would: one JSON
//! request on stdin, at most one JSON line on stdout, exit status as verdict.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

use claude_code_hook::testing::HookRunner;

const BIN: &str = env!("CARGO_BIN_EXE_claude-code-hook");

/// Command with logging redirected into `logs` and no inherited env file.
fn hook(logs: &TempDir, event: &str) -> Command {
    let mut cmd = Command::cargo_bin("claude-code-hook").unwrap();
    cmd.arg(event)
        .env("CLAUDE_CODE_HOOK_LOG_FILE", logs.path().join("hooks.log"))
        .env_remove("CLAUDE_ENV_FILE")
        .env_remove("CLAUDE_CODE_HOOK_STDIN_MAX_BUF_LEN");
    cmd
}

fn runner(logs: &TempDir, event: &str) -> HookRunner {
    HookRunner::new(BIN)
        .arg(event)
        .env("CLAUDE_CODE_HOOK_LOG_FILE", logs.path().join("hooks.log"))
        .env_remove("CLAUDE_ENV_FILE")
        .env_remove("CLAUDE_CODE_HOOK_STDIN_MAX_BUF_LEN")
}

fn payload(event: &str, extra: Value) -> Value {
    let mut value = json!({
        "hook_event_name": event,
        "session_id": "test-session",
        "transcript_path": "/tmp/transcript.json",
        "cwd": "/tmp"
    });
    for (key, v) in extra.as_object().unwrap() {
        value[key] = v.clone();
    }
    value
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_cli_help_displays() {
    Command::cargo_bin("claude-code-hook")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Validated Claude Code hooks"));
}

#[test]
fn test_unknown_event_fails() {
    Command::cargo_bin("claude-code-hook")
        .unwrap()
        .arg("post-compact")
        .assert()
        .failure();
}

// ============================================================================
// Protocol
// ============================================================================

#[test]
fn test_stop_block_is_one_json_line() {
    let logs = TempDir::new().unwrap();
    hook(&logs, "stop")
        .write_stdin(
            r#"{"hook_event_name":"Stop","session_id":"s","transcript_path":"/t","cwd":"/c","stop_hook_active":false}"#,
        )
        .assert()
        .success()
        .stdout(
            "{\"decision\":\"block\",\"reason\":\"Please verify the changes before stopping\",\"suppressOutput\":false,\"continue\":true}\n",
        );
}

#[test]
fn test_malformed_json_fails_with_empty_stdout() {
    let logs = TempDir::new().unwrap();
    hook(&logs, "stop")
        .write_stdin("{not json")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_empty_stdin_fails() {
    let logs = TempDir::new().unwrap();
    hook(&logs, "notification")
        .write_stdin("  \n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No data was sent over stdin"));
}

#[test]
fn test_wrong_event_tag_fails() {
    let logs = TempDir::new().unwrap();
    let input = payload("PostToolUse", json!({"tool_name": "Read", "tool_input": {"file_path": "/a"}}));
    hook(&logs, "pre-tool-use")
        .write_stdin(input.to_string())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Input validation failed"))
        .stderr(predicate::str::contains("hook_event_name"));
}

#[test]
fn test_stdin_limit_from_env() {
    let logs = TempDir::new().unwrap();
    let input = payload("Notification", json!({"message": "hello"}));
    hook(&logs, "notification")
        .env("CLAUDE_CODE_HOOK_STDIN_MAX_BUF_LEN", "10")
        .write_stdin(input.to_string())
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeded maximum buffer size of 10 bytes"));
}

#[test]
fn test_no_output_exits_zero() {
    let logs = TempDir::new().unwrap();
    let input = payload("Notification", json!({"message": "Claude is waiting for your input"}));
    hook(&logs, "notification")
        .write_stdin(input.to_string())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_log_file_records_execution() {
    let logs = TempDir::new().unwrap();
    let input = payload("SessionEnd", json!({"reason": "logout"}));
    hook(&logs, "session-end")
        .write_stdin(input.to_string())
        .assert()
        .success();

    let log = std::fs::read_to_string(logs.path().join("hooks.log")).unwrap();
    assert!(log.contains("Hook execution started"));
    assert!(log.contains("Hook execution complete"));
}

// ============================================================================
// Reference hooks
// ============================================================================

#[tokio::test]
async fn test_pre_tool_use_denies_write() {
    let logs = TempDir::new().unwrap();
    let run = runner(&logs, "pre-tool-use")
        .run(&payload(
            "PreToolUse",
            json!({
                "permission_mode": "default",
                "tool_name": "Write",
                "tool_input": {"file_path": "/tmp/test.txt", "content": "test content"}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(run.status, 0);
    let output = &run.stdout.json()["hookSpecificOutput"];
    assert_eq!(output["hookEventName"], "PreToolUse");
    assert_eq!(output["permissionDecision"], "deny");
    assert_eq!(
        output["permissionDecisionReason"],
        "Write operations are blocked by this hook"
    );
}

#[tokio::test]
async fn test_pre_tool_use_allows_read() {
    let logs = TempDir::new().unwrap();
    let run = runner(&logs, "pre-tool-use")
        .run(&payload(
            "PreToolUse",
            json!({"tool_name": "Read", "tool_input": {"file_path": "/tmp/test.txt"}}),
        ))
        .await
        .unwrap();

    assert!(run.success());
    assert_eq!(run.stdout.json()["hookSpecificOutput"]["permissionDecision"], "allow");
}

#[tokio::test]
async fn test_post_tool_use_interrupted_bash() {
    let logs = TempDir::new().unwrap();
    let run = runner(&logs, "post-tool-use")
        .run(&payload(
            "PostToolUse",
            json!({
                "tool_name": "Bash",
                "tool_input": {"command": "sleep 100", "description": "Wait"},
                "tool_response": {"stdout": "", "stderr": "", "interrupted": true, "isImage": false}
            }),
        ))
        .await
        .unwrap();

    assert!(run.success());
    assert_eq!(run.stdout.json()["decision"], "allow");
    assert_eq!(
        run.stdout.json()["hookSpecificOutput"]["additionalContext"],
        "Command was interrupted"
    );
}

#[tokio::test]
async fn test_post_tool_use_mcp_string_response() {
    let logs = TempDir::new().unwrap();
    let run = runner(&logs, "post-tool-use")
        .run(&payload(
            "PostToolUse",
            json!({
                "tool_name": "mcp__github__search_repositories",
                "tool_input": {"query": "rust"},
                "tool_response": "{\"total_count\": 1, \"items\": []}"
            }),
        ))
        .await
        .unwrap();

    assert!(run.success());
    assert_eq!(run.stdout.json()["decision"], "allow");
    assert!(run.stdout.json().get("hookSpecificOutput").is_none());
}

#[tokio::test]
async fn test_user_prompt_submit_blocks_dangerous_prompt() {
    let logs = TempDir::new().unwrap();
    let run = runner(&logs, "user-prompt-submit")
        .run(&payload(
            "UserPromptSubmit",
            json!({"prompt": "Delete production database"}),
        ))
        .await
        .unwrap();

    assert!(run.success());
    assert_eq!(run.stdout.json()["decision"], "block");
    assert_eq!(
        run.stdout.json()["reason"],
        "Dangerous operations blocked in production environment"
    );
}

#[tokio::test]
async fn test_user_prompt_submit_adds_test_context() {
    let logs = TempDir::new().unwrap();
    let run = runner(&logs, "user-prompt-submit")
        .run(&payload(
            "UserPromptSubmit",
            json!({"prompt": "Help me write a test for the login function"}),
        ))
        .await
        .unwrap();

    assert_eq!(run.stdout.json()["decision"], "allow");
    assert_eq!(
        run.stdout.json()["hookSpecificOutput"]["additionalContext"],
        "You are working on tests. Prioritize test-related suggestions."
    );
}

#[tokio::test]
async fn test_stop_allows_when_hook_active() {
    let logs = TempDir::new().unwrap();
    let run = runner(&logs, "stop")
        .run(&payload("Stop", json!({"stop_hook_active": true})))
        .await
        .unwrap();

    assert!(run.success());
    assert_eq!(run.stdout.json()["decision"], "allow");
    assert!(run.stdout.json().get("reason").is_none());
}

#[tokio::test]
async fn test_subagent_stop_blocks() {
    let logs = TempDir::new().unwrap();
    let run = runner(&logs, "subagent-stop")
        .run(&payload("SubagentStop", json!({"stop_hook_active": false})))
        .await
        .unwrap();

    assert_eq!(run.stdout.json()["decision"], "block");
    assert_eq!(
        run.stdout.json()["reason"],
        "Please provide a summary of completed work"
    );
}

#[tokio::test]
async fn test_pre_compact_manual_without_instructions() {
    let logs = TempDir::new().unwrap();
    let run = runner(&logs, "pre-compact")
        .run(&payload(
            "PreCompact",
            json!({"trigger": "manual", "custom_instructions": ""}),
        ))
        .await
        .unwrap();

    assert!(run.success());
    assert!(run.stdout.is_empty());
}

#[tokio::test]
async fn test_generic_accepts_unknown_event() {
    let logs = TempDir::new().unwrap();
    let run = runner(&logs, "generic")
        .run(&payload("SomeFutureEvent", json!({"anything": [1, 2, 3]})))
        .await
        .unwrap();

    assert!(run.success());
    assert!(run.stdout.is_empty());
}

// ============================================================================
// SessionStart and environment persistence
// ============================================================================

#[tokio::test]
async fn test_session_start_context_per_source() {
    let logs = TempDir::new().unwrap();
    for (source, context) in [
        ("startup", "Fresh session started"),
        ("resume", "Resuming previous session"),
        ("clear", "Session cleared, starting fresh"),
        ("compact", "Session restarted after compaction"),
    ] {
        let run = runner(&logs, "session-start")
            .run(&payload("SessionStart", json!({"source": source})))
            .await
            .unwrap();

        assert!(run.success(), "source {source}");
        let output = &run.stdout.json()["hookSpecificOutput"];
        assert_eq!(output["hookEventName"], "SessionStart");
        assert_eq!(output["additionalContext"], context);
    }
}

#[tokio::test]
async fn test_session_start_persists_exports() {
    let logs = TempDir::new().unwrap();
    let env_path = logs.path().join("env.sh");

    let run = runner(&logs, "session-start")
        .args(["--export", "TEST_VAR=it's a test", "--export", "_123=$HOME"])
        .env("CLAUDE_ENV_FILE", &env_path)
        .run(&payload("SessionStart", json!({"source": "startup"})))
        .await
        .unwrap();

    assert!(run.success());
    let content = std::fs::read_to_string(&env_path).unwrap();
    assert_eq!(
        content,
        "export TEST_VAR='it'\\''s a test'\nexport _123='$HOME'\n"
    );
}

#[tokio::test]
async fn test_session_start_invalid_name_writes_nothing() {
    let logs = TempDir::new().unwrap();
    let env_path = logs.path().join("env.sh");

    let run = runner(&logs, "session-start")
        .args(["--export", "MY-VAR=x"])
        .env("CLAUDE_ENV_FILE", &env_path)
        .run(&payload("SessionStart", json!({"source": "startup"})))
        .await
        .unwrap();

    assert_ne!(run.status, 0);
    assert!(run.stdout.is_empty());
    assert!(!env_path.exists());
}

#[tokio::test]
async fn test_session_start_export_without_env_file_fails() {
    let logs = TempDir::new().unwrap();
    let run = runner(&logs, "session-start")
        .args(["--export", "A=1"])
        .run(&payload("SessionStart", json!({"source": "startup"})))
        .await
        .unwrap();

    assert_ne!(run.status, 0);
    assert!(run.stdout.is_empty());
    assert!(run
        .stderr
        .text()
        .contains("CLAUDE_ENV_FILE is only set in `SessionStart` hooks"));
}
