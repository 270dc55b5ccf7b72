//! Tool-specific payloads for `PreToolUse` and `PostToolUse`.
//!
//! The tool name picks the variant. Names outside the known set (including
//! MCP tools such as `mcp__github__search_repositories`) fall back to
//! [`PreToolCall::Other`] / [`PostToolCall::Other`] with open payloads, so a
//! new tool never makes parsing fail.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::validation::FieldReader;

/// Open JSON object used where a tool's payload has no fixed shape.
pub type JsonObject = Map<String, Value>;

/// Response of a known tool whose result shape is not pinned down.
pub type ToolResponse = JsonObject;

// ============================================================================
// Tool arguments
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadInput {
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteInput {
    pub file_path: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditInput {
    pub file_path: String,
    pub old_string: String,
    pub new_string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_all: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobInput {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotebookEditMode {
    Replace,
    Insert,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookEditInput {
    pub notebook_path: String,
    pub new_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_type: Option<CellType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_mode: Option<NotebookEditMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BashInput {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_in_background: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrepOutputMode {
    Content,
    FilesWithMatches,
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrepInput {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_mode: Option<GrepOutputMode>,
    #[serde(rename = "-B", default, skip_serializing_if = "Option::is_none")]
    pub lines_before: Option<u64>,
    #[serde(rename = "-A", default, skip_serializing_if = "Option::is_none")]
    pub lines_after: Option<u64>,
    #[serde(rename = "-C", default, skip_serializing_if = "Option::is_none")]
    pub lines_context: Option<u64>,
    #[serde(rename = "-n", default, skip_serializing_if = "Option::is_none")]
    pub line_numbers: Option<bool>,
    #[serde(rename = "-i", default, skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiline: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    pub description: String,
    pub prompt: String,
    pub subagent_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub content: String,
    pub status: TodoStatus,
    pub active_form: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoWriteInput {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebFetchInput {
    pub url: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchInput {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_domains: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlashCommandInput {
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BashOutputInput {
    pub bash_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillShellInput {
    pub shell_id: String,
}

// ============================================================================
// Tool responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BashResponse {
    pub stdout: String,
    pub stderr: String,
    pub interrupted: bool,
    #[serde(default)]
    pub is_image: bool,
}

// ============================================================================
// Taxonomy
// ============================================================================

/// Arguments and result of one completed tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolExchange<I, R> {
    pub tool_input: I,
    pub tool_response: R,
}

/// A `PreToolUse` call to a tool outside the known set.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherToolInput {
    /// Raw tool name, e.g. `mcp__github__search_repositories`.
    pub tool_name: String,
    pub tool_input: JsonObject,
}

/// A `PostToolUse` call to a tool outside the known set.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherToolExchange {
    pub tool_name: String,
    pub tool_input: JsonObject,
    /// Kept exactly as received. Some MCP servers deliver a JSON-encoded
    /// string here rather than an object.
    pub tool_response: Value,
}

impl OtherToolExchange {
    /// The response as an object, decoding it first when it arrived as a
    /// JSON-encoded string.
    pub fn decoded_response(&self) -> Option<JsonObject> {
        match &self.tool_response {
            Value::Object(object) => Some(object.clone()),
            Value::String(text) => match serde_json::from_str(text) {
                Ok(Value::Object(object)) => Some(object),
                _ => None,
            },
            _ => None,
        }
    }
}

macro_rules! tool_taxonomy {
    ($( $variant:ident => $input:ty, $response:ty; )*) => {
        /// Discriminator derived from a raw tool name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ToolKind {
            $( $variant, )*
            Other,
        }

        impl ToolKind {
            /// Every tool with a dedicated schema.
            pub const KNOWN: &'static [ToolKind] = &[$( ToolKind::$variant ),*];

            /// Exact-match classification; anything unknown is `Other`.
            pub fn classify(tool_name: &str) -> Self {
                match tool_name {
                    $( stringify!($variant) => Self::$variant, )*
                    _ => Self::Other,
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant), )*
                    Self::Other => "Other",
                }
            }
        }

        /// Tool call attached to a `PreToolUse` payload.
        #[derive(Debug, Clone, PartialEq)]
        pub enum PreToolCall {
            $( $variant($input), )*
            Other(OtherToolInput),
        }

        impl PreToolCall {
            pub(crate) fn read(
                fields: &mut FieldReader,
                tool_name: String,
                tool_input: Value,
            ) -> Option<Self> {
                match ToolKind::classify(&tool_name) {
                    $( ToolKind::$variant => fields.decode("tool_input", tool_input).map(Self::$variant), )*
                    ToolKind::Other => {
                        let tool_input = fields.decode("tool_input", tool_input)?;
                        Some(Self::Other(OtherToolInput { tool_name, tool_input }))
                    }
                }
            }

            pub fn kind(&self) -> ToolKind {
                match self {
                    $( Self::$variant(_) => ToolKind::$variant, )*
                    Self::Other(_) => ToolKind::Other,
                }
            }

            /// The tool name as Claude Code sent it.
            pub fn tool_name(&self) -> &str {
                match self {
                    Self::Other(other) => &other.tool_name,
                    known => known.kind().as_str(),
                }
            }
        }

        /// Tool call and its result attached to a `PostToolUse` payload.
        #[derive(Debug, Clone, PartialEq)]
        pub enum PostToolCall {
            $( $variant(ToolExchange<$input, $response>), )*
            Other(OtherToolExchange),
        }

        impl PostToolCall {
            pub(crate) fn read(
                fields: &mut FieldReader,
                tool_name: String,
                tool_input: Value,
                tool_response: Value,
            ) -> Option<Self> {
                match ToolKind::classify(&tool_name) {
                    $(
                        ToolKind::$variant => {
                            let tool_input = fields.decode("tool_input", tool_input);
                            let tool_response = fields.decode("tool_response", tool_response);
                            Some(Self::$variant(ToolExchange {
                                tool_input: tool_input?,
                                tool_response: tool_response?,
                            }))
                        }
                    )*
                    ToolKind::Other => {
                        let tool_input = fields.decode("tool_input", tool_input)?;
                        Some(Self::Other(OtherToolExchange {
                            tool_name,
                            tool_input,
                            tool_response,
                        }))
                    }
                }
            }

            pub fn kind(&self) -> ToolKind {
                match self {
                    $( Self::$variant(_) => ToolKind::$variant, )*
                    Self::Other(_) => ToolKind::Other,
                }
            }

            /// The tool name as Claude Code sent it.
            pub fn tool_name(&self) -> &str {
                match self {
                    Self::Other(other) => &other.tool_name,
                    known => known.kind().as_str(),
                }
            }
        }
    };
}

tool_taxonomy! {
    Read => ReadInput, ToolResponse;
    Write => WriteInput, ToolResponse;
    Edit => EditInput, ToolResponse;
    Glob => GlobInput, ToolResponse;
    NotebookEdit => NotebookEditInput, ToolResponse;
    Bash => BashInput, BashResponse;
    Grep => GrepInput, ToolResponse;
    Task => TaskInput, ToolResponse;
    TodoWrite => TodoWriteInput, ToolResponse;
    WebFetch => WebFetchInput, ToolResponse;
    WebSearch => WebSearchInput, ToolResponse;
    SlashCommand => SlashCommandInput, ToolResponse;
    BashOutput => BashOutputInput, ToolResponse;
    KillShell => KillShellInput, ToolResponse;
}
