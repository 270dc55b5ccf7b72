//! Structured schema errors and the field reader behind the validating
//! constructors in [`crate::models::input`].

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A single schema mismatch: where it happened and what was wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Dotted field path, empty for the document root.
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Every issue found while validating one value against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub issues: Vec<Issue>,
}

impl SchemaViolation {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![Issue::new(path, message)])
    }

    /// True when any issue points at `path`.
    pub fn mentions(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "✖ {}", issue.message)?;
            if !issue.path.is_empty() {
                write!(f, "\n  → at {}", issue.path)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for SchemaViolation {}

/// JSON type name used in "expected X, received Y" messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Pulls typed fields out of one JSON object, recording an [`Issue`] for each
/// field that is missing or has the wrong shape instead of stopping at the
/// first one.
pub(crate) struct FieldReader {
    object: Map<String, Value>,
    issues: Vec<Issue>,
}

impl FieldReader {
    pub fn new(value: Value) -> Result<Self, SchemaViolation> {
        match value {
            Value::Object(object) => Ok(Self {
                object,
                issues: Vec::new(),
            }),
            other => Err(SchemaViolation::single(
                "",
                format!("Invalid input: expected object, received {}", kind_of(&other)),
            )),
        }
    }

    /// Required field; a missing key or `null` is an issue.
    pub fn required<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.required_raw(key)?;
        self.decode(key, value)
    }

    /// Optional field; a missing key or `null` reads as `None`.
    pub fn optional<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        match self.object.remove(key) {
            None | Some(Value::Null) => None,
            Some(value) => self.decode(key, value),
        }
    }

    /// Required field left as raw JSON for a later, discriminated decode.
    pub fn required_raw(&mut self, key: &str) -> Option<Value> {
        match self.object.remove(key) {
            None | Some(Value::Null) => {
                self.issue(key, "Required field is missing");
                None
            }
            Some(value) => Some(value),
        }
    }

    /// Required string that must equal `expected` exactly.
    pub fn literal(&mut self, key: &str, expected: &str) -> Option<String> {
        let actual: String = self.required(key)?;
        if actual != expected {
            self.issue(
                key,
                format!("Invalid input: expected \"{expected}\", received \"{actual}\""),
            );
            return None;
        }
        Some(actual)
    }

    /// Decodes a value that came from `path` into `T`. Issues point at the
    /// innermost offending field below `path`.
    pub fn decode<T: DeserializeOwned>(&mut self, path: &str, value: Value) -> Option<T> {
        match decode_at(path, value) {
            Ok(decoded) => Some(decoded),
            Err(issue) => {
                self.issues.push(issue);
                None
            }
        }
    }

    pub fn issue(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue::new(path, message));
    }

    /// Keys nobody has read yet.
    pub fn into_rest(self) -> (Map<String, Value>, Vec<Issue>) {
        (self.object, self.issues)
    }

    /// Finishes the object: any recorded issue fails it, otherwise `build`
    /// assembles the typed value from the fields read so far.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, SchemaViolation> {
        finish_with(self.issues, build)
    }
}

/// Deserializes `value`, reporting a failure at its full dotted path under
/// `prefix`.
pub(crate) fn decode_at<T: DeserializeOwned>(prefix: &str, value: Value) -> Result<T, Issue> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = join_path(prefix, err.path());
        Issue::new(path, err.into_inner().to_string())
    })
}

fn join_path(prefix: &str, path: &serde_path_to_error::Path) -> String {
    let mut joined = prefix.to_string();
    for segment in path.iter() {
        let segment = segment.to_string();
        if !joined.is_empty() && !segment.starts_with('[') {
            joined.push('.');
        }
        joined.push_str(&segment);
    }
    joined
}

pub(crate) fn finish_with<T>(
    issues: Vec<Issue>,
    build: impl FnOnce() -> Option<T>,
) -> Result<T, SchemaViolation> {
    if !issues.is_empty() {
        return Err(SchemaViolation::new(issues));
    }
    build().ok_or_else(|| SchemaViolation::single("", "Invalid input: incomplete object"))
}
