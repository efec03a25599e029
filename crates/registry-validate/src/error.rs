//! Error types for the validation engine.
//!
//! Two classes are kept apart:
//!
//! - [`RuleError`] / [`ValidationErrors`]: data failures, reported to the caller.
//! - [`EngineError`]: a rule declared against a shape the graph does not have.
//!   These abort the pass and are never aggregated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Fatal mismatch between declared rules and the actual schema shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A rule named a field the record does not have.
    #[error("Field '{field}' not found on item at '{path}'")]
    FieldNotFound { field: String, path: String },

    /// A field was requested on an item that is not a record.
    #[error("Cannot read field '{field}' at '{path}': item is not a record")]
    NotARecord { field: String, path: String },

    /// A list rule was declared on a value that is not a list.
    #[error("Value at '{path}' is not a list")]
    NotAList { path: String },

    /// A comparison key was null on an otherwise present item.
    #[error("Key field '{field}' is null on item at '{path}'")]
    NullKey { field: String, path: String },

    /// A regex pattern declared on a rule does not compile.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A rule set was declared against a type the registry does not know.
    #[error("Type '{0}' is not registered in the schema registry")]
    UnregisteredType(String),

    /// A rule set declared a field the registered schema does not have.
    #[error("Field '{field}' is not declared on model '{model}'")]
    UnknownField { field: String, model: String },

    /// A rule set built for one model was run against another.
    #[error("Rule set for '{expected}' cannot validate a value of type '{actual}'")]
    SchemaMismatch { expected: String, actual: String },

    /// The model did not serialize into a record.
    #[error("Model could not be serialized into a record: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

/// A data failure produced by a single rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleError {
    /// The validation rule code (e.g., "required", "email", "list_duplicity")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Dotted member path the failure is attributed to
    pub path: String,
    /// Optional parameters for message interpolation
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, serde_json::Value>,
}

impl RuleError {
    /// Create a new rule error.
    pub fn new(
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: path.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter to the error.
    pub fn param(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.params.insert(key.into(), v);
        }
        self
    }

    /// Interpolate parameters into the message.
    ///
    /// Replaces `{param_name}` placeholders with actual values.
    pub fn interpolate_message(&self) -> String {
        let mut result = self.message.clone();
        for (key, value) in &self.params {
            let placeholder = format!("{{{}}}", key);
            let replacement = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            result = result.replace(&placeholder, &replacement);
        }
        result
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.interpolate_message())
    }
}

impl std::error::Error for RuleError {}

/// One reported failure in the output of a validation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    /// Field path (supports nested: "Names[1].Value")
    pub field: String,
    /// Rule code
    pub code: String,
    /// Human-readable message, parameters already interpolated
    pub message: String,
}

impl From<RuleError> for FieldError {
    fn from(error: RuleError) -> Self {
        Self {
            message: error.interpolate_message(),
            field: error.path,
            code: error.code,
        }
    }
}

/// Ordered collection of failures from one validation pass.
///
/// An empty collection means the graph is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    /// Create an empty validation errors collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a failure.
    pub fn add(&mut self, error: impl Into<FieldError>) {
        self.fields.push(error.into());
    }

    /// Append another collection, keeping its order.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.fields.extend(other.fields);
    }

    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get the total number of errors.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Get errors attributed to a specific field path.
    pub fn get(&self, field: &str) -> Vec<&FieldError> {
        self.fields.iter().filter(|e| e.field == field).collect()
    }

    /// Get the distinct field paths with errors, in first-reported order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for error in &self.fields {
            if !names.contains(&error.field.as_str()) {
                names.push(error.field.as_str());
            }
        }
        names
    }

    /// Iterate over the failures in reported order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.fields.iter()
    }

    /// Convert to Result - Ok if no errors, Err otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {} error(s)", self.len())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
