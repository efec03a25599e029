//! Core rule contract.

use crate::context::EvaluationContext;
use crate::error::{Result, RuleError};
use serde_json::Value;
use std::fmt::Debug;

/// Result of evaluating one rule against one value.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No violation.
    Valid,
    /// The declared condition is violated.
    Invalid(RuleError),
}

impl Outcome {
    /// Whether the outcome is [`Outcome::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid)
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&RuleError> {
        match self {
            Outcome::Valid => None,
            Outcome::Invalid(error) => Some(error),
        }
    }

    /// Consume the outcome, returning the failure, if any.
    pub fn into_error(self) -> Option<RuleError> {
        match self {
            Outcome::Valid => None,
            Outcome::Invalid(error) => Some(error),
        }
    }
}

impl From<RuleError> for Outcome {
    fn from(error: RuleError) -> Self {
        Outcome::Invalid(error)
    }
}

/// A stateless validation rule.
///
/// Rules are built once per declared constraint and evaluated any number of
/// times, possibly concurrently against different graphs. They never mutate
/// the graph. A data failure is `Ok(Outcome::Invalid)`; a rule/schema
/// mismatch is `Err(EngineError)` and aborts the pass.
///
/// ## Example
///
/// ```rust
/// use registry_validate::prelude::*;
/// use serde_json::json;
///
/// let root = json!({ "Name": "" });
/// let services = Services::default();
/// let ctx = EvaluationContext::new(&root, "Name", &services);
///
/// let outcome = RequiredRule::new().evaluate(&root["Name"], &ctx).unwrap();
/// assert!(!outcome.is_valid());
/// ```
pub trait ValidationRule: Debug + Send + Sync {
    /// Evaluate the rule against `value`, located at `ctx.path()`.
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome>;

    /// Get the rule name/code for error reporting.
    fn rule_name(&self) -> &'static str;

    /// Fields of the root record this rule reads, checked when a rule set is built.
    fn root_references(&self) -> Vec<&str> {
        Vec::new()
    }
}
