//! Requirements switched on by a sibling field of the root record.

use crate::access;
use crate::context::EvaluationContext;
use crate::error::{Result, RuleError};
use crate::traits::{Outcome, ValidationRule};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Basic presence check used once a condition holds.
///
/// Strings must be non-blank; lists must be non-empty and every element
/// must itself pass; records and other scalars pass.
pub(crate) fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(values) => !values.is_empty() && values.iter().all(has_content),
        _ => true,
    }
}

/// Presence check of a conditionally required value.
///
/// Like [`has_content`], except a list passes once any element has content.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Array(values) => values.iter().any(has_content),
        other => has_content(other),
    }
}

/// Whether `sibling` satisfies the desired value.
///
/// - Absent or blank sibling: holds when nothing is desired.
/// - List sibling: holds when it contains the desired value, or is empty
///   when nothing is desired.
/// - Scalar sibling: holds on string equality.
pub(crate) fn condition_holds(sibling: &Value, desired: Option<&str>) -> bool {
    let desired = desired.filter(|d| !d.is_empty());
    match sibling {
        Value::Array(values) => match desired {
            None => values.is_empty(),
            Some(d) => values
                .iter()
                .any(|v| access::text(v).as_deref() == Some(d)),
        },
        other if access::is_blank(other) => desired.is_none(),
        other => match desired {
            Some(d) => access::text(other).as_deref() == Some(d),
            None => false,
        },
    }
}

fn describe(desired: Option<&str>) -> &str {
    desired.filter(|d| !d.is_empty()).unwrap_or("empty")
}

/// Value is required when the root field `sibling` has the desired value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequiredIfRule {
    pub sibling: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired: Option<String>,
}

impl RequiredIfRule {
    pub fn new(sibling: impl Into<String>, desired: Option<&str>) -> Self {
        Self {
            sibling: sibling.into(),
            desired: desired.map(str::to_string),
        }
    }
}

impl ValidationRule for RequiredIfRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let sibling = ctx.root_field(&self.sibling)?;
        let desired = self.desired.as_deref();
        if !condition_holds(sibling, desired) || is_present(value) {
            return Ok(Outcome::Valid);
        }
        let message = format!(
            "The {} field is required when {} is '{}'.",
            ctx.member_name(),
            self.sibling,
            describe(desired)
        );
        Ok(RuleError::new(self.rule_name(), ctx.path(), message)
            .param("sibling", &self.sibling)
            .param("desired", desired)
            .into())
    }

    fn rule_name(&self) -> &'static str {
        "required_if"
    }

    fn root_references(&self) -> Vec<&str> {
        vec![self.sibling.as_str()]
    }
}

/// List is required, with every element present, when the root field
/// `sibling` has the desired value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListRequiredIfRule {
    pub sibling: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired: Option<String>,
}

impl ListRequiredIfRule {
    pub fn new(sibling: impl Into<String>, desired: Option<&str>) -> Self {
        Self {
            sibling: sibling.into(),
            desired: desired.map(str::to_string),
        }
    }
}

impl ValidationRule for ListRequiredIfRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let sibling = ctx.root_field(&self.sibling)?;
        let desired = self.desired.as_deref();
        if !condition_holds(sibling, desired) {
            return Ok(Outcome::Valid);
        }

        let values = access::items(value, ctx.path())?;
        if values.is_empty() {
            let message = format!(
                "The {} list is required when {} is '{}'.",
                ctx.member_name(),
                self.sibling,
                describe(desired)
            );
            return Ok(RuleError::new(self.rule_name(), ctx.path(), message)
                .param("sibling", &self.sibling)
                .param("desired", desired)
                .into());
        }

        for (index, item) in values.iter().enumerate() {
            if !has_content(item) {
                let message = format!(
                    "Items of {} must not be empty when {} is '{}'.",
                    ctx.member_name(),
                    self.sibling,
                    describe(desired)
                );
                return Ok(RuleError::new(
                    self.rule_name(),
                    access::element_path(ctx.path(), index),
                    message,
                )
                .param("sibling", &self.sibling)
                .param("desired", desired)
                .into());
            }
        }

        Ok(Outcome::Valid)
    }

    fn rule_name(&self) -> &'static str {
        "list_required_if"
    }

    fn root_references(&self) -> Vec<&str> {
        vec![self.sibling.as_str()]
    }
}
