//! Single-value rules.
//!
//! Each rule treats an absent value as valid unless it exists to demand
//! presence ([`RequiredRule`]).

use super::syntax;
use crate::access;
use crate::context::{EvaluationContext, TranslateError};
use crate::error::{EngineError, Result, RuleError};
use crate::traits::{Outcome, ValidationRule};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Trimmed lengths from 1 up to this bound are rejected by [`ValueNotEmptyRule`].
pub const NEAR_EMPTY_MAX_LENGTH: usize = 4;

fn message_or(custom: &Option<String>, default: impl FnOnce() -> String) -> String {
    custom.clone().unwrap_or_else(default)
}

/// Value must be present; strings must not be blank unless explicitly allowed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequiredRule {
    /// Accept empty and whitespace-only strings
    #[serde(default)]
    pub allow_empty_strings: bool,
    /// Custom error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RequiredRule {
    /// Create a new required rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept empty strings as present.
    pub fn allow_empty_strings(mut self) -> Self {
        self.allow_empty_strings = true;
        self
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ValidationRule for RequiredRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let present = match value {
            Value::Null => false,
            Value::String(s) => self.allow_empty_strings || !s.trim().is_empty(),
            _ => true,
        };
        if present {
            return Ok(Outcome::Valid);
        }
        let message = message_or(&self.message, || {
            format!("The {} field is required.", ctx.member_name())
        });
        Ok(RuleError::new(self.rule_name(), ctx.path(), message).into())
    }

    fn rule_name(&self) -> &'static str {
        "required"
    }
}

/// Either leave the value blank or write a real one: trimmed lengths
/// 1 through 4 are rejected, everything else passes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValueNotEmptyRule {
    /// Custom error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValueNotEmptyRule {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValidationRule for ValueNotEmptyRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let Some(text) = access::text(value) else {
            return Ok(Outcome::Valid);
        };
        let length = text.trim().chars().count();
        if length == 0 || length > NEAR_EMPTY_MAX_LENGTH {
            return Ok(Outcome::Valid);
        }
        let message = message_or(&self.message, || {
            format!(
                "The {} field must be left empty or contain more than {} characters.",
                ctx.member_name(),
                NEAR_EMPTY_MAX_LENGTH
            )
        });
        Ok(RuleError::new(self.rule_name(), ctx.path(), message)
            .param("actual", length)
            .into())
    }

    fn rule_name(&self) -> &'static str {
        "value_not_empty"
    }
}

/// Value must be one of a fixed set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AllowedValuesRule {
    pub values: Vec<String>,
}

impl AllowedValuesRule {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl ValidationRule for AllowedValuesRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let Some(text) = access::text(value) else {
            return Ok(Outcome::Valid);
        };
        if self.values.iter().any(|allowed| allowed.as_str() == text) {
            return Ok(Outcome::Valid);
        }
        let message = format!(
            "Value '{}' is not allowed for field '{}'. Allowed values are: {}.",
            text,
            ctx.member_name(),
            self.values.join(", ")
        );
        Ok(RuleError::new(self.rule_name(), ctx.path(), message)
            .param("value", &*text)
            .param("allowed", &self.values)
            .into())
    }

    fn rule_name(&self) -> &'static str {
        "allowed_values"
    }
}

/// Value must translate to a wire string of `domain` through the enum translator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnumWireValueRule {
    pub domain: String,
}

impl EnumWireValueRule {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }
}

impl ValidationRule for EnumWireValueRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let Some(text) = access::text(value) else {
            return Ok(Outcome::Valid);
        };
        let enums = ctx.services().enums();
        match enums.translate(&self.domain, &text) {
            Ok(_) => Ok(Outcome::Valid),
            Err(TranslateError::UnknownDomain) | Err(TranslateError::NotFound) => {
                let valid = enums.wire_values(&self.domain);
                let message = format!(
                    "Malformed request: '{}' is not a valid value for field '{}'. Valid values are: {}.",
                    text,
                    ctx.member_name(),
                    valid.join(", ")
                );
                Ok(RuleError::new(self.rule_name(), ctx.path(), message)
                    .param("value", &*text)
                    .param("domain", &self.domain)
                    .into())
            }
        }
    }

    fn rule_name(&self) -> &'static str {
        "enum_wire_value"
    }
}

/// Value must be a language code from the allowed-language service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LanguageCodeRule {
    /// Custom error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LanguageCodeRule {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValidationRule for LanguageCodeRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let Some(code) = access::text(value) else {
            return Ok(Outcome::Valid);
        };
        let languages = ctx.services().languages();
        if languages.is_allowed(&code) {
            return Ok(Outcome::Valid);
        }
        let message = message_or(&self.message, || {
            format!(
                "Language code '{}' of field '{}' is not allowed. Allowed language codes are: {}.",
                code,
                ctx.member_name(),
                languages.allowed().join(", ")
            )
        });
        Ok(RuleError::new(self.rule_name(), ctx.path(), message)
            .param("value", &*code)
            .into())
    }

    fn rule_name(&self) -> &'static str {
        "language_code"
    }
}

/// E-mail address syntax.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmailRule {
    /// Custom error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EmailRule {
    /// Create a new email rule with default message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an email rule with a custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl ValidationRule for EmailRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let Some(text) = access::text(value) else {
            return Ok(Outcome::Valid);
        };
        if syntax::is_valid_email(&text) {
            return Ok(Outcome::Valid);
        }
        let message = message_or(&self.message, || {
            format!("The {} field is not a valid e-mail address.", ctx.member_name())
        });
        Ok(RuleError::new(self.rule_name(), ctx.path(), message)
            .param("value", &*text)
            .into())
    }

    fn rule_name(&self) -> &'static str {
        "email"
    }
}

/// Absolute URL syntax.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UrlRule {
    /// Custom error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UrlRule {
    /// Create a new URL rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a URL rule with a custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl ValidationRule for UrlRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let Some(text) = access::text(value) else {
            return Ok(Outcome::Valid);
        };
        if syntax::is_valid_url(&text) {
            return Ok(Outcome::Valid);
        }
        let message = message_or(&self.message, || {
            format!("The {} field is not a valid fully-qualified URL.", ctx.member_name())
        });
        Ok(RuleError::new(self.rule_name(), ctx.path(), message)
            .param("value", &*text)
            .into())
    }

    fn rule_name(&self) -> &'static str {
        "url"
    }
}

/// A regex pattern compiled on first use.
///
/// Serializes as the bare pattern string. A pattern that does not compile
/// is an [`EngineError::InvalidPattern`] when the rule is first evaluated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Pattern {
    source: String,
    compiled: OnceLock<std::result::Result<Regex, String>>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceLock::new(),
        }
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn regex(&self) -> Result<&Regex> {
        self.compiled
            .get_or_init(|| {
                Regex::new(&format!("^(?:{})$", self.source)).map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|reason| EngineError::InvalidPattern {
                pattern: self.source.clone(),
                reason: reason.clone(),
            })
    }

    /// Whether the pattern matches the whole of `value`.
    pub fn matches(&self, value: &str) -> Result<bool> {
        Ok(self.regex()?.is_match(value))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.source
    }
}

/// Value's string form must match a regex pattern in full.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RegexRule {
    /// The regex pattern
    pub pattern: Pattern,
    /// Custom error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RegexRule {
    /// Create a new regex rule.
    pub fn new(pattern: impl Into<Pattern>) -> Self {
        Self {
            pattern: pattern.into(),
            message: None,
        }
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ValidationRule for RegexRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let Some(text) = access::text(value) else {
            return Ok(Outcome::Valid);
        };
        if self.pattern.matches(&text)? {
            return Ok(Outcome::Valid);
        }
        let message = message_or(&self.message, || {
            format!(
                "The field {} must match the regular expression '{}'.",
                ctx.member_name(),
                self.pattern.as_str()
            )
        });
        Ok(RuleError::new(self.rule_name(), ctx.path(), message)
            .param("pattern", self.pattern.as_str())
            .param("value", &*text)
            .into())
    }

    fn rule_name(&self) -> &'static str {
        "regex"
    }
}

/// String form of the value may hold at most `length` characters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MaxLengthRule {
    pub length: usize,
}

impl MaxLengthRule {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl ValidationRule for MaxLengthRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let Some(text) = access::text(value) else {
            return Ok(Outcome::Valid);
        };
        let actual = text.chars().count();
        if actual <= self.length {
            return Ok(Outcome::Valid);
        }
        let message = format!(
            "The field {} must be a string with a maximum length of {}.",
            ctx.member_name(),
            self.length
        );
        Ok(RuleError::new(self.rule_name(), ctx.path(), message)
            .param("length", self.length)
            .param("actual", actual)
            .into())
    }

    fn rule_name(&self) -> &'static str {
        "max_length"
    }
}
