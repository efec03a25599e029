//! Rules over lists of localized values and typed sub-records.
//!
//! An absent list is valid for every rule here except [`ListRequiredRule`].
//! Element scanning runs in list order and the first offending element wins.

use super::conditional_rules::has_content;
use super::value_rules::Pattern;
use super::{syntax, Rule};
use crate::access;
use crate::context::EvaluationContext;
use crate::error::{EngineError, Result, RuleError};
use crate::traits::{Outcome, ValidationRule};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashSet};

fn default_language_member() -> String {
    "Language".to_string()
}

fn default_key_members() -> Vec<String> {
    vec!["Language".to_string(), "Type".to_string()]
}

/// Restricts a per-element rule to elements whose `member` equals `value`.
///
/// An element without the member, or with a `null` one, does not match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Discriminator {
    pub member: String,
    pub value: String,
}

impl Discriminator {
    pub fn new(member: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            value: value.into(),
        }
    }

    fn matches(&self, item: &Value) -> bool {
        item.as_object()
            .and_then(|record| record.get(&self.member))
            .and_then(access::text)
            .map(|v| v == self.value.as_str())
            .unwrap_or(false)
    }
}

fn applies(discriminator: Option<&Discriminator>, item: &Value) -> bool {
    discriminator.map_or(true, |d| d.matches(item))
}

/// Comparison key of an extracted value: strings verbatim, anything else as JSON text.
fn key_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads a comparison key that must not be null.
fn required_key(item: &Value, member: Option<&str>, path: &str) -> Result<String> {
    match access::member_value(item, member, path)? {
        Some(value) => Ok(key_of(value)),
        None => Err(EngineError::NullKey {
            field: member.unwrap_or("<item>").to_string(),
            path: path.to_string(),
        }),
    }
}

/// List must be present, non-empty, and hold no empty elements.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListRequiredRule {
    /// Custom error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ListRequiredRule {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValidationRule for ListRequiredRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let values = access::items(value, ctx.path())?;
        if values.is_empty() {
            let message = self
                .message
                .clone()
                .unwrap_or_else(|| format!("The {} field is required.", ctx.member_name()));
            return Ok(RuleError::new(self.rule_name(), ctx.path(), message).into());
        }

        for (index, item) in values.iter().enumerate() {
            if !has_content(item) {
                let message = format!("Items of {} must not be empty.", ctx.member_name());
                return Ok(RuleError::new(
                    self.rule_name(),
                    access::element_path(ctx.path(), index),
                    message,
                )
                .into());
            }
        }

        Ok(Outcome::Valid)
    }

    fn rule_name(&self) -> &'static str {
        "list_required"
    }
}

/// Applies a single-value rule to `member` of every element (or to the
/// element itself when no member is named).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListOfRule {
    pub inner: Box<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
}

impl ListOfRule {
    /// Apply `inner` to each element.
    pub fn new(inner: impl Into<Rule>) -> Self {
        Self {
            inner: Box::new(inner.into()),
            member: None,
            discriminator: None,
        }
    }

    /// Apply `inner` to `member` of each element.
    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    /// Only check elements whose `member` equals `value`.
    pub fn when(mut self, member: impl Into<String>, value: impl Into<String>) -> Self {
        self.discriminator = Some(Discriminator::new(member, value));
        self
    }
}

impl ValidationRule for ListOfRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        for (index, item) in access::iterate(value, ctx.path())?.enumerate() {
            if !applies(self.discriminator.as_ref(), item) {
                continue;
            }
            let element_path = access::element_path(ctx.path(), index);
            let (target, path) = match &self.member {
                Some(member) => {
                    let target = access::get_field(item, member, &element_path)?;
                    (target, access::member_path(&element_path, member))
                }
                None => (Some(item), element_path),
            };
            let target = target.unwrap_or(&access::NULL);

            tracing::trace!(rule = self.inner.rule_name(), path = %path, "evaluating list element");
            let outcome = self.inner.evaluate(target, &ctx.at(path))?;
            if !outcome.is_valid() {
                return Ok(outcome);
            }
        }
        Ok(Outcome::Valid)
    }

    fn rule_name(&self) -> &'static str {
        "list_of"
    }

    fn root_references(&self) -> Vec<&str> {
        self.inner.root_references()
    }
}

/// `member` of each element may hold at most `length` characters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListPropertyMaxLengthRule {
    pub length: usize,
    pub member: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
}

impl ListPropertyMaxLengthRule {
    pub fn new(member: impl Into<String>, length: usize) -> Self {
        Self {
            length,
            member: member.into(),
            discriminator: None,
        }
    }

    /// Only check elements whose `member` equals `value`.
    pub fn when(mut self, member: impl Into<String>, value: impl Into<String>) -> Self {
        self.discriminator = Some(Discriminator::new(member, value));
        self
    }
}

impl ValidationRule for ListPropertyMaxLengthRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        for (index, item) in access::iterate(value, ctx.path())?.enumerate() {
            if !applies(self.discriminator.as_ref(), item) {
                continue;
            }
            let element_path = access::element_path(ctx.path(), index);
            let Some(text) = access::member_value(item, Some(&self.member), &element_path)?
                .and_then(access::text)
            else {
                continue;
            };

            let actual = text.chars().count();
            if actual <= self.length {
                continue;
            }

            let mut message = format!(
                "Maximum length of property '{}' is {}.",
                self.member, self.length
            );
            if let Some(d) = &self.discriminator {
                message.push_str(&format!(" Applies to items with {} '{}'.", d.member, d.value));
            }
            let error = RuleError::new(
                self.rule_name(),
                access::member_path(&element_path, &self.member),
                message,
            )
            .param("length", self.length)
            .param("actual", actual)
            .param("discriminator", self.discriminator.as_ref().map(|d| &d.value));
            return Ok(error.into());
        }
        Ok(Outcome::Valid)
    }

    fn rule_name(&self) -> &'static str {
        "list_property_max_length"
    }
}

/// No two elements may share the same value of `member`
/// (or the same value, for lists of primitives).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListPropertyDuplicityRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
}

impl ListPropertyDuplicityRule {
    /// Uniqueness of the elements themselves.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniqueness of `member` across elements.
    pub fn member(member: impl Into<String>) -> Self {
        Self {
            member: Some(member.into()),
        }
    }
}

impl ValidationRule for ListPropertyDuplicityRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let mut seen = HashSet::new();
        for (index, item) in access::iterate(value, ctx.path())?.enumerate() {
            let element_path = access::element_path(ctx.path(), index);
            let key = required_key(item, self.member.as_deref(), &element_path)?;
            if seen.contains(&key) {
                let property = self.member.as_deref().unwrap_or(ctx.member_name());
                let message = format!("Duplicate value '{}' for property '{}'.", key, property);
                return Ok(RuleError::new(self.rule_name(), element_path, message)
                    .param("value", &key)
                    .into());
            }
            seen.insert(key);
        }
        Ok(Outcome::Valid)
    }

    fn rule_name(&self) -> &'static str {
        "list_property_duplicity"
    }
}

/// A localized list may carry each language at most once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalizedLanguageDuplicityRule {
    #[serde(default = "default_language_member")]
    pub language_member: String,
}

impl Default for LocalizedLanguageDuplicityRule {
    fn default() -> Self {
        Self {
            language_member: default_language_member(),
        }
    }
}

impl LocalizedLanguageDuplicityRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language_member(member: impl Into<String>) -> Self {
        Self {
            language_member: member.into(),
        }
    }
}

impl ValidationRule for LocalizedLanguageDuplicityRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let mut seen = HashSet::new();
        for (index, item) in access::iterate(value, ctx.path())?.enumerate() {
            let element_path = access::element_path(ctx.path(), index);
            let language = required_key(item, Some(&self.language_member), &element_path)?;
            if !seen.insert(language.clone()) {
                let message = format!(
                    "Language '{}' is used more than once in {}.",
                    language,
                    ctx.member_name()
                );
                return Ok(RuleError::new(self.rule_name(), element_path, message)
                    .param("language", &language)
                    .into());
            }
        }
        Ok(Outcome::Valid)
    }

    fn rule_name(&self) -> &'static str {
        "localized_language_duplicity"
    }
}

/// Values of `member` must be unique within each language; the same value
/// may repeat across languages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalizedPropertyDuplicityRule {
    pub member: String,
    #[serde(default = "default_language_member")]
    pub language_member: String,
}

impl LocalizedPropertyDuplicityRule {
    pub fn new(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            language_member: default_language_member(),
        }
    }

    pub fn with_language_member(mut self, member: impl Into<String>) -> Self {
        self.language_member = member.into();
        self
    }
}

impl ValidationRule for LocalizedPropertyDuplicityRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let mut groups: BTreeMap<String, HashSet<String>> = BTreeMap::new();
        for (index, item) in access::iterate(value, ctx.path())?.enumerate() {
            let element_path = access::element_path(ctx.path(), index);
            let language = required_key(item, Some(&self.language_member), &element_path)?;

            let Some(property) = access::member_value(item, Some(&self.member), &element_path)?
            else {
                let message = format!("The {} field is required.", self.member);
                return Ok(RuleError::new(
                    self.rule_name(),
                    access::member_path(&element_path, &self.member),
                    message,
                )
                .into());
            };

            let key = key_of(property);
            let group = groups.entry(language.clone()).or_default();
            if group.contains(&key) {
                let message = format!(
                    "Duplicate value '{}' for property '{}' in language '{}'.",
                    key, self.member, language
                );
                return Ok(RuleError::new(self.rule_name(), element_path, message)
                    .param("value", &key)
                    .param("language", &language)
                    .into());
            }
            group.insert(key);
        }
        Ok(Outcome::Valid)
    }

    fn rule_name(&self) -> &'static str {
        "localized_property_duplicity"
    }
}

/// At least one element must have `item_member` equal to the root field
/// `linked_member`. Holds trivially while the linked field is `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListRequiredIfPropertyRule {
    pub item_member: String,
    pub linked_member: String,
}

impl ListRequiredIfPropertyRule {
    pub fn new(item_member: impl Into<String>, linked_member: impl Into<String>) -> Self {
        Self {
            item_member: item_member.into(),
            linked_member: linked_member.into(),
        }
    }
}

impl ValidationRule for ListRequiredIfPropertyRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let Some(linked) = access::text(ctx.root_field(&self.linked_member)?) else {
            return Ok(Outcome::Valid);
        };

        for (index, item) in access::iterate(value, ctx.path())?.enumerate() {
            let element_path = access::element_path(ctx.path(), index);
            let found = access::member_value(item, Some(&self.item_member), &element_path)?
                .and_then(access::text);
            if found.as_deref() == Some(&*linked) {
                return Ok(Outcome::Valid);
            }
        }

        let message = format!(
            "{} must contain an item with property '{}' set to '{}' (the value of {}).",
            ctx.member_name(),
            self.item_member,
            linked,
            self.linked_member
        );
        Ok(RuleError::new(self.rule_name(), ctx.path(), message)
            .param("property", &self.item_member)
            .param("linked", &*linked)
            .into())
    }

    fn rule_name(&self) -> &'static str {
        "list_required_if_property"
    }

    fn root_references(&self) -> Vec<&str> {
        vec![self.linked_member.as_str()]
    }
}

/// Two-way coverage between this list and a linked list of the root record.
///
/// Completeness: every linked element's key tuple must appear in this list.
/// Soundness: every language used in this list must appear in the linked list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListMatchesLinkedListRule {
    pub linked_list: String,
    #[serde(default = "default_key_members")]
    pub key_members: Vec<String>,
    #[serde(default = "default_language_member")]
    pub language_member: String,
}

impl ListMatchesLinkedListRule {
    pub fn new(linked_list: impl Into<String>) -> Self {
        Self {
            linked_list: linked_list.into(),
            key_members: default_key_members(),
            language_member: default_language_member(),
        }
    }

    pub fn keys<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_members = members.into_iter().map(Into::into).collect();
        self
    }

    fn key_tuple<'v>(&self, item: &'v Value, path: &str) -> Result<Vec<Option<Cow<'v, str>>>> {
        self.key_members
            .iter()
            .map(|member| -> Result<_> {
                Ok(access::member_value(item, Some(member), path)?.and_then(access::text))
            })
            .collect()
    }

    fn language<'v>(&self, item: &'v Value, path: &str) -> Result<Option<Cow<'v, str>>> {
        Ok(access::member_value(item, Some(&self.language_member), path)?.and_then(access::text))
    }

    fn describe(&self, key: &[Option<Cow<'_, str>>]) -> String {
        self.key_members
            .iter()
            .zip(key)
            .map(|(member, value)| format!("{} '{}'", member, value.as_deref().unwrap_or("")))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ValidationRule for ListMatchesLinkedListRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let linked = ctx.root_field(&self.linked_list)?;
        let linked_path = self.linked_list.as_str();

        let mut target_keys = Vec::new();
        let mut target_languages = Vec::new();
        for (index, item) in access::iterate(value, ctx.path())?.enumerate() {
            if item.is_null() {
                continue;
            }
            let element_path = access::element_path(ctx.path(), index);
            target_keys.push(self.key_tuple(item, &element_path)?);
            if let Some(language) = self.language(item, &element_path)? {
                if !target_languages.contains(&language) {
                    target_languages.push(language);
                }
            }
        }

        let mut linked_languages = BTreeSet::new();
        for (index, item) in access::iterate(linked, linked_path)?.enumerate() {
            if item.is_null() {
                continue;
            }
            let element_path = access::element_path(linked_path, index);
            let key = self.key_tuple(item, &element_path)?;
            if !target_keys.contains(&key) {
                let described = self.describe(&key);
                let message = format!(
                    "{} is missing an item with {} required by {}.",
                    ctx.member_name(),
                    described,
                    self.linked_list
                );
                return Ok(RuleError::new(self.rule_name(), ctx.path(), message)
                    .param("missing", described)
                    .into());
            }
            if let Some(language) = self.language(item, &element_path)? {
                linked_languages.insert(language);
            }
        }

        if let Some(language) = target_languages
            .iter()
            .find(|language| !linked_languages.contains(*language))
        {
            let message = format!(
                "Missing {} for language '{}' used in {}.",
                self.linked_list,
                language,
                ctx.member_name()
            );
            return Ok(RuleError::new("linked_list_language", ctx.path(), message)
                .param("language", &**language)
                .into());
        }

        Ok(Outcome::Valid)
    }

    fn rule_name(&self) -> &'static str {
        "list_matches_linked_list"
    }

    fn root_references(&self) -> Vec<&str> {
        vec![self.linked_list.as_str()]
    }
}

/// Every URL must match `pattern` and share scheme and host with the first one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UniformBaseUrlListRule {
    pub pattern: Pattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
}

impl UniformBaseUrlListRule {
    pub fn new(pattern: impl Into<Pattern>) -> Self {
        Self {
            pattern: pattern.into(),
            member: None,
        }
    }

    /// Read the URL from `member` of each element.
    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }
}

impl ValidationRule for UniformBaseUrlListRule {
    fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
        let mut first_base: Option<String> = None;
        for (index, item) in access::iterate(value, ctx.path())?.enumerate() {
            let element_path = access::element_path(ctx.path(), index);
            let url = access::member_value(item, self.member.as_deref(), &element_path)?
                .and_then(access::text)
                .unwrap_or_default();

            let base = if self.pattern.matches(&url)? {
                syntax::base_url(&url)
            } else {
                None
            };
            let Some(base) = base else {
                let message = format!("'{}' is not a valid URL for {}.", url, ctx.member_name());
                return Ok(RuleError::new(self.rule_name(), element_path, message)
                    .param("value", &*url)
                    .param("pattern", self.pattern.as_str())
                    .into());
            };

            match &first_base {
                None => first_base = Some(base),
                Some(expected) if *expected != base => {
                    let message = format!(
                        "All URLs in {} must share the base address '{}', found '{}'.",
                        ctx.member_name(),
                        expected,
                        base
                    );
                    return Ok(RuleError::new(self.rule_name(), element_path, message)
                        .param("expected", expected)
                        .param("actual", &base)
                        .into());
                }
                Some(_) => {}
            }
        }
        Ok(Outcome::Valid)
    }

    fn rule_name(&self) -> &'static str {
        "uniform_base_url_list"
    }
}
