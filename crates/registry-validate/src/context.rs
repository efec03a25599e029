//! Evaluation context and the external lookup services.

use crate::access;
use crate::error::Result;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Language codes of the registry.
pub const DEFAULT_LANGUAGE_CODES: [&str; 6] = ["fi", "sv", "en", "se", "smn", "sms"];

/// Set of language codes accepted on localized values.
pub trait LanguageCodes: Send + Sync {
    /// Whether `code` is an allowed language code.
    fn is_allowed(&self, code: &str) -> bool;

    /// All allowed codes, for error messages.
    fn allowed(&self) -> Vec<String>;
}

/// Why an enum value has no wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// The translator knows nothing about the domain.
    #[error("unknown enum domain")]
    UnknownDomain,
    /// The domain exists but the value is not one of its members.
    #[error("value not found in enum domain")]
    NotFound,
}

/// Translates enum values to their external wire strings.
pub trait EnumTranslator: Send + Sync {
    /// Map `value` within `domain` to its canonical wire string.
    fn translate(&self, domain: &str, value: &str) -> Result<String, TranslateError>;

    /// Every wire value of `domain`, for error messages.
    fn wire_values(&self, domain: &str) -> Vec<String>;
}

/// In-memory language code set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCodeSet {
    codes: BTreeSet<String>,
}

impl LanguageCodeSet {
    /// Create a set from the given codes.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }
}

impl LanguageCodes for LanguageCodeSet {
    fn is_allowed(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    fn allowed(&self) -> Vec<String> {
        self.codes.iter().cloned().collect()
    }
}

/// In-memory enum translation table: domain → value → wire string.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(transparent)]
pub struct EnumTable {
    domains: BTreeMap<String, BTreeMap<String, String>>,
}

impl EnumTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping for `value` in `domain`.
    pub fn insert(
        mut self,
        domain: impl Into<String>,
        value: impl Into<String>,
        wire: impl Into<String>,
    ) -> Self {
        self.domains
            .entry(domain.into())
            .or_default()
            .insert(value.into(), wire.into());
        self
    }

    /// Add a domain whose values are their own wire strings.
    pub fn identity<I, S>(mut self, domain: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.domains.entry(domain.into()).or_default();
        for value in values {
            let value = value.into();
            entry.insert(value.clone(), value);
        }
        self
    }
}

impl EnumTranslator for EnumTable {
    fn translate(&self, domain: &str, value: &str) -> Result<String, TranslateError> {
        let values = self.domains.get(domain).ok_or(TranslateError::UnknownDomain)?;
        values.get(value).cloned().ok_or(TranslateError::NotFound)
    }

    fn wire_values(&self, domain: &str) -> Vec<String> {
        let mut wire: Vec<String> = self
            .domains
            .get(domain)
            .map(|values| values.values().cloned().collect())
            .unwrap_or_default();
        wire.sort();
        wire.dedup();
        wire
    }
}

/// Lookup services supplied at the start of a validation pass.
///
/// Read-only; one instance can back any number of concurrent passes.
#[derive(Clone)]
pub struct Services {
    languages: Arc<dyn LanguageCodes>,
    enums: Arc<dyn EnumTranslator>,
}

impl Services {
    /// Create a builder for constructing services.
    pub fn builder() -> ServicesBuilder {
        ServicesBuilder::new()
    }

    /// The allowed-language-code set.
    pub fn languages(&self) -> &dyn LanguageCodes {
        self.languages.as_ref()
    }

    /// The enum translator.
    pub fn enums(&self) -> &dyn EnumTranslator {
        self.enums.as_ref()
    }
}

impl Default for Services {
    fn default() -> Self {
        ServicesBuilder::new().build()
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("languages", &self.languages.allowed())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing [`Services`].
///
/// Unset services default to an empty language set and an empty enum table.
#[derive(Default)]
pub struct ServicesBuilder {
    languages: Option<Arc<dyn LanguageCodes>>,
    enums: Option<Arc<dyn EnumTranslator>>,
}

impl ServicesBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language code service.
    pub fn languages(mut self, languages: impl LanguageCodes + 'static) -> Self {
        self.languages = Some(Arc::new(languages));
        self
    }

    /// Set the language code service from an Arc.
    pub fn languages_arc(mut self, languages: Arc<dyn LanguageCodes>) -> Self {
        self.languages = Some(languages);
        self
    }

    /// Set the enum translator.
    pub fn enums(mut self, enums: impl EnumTranslator + 'static) -> Self {
        self.enums = Some(Arc::new(enums));
        self
    }

    /// Set the enum translator from an Arc.
    pub fn enums_arc(mut self, enums: Arc<dyn EnumTranslator>) -> Self {
        self.enums = Some(enums);
        self
    }

    /// Build the services.
    pub fn build(self) -> Services {
        Services {
            languages: self
                .languages
                .unwrap_or_else(|| Arc::new(LanguageCodeSet::default()) as Arc<dyn LanguageCodes>),
            enums: self
                .enums
                .unwrap_or_else(|| Arc::new(EnumTable::new()) as Arc<dyn EnumTranslator>),
        }
    }
}

/// What a rule sees while evaluating one value.
///
/// Borrowed for a single evaluation call: the root record of the pass, the
/// dotted path of the member under evaluation, and the lookup services.
#[derive(Debug, Clone)]
pub struct EvaluationContext<'a> {
    root: &'a Value,
    path: String,
    services: &'a Services,
}

impl<'a> EvaluationContext<'a> {
    /// Create a context for the member at `path` of `root`.
    pub fn new(root: &'a Value, path: impl Into<String>, services: &'a Services) -> Self {
        Self {
            root,
            path: path.into(),
            services,
        }
    }

    /// The root record of the pass.
    pub fn root(&self) -> &'a Value {
        self.root
    }

    /// Dotted path of the member under evaluation.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last segment of the path, used as the field name in messages.
    pub fn member_name(&self) -> &str {
        let last = self.path.rsplit('.').next().unwrap_or(&self.path);
        last.split('[').next().unwrap_or(last)
    }

    /// The lookup services.
    pub fn services(&self) -> &'a Services {
        self.services
    }

    /// Context for a value below the current one.
    pub fn at(&self, path: impl Into<String>) -> EvaluationContext<'a> {
        EvaluationContext {
            root: self.root,
            path: path.into(),
            services: self.services,
        }
    }

    /// Reads a field of the root record; a `null` field reads as `Value::Null`.
    pub fn root_field(&self, name: &str) -> Result<&'a Value> {
        Ok(access::get_field(self.root, name, "")?.unwrap_or(&access::NULL))
    }
}
