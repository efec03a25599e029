//! # Registry Validate
//!
//! Declarative constraint validation for the registry's Open API input
//! models: organizations, services and service channels with their lists
//! of localized values and typed sub-records.
//!
//! A model type is registered once in a [`SchemaRegistry`]. Rules are
//! declared per field with [`ModelRules::builder`], which rejects fields
//! and cross-references the model does not have. A pass serializes the
//! model, walks the declared fields and returns every data failure as a
//! path-qualified [`FieldError`].
//!
//! ## Example
//!
//! ```rust
//! use registry_validate::prelude::*;
//! use serde::Serialize;
//!
//! #[derive(Serialize, Default)]
//! #[serde(rename_all = "PascalCase")]
//! struct ChannelIn {
//!     emails: Vec<String>,
//!     urls: Vec<String>,
//! }
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register::<ChannelIn>("ChannelIn").unwrap();
//!
//! let rules = ModelRules::builder::<ChannelIn>(&registry)
//!     .field("Emails", ListOfRule::new(EmailRule::new()))
//!     .field("Urls", UniformBaseUrlListRule::new("^https?://.*$"))
//!     .build()
//!     .unwrap();
//!
//! let channel = ChannelIn {
//!     emails: vec!["info@example.fi".into(), "a..b@example.fi".into()],
//!     urls: vec!["https://example.fi/a".into(), "https://other.fi/b".into()],
//! };
//!
//! let errors = validate_model(&channel, &rules, &Services::default()).unwrap();
//! assert_eq!(errors.field_names(), vec!["Emails[1]", "Urls[1]"]);
//! ```
//!
//! ## Error classes
//!
//! - Data failures come back as [`ValidationErrors`].
//! - A rule declared against a shape the graph does not have is an
//!   [`EngineError`] and aborts the pass.

pub mod access;
#[cfg(feature = "config")]
pub mod config;
mod context;
mod error;
pub mod rules;
mod schema;
mod traits;
mod validate;

#[cfg(test)]
mod tests;

pub use context::{
    EnumTable, EnumTranslator, EvaluationContext, LanguageCodeSet, LanguageCodes, Services,
    ServicesBuilder, TranslateError, DEFAULT_LANGUAGE_CODES,
};
pub use error::{EngineError, FieldError, Result, RuleError, ValidationErrors};
pub use rules::Rule;
pub use schema::{
    FieldRules, ModelRules, ModelRulesBuilder, RecordSchema, RuleDeclarations, SchemaRegistry,
};
pub use traits::{Outcome, ValidationRule};
pub use validate::{validate_graph, validate_model, Validate};

/// Prelude module for validation
pub mod prelude {
    pub use crate::context::{
        EnumTable, EnumTranslator, EvaluationContext, LanguageCodeSet, LanguageCodes, Services,
    };
    pub use crate::error::{EngineError, FieldError, RuleError, ValidationErrors};
    pub use crate::rules::*;
    pub use crate::schema::{ModelRules, RuleDeclarations, SchemaRegistry};
    pub use crate::traits::{Outcome, ValidationRule};
    pub use crate::validate::{validate_model, Validate};
}
