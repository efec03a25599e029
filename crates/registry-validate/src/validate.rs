//! Validation pass entry points.

use crate::access;
use crate::context::{EvaluationContext, Services};
use crate::error::{Result, ValidationErrors};
use crate::schema::ModelRules;
use crate::traits::ValidationRule;
use serde::Serialize;
use serde_json::Value;

/// Runs every rule of `rules` against `model`.
///
/// The model is serialized once and its declared fields are visited in
/// declaration order. Data failures are collected; the first engine error
/// aborts the pass and is returned instead.
pub fn validate_model<T>(
    model: &T,
    rules: &ModelRules,
    services: &Services,
) -> Result<ValidationErrors>
where
    T: Serialize + 'static,
{
    rules.check_type::<T>()?;
    let graph = serde_json::to_value(model)?;
    validate_graph(&graph, rules, services)
}

/// Runs every rule of `rules` against an already serialized graph.
///
/// A `null` graph has nothing to check.
pub fn validate_graph(
    graph: &Value,
    rules: &ModelRules,
    services: &Services,
) -> Result<ValidationErrors> {
    tracing::debug!(model = %rules.model(), "validation pass started");

    match run(graph, rules, services) {
        Ok(errors) => {
            tracing::debug!(
                model = %rules.model(),
                errors = errors.len(),
                "validation pass finished"
            );
            Ok(errors)
        }
        Err(e) => {
            tracing::error!(model = %rules.model(), error = %e, "validation pass aborted");
            Err(e)
        }
    }
}

fn run(graph: &Value, rules: &ModelRules, services: &Services) -> Result<ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if graph.is_null() {
        return Ok(errors);
    }

    for declared in rules.fields() {
        let value = access::get_field(graph, &declared.field, "")?.unwrap_or(&access::NULL);
        let ctx = EvaluationContext::new(graph, declared.field.as_str(), services);

        for rule in &declared.rules {
            tracing::trace!(field = %declared.field, rule = rule.rule_name(), "evaluating rule");
            if let Some(error) = rule.evaluate(value, &ctx)?.into_error() {
                errors.add(error);
            }
        }
    }

    Ok(errors)
}

/// A model that owns its rule set.
///
/// ## Example
///
/// ```rust
/// use registry_validate::prelude::*;
/// use serde::Serialize;
/// use std::sync::OnceLock;
///
/// #[derive(Serialize, Default)]
/// #[serde(rename_all = "PascalCase")]
/// struct PhoneIn {
///     number: Option<String>,
/// }
///
/// impl Validate for PhoneIn {
///     fn rules() -> Result<&'static ModelRules, EngineError> {
///         static RULES: OnceLock<Result<ModelRules, EngineError>> = OnceLock::new();
///         RULES
///             .get_or_init(|| {
///                 let mut registry = SchemaRegistry::new();
///                 registry.register::<PhoneIn>("PhoneIn")?;
///                 ModelRules::builder::<PhoneIn>(&registry)
///                     .field("Number", RequiredRule::new())
///                     .build()
///             })
///             .as_ref()
///             .map_err(Clone::clone)
///     }
/// }
///
/// let errors = PhoneIn::default().validate(&Services::default()).unwrap();
/// assert_eq!(errors.field_names(), vec!["Number"]);
/// ```
pub trait Validate: Serialize + Sized + 'static {
    /// The rule set declared for this model.
    fn rules() -> Result<&'static ModelRules>;

    /// Validate the model with the given lookup services.
    fn validate(&self, services: &Services) -> Result<ValidationErrors> {
        validate_model(self, Self::rules()?, services)
    }
}
