//! Schema registry and per-model rule sets.
//!
//! Field names are learned once per model type, when the type is
//! registered. Rule sets are checked against them when they are built, so
//! a rule declared on a field the model does not have fails before any
//! graph is validated.

use crate::error::{EngineError, Result};
use crate::rules::Rule;
use crate::traits::ValidationRule;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::{type_name, TypeId};
use std::collections::HashMap;

/// Top-level field names of one registered model type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    name: String,
    fields: Vec<String>,
}

impl RecordSchema {
    /// Model name used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wire names of the model's fields, sorted.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether the model has a field called `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.binary_search_by(|f| f.as_str().cmp(field)).is_ok()
    }
}

/// Field-name registry keyed by model type.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<TypeId, RecordSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under `name`.
    ///
    /// Field names are taken from the serialized form of `T::default()`,
    /// which must be a record. Registering a type twice replaces the
    /// earlier entry.
    pub fn register<T>(&mut self, name: impl Into<String>) -> Result<&mut Self>
    where
        T: Serialize + Default + 'static,
    {
        let name = name.into();
        let fields = match serde_json::to_value(T::default())? {
            Value::Object(map) => {
                let mut fields: Vec<String> = map.keys().cloned().collect();
                fields.sort();
                fields
            }
            _ => {
                return Err(EngineError::NotARecord {
                    field: name,
                    path: type_name::<T>().to_string(),
                })
            }
        };

        tracing::debug!(model = %name, fields = fields.len(), "registered model schema");
        self.schemas
            .insert(TypeId::of::<T>(), RecordSchema { name, fields });
        Ok(self)
    }

    /// Schema of `T`, if registered.
    pub fn get<T: 'static>(&self) -> Option<&RecordSchema> {
        self.schemas.get(&TypeId::of::<T>())
    }

    /// Whether `T` is registered.
    pub fn contains<T: 'static>(&self) -> bool {
        self.schemas.contains_key(&TypeId::of::<T>())
    }
}

/// Rules declared on one field, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldRules {
    pub field: String,
    pub rules: Vec<Rule>,
}

/// Serializable rule declarations for one model.
///
/// ```json
/// [
///   { "field": "Names", "rules": [{ "type": "list_required" }] }
/// ]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RuleDeclarations(pub Vec<FieldRules>);

impl RuleDeclarations {
    /// Parse declarations from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// JSON form of the declarations.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The checked rule set of one model type.
#[derive(Debug, Clone)]
pub struct ModelRules {
    type_id: TypeId,
    type_name: &'static str,
    model: String,
    fields: Vec<FieldRules>,
}

impl ModelRules {
    /// Start declaring rules for `T`, checked against `registry`.
    pub fn builder<T: 'static>(registry: &SchemaRegistry) -> ModelRulesBuilder<'_> {
        ModelRulesBuilder {
            registry,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            fields: Vec::new(),
        }
    }

    /// Name the model was registered under.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Declared fields with their rules, in declaration order.
    pub fn fields(&self) -> &[FieldRules] {
        &self.fields
    }

    /// Rules declared on `field`.
    pub fn rules_for(&self, field: &str) -> impl Iterator<Item = &Rule> + '_ {
        let field = field.to_string();
        self.fields
            .iter()
            .filter(move |f| f.field == field)
            .flat_map(|f| f.rules.iter())
    }

    /// Declarations in their serializable form.
    pub fn declarations(&self) -> RuleDeclarations {
        RuleDeclarations(self.fields.clone())
    }

    /// Fails unless the rule set was built for `T`.
    pub fn check_type<T: 'static>(&self) -> Result<()> {
        if self.type_id == TypeId::of::<T>() {
            Ok(())
        } else {
            Err(EngineError::SchemaMismatch {
                expected: self.type_name.to_string(),
                actual: type_name::<T>().to_string(),
            })
        }
    }
}

/// Builder for [`ModelRules`].
#[derive(Debug)]
pub struct ModelRulesBuilder<'r> {
    registry: &'r SchemaRegistry,
    type_id: TypeId,
    type_name: &'static str,
    fields: Vec<FieldRules>,
}

impl<'r> ModelRulesBuilder<'r> {
    /// Declare `rule` on `field`.
    ///
    /// Rules on the same field keep their declaration order.
    pub fn field(mut self, field: impl Into<String>, rule: impl Into<Rule>) -> Self {
        let field = field.into();
        let rule = rule.into();
        match self.fields.iter_mut().find(|f| f.field == field) {
            Some(existing) => existing.rules.push(rule),
            None => self.fields.push(FieldRules {
                field,
                rules: vec![rule],
            }),
        }
        self
    }

    /// Declare every rule of `declarations`.
    pub fn declarations(self, declarations: RuleDeclarations) -> Self {
        declarations
            .0
            .into_iter()
            .flat_map(|f| {
                let field = f.field;
                f.rules.into_iter().map(move |rule| (field.clone(), rule))
            })
            .fold(self, |builder, (field, rule)| builder.field(field, rule))
    }

    /// Check every declared field and root reference against the schema.
    pub fn build(self) -> Result<ModelRules> {
        let schema = self
            .registry
            .schemas
            .get(&self.type_id)
            .ok_or_else(|| EngineError::UnregisteredType(self.type_name.to_string()))?;

        for declared in &self.fields {
            if !schema.has_field(&declared.field) {
                return Err(EngineError::UnknownField {
                    field: declared.field.clone(),
                    model: schema.name.clone(),
                });
            }
            for rule in &declared.rules {
                if let Some(reference) = rule
                    .root_references()
                    .into_iter()
                    .find(|r| !schema.has_field(r))
                {
                    return Err(EngineError::UnknownField {
                        field: reference.to_string(),
                        model: schema.name.clone(),
                    });
                }
            }
        }

        Ok(ModelRules {
            type_id: self.type_id,
            type_name: self.type_name,
            model: schema.name.clone(),
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{EmailRule, ListOfRule, RequiredIfRule, RequiredRule};

    #[derive(Serialize, Default)]
    #[serde(rename_all = "PascalCase")]
    struct Contact {
        name: Option<String>,
        kind: Option<String>,
        emails: Vec<String>,
    }

    #[derive(Serialize, Default)]
    struct Other {
        id: u32,
    }

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register::<Contact>("Contact").unwrap();
        registry
    }

    #[test]
    fn registers_field_names() {
        let registry = registry();
        let schema = registry.get::<Contact>().unwrap();
        assert_eq!(schema.name(), "Contact");
        assert_eq!(schema.fields(), ["Emails", "Kind", "Name"]);
        assert!(!registry.contains::<Other>());
    }

    #[test]
    fn rejects_non_record_types() {
        let mut registry = SchemaRegistry::new();
        assert!(matches!(
            registry.register::<String>("Text"),
            Err(EngineError::NotARecord { .. })
        ));
    }

    #[test]
    fn builds_and_groups_rules_per_field() {
        let registry = registry();
        let rules = ModelRules::builder::<Contact>(&registry)
            .field("Name", RequiredRule::new())
            .field("Emails", ListOfRule::new(EmailRule::new()))
            .field("Name", RequiredIfRule::new("Kind", Some("Person")))
            .build()
            .unwrap();
        assert_eq!(rules.model(), "Contact");
        assert_eq!(rules.fields().len(), 2);
        assert_eq!(rules.rules_for("Name").count(), 2);
        assert!(rules.check_type::<Contact>().is_ok());
        assert!(matches!(
            rules.check_type::<Other>(),
            Err(EngineError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn unknown_declared_field_fails_at_build() {
        let err = ModelRules::builder::<Contact>(&registry())
            .field("Phone", RequiredRule::new())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownField {
                field: "Phone".into(),
                model: "Contact".into()
            }
        );
    }

    #[test]
    fn unknown_root_reference_fails_at_build() {
        let err = ModelRules::builder::<Contact>(&registry())
            .field("Name", RequiredIfRule::new("Type", Some("Person")))
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownField { field, .. } if field == "Type"));
    }

    #[test]
    fn unregistered_type_fails_at_build() {
        assert!(matches!(
            ModelRules::builder::<Other>(&registry()).build(),
            Err(EngineError::UnregisteredType(_))
        ));
    }

    #[test]
    fn declarations_round_trip_through_json() {
        let json = r#"[
            { "field": "Name", "rules": [{ "type": "required" }] },
            { "field": "Emails", "rules": [{ "type": "list_of", "inner": { "type": "email" } }] }
        ]"#;
        let declarations = RuleDeclarations::from_json(json).unwrap();
        let rules = ModelRules::builder::<Contact>(&registry())
            .declarations(declarations.clone())
            .build()
            .unwrap();
        assert_eq!(rules.declarations(), declarations);
    }
}
