//! Shared schema registry and enum domains of the input models.

use crate::{OrganizationIn, ServiceChannelIn, ServiceIn};
use registry_validate::{
    EngineError, EnumTable, LanguageCodeSet, ModelRules, Result, SchemaRegistry, Services,
    DEFAULT_LANGUAGE_CODES,
};
use std::sync::OnceLock;

/// Organization types accepted on input.
pub const ORGANIZATION_TYPES: [&str; 7] = [
    "State",
    "Municipality",
    "RegionalOrganization",
    "Organization",
    "Company",
    "SotePublic",
    "SotePrivate",
];

/// Service types accepted on input.
pub const SERVICE_TYPES: [&str; 3] = ["Service", "PermitOrObligation", "ProfessionalQualifications"];

static REGISTRY: OnceLock<Result<SchemaRegistry>> = OnceLock::new();

/// Registry holding every input model of this crate.
pub fn schema_registry() -> Result<&'static SchemaRegistry> {
    REGISTRY
        .get_or_init(|| {
            let mut registry = SchemaRegistry::new();
            registry
                .register::<OrganizationIn>("OrganizationIn")?
                .register::<ServiceIn>("ServiceIn")?
                .register::<ServiceChannelIn>("ServiceChannelIn")?;
            Ok(registry)
        })
        .as_ref()
        .map_err(EngineError::clone)
}

/// Builds a model's rule set on first use and hands out the cached result.
pub(crate) fn cached(
    cell: &'static OnceLock<Result<ModelRules>>,
    build: fn(&SchemaRegistry) -> Result<ModelRules>,
) -> Result<&'static ModelRules> {
    cell.get_or_init(|| build(schema_registry()?))
        .as_ref()
        .map_err(EngineError::clone)
}

/// Enum domains used by the input models, each value its own wire string.
pub fn enum_table() -> EnumTable {
    EnumTable::new()
        .identity("OrganizationType", ORGANIZATION_TYPES)
        .identity("ServiceType", SERVICE_TYPES)
}

/// Lookup services with the registry's languages and enum domains.
pub fn default_services() -> Services {
    Services::builder()
        .languages(LanguageCodeSet::new(DEFAULT_LANGUAGE_CODES))
        .enums(enum_table())
        .build()
}
