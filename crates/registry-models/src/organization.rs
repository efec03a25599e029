use crate::common::{
    LanguageItem, LocalizedListItem, NameTypeByLanguage, PhoneIn, WebPageIn,
    AREA_INFORMATION_TYPES, NAME_TYPES, PUBLISHING_STATUSES,
};
use crate::schema::cached;
use registry_validate::prelude::*;
use registry_validate::Result;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Description types of an organization.
pub const ORGANIZATION_DESCRIPTION_TYPES: [&str; 2] = ["Description", "ShortDescription"];

/// Organization input of the Open API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct OrganizationIn {
    pub source_id: Option<String>,
    pub parent_organization_id: Option<String>,
    pub organization_type: Option<String>,
    pub business_code: Option<String>,
    pub business_name: Option<String>,
    pub organization_names: Vec<LocalizedListItem>,
    pub display_name_types: Vec<NameTypeByLanguage>,
    pub organization_descriptions: Vec<LocalizedListItem>,
    pub email_addresses: Vec<LanguageItem>,
    pub phone_numbers: Vec<PhoneIn>,
    pub web_pages: Vec<WebPageIn>,
    pub area_type: Option<String>,
    pub areas: Vec<String>,
    pub publishing_status: Option<String>,
}

fn organization_rules(registry: &SchemaRegistry) -> Result<ModelRules> {
    ModelRules::builder::<OrganizationIn>(registry)
        .field("OrganizationType", RequiredRule::new())
        .field("OrganizationType", EnumWireValueRule::new("OrganizationType"))
        .field(
            "BusinessCode",
            RegexRule::new(r"[0-9]{7}-[0-9]")
                .with_message("Business code must be of the form 1234567-8."),
        )
        .field("BusinessName", ValueNotEmptyRule::new())
        .field("OrganizationNames", ListRequiredRule::new())
        .field(
            "OrganizationNames",
            ListOfRule::new(LanguageCodeRule::new()).member("Language"),
        )
        .field(
            "OrganizationNames",
            ListOfRule::new(AllowedValuesRule::new(NAME_TYPES)).member("Type"),
        )
        .field("OrganizationNames", ListPropertyMaxLengthRule::new("Value", 100))
        .field("OrganizationNames", LocalizedPropertyDuplicityRule::new("Type"))
        .field(
            "DisplayNameTypes",
            ListMatchesLinkedListRule::new("OrganizationNames"),
        )
        .field(
            "OrganizationDescriptions",
            ListOfRule::new(LanguageCodeRule::new()).member("Language"),
        )
        .field(
            "OrganizationDescriptions",
            ListOfRule::new(AllowedValuesRule::new(ORGANIZATION_DESCRIPTION_TYPES)).member("Type"),
        )
        .field(
            "OrganizationDescriptions",
            ListPropertyMaxLengthRule::new("Value", 150).when("Type", "ShortDescription"),
        )
        .field(
            "OrganizationDescriptions",
            ListPropertyMaxLengthRule::new("Value", 2500).when("Type", "Description"),
        )
        .field(
            "OrganizationDescriptions",
            LocalizedPropertyDuplicityRule::new("Type"),
        )
        .field(
            "EmailAddresses",
            ListOfRule::new(EmailRule::new()).member("Value"),
        )
        .field(
            "EmailAddresses",
            ListOfRule::new(LanguageCodeRule::new()).member("Language"),
        )
        .field(
            "EmailAddresses",
            LocalizedPropertyDuplicityRule::new("Value"),
        )
        .field(
            "PhoneNumbers",
            ListOfRule::new(RequiredRule::new()).member("Number"),
        )
        .field(
            "PhoneNumbers",
            ListOfRule::new(RegexRule::new(r"\+[0-9]{1,4}")).member("PrefixNumber"),
        )
        .field("WebPages", ListOfRule::new(UrlRule::new()).member("Url"))
        .field("WebPages", ListPropertyMaxLengthRule::new("Value", 110))
        .field("AreaType", AllowedValuesRule::new(AREA_INFORMATION_TYPES))
        .field("Areas", ListRequiredIfRule::new("AreaType", Some("AreaType")))
        .field("PublishingStatus", RequiredRule::new())
        .field("PublishingStatus", AllowedValuesRule::new(PUBLISHING_STATUSES))
        .build()
}

impl Validate for OrganizationIn {
    fn rules() -> Result<&'static ModelRules> {
        static RULES: OnceLock<Result<ModelRules>> = OnceLock::new();
        cached(&RULES, organization_rules)
    }
}
