use crate::common::{
    LanguageItem, LocalizedListItem, PhoneIn, WebPageIn, HTTP_URL_PATTERN, PUBLISHING_STATUSES,
};
use crate::schema::cached;
use registry_validate::prelude::*;
use registry_validate::Result;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Description types of a service channel.
pub const CHANNEL_DESCRIPTION_TYPES: [&str; 2] = ["Description", "ShortDescription"];

/// Electronic service channel input of the Open API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ServiceChannelIn {
    pub source_id: Option<String>,
    pub organization_id: Option<String>,
    pub service_channel_names: Vec<LanguageItem>,
    pub service_channel_descriptions: Vec<LocalizedListItem>,
    pub urls: Vec<LanguageItem>,
    pub support_emails: Vec<LanguageItem>,
    pub support_phones: Vec<PhoneIn>,
    pub languages: Vec<String>,
    pub requires_authentication: bool,
    pub requires_signature: bool,
    pub signature_quantity: Option<String>,
    pub attachments: Vec<WebPageIn>,
    pub publishing_status: Option<String>,
}

fn channel_rules(registry: &SchemaRegistry) -> Result<ModelRules> {
    ModelRules::builder::<ServiceChannelIn>(registry)
        .field("OrganizationId", RequiredRule::new())
        .field("ServiceChannelNames", ListRequiredRule::new())
        .field(
            "ServiceChannelNames",
            ListOfRule::new(LanguageCodeRule::new()).member("Language"),
        )
        .field(
            "ServiceChannelNames",
            ListOfRule::new(RequiredRule::new()).member("Value"),
        )
        .field("ServiceChannelNames", ListPropertyMaxLengthRule::new("Value", 100))
        .field("ServiceChannelNames", LocalizedLanguageDuplicityRule::new())
        .field(
            "ServiceChannelDescriptions",
            ListOfRule::new(AllowedValuesRule::new(CHANNEL_DESCRIPTION_TYPES)).member("Type"),
        )
        .field(
            "ServiceChannelDescriptions",
            ListPropertyMaxLengthRule::new("Value", 150).when("Type", "ShortDescription"),
        )
        .field(
            "ServiceChannelDescriptions",
            ListPropertyMaxLengthRule::new("Value", 2500).when("Type", "Description"),
        )
        .field("Urls", ListRequiredRule::new())
        .field("Urls", ListOfRule::new(UrlRule::new()).member("Value"))
        .field(
            "Urls",
            UniformBaseUrlListRule::new(HTTP_URL_PATTERN).member("Value"),
        )
        .field("Urls", LocalizedLanguageDuplicityRule::new())
        .field(
            "SupportEmails",
            ListOfRule::new(EmailRule::new()).member("Value"),
        )
        .field(
            "SupportEmails",
            LocalizedPropertyDuplicityRule::new("Value"),
        )
        .field(
            "SupportPhones",
            ListOfRule::new(RequiredRule::new()).member("Number"),
        )
        .field(
            "SupportPhones",
            ListOfRule::new(RegexRule::new(r"[0-9 ]{3,20}")).member("Number"),
        )
        .field("Languages", ListOfRule::new(LanguageCodeRule::new()))
        .field("Languages", ListPropertyDuplicityRule::new())
        .field(
            "SignatureQuantity",
            RequiredIfRule::new("RequiresSignature", Some("true")),
        )
        .field("SignatureQuantity", RegexRule::new(r"[1-9][0-9]{0,2}"))
        .field("Attachments", ListOfRule::new(UrlRule::new()).member("Url"))
        .field("PublishingStatus", RequiredRule::new())
        .field("PublishingStatus", AllowedValuesRule::new(PUBLISHING_STATUSES))
        .build()
}

impl Validate for ServiceChannelIn {
    fn rules() -> Result<&'static ModelRules> {
        static RULES: OnceLock<Result<ModelRules>> = OnceLock::new();
        cached(&RULES, channel_rules)
    }
}
