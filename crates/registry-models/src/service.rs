use crate::common::{
    LanguageItem, LocalizedListItem, WebPageIn, AREA_INFORMATION_TYPES, NAME_TYPES,
    PUBLISHING_STATUSES,
};
use crate::schema::cached;
use registry_validate::prelude::*;
use registry_validate::Result;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Description types of a service.
pub const SERVICE_DESCRIPTION_TYPES: [&str; 4] =
    ["Description", "Summary", "UserInstruction", "ChargeTypeAdditionalInfo"];

/// Charge types of a service.
pub const SERVICE_CHARGE_TYPES: [&str; 3] = ["Charged", "Free", "Other"];

/// Funding types of a service.
pub const FUNDING_TYPES: [&str; 2] = ["PubliclyFunded", "MarketFunded"];

/// An organization taking part in producing a service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ServiceOrganizationIn {
    pub organization_id: Option<String>,
    pub role_type: Option<String>,
}

impl ServiceOrganizationIn {
    pub fn new(organization_id: &str, role_type: &str) -> Self {
        Self {
            organization_id: Some(organization_id.to_string()),
            role_type: Some(role_type.to_string()),
        }
    }
}

/// Service input of the Open API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ServiceIn {
    pub source_id: Option<String>,
    #[serde(rename = "Type")]
    pub service_type: Option<String>,
    pub funding_type: Option<String>,
    pub service_names: Vec<LocalizedListItem>,
    pub service_descriptions: Vec<LocalizedListItem>,
    pub languages: Vec<String>,
    pub keywords: Vec<LanguageItem>,
    pub requirements: Vec<LanguageItem>,
    pub service_charge_types: Vec<String>,
    pub charge_type_additional_info: Vec<LanguageItem>,
    pub service_vouchers_in_use: bool,
    pub service_vouchers: Vec<WebPageIn>,
    pub main_responsible_organization: Option<String>,
    pub organizations: Vec<ServiceOrganizationIn>,
    pub area_type: Option<String>,
    pub areas: Vec<String>,
    pub publishing_status: Option<String>,
}

fn service_rules(registry: &SchemaRegistry) -> Result<ModelRules> {
    ModelRules::builder::<ServiceIn>(registry)
        .field("Type", RequiredRule::new())
        .field("Type", EnumWireValueRule::new("ServiceType"))
        .field("FundingType", AllowedValuesRule::new(FUNDING_TYPES))
        .field("ServiceNames", ListRequiredRule::new())
        .field(
            "ServiceNames",
            ListOfRule::new(LanguageCodeRule::new()).member("Language"),
        )
        .field(
            "ServiceNames",
            ListOfRule::new(AllowedValuesRule::new(NAME_TYPES)).member("Type"),
        )
        .field("ServiceNames", ListPropertyMaxLengthRule::new("Value", 100))
        .field("ServiceNames", LocalizedPropertyDuplicityRule::new("Type"))
        .field(
            "ServiceDescriptions",
            ListOfRule::new(AllowedValuesRule::new(SERVICE_DESCRIPTION_TYPES)).member("Type"),
        )
        .field(
            "ServiceDescriptions",
            ListPropertyMaxLengthRule::new("Value", 150).when("Type", "Summary"),
        )
        .field(
            "ServiceDescriptions",
            ListPropertyMaxLengthRule::new("Value", 2500).when("Type", "Description"),
        )
        .field("Languages", ListRequiredRule::new())
        .field("Languages", ListOfRule::new(LanguageCodeRule::new()))
        .field("Languages", ListPropertyDuplicityRule::new())
        .field("Keywords", ListOfRule::new(ValueNotEmptyRule::new()).member("Value"))
        .field("Keywords", ListPropertyMaxLengthRule::new("Value", 150))
        .field("Keywords", LocalizedPropertyDuplicityRule::new("Value"))
        .field(
            "Requirements",
            ListOfRule::new(LanguageCodeRule::new()).member("Language"),
        )
        .field("Requirements", ListPropertyMaxLengthRule::new("Value", 2500))
        .field(
            "ServiceChargeTypes",
            ListOfRule::new(AllowedValuesRule::new(SERVICE_CHARGE_TYPES)),
        )
        .field(
            "ChargeTypeAdditionalInfo",
            RequiredIfRule::new("ServiceChargeTypes", Some("Other")),
        )
        .field(
            "ServiceVouchers",
            ListRequiredIfRule::new("ServiceVouchersInUse", Some("true")),
        )
        .field("ServiceVouchers", ListOfRule::new(UrlRule::new()).member("Url"))
        .field(
            "Organizations",
            ListRequiredIfPropertyRule::new("OrganizationId", "MainResponsibleOrganization"),
        )
        .field("Organizations", ListPropertyDuplicityRule::member("OrganizationId"))
        .field("AreaType", AllowedValuesRule::new(AREA_INFORMATION_TYPES))
        .field("Areas", ListRequiredIfRule::new("AreaType", Some("AreaType")))
        .field("PublishingStatus", RequiredRule::new())
        .field("PublishingStatus", AllowedValuesRule::new(PUBLISHING_STATUSES))
        .build()
}

impl Validate for ServiceIn {
    fn rules() -> Result<&'static ModelRules> {
        static RULES: OnceLock<Result<ModelRules>> = OnceLock::new();
        cached(&RULES, service_rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::default_services;

    fn service() -> ServiceIn {
        ServiceIn {
            service_type: Some("Service".into()),
            funding_type: Some("PubliclyFunded".into()),
            service_names: vec![LocalizedListItem::new("fi", "Name", "Rakennuslupa")],
            service_descriptions: vec![LocalizedListItem::new(
                "fi",
                "Summary",
                "Rakennuslupa tarvitaan uuden rakennuksen rakentamiseen.",
            )],
            languages: vec!["fi".into(), "sv".into()],
            keywords: vec![LanguageItem::new("fi", "rakentaminen")],
            service_charge_types: vec!["Charged".into()],
            main_responsible_organization: Some("org-1".into()),
            organizations: vec![
                ServiceOrganizationIn::new("org-2", "Producer"),
                ServiceOrganizationIn::new("org-1", "Responsible"),
            ],
            publishing_status: Some("Draft".into()),
            ..ServiceIn::default()
        }
    }

    #[test]
    fn valid_service() {
        let errors = service().validate(&default_services()).unwrap();
        assert!(errors.is_empty(), "{:?}", errors.fields);
    }

    #[test]
    fn other_charge_type_requires_additional_info() {
        let mut service = service();
        service.service_charge_types = vec!["Charged".into(), "Other".into()];
        let errors = service.validate(&default_services()).unwrap();
        assert_eq!(errors.field_names(), vec!["ChargeTypeAdditionalInfo"]);

        service.charge_type_additional_info = vec![LanguageItem::new("fi", "Hinnasto")];
        assert!(service.validate(&default_services()).unwrap().is_empty());
    }

    #[test]
    fn vouchers_required_when_in_use() {
        let mut service = service();
        service.service_vouchers_in_use = true;
        let errors = service.validate(&default_services()).unwrap();
        assert_eq!(errors.field_names(), vec!["ServiceVouchers"]);

        service.service_vouchers = vec![WebPageIn::new("fi", "https://www.palveluseteli.fi")];
        assert!(service.validate(&default_services()).unwrap().is_empty());
    }

    #[test]
    fn main_organization_must_be_listed() {
        let mut service = service();
        service.main_responsible_organization = Some("org-3".into());
        let errors = service.validate(&default_services()).unwrap();
        let failure = errors.get("Organizations")[0];
        assert_eq!(failure.code, "list_required_if_property");
        assert!(failure.message.contains("'org-3'"));

        service.main_responsible_organization = None;
        assert!(service.validate(&default_services()).unwrap().is_empty());
    }

    #[test]
    fn keywords_unique_per_language() {
        let mut service = service();
        service.keywords = vec![
            LanguageItem::new("fi", "rakennuslupa"),
            LanguageItem::new("sv", "rakennuslupa"),
            LanguageItem::new("fi", "rakennuslupa"),
        ];
        let errors = service.validate(&default_services()).unwrap();
        assert_eq!(errors.field_names(), vec!["Keywords[2]"]);

        service.keywords = vec![LanguageItem::new("fi", "lupa")];
        let errors = service.validate(&default_services()).unwrap();
        assert_eq!(errors.field_names(), vec!["Keywords[0].Value"]);
    }

    #[test]
    fn unknown_language_code() {
        let mut service = service();
        service.languages = vec!["fi".into(), "de".into(), "fi".into()];
        let errors = service.validate(&default_services()).unwrap();
        assert_eq!(errors.field_names(), vec!["Languages[1]", "Languages[2]"]);
    }
}
