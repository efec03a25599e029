//! Validation of Open API request bodies as they arrive on the wire.

use registry_models::{
    default_services, schema_registry, LanguageItem, OrganizationIn, PhoneIn, ServiceChannelIn,
    ServiceIn,
};
use registry_validate::config::ValidatorConfig;
use registry_validate::{validate_model, EngineError, Services, Validate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn organization_request_body() {
    init_tracing();
    let body = r#"{
        "OrganizationType": "Company",
        "BusinessCode": "1234567",
        "OrganizationNames": [
            { "Language": "fi", "Type": "Name", "Value": "Yritys Oy" },
            { "Language": "de", "Type": "Name", "Value": "Firma GmbH" }
        ],
        "DisplayNameTypes": [{ "Language": "fi", "Type": "Name" }],
        "EmailAddresses": [{ "Language": "fi", "Value": "info@yritys" }],
        "PublishingStatus": "Archived"
    }"#;
    let organization: OrganizationIn = serde_json::from_str(body).unwrap();
    let errors = organization.validate(&default_services()).unwrap();

    let mut fields = errors.field_names();
    fields.sort();
    assert_eq!(
        fields,
        vec![
            "BusinessCode",
            "DisplayNameTypes",
            "EmailAddresses[0].Value",
            "OrganizationNames[1].Language",
            "PublishingStatus",
        ]
    );
    assert!(errors.get("PublishingStatus")[0].message.contains("Draft, Published"));
}

#[test]
fn service_request_body() {
    init_tracing();
    let body = r#"{
        "Type": "Service",
        "ServiceNames": [{ "Language": "fi", "Type": "Name", "Value": "Kotihoito" }],
        "ServiceDescriptions": [
            { "Language": "fi", "Type": "Summary", "Value": "Kotihoito on apua arjen askareisiin." }
        ],
        "Languages": ["fi"],
        "ServiceChargeTypes": ["Other"],
        "ChargeTypeAdditionalInfo": [{ "Language": "fi", "Value": "Maksu tulojen mukaan." }],
        "PublishingStatus": "Published"
    }"#;
    let service: ServiceIn = serde_json::from_str(body).unwrap();
    let errors = service.validate(&default_services()).unwrap();
    assert!(errors.is_empty(), "{:?}", errors.fields);
}

#[test]
fn channel_request_body() {
    init_tracing();
    let body = r#"{
        "OrganizationId": "org-1",
        "ServiceChannelNames": [{ "Language": "fi", "Value": "Verkkoasiointi" }],
        "Urls": [
            { "Language": "fi", "Value": "https://asiointi.example.fi/fi" },
            { "Language": "en", "Value": "http://asiointi.example.fi/en" }
        ],
        "Languages": ["fi", "en"],
        "PublishingStatus": "Draft"
    }"#;
    let channel: ServiceChannelIn = serde_json::from_str(body).unwrap();
    let errors = channel.validate(&default_services()).unwrap();
    assert_eq!(errors.field_names(), vec!["Urls[1]"]);
}

#[test]
fn configured_services_restrict_languages() {
    let config = ValidatorConfig::from_vars(vec![(
        "REGISTRY_LANGUAGE_CODES".to_string(),
        "fi".to_string(),
    )])
    .unwrap();
    let services = Services::from_config(&config).unwrap();

    let service = ServiceIn {
        service_type: Some("Service".into()),
        languages: vec!["fi".into(), "sv".into()],
        ..ServiceIn::default()
    };
    let errors = service.validate(&services).unwrap();
    assert!(errors.get("Languages[1]")[0]
        .message
        .contains("Allowed language codes are: fi."));
    // without an enum table every service type is rejected
    assert_eq!(errors.get("Type")[0].code, "enum_wire_value");
}

#[test]
fn registry_knows_every_model() {
    let registry = schema_registry().unwrap();
    assert!(registry.contains::<OrganizationIn>());
    assert!(registry.contains::<ServiceIn>());
    assert!(registry.contains::<ServiceChannelIn>());
    assert!(registry.get::<ServiceIn>().unwrap().has_field("Type"));
}

#[test]
fn rules_of_one_model_reject_another() {
    let rules = OrganizationIn::rules().unwrap();
    let result = validate_model(&ServiceIn::default(), rules, &default_services());
    assert!(matches!(result, Err(EngineError::SchemaMismatch { .. })));
}

#[test]
fn default_services_use_default_configuration_languages() {
    let configured = Services::from_config(&ValidatorConfig::default()).unwrap();
    assert_eq!(
        default_services().languages().allowed(),
        configured.languages().allowed()
    );
}

#[test]
fn shared_rules_and_services_across_threads() {
    init_tracing();
    let rules = ServiceChannelIn::rules().unwrap();
    let services = default_services();

    let channel = ServiceChannelIn {
        organization_id: Some("org-1".into()),
        service_channel_names: vec![LanguageItem::new("fi", "Verkkoasiointi")],
        urls: vec![
            LanguageItem::new("fi", "https://asiointi.example.fi/fi"),
            LanguageItem::new("sv", "https://other.example.fi/sv"),
        ],
        support_phones: vec![PhoneIn {
            number: Some("not a number".into()),
            ..PhoneIn::default()
        }],
        signature_quantity: Some("1000".into()),
        languages: vec!["fi".into(), "sv".into()],
        publishing_status: Some("Draft".into()),
        ..ServiceChannelIn::default()
    };

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| validate_model(&channel, rules, &services)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect()
    });

    let expected = &results[0];
    assert_eq!(
        expected.field_names(),
        vec!["Urls[1]", "SupportPhones[0].Number", "SignatureQuantity"]
    );
    assert!(results.iter().all(|errors| errors == expected));
}
