//! # Registry Models
//!
//! Open API input models of the service registry with their declared
//! validation rules.
//!
//! ## Example
//!
//! ```rust
//! use registry_models::{default_services, LocalizedListItem, ServiceIn};
//! use registry_validate::Validate;
//!
//! let service = ServiceIn {
//!     service_type: Some("Service".into()),
//!     service_names: vec![LocalizedListItem::new("fi", "Name", "Rakennuslupa")],
//!     languages: vec!["fi".into()],
//!     publishing_status: Some("Draft".into()),
//!     ..ServiceIn::default()
//! };
//!
//! let errors = service.validate(&default_services()).unwrap();
//! assert!(errors.is_empty());
//! ```

mod channel;
mod common;
mod organization;
mod schema;
mod service;

pub use channel::{ServiceChannelIn, CHANNEL_DESCRIPTION_TYPES};
pub use common::{
    LanguageItem, LocalizedListItem, NameTypeByLanguage, PhoneIn, WebPageIn,
    AREA_INFORMATION_TYPES, HTTP_URL_PATTERN, NAME_TYPES, PUBLISHING_STATUSES,
};
pub use organization::{OrganizationIn, ORGANIZATION_DESCRIPTION_TYPES};
pub use schema::{
    default_services, enum_table, schema_registry, ORGANIZATION_TYPES, SERVICE_TYPES,
};
pub use service::{
    ServiceIn, ServiceOrganizationIn, FUNDING_TYPES, SERVICE_CHARGE_TYPES,
    SERVICE_DESCRIPTION_TYPES,
};
