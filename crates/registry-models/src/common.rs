//! List item types shared by the input models.

use serde::{Deserialize, Serialize};

/// Allowed name types of organizations and services.
pub const NAME_TYPES: [&str; 2] = ["Name", "AlternativeName"];

/// Publishing states accepted on input.
pub const PUBLISHING_STATUSES: [&str; 2] = ["Draft", "Published"];

/// Area information types.
pub const AREA_INFORMATION_TYPES: [&str; 3] =
    ["WholeCountry", "WholeCountryExceptAlandIslands", "AreaType"];

/// Absolute http(s) URL pattern used on URL lists.
pub const HTTP_URL_PATTERN: &str = r"^https?://.*$";

/// A value in one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LanguageItem {
    pub language: Option<String>,
    pub value: Option<String>,
}

impl LanguageItem {
    pub fn new(language: &str, value: &str) -> Self {
        Self {
            language: Some(language.to_string()),
            value: Some(value.to_string()),
        }
    }
}

/// A typed value in one language, e.g. a name or a description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LocalizedListItem {
    pub language: Option<String>,
    #[serde(rename = "Type")]
    pub item_type: Option<String>,
    pub value: Option<String>,
}

impl LocalizedListItem {
    pub fn new(language: &str, item_type: &str, value: &str) -> Self {
        Self {
            language: Some(language.to_string()),
            item_type: Some(item_type.to_string()),
            value: Some(value.to_string()),
        }
    }
}

/// Which name type is displayed in a language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NameTypeByLanguage {
    pub language: Option<String>,
    #[serde(rename = "Type")]
    pub item_type: Option<String>,
}

impl NameTypeByLanguage {
    pub fn new(language: &str, item_type: &str) -> Self {
        Self {
            language: Some(language.to_string()),
            item_type: Some(item_type.to_string()),
        }
    }
}

/// A phone number in one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PhoneIn {
    pub language: Option<String>,
    pub prefix_number: Option<String>,
    pub number: Option<String>,
    pub is_finnish_service_number: bool,
    pub additional_information: Option<String>,
}

/// A web page in one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct WebPageIn {
    pub language: Option<String>,
    pub url: Option<String>,
    pub value: Option<String>,
}

impl WebPageIn {
    pub fn new(language: &str, url: &str) -> Self {
        Self {
            language: Some(language.to_string()),
            url: Some(url.to_string()),
            value: None,
        }
    }
}
