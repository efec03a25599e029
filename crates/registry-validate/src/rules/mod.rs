//! Rule catalogue.
//!
//! Single-value rules live in `value_rules`, rules switched on by a sibling
//! field in `conditional_rules`, and rules over lists in `list_rules`.
//! [`Rule`] closes the catalogue so rule sets can be stored, compared and
//! loaded from JSON.

mod conditional_rules;
mod list_rules;
pub(crate) mod syntax;
mod value_rules;

pub use conditional_rules::*;
pub use list_rules::*;
pub use value_rules::*;

use crate::context::EvaluationContext;
use crate::error::Result;
use crate::traits::{Outcome, ValidationRule};
use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! rule_catalogue {
    ($($(#[$doc:meta])* $variant:ident($rule:ty),)+) => {
        /// Any rule of the catalogue.
        ///
        /// Serialized with a snake-case `type` tag next to the rule's own fields:
        ///
        /// ```json
        /// { "type": "list_of", "inner": { "type": "email" }, "member": "Value" }
        /// ```
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
        #[serde(tag = "type", rename_all = "snake_case")]
        pub enum Rule {
            $($(#[$doc])* $variant($rule),)+
        }

        impl ValidationRule for Rule {
            fn evaluate(&self, value: &Value, ctx: &EvaluationContext<'_>) -> Result<Outcome> {
                match self {
                    $(Rule::$variant(rule) => rule.evaluate(value, ctx),)+
                }
            }

            fn rule_name(&self) -> &'static str {
                match self {
                    $(Rule::$variant(rule) => rule.rule_name(),)+
                }
            }

            fn root_references(&self) -> Vec<&str> {
                match self {
                    $(Rule::$variant(rule) => rule.root_references(),)+
                }
            }
        }

        $(
            impl From<$rule> for Rule {
                fn from(rule: $rule) -> Self {
                    Rule::$variant(rule)
                }
            }
        )+
    };
}

rule_catalogue! {
    /// Value must be present
    Required(RequiredRule),
    /// Text of at least five characters
    ValueNotEmpty(ValueNotEmptyRule),
    /// Value from a fixed set
    AllowedValues(AllowedValuesRule),
    /// Value from the wire values of an enum domain
    EnumWireValue(EnumWireValueRule),
    /// Known language code
    LanguageCode(LanguageCodeRule),
    /// E-mail address
    Email(EmailRule),
    /// Absolute URL
    Url(UrlRule),
    /// Full regex match
    Regex(RegexRule),
    /// Text length limit
    MaxLength(MaxLengthRule),
    /// Required when a sibling has a value
    RequiredIf(RequiredIfRule),
    /// List required when a sibling has a value
    ListRequiredIf(ListRequiredIfRule),
    /// Non-empty list without empty elements
    ListRequired(ListRequiredRule),
    /// Rule applied to every element
    ListOf(ListOfRule),
    /// Length limit on a member of every element
    ListPropertyMaxLength(ListPropertyMaxLengthRule),
    /// Unique member values
    ListPropertyDuplicity(ListPropertyDuplicityRule),
    /// Each language at most once
    LocalizedLanguageDuplicity(LocalizedLanguageDuplicityRule),
    /// Unique member values per language
    LocalizedPropertyDuplicity(LocalizedPropertyDuplicityRule),
    /// Some element carries a root field's value
    ListRequiredIfProperty(ListRequiredIfPropertyRule),
    /// Two-way coverage with a linked list
    ListMatchesLinkedList(ListMatchesLinkedListRule),
    /// URLs sharing one base address
    UniformBaseUrlList(UniformBaseUrlListRule),
}

impl Rule {
    /// Parse a rule from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// JSON form of the rule.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_reaches_wrapped_rule() {
        let rule: Rule = RequiredIfRule::new("Type", Some("Permit")).into();
        assert_eq!(rule.rule_name(), "required_if");
        assert_eq!(rule.root_references(), vec!["Type"]);

        let nested: Rule = ListOfRule::new(rule).member("Value").into();
        assert_eq!(nested.rule_name(), "list_of");
        assert_eq!(nested.root_references(), vec!["Type"]);
    }

    #[test]
    fn parses_tagged_json() {
        let rule = Rule::from_json(
            r#"{ "type": "list_of", "inner": { "type": "email" }, "member": "Value" }"#,
        )
        .unwrap();
        assert_eq!(rule, ListOfRule::new(EmailRule::new()).member("Value").into());

        let rule = Rule::from_json(r#"{ "type": "localized_language_duplicity" }"#).unwrap();
        assert_eq!(rule, LocalizedLanguageDuplicityRule::new().into());

        let rule = Rule::from_json(r#"{ "type": "regex", "pattern": "^[0-9]{5}$" }"#).unwrap();
        assert_eq!(rule, RegexRule::new("^[0-9]{5}$").into());
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(Rule::from_json(r#"{ "type": "nope" }"#).is_err());
    }

    #[test]
    fn json_form_is_stable() {
        let rule: Rule = ListPropertyMaxLengthRule::new("Value", 150)
            .when("Type", "Summary")
            .into();
        let json = rule.to_json().unwrap();
        assert_eq!(Rule::from_json(&json).unwrap(), rule);
        assert!(json.contains(r#""type":"list_property_max_length""#));
    }
}
