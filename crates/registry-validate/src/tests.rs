//! Property-based tests for the rule catalogue.

#[cfg(test)]
mod property_tests {
    use crate::context::{EvaluationContext, Services};
    use crate::rules::*;
    use crate::traits::ValidationRule;
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use std::collections::HashSet;

    fn evaluate(rule: &dyn ValidationRule, root: &Value, field: &str) -> bool {
        let services = Services::default();
        let ctx = EvaluationContext::new(root, field, &services);
        rule.evaluate(&root[field], &ctx).unwrap().is_valid()
    }

    // Whitespace padding around a core of printable characters
    fn padded(core: &'static str) -> impl Strategy<Value = String> {
        ("[ \t]{0,3}", core, "[ \t]{0,3}").prop_map(|(l, c, r)| format!("{l}{c}{r}"))
    }

    fn optional_message_strategy() -> impl Strategy<Value = Option<String>> {
        prop_oneof![Just(None), "[a-zA-Z0-9 ]{1,50}".prop_map(Some),]
    }

    fn single_value_rule_strategy() -> impl Strategy<Value = Rule> {
        prop_oneof![
            optional_message_strategy().prop_map(|message| Rule::Email(EmailRule { message })),
            optional_message_strategy().prop_map(|message| Rule::Url(UrlRule { message })),
            (any::<bool>(), optional_message_strategy()).prop_map(
                |(allow_empty_strings, message)| Rule::Required(RequiredRule {
                    allow_empty_strings,
                    message
                })
            ),
            (0usize..500).prop_map(|length| Rule::MaxLength(MaxLengthRule { length })),
            prop::collection::vec("[A-Za-z]{1,10}", 1..5)
                .prop_map(|values| Rule::AllowedValues(AllowedValuesRule { values })),
            prop_oneof![Just(r"^\d+$".to_string()), Just(r"[a-z]+".to_string()),]
                .prop_map(|pattern| Rule::Regex(RegexRule::new(pattern))),
        ]
    }

    fn rule_strategy() -> impl Strategy<Value = Rule> {
        prop_oneof![
            single_value_rule_strategy(),
            (
                single_value_rule_strategy(),
                prop::option::of("[A-Z][a-z]{1,10}"),
            )
                .prop_map(|(inner, member)| {
                    let mut rule = ListOfRule::new(inner);
                    rule.member = member;
                    Rule::ListOf(rule)
                }),
            ("[A-Z][a-z]{1,10}", 1usize..500, prop::option::of("[A-Z][a-z]{1,10}")).prop_map(
                |(member, length, discriminator)| {
                    let mut rule = ListPropertyMaxLengthRule::new(member, length);
                    if let Some(value) = discriminator {
                        rule = rule.when("Type", value);
                    }
                    Rule::ListPropertyMaxLength(rule)
                }
            ),
            ("[A-Z][a-z]{1,10}", prop::option::of("[A-Z][a-z]{1,10}")).prop_map(
                |(sibling, desired)| Rule::RequiredIf(RequiredIfRule::new(sibling, desired.as_deref()))
            ),
            "[A-Z][a-z]{1,10}".prop_map(|list| Rule::ListMatchesLinkedList(
                ListMatchesLinkedListRule::new(list)
            )),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn value_not_empty_accepts_blank(s in "[ \t\n]{0,10}") {
            let root = json!({ "Name": s });
            prop_assert!(evaluate(&ValueNotEmptyRule::new(), &root, "Name"));
        }

        #[test]
        fn value_not_empty_rejects_near_empty(s in padded("[a-zA-Z0-9äöå]{1,4}")) {
            let root = json!({ "Name": s });
            prop_assert!(!evaluate(&ValueNotEmptyRule::new(), &root, "Name"));
        }

        #[test]
        fn value_not_empty_accepts_real_values(s in padded("[a-zA-Z0-9äöå][a-zA-Z0-9äöå ]{3,30}[a-zA-Z0-9äöå]")) {
            let root = json!({ "Name": s });
            prop_assert!(evaluate(&ValueNotEmptyRule::new(), &root, "Name"));
        }

        #[test]
        fn duplicity_iff_repeated_value(values in prop::collection::vec("[a-c]{1,2}", 0..8)) {
            let items: Vec<Value> = values.iter().map(|v| json!({ "Value": v })).collect();
            let root = json!({ "Phones": items });
            let distinct: HashSet<&String> = values.iter().collect();

            let valid = evaluate(&ListPropertyDuplicityRule::member("Value"), &root, "Phones");
            prop_assert_eq!(valid, distinct.len() == values.len());
        }

        #[test]
        fn localized_duplicity_is_scoped_to_language(
            pairs in prop::collection::vec(("(fi|sv|en)", "[ab]"), 0..6)
        ) {
            let items: Vec<Value> = pairs
                .iter()
                .map(|(language, value)| json!({ "Language": language, "Value": value }))
                .collect();
            let root = json!({ "Keywords": items });
            let distinct: HashSet<&(String, String)> = pairs.iter().collect();

            let valid = evaluate(&LocalizedPropertyDuplicityRule::new("Value"), &root, "Keywords");
            prop_assert_eq!(valid, distinct.len() == pairs.len());
        }

        #[test]
        fn evaluation_is_deterministic(
            urls in prop::collection::vec("https?://(a|b)\\.fi/[a-z]{0,5}", 0..5),
            emails in prop::collection::vec("[a-z.]{1,6}@(example\\.fi|x)", 0..5),
        ) {
            let root = json!({ "Urls": urls, "Emails": emails });
            let services = Services::default();
            let url_rule = UniformBaseUrlListRule::new("^https?://.*$");
            let email_rule = ListOfRule::new(EmailRule::new());

            let run = || {
                let url_ctx = EvaluationContext::new(&root, "Urls", &services);
                let email_ctx = EvaluationContext::new(&root, "Emails", &services);
                (
                    url_rule.evaluate(&root["Urls"], &url_ctx).unwrap(),
                    email_rule.evaluate(&root["Emails"], &email_ctx).unwrap(),
                )
            };
            prop_assert_eq!(run(), run());
        }

        #[test]
        fn rule_json_round_trip(rule in rule_strategy()) {
            let json = serde_json::to_string(&rule).unwrap();
            let parsed: Rule = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(rule, parsed);
        }
    }
}
