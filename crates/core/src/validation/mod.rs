//! Server-side validation rules for customer payloads.
//!
//! Validation runs over the raw JSON field map rather than a deserialized
//! struct so that every problem with every field can be reported at once,
//! including wrong JSON types. Each field carries an ordered list of
//! [`Rule`]s:
//!
//! | Field        | Rules                                  |
//! |--------------|----------------------------------------|
//! | `first_name` | required, string                       |
//! | `last_name`  | required, string                       |
//! | `dob`        | required, date                         |
//! | `username`   | required, min:2, username format, unique |
//! | `password`   | required, min:8, password format       |
//!
//! A failing `required` rule suppresses the remaining rules for that field;
//! otherwise every rule runs and all failures are reported in rule order.
//! Fields never short-circuit each other.

mod errors;
mod rules;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::types::CustomerDraft;

pub use errors::ValidationErrors;
pub use rules::{Rule, parse_date};

/// Fields whose string values are kept verbatim (not trimmed) before validation.
const UNTRIMMED_FIELDS: &[&str] = &["password"];

/// The rule table for customer create and update payloads.
pub const CUSTOMER_RULES: &[(&str, &[Rule])] = &[
    ("first_name", &[Rule::Required, Rule::String]),
    ("last_name", &[Rule::Required, Rule::String]),
    ("dob", &[Rule::Required, Rule::Date]),
    (
        "username",
        &[
            Rule::Required,
            Rule::MinLength(2),
            Rule::UsernameFormat,
            Rule::Unique,
        ],
    ),
    (
        "password",
        &[Rule::Required, Rule::MinLength(8), Rule::PasswordFormat],
    ),
];

/// Trim surrounding whitespace from every string value except passwords.
#[must_use]
pub fn normalize(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) if !UNTRIMMED_FIELDS.contains(&key.as_str()) => {
                    Value::String(s.trim().to_owned())
                }
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Apply a rule table to a field map.
///
/// `is_taken` answers the [`Rule::Unique`] question for a candidate value; it
/// should already exclude the record being updated.
#[must_use]
pub fn check(
    table: &[(&str, &[Rule])],
    fields: &Map<String, Value>,
    is_taken: &dyn Fn(&str) -> bool,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for (field, rules) in table {
        let value = fields.get(*field).unwrap_or(&Value::Null);

        for rule in *rules {
            if rule.passes(value, is_taken) {
                continue;
            }
            errors.add(field, rule.message(field));
            if matches!(rule, Rule::Required) {
                break;
            }
        }
    }

    errors
}

/// Validate a customer payload and produce a draft ready for persistence.
///
/// Input strings are normalized with [`normalize`] first, so the draft holds
/// trimmed names and username.
///
/// # Errors
///
/// Returns every rule violation, grouped by field, if any rule fails.
pub fn validate_customer(
    fields: &Map<String, Value>,
    is_taken: &dyn Fn(&str) -> bool,
) -> Result<CustomerDraft, ValidationErrors> {
    let fields = normalize(fields);
    let errors = check(CUSTOMER_RULES, &fields, is_taken);
    if !errors.is_empty() {
        return Err(errors);
    }

    let text = |key: &str| {
        fields
            .get(key)
            .and_then(rules::as_text)
            .unwrap_or_default()
    };
    let dob: Option<NaiveDate> = fields.get("dob").and_then(Value::as_str).and_then(parse_date);

    let Some(dob) = dob else {
        // Unreachable once the Date rule passed, but keep the contract total.
        let mut errors = ValidationErrors::new();
        errors.add("dob", Rule::Date.message("dob"));
        return Err(errors);
    };

    Ok(CustomerDraft {
        first_name: text("first_name"),
        last_name: text("last_name"),
        dob,
        username: text("username"),
        password: text("password"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(overrides: &Value) -> Map<String, Value> {
        let mut base = json!({
            "first_name": "John",
            "last_name": "Lastname",
            "dob": "1990-11-11",
            "username": "userjohn",
            "password": "PasS1234"
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        base.as_object().cloned().unwrap()
    }

    fn never_taken(_: &str) -> bool {
        false
    }

    fn errors_for(overrides: &Value) -> ValidationErrors {
        validate_customer(&payload(overrides), &never_taken).unwrap_err()
    }

    #[test]
    fn test_valid_payload_produces_draft() {
        let draft = validate_customer(&payload(&json!({})), &never_taken).unwrap();
        assert_eq!(draft.first_name, "John");
        assert_eq!(draft.username, "userjohn");
        assert_eq!(draft.dob, NaiveDate::from_ymd_opt(1990, 11, 11).unwrap());
        assert_eq!(draft.password, "PasS1234");
    }

    #[test]
    fn test_password_too_short_and_bad_format_reports_both_in_order() {
        let errors = errors_for(&json!({"password": "1"}));
        assert_eq!(
            errors.get("password").unwrap(),
            [
                "The password field must be at least 8 characters.",
                "The password field format is invalid.",
            ]
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_password_long_enough_but_bad_format() {
        let errors = errors_for(&json!({"password": "1123123123123"}));
        assert_eq!(
            errors.get("password").unwrap(),
            ["The password field format is invalid."]
        );

        let errors = errors_for(&json!({"password": "1aaaaaaaaaaaa"}));
        assert_eq!(
            errors.get("password").unwrap(),
            ["The password field format is invalid."]
        );
    }

    #[test]
    fn test_password_short_but_well_formed() {
        let errors = errors_for(&json!({"password": "1Aa"}));
        assert_eq!(
            errors.get("password").unwrap(),
            ["The password field must be at least 8 characters."]
        );
    }

    #[test]
    fn test_password_is_not_trimmed() {
        // Leading/trailing spaces count towards the length.
        let draft =
            validate_customer(&payload(&json!({"password": " PasS123 "})), &never_taken).unwrap();
        assert_eq!(draft.password, " PasS123 ");
    }

    #[test]
    fn test_username_too_short() {
        let errors = errors_for(&json!({"username": "a"}));
        assert_eq!(
            errors.get("username").unwrap(),
            ["The username field must be at least 2 characters."]
        );
    }

    #[test]
    fn test_username_empty_is_only_required() {
        let errors = errors_for(&json!({"username": ""}));
        assert_eq!(
            errors.get("username").unwrap(),
            ["The username field is required."]
        );

        let errors = errors_for(&json!({"username": "   "}));
        assert_eq!(
            errors.get("username").unwrap(),
            ["The username field is required."]
        );
    }

    #[test]
    fn test_username_format() {
        for bad in ["user-jo.hn", "£½£234ljlk", "john..doe", "-john", "john-", "jo hn"] {
            let errors = errors_for(&json!({"username": bad}));
            assert_eq!(
                errors.get("username").unwrap(),
                ["The username field format is invalid."],
                "{bad}"
            );
        }
        for good in ["john.doe", "john-doe", "JD", "user123", "a1-b2"] {
            assert!(
                validate_customer(&payload(&json!({"username": good})), &never_taken).is_ok(),
                "{good}"
            );
        }
    }

    #[test]
    fn test_username_taken() {
        let errors =
            validate_customer(&payload(&json!({})), &|u: &str| u == "userjohn").unwrap_err();
        assert_eq!(
            errors.get("username").unwrap(),
            ["The username has already been taken."]
        );
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let errors = validate_customer(&Map::new(), &never_taken).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(
            errors.get("first_name").unwrap(),
            ["The first name field is required."]
        );
        assert_eq!(
            errors.get("last_name").unwrap(),
            ["The last name field is required."]
        );
        assert_eq!(errors.get("dob").unwrap(), ["The dob field is required."]);
    }

    #[test]
    fn test_wrong_types() {
        let errors = errors_for(&json!({"first_name": 12, "dob": "not-a-date"}));
        assert_eq!(
            errors.get("first_name").unwrap(),
            ["The first name field must be a string."]
        );
        assert_eq!(
            errors.get("dob").unwrap(),
            ["The dob field must be a valid date."]
        );
    }

    #[test]
    fn test_names_are_trimmed() {
        let draft = validate_customer(
            &payload(&json!({"first_name": "  John ", "username": " userjohn "})),
            &never_taken,
        )
        .unwrap();
        assert_eq!(draft.first_name, "John");
        assert_eq!(draft.username, "userjohn");
    }

    #[test]
    fn test_unique_sees_trimmed_username() {
        let errors = validate_customer(
            &payload(&json!({"username": " taken "})),
            &|u: &str| u == "taken",
        )
        .unwrap_err();
        assert_eq!(
            errors.get("username").unwrap(),
            ["The username has already been taken."]
        );
    }

    #[test]
    fn test_dob_year_outside_calendar_range() {
        for dob in ["-5000-01-01", "12345-01-01"] {
            let errors = errors_for(&json!({ "dob": dob }));
            assert_eq!(
                errors.get("dob").unwrap(),
                ["The dob field must be a valid date."],
                "dob {dob}"
            );
        }
    }

    #[test]
    fn test_errors_follow_rule_table_order() {
        let errors = validate_customer(&Map::new(), &never_taken).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(
            fields,
            ["first_name", "last_name", "dob", "username", "password"]
        );

        let json = serde_json::to_string(&errors).unwrap();
        let first_name = json.find("first_name").unwrap();
        let dob = json.find("dob").unwrap();
        let password = json.find("password").unwrap();
        assert!(first_name < dob && dob < password, "{json}");
    }
}
