//! Form validation run before a customer is submitted.
//!
//! Stricter than the server in some places (alphabetic names, an age window)
//! and looser in others (no uniqueness check). One message per field. The
//! server's verdict is authoritative.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{Months, NaiveDate};
use regex::Regex;

use customer_hub_core::CustomerInput;
use customer_hub_core::validation::parse_date;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]{2,20}$").expect("Invalid regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]{4,20}$").expect("Invalid regex"));

const MIN_AGE_YEARS: u32 = 18;
const MAX_AGE_YEARS: u32 = 100;
const MIN_PASSWORD_LENGTH: usize = 8;

pub const FIRST_NAME_MESSAGE: &str =
    "First name is required and should consist of 2-20 alphabetical characters";
pub const LAST_NAME_MESSAGE: &str =
    "Last name is required and should consist of 2-20 alphabetical characters";
pub const USERNAME_MESSAGE: &str =
    "Username is required and should consist of 4-20 alphabetical characters";
pub const DOB_REQUIRED_MESSAGE: &str = "Date of birth is required";
pub const DOB_AGE_MESSAGE: &str = "Customers age should be between 18 and 100 years old";
pub const PASSWORD_REQUIRED_MESSAGE: &str = "Password is required";
pub const PASSWORD_FORMAT_MESSAGE: &str = "Password should be at least 8 characters long and include at least one uppercase letter and one digit";

/// Field name to message; empty when the form may be submitted.
pub type FormErrors = BTreeMap<&'static str, &'static str>;

/// Check a customer form against `today`'s age window.
#[must_use]
pub fn validate_customer_input(input: &CustomerInput, today: NaiveDate) -> FormErrors {
    let mut errors = FormErrors::new();

    if !NAME_RE.is_match(&input.first_name) {
        errors.insert("first_name", FIRST_NAME_MESSAGE);
    }
    if !NAME_RE.is_match(&input.last_name) {
        errors.insert("last_name", LAST_NAME_MESSAGE);
    }
    if !USERNAME_RE.is_match(&input.username) {
        errors.insert("username", USERNAME_MESSAGE);
    }

    if input.dob.is_empty() {
        errors.insert("dob", DOB_REQUIRED_MESSAGE);
    } else if !dob_in_window(&input.dob, today) {
        errors.insert("dob", DOB_AGE_MESSAGE);
    }

    if input.password.is_empty() {
        errors.insert("password", PASSWORD_REQUIRED_MESSAGE);
    } else if !password_is_strong(&input.password) {
        errors.insert("password", PASSWORD_FORMAT_MESSAGE);
    }

    errors
}

/// Born no earlier than 100 years ago and no later than 18 years ago,
/// both bounds inclusive. Unparseable dates fail.
fn dob_in_window(raw: &str, today: NaiveDate) -> bool {
    let Some(dob) = parse_date(raw) else {
        return false;
    };
    let (Some(earliest), Some(latest)) = (
        today.checked_sub_months(Months::new(MAX_AGE_YEARS * 12)),
        today.checked_sub_months(Months::new(MIN_AGE_YEARS * 12)),
    ) else {
        return false;
    };
    (earliest..=latest).contains(&dob)
}

fn password_is_strong(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}
