//! Field predicates and per-step rule sets.
//!
//! Every predicate is total over `&str` and trims its input first. Step
//! validators return one message per failed rule, in a fixed order, and an
//! empty list when the step is valid.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use movelead_domain::LeadDraft;

pub const MOVE_DATE_FORMAT: &str = "%Y-%m-%d";
pub const PHONE_DIGITS: usize = 10;

/// Accepted postal-code shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZipPolicy {
    /// Exactly five digits.
    #[default]
    FiveDigit,
    /// Five digits, optionally followed by `-` and four digits.
    ZipPlusFour,
}

/// How a move date compares against the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePolicy {
    /// Same-day moves are allowed.
    #[default]
    TodayOrLater,
    AfterToday,
}

impl DatePolicy {
    pub fn accepts(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DatePolicy::TodayOrLater => date >= today,
            DatePolicy::AfterToday => date > today,
        }
    }

    fn message(self) -> &'static str {
        match self {
            DatePolicy::TodayOrLater => "Move date must be today or later.",
            DatePolicy::AfterToday => "Move date must be in the future.",
        }
    }
}

/// Rule choices applied by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationRules {
    pub zip: ZipPolicy,
    pub move_date: DatePolicy,
}

pub fn is_valid_zip(input: &str, policy: ZipPolicy) -> bool {
    let value = input.trim();
    match policy {
        ZipPolicy::FiveDigit => all_digits(value, 5),
        ZipPolicy::ZipPlusFour => match value.split_once('-') {
            Some((base, plus_four)) => all_digits(base, 5) && all_digits(plus_four, 4),
            None => all_digits(value, 5),
        },
    }
}

fn all_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_present(input: &str) -> bool {
    !input.trim().is_empty()
}

/// Parses a calendar date as produced by a date input (`YYYY-MM-DD`).
pub fn parse_move_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), MOVE_DATE_FORMAT).ok()
}

/// Parses an ISO 8601 date or date-time and keeps the calendar date.
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    let value = input.trim();
    parse_move_date(value)
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

pub fn is_valid_move_date(input: &str, today: NaiveDate, policy: DatePolicy) -> bool {
    parse_move_date(input)
        .map(|date| policy.accepts(date, today))
        .unwrap_or(false)
}

/// Letters, whitespace and hyphens; at least one character.
pub fn is_valid_name(input: &str) -> bool {
    let value = input.trim();
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_alphabetic() || ch.is_whitespace() || ch == '-')
}

/// Exactly ten digits once every non-digit character is dropped.
pub fn is_valid_phone(input: &str) -> bool {
    input.chars().filter(char::is_ascii_digit).count() == PHONE_DIGITS
}

/// `local@domain.tld`, a pragmatic subset of RFC 5322: one `@`, a non-empty
/// local part, a dotted domain without empty labels, no whitespace anywhere.
pub fn is_valid_email(input: &str) -> bool {
    let value = input.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Step 1: zip, destination zip, state, date, size.
pub fn validate_quote_step(
    draft: &LeadDraft,
    today: NaiveDate,
    rules: ValidationRules,
) -> Vec<String> {
    let mut errors = Vec::new();
    if !is_valid_zip(&draft.zip_code, rules.zip) {
        errors.push("Invalid ZIP Code.".to_string());
    }
    if !is_valid_zip(&draft.move_to_zip_code, rules.zip) {
        errors.push("Invalid destination ZIP Code.".to_string());
    }
    if !is_present(&draft.move_to_state) {
        errors.push("State is required.".to_string());
    }
    if !is_valid_move_date(&draft.move_date, today, rules.move_date) {
        errors.push(rules.move_date.message().to_string());
    }
    if !is_present(&draft.moving_size) {
        errors.push("Moving size is required.".to_string());
    }
    errors
}

/// Step 2: first name, last name.
pub fn validate_name_step(draft: &LeadDraft) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(message) = name_error("First name", &draft.first_name) {
        errors.push(message);
    }
    if let Some(message) = name_error("Last name", &draft.last_name) {
        errors.push(message);
    }
    errors
}

fn name_error(label: &str, value: &str) -> Option<String> {
    if !is_present(value) {
        Some(format!("{label} is required."))
    } else if !is_valid_name(value) {
        Some(format!(
            "{label} should only contain letters, spaces, or hyphens."
        ))
    } else {
        None
    }
}

/// Step 3: phone, email.
pub fn validate_contact_step(draft: &LeadDraft) -> Vec<String> {
    let mut errors = Vec::new();
    if !is_valid_phone(&draft.phone_number) {
        errors.push("Phone number must contain exactly 10 digits.".to_string());
    }
    if !is_valid_email(&draft.email_address) {
        errors.push("Enter a valid email address.".to_string());
    }
    errors
}
