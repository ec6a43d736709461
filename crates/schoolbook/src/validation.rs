//! Field validation for the add-school form.
//!
//! The rules are declared as a static table of [`FieldRule`]s and compiled
//! once into a [`Schema`]. Every rule runs on every submission, so a single
//! pass reports all broken fields at once.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use crate::school::{SchoolInput, SchoolRecord};

/// A form field, in the order fields appear on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// School name.
    Name,
    /// City.
    City,
    /// Street address.
    Address,
    /// State or province.
    State,
    /// Contact number.
    Contact,
    /// Email address.
    EmailId,
    /// Image upload.
    Image,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::City,
        Self::Address,
        Self::State,
        Self::Contact,
        Self::EmailId,
        Self::Image,
    ];

    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::City => "city",
            Self::Address => "address",
            Self::State => "state",
            Self::Contact => "contact",
            Self::EmailId => "email_id",
            Self::Image => "image",
        }
    }

    /// Label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "School Name *",
            Self::City => "City *",
            Self::Address => "Address *",
            Self::State => "State *",
            Self::Contact => "Contact Number *",
            Self::EmailId => "Email Address *",
            Self::Image => "School Image",
        }
    }

    /// Read this field's text from the input. The image field has no text.
    #[must_use]
    pub fn value(self, input: &SchoolInput) -> Option<&str> {
        match self {
            Self::Name => Some(&input.name),
            Self::City => Some(&input.city),
            Self::Address => Some(&input.address),
            Self::State => Some(&input.state),
            Self::Contact => Some(&input.contact),
            Self::EmailId => Some(&input.email_id),
            Self::Image => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single constraint on a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// At least this many characters.
    MinLength(usize),
    /// The whole value must match this regex.
    Pattern(&'static str),
    /// Syntactically valid email address.
    Email,
}

/// A declared rule: which field, what constraint, what to say on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// The field the rule applies to.
    pub field: Field,
    /// The constraint to check.
    pub constraint: Constraint,
    /// Message shown when the constraint fails.
    pub message: &'static str,
}

/// Rules for the add-school form. The image field is optional and has none.
pub const SCHOOL_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Name,
        constraint: Constraint::MinLength(2),
        message: "School name must be at least 2 characters",
    },
    FieldRule {
        field: Field::Address,
        constraint: Constraint::MinLength(5),
        message: "Address must be at least 5 characters",
    },
    FieldRule {
        field: Field::City,
        constraint: Constraint::MinLength(2),
        message: "City must be at least 2 characters",
    },
    FieldRule {
        field: Field::State,
        constraint: Constraint::MinLength(2),
        message: "State must be at least 2 characters",
    },
    FieldRule {
        field: Field::Contact,
        constraint: Constraint::Pattern(r"^[0-9]{10}$"),
        message: "Contact must be a 10-digit number",
    },
    FieldRule {
        field: Field::EmailId,
        constraint: Constraint::Email,
        message: "Please enter a valid email address",
    },
];

const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9._%+-]+@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$";

/// Field errors collected from one validation pass, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summarize(.errors))]
pub struct FieldErrors {
    errors: BTreeMap<Field, &'static str>,
}

fn summarize(errors: &BTreeMap<Field, &'static str>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl FieldErrors {
    /// Record an error for a field. The first message for a field wins.
    pub fn insert(&mut self, field: Field, message: &'static str) {
        self.errors.entry(field).or_insert(message);
    }

    /// Drop the error for a field, if any.
    pub fn clear(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Whether the given field failed.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate failures in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }
}

/// Input that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSchool(SchoolInput);

impl ValidSchool {
    /// Borrow the validated input.
    #[must_use]
    pub fn input(&self) -> &SchoolInput {
        &self.0
    }

    /// Build the record to persist.
    #[must_use]
    pub fn into_record(self, id: i64, image: String) -> SchoolRecord {
        let SchoolInput {
            name,
            address,
            city,
            state,
            contact,
            email_id,
            image: _,
        } = self.0;
        SchoolRecord {
            id,
            name,
            address,
            city,
            state,
            contact,
            email_id,
            image,
        }
    }
}

#[derive(Debug)]
enum Check {
    MinLength(usize),
    Pattern(Regex),
    Email(Regex),
}

impl Check {
    fn passes(&self, value: &str) -> bool {
        match self {
            Self::MinLength(min) => value.chars().count() >= *min,
            Self::Pattern(regex) => regex.is_match(value),
            Self::Email(regex) => regex.is_match(value) && local_part_is_well_formed(value),
        }
    }
}

/// The regex admits dots anywhere in the local part; reject leading,
/// trailing and doubled dots here since the regex crate has no lookaround.
fn local_part_is_well_formed(email: &str) -> bool {
    let local = email.split('@').next().unwrap_or_default();
    !local.starts_with('.') && !local.ends_with('.') && !local.contains("..")
}

/// A compiled rule table.
#[derive(Debug)]
pub struct Schema {
    rules: Vec<(FieldRule, Check)>,
}

impl Schema {
    /// Compile a rule table.
    ///
    /// # Panics
    ///
    /// Panics if a `Pattern` rule holds an invalid regex.
    #[must_use]
    pub fn new(rules: &[FieldRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| {
                let check = match rule.constraint {
                    Constraint::MinLength(min) => Check::MinLength(min),
                    Constraint::Pattern(pattern) => {
                        Check::Pattern(Regex::new(pattern).expect("Invalid regex pattern"))
                    }
                    Constraint::Email => {
                        Check::Email(Regex::new(EMAIL_PATTERN).expect("Invalid email pattern"))
                    }
                };
                (*rule, check)
            })
            .collect();
        Self { rules }
    }

    /// The shared schema for the add-school form.
    #[must_use]
    pub fn school() -> &'static Self {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| Self::new(SCHOOL_RULES))
    }

    /// Check a single field, returning its message on failure.
    #[must_use]
    pub fn check_field(&self, field: Field, input: &SchoolInput) -> Option<&'static str> {
        let value = field.value(input)?;
        self.rules
            .iter()
            .filter(|(rule, _)| rule.field == field)
            .find(|(_, check)| !check.passes(value))
            .map(|(rule, _)| rule.message)
    }

    /// Run every rule and collect all failures.
    ///
    /// # Errors
    ///
    /// Returns the full set of field errors if any rule fails.
    pub fn validate(&self, input: &SchoolInput) -> Result<ValidSchool, FieldErrors> {
        let mut errors = FieldErrors::default();
        for (rule, check) in &self.rules {
            let Some(value) = rule.field.value(input) else {
                continue;
            };
            if !check.passes(value) {
                trace!(field = %rule.field, "Field failed validation");
                errors.insert(rule.field, rule.message);
            }
        }

        if errors.is_empty() {
            Ok(ValidSchool(input.clone()))
        } else {
            Err(errors)
        }
    }
}

/// Validate add-school input against the shared schema.
///
/// # Errors
///
/// Returns every field error found; see [`Schema::validate`].
pub fn validate(input: &SchoolInput) -> Result<ValidSchool, FieldErrors> {
    Schema::school().validate(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> SchoolInput {
        SchoolInput {
            name: "AB".to_string(),
            address: "12345".to_string(),
            city: "NY".to_string(),
            state: "NY".to_string(),
            contact: "1234567890".to_string(),
            email_id: "a@b.com".to_string(),
            image: None,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        let valid = validate(&valid_input()).unwrap();
        assert_eq!(valid.input(), &valid_input());
    }

    #[test]
    fn test_short_name() {
        let mut input = valid_input();
        input.name = "A".to_string();

        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::Name),
            Some("School name must be at least 2 characters")
        );
    }

    #[test]
    fn test_short_contact() {
        let mut input = valid_input();
        input.contact = "12345".to_string();

        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::Contact),
            Some("Contact must be a 10-digit number")
        );
    }

    #[test]
    fn test_each_single_violation_reports_only_that_field() {
        let cases: [(Field, fn(&mut SchoolInput), &str); 6] = [
            (
                Field::Name,
                |i| i.name = "A".to_string(),
                "School name must be at least 2 characters",
            ),
            (
                Field::Address,
                |i| i.address = "1234".to_string(),
                "Address must be at least 5 characters",
            ),
            (
                Field::City,
                |i| i.city = "N".to_string(),
                "City must be at least 2 characters",
            ),
            (
                Field::State,
                |i| i.state = String::new(),
                "State must be at least 2 characters",
            ),
            (
                Field::Contact,
                |i| i.contact = "12345678901".to_string(),
                "Contact must be a 10-digit number",
            ),
            (
                Field::EmailId,
                |i| i.email_id = "not-an-email".to_string(),
                "Please enter a valid email address",
            ),
        ];

        for (field, mutate, message) in cases {
            let mut input = valid_input();
            mutate(&mut input);
            let errors = validate(&input).unwrap_err();
            assert_eq!(errors.len(), 1, "{field}");
            assert_eq!(errors.get(field), Some(message));
        }
    }

    #[test]
    fn test_all_errors_collected() {
        let errors = validate(&SchoolInput::default()).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(!errors.contains(Field::Image));

        let fields: Vec<Field> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(
            fields,
            vec![
                Field::Name,
                Field::City,
                Field::Address,
                Field::State,
                Field::Contact,
                Field::EmailId
            ]
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut input = valid_input();
        input.name = "日本".to_string();
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn test_contact_rejects_non_digits() {
        let mut input = valid_input();
        for contact in ["123456789a", "123-456-78", " 1234567890", "１２３４５６７８９０"] {
            input.contact = contact.to_string();
            assert!(validate(&input).is_err(), "{contact}");
        }
    }

    #[test]
    fn test_email_syntax() {
        let schema = Schema::school();
        let mut input = valid_input();

        for ok in ["a@b.com", "first.last+tag@sub.example.co.in", "x_y%z@host-1.org"] {
            input.email_id = ok.to_string();
            assert_eq!(schema.check_field(Field::EmailId, &input), None, "{ok}");
        }

        for bad in [
            "",
            "plain",
            "@b.com",
            "a@",
            "a@b",
            "a@b.c",
            "a@-b.com",
            "a@b-.com",
            ".a@b.com",
            "a.@b.com",
            "a..b@c.com",
            "a b@c.com",
            "a@b..com",
        ] {
            input.email_id = bad.to_string();
            assert!(
                schema.check_field(Field::EmailId, &input).is_some(),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_image_field_has_no_rule() {
        let input = valid_input();
        assert_eq!(Schema::school().check_field(Field::Image, &input), None);
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::default();
        errors.insert(Field::Contact, "Contact must be a 10-digit number");
        errors.insert(Field::Name, "School name must be at least 2 characters");
        assert_eq!(
            errors.to_string(),
            "name: School name must be at least 2 characters; contact: Contact must be a 10-digit number"
        );
    }

    #[test]
    fn test_field_errors_clear() {
        let mut errors = FieldErrors::default();
        errors.insert(Field::City, "City must be at least 2 characters");
        errors.clear(Field::City);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_into_record_keeps_fields() {
        let valid = validate(&valid_input()).unwrap();
        let record = valid.into_record(99, "/x.png".to_string());
        assert_eq!(record.id, 99);
        assert_eq!(record.name, "AB");
        assert_eq!(record.email_id, "a@b.com");
        assert_eq!(record.image, "/x.png");
    }

    #[test]
    fn test_field_wire_names() {
        let names: Vec<&str> = Field::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            vec!["name", "city", "address", "state", "contact", "email_id", "image"]
        );
    }
}
