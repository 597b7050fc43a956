//! Rule-based form validation.
//!
//! Records expose fields by name through [`FieldLookup`]; the checks
//! themselves only see [`FieldValue`] views, so the same rules run against a
//! parsed draft, an update form, or anything else that names its fields.
//! Every failure is returned as data — nothing in this module panics or
//! raises on bad input.

use regex::Regex;
use url::Url;

use crate::products::ProductDraft;

/// A borrowed view of one field of a record under validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// The record has no value for this field.
    Missing,
    Text(&'a str),
    Number(f64),
    Bool(bool),
}

/// Access to a record's fields by name. Unknown names map to
/// [`FieldValue::Missing`].
pub trait FieldLookup {
    fn field(&self, name: &str) -> FieldValue<'_>;
}

impl FieldLookup for ProductDraft {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "name" => FieldValue::Text(&self.name),
            "company_name" => FieldValue::Text(&self.company_name),
            "content" => FieldValue::Text(&self.content),
            "form" => FieldValue::Text(&self.form),
            "mg" => FieldValue::Text(&self.mg),
            "mrp" => FieldValue::Number(self.mrp),
            "rate" => FieldValue::Number(self.rate),
            "unit_of_sale" => FieldValue::Text(&self.unit_of_sale),
            "unit_name" => FieldValue::Text(&self.unit_name),
            "image_url" => self
                .image_url
                .as_deref()
                .map_or(FieldValue::Missing, FieldValue::Text),
            _ => FieldValue::Missing,
        }
    }
}

/// Which fields of a record are required, must be positive numbers, and must
/// be well-formed URLs. Empty lists skip the corresponding check.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationRules<'a> {
    pub required: &'a [&'a str],
    pub numbers: &'a [&'a str],
    pub urls: &'a [&'a str],
}

/// Result of a multi-error validation pass. Errors keep check order:
/// required, then numbers, then urls, each in its field-list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// The first error found, the one the UI shows.
    #[must_use]
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// True when the value is missing or a string that trims to nothing.
/// Numbers and bools are never empty — `0`, `false`, and `NAN` all count as
/// present values.
#[must_use]
pub fn is_empty(value: &FieldValue<'_>) -> bool {
    match value {
        FieldValue::Missing => true,
        FieldValue::Text(s) => s.trim().is_empty(),
        FieldValue::Number(_) | FieldValue::Bool(_) => false,
    }
}

/// Checks that each named field is present and non-empty.
pub fn validate_required_fields(record: &impl FieldLookup, fields: &[&str]) -> ValidationOutcome {
    let errors = fields
        .iter()
        .filter(|field| is_empty(&record.field(field)))
        .map(|field| format!("{field} is required"))
        .collect();
    ValidationOutcome::from_errors(errors)
}

/// Checks that each named field, when present, coerces to a number greater
/// than zero. Missing and empty-text fields are skipped — a numeric field is
/// optional unless it is also listed as required.
pub fn validate_number_fields(record: &impl FieldLookup, fields: &[&str]) -> ValidationOutcome {
    let mut errors = Vec::new();

    for field in fields {
        let value = record.field(field);
        let coerced = match value {
            FieldValue::Missing => continue,
            FieldValue::Text("") => continue,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Number(n) if n.is_nan() => None,
            FieldValue::Number(n) => Some(n),
            FieldValue::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        };

        match coerced {
            None => errors.push(format!("{field} must be a valid number")),
            Some(n) if n <= 0.0 => errors.push(format!("{field} must be greater than 0")),
            Some(_) => {}
        }
    }

    ValidationOutcome::from_errors(errors)
}

/// True for an empty value (the field is optional) or an absolute
/// `http`/`https` URL. Any other scheme, or text that does not parse as an
/// absolute URL, is invalid.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.trim().is_empty() {
        return true;
    }
    Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// Checks that each named field, when present and non-empty, holds a
/// well-formed URL.
pub fn validate_url_fields(record: &impl FieldLookup, fields: &[&str]) -> ValidationOutcome {
    let mut errors = Vec::new();

    for field in fields {
        if let FieldValue::Text(s) = record.field(field) {
            if !s.trim().is_empty() && !is_valid_url(s) {
                errors.push(format!("{field} must be a valid URL (https://...)"));
            }
        }
    }

    ValidationOutcome::from_errors(errors)
}

/// Runs the required, number, and URL checks in that fixed order and
/// concatenates their errors.
pub fn validate_form(record: &impl FieldLookup, rules: &ValidationRules<'_>) -> ValidationOutcome {
    let mut errors = Vec::new();
    errors.extend(validate_required_fields(record, rules.required).errors);
    errors.extend(validate_number_fields(record, rules.numbers).errors);
    errors.extend(validate_url_fields(record, rules.urls).errors);
    ValidationOutcome::from_errors(errors)
}

/// The fixed rule set for the product form: name, prices, and sale units are
/// required; prices must be positive; the image URL must be well-formed when
/// given.
pub fn validate_product_form(product: &ProductDraft) -> ValidationOutcome {
    validate_form(
        product,
        &ValidationRules {
            required: &["name", "mrp", "rate", "unit_of_sale", "unit_name"],
            numbers: &["mrp", "rate"],
            urls: &["image_url"],
        },
    )
}

/// Validates every draft in a parsed batch. Returns the UI-facing error for
/// the first draft that fails, labeled with the draft's 1-based position —
/// one bad product rejects the whole submission.
#[must_use]
pub fn first_batch_error(drafts: &[ProductDraft]) -> Option<String> {
    drafts.iter().enumerate().find_map(|(i, draft)| {
        validate_product_form(draft)
            .first_error()
            .map(|error| format!("Product {}: {error}", i + 1))
    })
}

/// Loose `local@domain.tld` shape check. Empty input is invalid here —
/// unlike URLs, an email field that uses this check is never optional.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return false;
    }
    let re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex");
    re.is_match(trimmed)
}

/// Result of the login form check: at most one error, from the first check
/// that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginValidation {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl LoginValidation {
    fn failed(message: &str) -> Self {
        Self {
            is_valid: false,
            error: Some(message.to_owned()),
        }
    }
}

/// Sequential, short-circuiting login checks: email present → email
/// well-formed → password present → password at least 6 characters. Later
/// checks never run once one fails.
#[must_use]
pub fn validate_login_form(email: &str, password: &str) -> LoginValidation {
    if email.trim().is_empty() {
        return LoginValidation::failed("Email is required");
    }
    if !is_valid_email(email) {
        return LoginValidation::failed("Please enter a valid email address");
    }
    if password.trim().is_empty() {
        return LoginValidation::failed("Password is required");
    }
    if password.chars().count() < 6 {
        return LoginValidation::failed("Password must be at least 6 characters");
    }
    LoginValidation {
        is_valid: true,
        error: None,
    }
}
