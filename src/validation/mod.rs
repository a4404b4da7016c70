//! Validation gateway for contact and join submissions.
//!
//! Each field has its own validator; every violation is collected so the caller
//! sees the full list in one response.

use serde_json::{Map, Value};

use crate::errors::{AppError, FieldViolation, PathSegment};
use crate::models::{Interest, NewContactSubmission};

const MIN_NAME_CHARS: usize = 2;
const MIN_PHONE_CHARS: usize = 10;
const MAX_EMAIL_CHARS: usize = 254;

/// Input rejected by the gateway, with one entry per offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

#[cfg(test)]
impl ValidationError {
    /// Whether any violation points at `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.field_name() == Some(field))
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} invalid field(s)", self.violations.len())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.violations)
    }
}

/// Check an untyped request body and normalize it into a storable submission.
pub fn validate_contact(input: &Value) -> Result<NewContactSubmission, ValidationError> {
    let Some(obj) = input.as_object() else {
        return Err(ValidationError {
            violations: vec![FieldViolation::new(
                Vec::new(),
                format!("Expected object, received {}", type_name(input)),
            )],
        });
    };

    let mut violations = Vec::new();

    let first_name = min_length_string(obj, "firstName", MIN_NAME_CHARS, &mut violations);
    let last_name = min_length_string(obj, "lastName", MIN_NAME_CHARS, &mut violations);
    let email = email(obj, &mut violations);
    let phone = min_length_string(obj, "phone", MIN_PHONE_CHARS, &mut violations);
    let interest = interest(obj, &mut violations);
    let message = optional_string(obj, "message", &mut violations);
    let newsletter = optional_bool(obj, "newsletter", &mut violations);
    let volunteer = optional_bool(obj, "volunteer", &mut violations);
    let volunteer_areas = optional_string_list(obj, "volunteerAreas", &mut violations);

    match (first_name, last_name, email, phone, interest) {
        (Some(first_name), Some(last_name), Some(email), Some(phone), Some(interest))
            if violations.is_empty() =>
        {
            Ok(NewContactSubmission {
                first_name,
                last_name,
                email,
                phone,
                interest,
                message,
                newsletter,
                volunteer,
                volunteer_areas,
            })
        }
        _ => Err(ValidationError { violations }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn required_string(
    obj: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match obj.get(field) {
        None => {
            violations.push(FieldViolation::field(field, "Required"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            violations.push(FieldViolation::field(
                field,
                format!("Expected string, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn min_length_string(
    obj: &Map<String, Value>,
    field: &str,
    min: usize,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    let value = required_string(obj, field, violations)?;
    if value.chars().count() < min {
        violations.push(FieldViolation::field(
            field,
            format!("String must contain at least {} character(s)", min),
        ));
        return None;
    }
    Some(value)
}

fn email(obj: &Map<String, Value>, violations: &mut Vec<FieldViolation>) -> Option<String> {
    let value = required_string(obj, "email", violations)?;
    if !is_valid_email(&value) {
        violations.push(FieldViolation::field("email", "Invalid email"));
        return None;
    }
    Some(value)
}

fn interest(obj: &Map<String, Value>, violations: &mut Vec<FieldViolation>) -> Option<Interest> {
    let value = required_string(obj, "interest", violations)?;
    let parsed = Interest::parse(&value);
    if parsed.is_none() {
        let expected = Interest::ALL
            .iter()
            .map(|i| format!("'{}'", i.as_str()))
            .collect::<Vec<_>>()
            .join(" | ");
        violations.push(FieldViolation::field(
            "interest",
            format!(
                "Invalid enum value. Expected {}, received '{}'",
                expected, value
            ),
        ));
    }
    parsed
}

fn optional_string(
    obj: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match obj.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            violations.push(FieldViolation::field(
                field,
                format!("Expected string, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn optional_bool(
    obj: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> bool {
    match obj.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            violations.push(FieldViolation::field(
                field,
                format!("Expected boolean, received {}", type_name(other)),
            ));
            false
        }
    }
}

fn optional_string_list(
    obj: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Vec<String> {
    match obj.get(field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    other => violations.push(FieldViolation::new(
                        vec![PathSegment::from(field), PathSegment::Index(index)],
                        format!("Expected string, received {}", type_name(other)),
                    )),
                }
            }
            out
        }
        Some(other) => {
            violations.push(FieldViolation::field(
                field,
                format!("Expected array, received {}", type_name(other)),
            ));
            Vec::new()
        }
    }
}

/// Syntactic email check: `local@label.label`, no whitespace, alphabetic TLD.
pub fn is_valid_email(s: &str) -> bool {
    if s.is_empty() || s.chars().count() > MAX_EMAIL_CHARS {
        return false;
    }

    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    const SPECIALS: &str = "!#$%&'*+/=?^_`{|}~-.";

    !local.is_empty()
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || SPECIALS.contains(c))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

    labels_ok && tld_ok
}
