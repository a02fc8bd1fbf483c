//! Input validation rules
//!
//! Field rules shared by create payloads (through `validator` derive
//! attributes) and partial-update payloads (through [`PatchChecks`]), plus
//! the plain-text field error listing returned to clients.

use crate::patch::Patch;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use validator::{ValidateEmail, ValidationError, ValidationErrors};

pub const BLANK_MESSAGE: &str = "must not be blank";
pub const NULL_MESSAGE: &str = "must not be null";
pub const EMAIL_MESSAGE: &str = "must be a well-formed email address";
pub const AGE_MESSAGE: &str = "must be between 1 and 100";
pub const WEIGHT_MESSAGE: &str = "must be greater than or equal to 5";
pub const HEIGHT_MESSAGE: &str = "must be greater than or equal to 30";
pub const NUTRIENT_MESSAGE: &str = "must be greater than or equal to 0";

pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(BLANK_MESSAGE.to_string());
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if !email.validate_email() {
        return Err(EMAIL_MESSAGE.to_string());
    }
    Ok(())
}

/// Age in years, 1-100 inclusive
pub fn validate_age(age: i32) -> Result<(), String> {
    if !(1..=100).contains(&age) {
        return Err(AGE_MESSAGE.to_string());
    }
    Ok(())
}

/// Weight in kg, at least 5
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg < 5.0 {
        return Err(WEIGHT_MESSAGE.to_string());
    }
    Ok(())
}

/// Height in cm, at least 30
pub fn validate_height(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm < 30.0 {
        return Err(HEIGHT_MESSAGE.to_string());
    }
    Ok(())
}

/// Calories and macronutrients are never negative
pub fn validate_nutrient(value: f64) -> Result<(), String> {
    if value.is_nan() || value < 0.0 {
        return Err(NUTRIENT_MESSAGE.to_string());
    }
    Ok(())
}

/// Custom `validator` rule for required text fields
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    validate_name(value).map_err(field_error)
}

/// Build a `validator` error carrying a display message
pub fn field_error(message: String) -> ValidationError {
    let mut error = ValidationError::new("invalid");
    error.message = Some(Cow::Owned(message));
    error
}

/// Collects rule failures for a partial-update payload
#[derive(Debug, Default)]
pub struct PatchChecks {
    failures: Vec<(&'static str, String)>,
}

impl PatchChecks {
    /// Field that may be omitted but never set to null
    pub fn required<T>(
        &mut self,
        field: &'static str,
        patch: &Patch<T>,
        rule: impl Fn(&T) -> Result<(), String>,
    ) -> &mut Self {
        match patch {
            Some(None) => self.failures.push((field, NULL_MESSAGE.to_string())),
            Some(Some(value)) => {
                if let Err(msg) = rule(value) {
                    self.failures.push((field, msg));
                }
            }
            None => {}
        }
        self
    }

    /// Field that may be omitted or cleared with null
    pub fn nullable<T>(
        &mut self,
        field: &'static str,
        patch: &Patch<T>,
        rule: impl Fn(&T) -> Result<(), String>,
    ) -> &mut Self {
        if let Some(Some(value)) = patch {
            if let Err(msg) = rule(value) {
                self.failures.push((field, msg));
            }
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.failures.is_empty() {
            return Ok(());
        }
        let mut errors = ValidationErrors::new();
        for (field, message) in self.failures.drain(..) {
            errors.add(field, field_error(message));
        }
        Err(errors)
    }
}

/// Field name to message listing, rendered one `"field" - message` pair per line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message; the first message for a field wins
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, list) in errors.field_errors() {
            if let Some(error) = list.first() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                fields.insert(wire_name(field), message);
            }
        }
        fields
    }
}

/// `validator` reports Rust field names; clients see the camelCase JSON keys
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("\"{}\" - {}", field, message))
            .collect();
        f.write_str(&lines.join("\n"))
    }
}
