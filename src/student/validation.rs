//! Field constraints for student payloads
//!
//! Create requires every field; update only checks the fields it carries.
//! Blank strings in an update are dropped, never rejected.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::model::{NewStudent, StudentPatch, StudentPayload};

pub const MIN_AGE: i64 = 5;
pub const MAX_AGE: i64 = 100;

static PHONE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn phone_pattern() -> &'static Regex {
    // \d would also accept non-ASCII digits
    PHONE_PATTERN.get_or_init(|| Regex::new("^[0-9]{10}$").expect("phone pattern is valid"))
}

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All constraints a payload violated, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

fn check_age(age: i64, errors: &mut ValidationErrors) -> Option<i32> {
    if age < MIN_AGE {
        errors.push("age", "Age must be at least 5");
        None
    } else if age > MAX_AGE {
        errors.push("age", "Age must be less than 100");
        None
    } else {
        i32::try_from(age).ok()
    }
}

fn check_phone(phone: &str, errors: &mut ValidationErrors) {
    if !phone_pattern().is_match(phone) {
        errors.push("phoneNumber", "Phone number must be 10 digits");
    }
}

impl StudentPayload {
    /// Validate a create request. Every field is required.
    pub fn into_new_student(self) -> Result<NewStudent, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if is_blank(&self.name) {
            errors.push("name", "Name is required");
        }

        let age = match self.age {
            Some(age) => check_age(age, &mut errors),
            None => {
                errors.push("age", "Age is required");
                None
            }
        };

        if is_blank(&self.class_name) {
            errors.push("className", "Class is required");
        }

        match self.phone_number.as_deref() {
            Some(phone) if !phone.trim().is_empty() => check_phone(phone, &mut errors),
            _ => errors.push("phoneNumber", "Phone number is required"),
        }

        match (self.name, age, self.class_name, self.phone_number) {
            (Some(name), Some(age), Some(class_name), Some(phone_number)) => {
                errors.into_result(NewStudent {
                    name,
                    age,
                    class_name,
                    phone_number,
                })
            }
            _ => Err(errors),
        }
    }

    /// Validate an update request. Absent and blank fields are dropped;
    /// anything left must satisfy the same constraints as on create.
    pub fn into_patch(self) -> Result<StudentPatch, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.name.filter(|s| !s.trim().is_empty());
        let age = self.age.and_then(|age| check_age(age, &mut errors));
        let class_name = self.class_name.filter(|s| !s.trim().is_empty());
        let phone_number = self.phone_number.filter(|s| !s.trim().is_empty());
        if let Some(phone) = phone_number.as_deref() {
            check_phone(phone, &mut errors);
        }

        errors.into_result(StudentPatch {
            name,
            age,
            class_name,
            phone_number,
        })
    }
}
