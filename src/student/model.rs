//! Student record types
//!
//! - `Student`: a persisted record, always carrying a store-assigned id
//! - `NewStudent`: a validated candidate for insertion
//! - `StudentPatch`: a validated partial update
//! - `StudentPayload`: the raw request body shared by create and update

use serde::{Deserialize, Serialize};

/// A persisted student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub class_name: String,
    pub phone_number: String,
}

impl Student {
    /// Attach a store-assigned id to a validated candidate
    pub fn from_new(id: i64, candidate: NewStudent) -> Self {
        Self {
            id,
            name: candidate.name,
            age: candidate.age,
            class_name: candidate.class_name,
            phone_number: candidate.phone_number,
        }
    }

    /// Overwrite every field the patch carries a non-blank value for.
    ///
    /// Blank strings and absent fields leave the existing value untouched,
    /// so a patch can never clear a field.
    pub fn apply(&mut self, patch: StudentPatch) {
        if let Some(name) = non_blank(patch.name) {
            self.name = name;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(class_name) = non_blank(patch.class_name) {
            self.class_name = class_name;
        }
        if let Some(phone_number) = non_blank(patch.phone_number) {
            self.phone_number = phone_number;
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// A student that passed validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub age: i32,
    pub class_name: String,
    pub phone_number: String,
}

/// A partial update. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub class_name: Option<String>,
    pub phone_number: Option<String>,
}

impl StudentPatch {
    /// True when applying the patch cannot change anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.class_name.is_none()
            && self.phone_number.is_none()
    }
}

/// Request body for create and update.
///
/// Every field is optional so that a missing field is reported as a
/// validation failure rather than a deserialization failure. `age` is
/// read as `i64` so out-of-range values reach the range check.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}
