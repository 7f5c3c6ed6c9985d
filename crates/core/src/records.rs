//! The record table behind the CRUD dashboard.
//!
//! A table holds rows of `{ID, Name, Age}` in insertion order. IDs are
//! assigned as `max(existing) + 1`, names are stored trimmed, and every
//! submission is validated before the table is touched.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::types::RecordId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a (trimmed) name, in characters.
pub const MAX_NAME_LEN: usize = 50;

pub const NAME_EMPTY_MESSAGE: &str = "Name cannot be empty!";
pub const NAME_TOO_LONG_MESSAGE: &str = "Name is too long! Please keep it under 50 characters.";
pub const AGE_NEGATIVE_MESSAGE: &str = "Age cannot be negative!";

/// Column headers of the tabular view, in display order.
pub const COLUMNS: [&str; 3] = ["ID", "Name", "Age"];

/// Entity label used in `NotFound` errors.
const ENTITY: &str = "Record";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub age: i64,
}

/// Form input for the Create and Update operations.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordInput {
    #[validate(custom(function = "name_rule"))]
    pub name: String,
    // Must stay equal to AGE_NEGATIVE_MESSAGE; the derive only takes literals.
    #[validate(range(min = 0, message = "Age cannot be negative!"))]
    pub age: i64,
}

impl RecordInput {
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    /// Run all field rules, reporting the first failure as a
    /// [`CoreError::Validation`] carrying the inline message.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|errors| CoreError::Validation(first_message(&errors)))
    }
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Compute the next free ID: one past the largest existing ID, or `1` when
/// there are none.
///
/// ```
/// use tabula_core::records::next_id;
///
/// assert_eq!(next_id([]), 1);
/// assert_eq!(next_id([3, 1, 7]), 8);
/// ```
pub fn next_id(ids: impl IntoIterator<Item = RecordId>) -> RecordId {
    ids.into_iter().max().map_or(1, |max| max + 1)
}

/// Return the inline message describing what is wrong with `name`, if
/// anything.
pub fn name_problem(name: &str) -> Option<&'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Some(NAME_EMPTY_MESSAGE)
    } else if trimmed.chars().count() > MAX_NAME_LEN {
        Some(NAME_TOO_LONG_MESSAGE)
    } else {
        None
    }
}

/// Validate a name: non-empty after trimming and at most
/// [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    match name_problem(name) {
        Some(msg) => Err(CoreError::Validation(msg.to_string())),
        None => Ok(()),
    }
}

fn name_rule(name: &str) -> Result<(), ValidationError> {
    match name_problem(name) {
        Some(msg) => Err(ValidationError::new("name").with_message(Cow::Borrowed(msg))),
        None => Ok(()),
    }
}

/// Pick the message of the first failing field, name before age.
fn first_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    for field in ["name", "age"] {
        if let Some(error) = fields.get(field).and_then(|errs| errs.first()) {
            return error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {field}"));
        }
    }
    errors.to_string()
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An ordered, in-memory collection of [`Record`]s with unique IDs.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    rows: Vec<Record>,
}

impl RecordTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table every new session starts with.
    pub fn seeded() -> Self {
        Self {
            rows: vec![
                Record {
                    id: 1,
                    name: "Alice".into(),
                    age: 30,
                },
                Record {
                    id: 2,
                    name: "Bob".into(),
                    age: 25,
                },
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in insertion order.
    pub fn list(&self) -> &[Record] {
        &self.rows
    }

    /// All IDs in row order, as offered by the Update/Delete select boxes.
    pub fn ids(&self) -> Vec<RecordId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    /// The ID the next created row will receive.
    pub fn next_id(&self) -> RecordId {
        next_id(self.rows.iter().map(|r| r.id))
    }

    pub fn get(&self, id: RecordId) -> Result<&Record, CoreError> {
        self.rows
            .iter()
            .find(|r| r.id == id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    /// Validate `input` and append it as a new row.
    pub fn create(&mut self, input: &RecordInput) -> Result<Record, CoreError> {
        input.check()?;

        let record = Record {
            id: self.next_id(),
            name: input.name.trim().to_string(),
            age: input.age,
        };
        self.rows.push(record.clone());
        Ok(record)
    }

    /// Validate `input` and overwrite the Name and Age of the row with `id`.
    pub fn update(&mut self, id: RecordId, input: &RecordInput) -> Result<Record, CoreError> {
        input.check()?;

        let row = self
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        row.name = input.name.trim().to_string();
        row.age = input.age;
        Ok(row.clone())
    }

    /// Remove the row with `id`, returning it.
    pub fn delete(&mut self, id: RecordId) -> Result<Record, CoreError> {
        let pos = self
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;
        Ok(self.rows.remove(pos))
    }
}
