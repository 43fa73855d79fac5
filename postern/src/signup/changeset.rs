use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Utc;
use serde_json::Value;

use crate::models::UserRecord;
use crate::signup::errors::FieldError;
use crate::signup::errors::SignupError;

/// Staged field changes for a record, not yet committed.
///
/// Validation steps stage values and record field-level errors; the
/// caller either commits a valid changeset through [`Changeset::apply`]
/// or renders the errors and discards it.
#[derive(Debug, Clone, PartialEq)]
pub struct Changeset<R> {
    record: R,
    changes: BTreeMap<String, Value>,
    errors: Vec<FieldError>,
}

impl<R> Changeset<R> {
    pub fn new(record: R) -> Self {
        Self {
            record,
            changes: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn changes(&self) -> &BTreeMap<String, Value> {
        &self.changes
    }

    /// Returns the staged value for a field, if any.
    pub fn staged(&self, field: &str) -> Option<&Value> {
        self.changes.get(field)
    }

    /// Stages a value, replacing any previous change for the field.
    pub fn stage(&mut self, field: impl Into<String>, value: Value) {
        self.changes.insert(field.into(), value);
    }

    /// Removes and returns a staged value.
    pub fn unstage(&mut self, field: &str) -> Option<Value> {
        self.changes.remove(field)
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

impl Changeset<UserRecord> {
    /// Merges the staged changes into the wrapped record.
    ///
    /// The staged value under `hash_field` lands on the record's password
    /// hash; every other staged field must be one the record models.
    ///
    /// # Errors
    ///
    /// * [`SignupError::InvalidChangeset`] - The changeset carries
    ///   validation errors and must not be committed.
    /// * [`SignupError::UnknownField`] - A staged field has no place on
    ///   the record.
    /// * [`SignupError::InvalidValue`] - A staged value has the wrong
    ///   type for its field.
    pub fn apply(self, hash_field: &str) -> Result<UserRecord, SignupError> {
        if !self.errors.is_empty() {
            let summary = self
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(SignupError::InvalidChangeset(summary));
        }

        let mut record = self.record;

        for (field, value) in self.changes {
            if field == hash_field {
                record.password_hash = string_value(&field, value)?;
                continue;
            }

            match field.as_str() {
                "username" => record.username = string_value(&field, value)?,
                "email" => record.email = Some(string_value(&field, value)?),
                "role" => record.role = Some(string_value(&field, value)?),
                "confirmation_token" => {
                    record.confirmation_token = Some(string_value(&field, value)?);
                }
                "confirmation_sent_at" => {
                    record.confirmation_sent_at = Some(datetime_value(&field, value)?);
                }
                "reset_token" => record.reset_token = Some(string_value(&field, value)?),
                "reset_sent_at" => record.reset_sent_at = Some(datetime_value(&field, value)?),
                _ => return Err(SignupError::UnknownField(field)),
            }
        }

        Ok(record)
    }
}

fn string_value(field: &str, value: Value) -> Result<String, SignupError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(SignupError::InvalidValue {
            field: field.to_string(),
        }),
    }
}

fn datetime_value(field: &str, value: Value) -> Result<DateTime<Utc>, SignupError> {
    serde_json::from_value(value).map_err(|_| SignupError::InvalidValue {
        field: field.to_string(),
    })
}
