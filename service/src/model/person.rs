use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A person record, keyed by `email`
///
/// Serialized with camelCase field names, this is the shape used on the HTTP
/// surface and as the message payload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub year_birth: i32,
}

#[derive(Error, Debug, PartialEq)]
pub enum PersonValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
}

impl Person {
    pub fn new(email: &str, first_name: &str, last_name: &str, year_birth: i32) -> Self {
        Person {
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            year_birth,
        }
    }

    pub fn new_test() -> Self {
        Person::new("edsger.dijkstra@company.com", "Edsger", "Dijkstra", 1930)
    }

    /// The email is the primary key, everything else is unconstrained
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.email.trim().is_empty() {
            return Err(PersonValidationError::EmptyEmail);
        }

        Ok(())
    }
}
