use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    NotPositive { field: &'static str, actual: Decimal },
    OutOfRange {
        field: &'static str,
        min: Decimal,
        max: Decimal,
        actual: Decimal,
    },
    InvalidEmail { input: String },
    InvalidPhoneNumber { input: String },
    InvalidDate { field: &'static str, input: String },
    UnknownChoice { field: &'static str, input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::NotPositive { field, actual } => {
                write!(f, "{field} must be greater than zero: {actual}")
            }
            Self::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "{field} out of range: {actual} (expected {min}..={max})"
            ),
            Self::InvalidEmail { input } => write!(f, "invalid email address: {input}"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidDate { field, input } => {
                write!(f, "{field} is not a valid YYYY-MM-DD date: {input}")
            }
            Self::UnknownChoice { field, input } => {
                write!(f, "{field} has an unknown value: {input}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A user-facing message attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field_key: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_key: field_key.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_key, self.message)
    }
}

/// Collects per-field messages while a form is being checked.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(Vec<FieldValidationError>);

impl FieldErrors {
    pub(crate) fn check(&mut self, field_key: &str, message: Option<String>) {
        if let Some(message) = message {
            self.0.push(FieldValidationError::new(field_key, message));
        }
    }

    pub(crate) fn push(&mut self, field_key: &str, message: impl Into<String>) {
        self.0.push(FieldValidationError::new(field_key, message));
    }

    pub(crate) fn has(&self, field_key: &str) -> bool {
        self.0.iter().any(|err| err.field_key == field_key)
    }

    pub(crate) fn extend(&mut self, errors: impl IntoIterator<Item = FieldValidationError>) {
        self.0.extend(errors);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_vec(self) -> Vec<FieldValidationError> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{FieldValidationError, ValidationError};

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "nombre" };
        assert_eq!(err.to_string(), "nombre must not be empty");

        let err = ValidationError::NotPositive {
            field: "monto",
            actual: dec!(-5),
        };
        assert_eq!(err.to_string(), "monto must be greater than zero: -5");

        let err = ValidationError::OutOfRange {
            field: "tasa_interes",
            min: dec!(0),
            max: dec!(100),
            actual: dec!(120),
        };
        assert_eq!(
            err.to_string(),
            "tasa_interes out of range: 120 (expected 0..=100)"
        );

        let err = ValidationError::InvalidPhoneNumber {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: bad");
    }

    #[test]
    fn field_error_display_joins_key_and_message() {
        let err = FieldValidationError::new("email", "Este campo es requerido");
        assert_eq!(err.to_string(), "email: Este campo es requerido");
    }
}
