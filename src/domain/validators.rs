//! Field validators shared by every form.
//!
//! The `is_*` predicates answer yes/no; the `get_*_error` variants return the
//! message to show next to the field, or `None` when the value is acceptable.
//! Required-ness is always checked before shape.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;

pub const REQUIRED_MESSAGE: &str = "Este campo es requerido";
pub const POSITIVE_NUMBER_MESSAGE: &str = "Debe ser un número mayor a 0";
pub const NUMBER_MESSAGE: &str = "Debe ser un número válido";
pub const EMAIL_MESSAGE: &str = "Ingrese un email válido";
pub const PHONE_MESSAGE: &str = "Ingrese un teléfono válido (10 a 15 dígitos)";

pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Raw value of a form field as it arrives from the UI or a JSON body.
///
/// Any JSON value decodes: booleans, arrays and objects land in `Other`,
/// which is never a number nor text, so validation reports it per field.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
    Other(serde_json::Value),
}

impl FieldValue {
    /// Parse the value as a finite number. Text is trimmed first.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Missing | Self::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Parse the value as an exact decimal. Text keeps its written precision.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(value) if value.is_finite() => Decimal::from_f64(*value),
            Self::Number(_) | Self::Missing | Self::Other(_) => None,
            Self::Text(text) => Decimal::from_str(text.trim()).ok(),
        }
    }

    /// Trimmed text, or `None` for any non-text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.trim()),
            Self::Number(_) | Self::Missing | Self::Other(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

pub fn is_required(value: &FieldValue) -> bool {
    match value {
        FieldValue::Text(text) => !text.trim().is_empty(),
        FieldValue::Number(number) => *number != 0.0,
        FieldValue::Missing => false,
        FieldValue::Other(value) => !matches!(value, serde_json::Value::Bool(false)),
    }
}

pub fn is_positive_number(value: &FieldValue) -> bool {
    value.as_number().is_some_and(|number| number > 0.0)
}

/// Both bounds are inclusive.
pub fn is_in_range(value: &FieldValue, min: f64, max: f64) -> bool {
    value
        .as_number()
        .is_some_and(|number| min <= number && number <= max)
}

/// Permissive `local@domain.tld` check; not RFC 5322.
pub fn is_valid_email_shape(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

/// Strips whitespace, hyphens, parentheses and one leading `+`, then expects
/// 10 to 15 digits.
pub fn is_valid_phone_shape(value: &str) -> bool {
    let digits = phone_digits(value);
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len())
        && digits.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn phone_digits(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    match cleaned.strip_prefix('+') {
        Some(rest) => rest.to_owned(),
        None => cleaned,
    }
}

pub fn get_required_error(value: &FieldValue) -> Option<String> {
    (!is_required(value)).then(|| REQUIRED_MESSAGE.to_owned())
}

pub fn get_positive_number_error(value: &FieldValue) -> Option<String> {
    get_required_error(value)
        .or_else(|| (!is_positive_number(value)).then(|| POSITIVE_NUMBER_MESSAGE.to_owned()))
}

pub fn get_range_error(value: &FieldValue, min: f64, max: f64) -> Option<String> {
    if let Some(message) = get_required_error(value) {
        return Some(message);
    }
    if value.as_number().is_none() {
        return Some(NUMBER_MESSAGE.to_owned());
    }
    (!is_in_range(value, min, max)).then(|| format!("Debe estar entre {min} y {max}"))
}

pub fn get_email_error(value: &FieldValue) -> Option<String> {
    get_required_error(value).or_else(|| {
        let valid = value.as_text().is_some_and(is_valid_email_shape);
        (!valid).then(|| EMAIL_MESSAGE.to_owned())
    })
}

pub fn get_phone_error(value: &FieldValue) -> Option<String> {
    get_required_error(value).or_else(|| {
        let valid = value.as_text().is_some_and(is_valid_phone_shape);
        (!valid).then(|| PHONE_MESSAGE.to_owned())
    })
}
