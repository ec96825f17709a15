//! Turns errors into the single line (or lines) shown to the user.

use std::any::Any;
use std::borrow::Cow;

use crate::calculator::CalculationError;
use crate::client::ClientError;
use crate::domain::validators::{
    EMAIL_MESSAGE, PHONE_MESSAGE, POSITIVE_NUMBER_MESSAGE, REQUIRED_MESSAGE,
};
use crate::domain::{
    AnnualRatePercent, ApiErrorBody, ApiErrorPayload, DATE_MESSAGE, EmailAddress, FieldMessages,
    PhoneNumber, Principal, TermMonths, ValidationError,
};

/// Shown when the error value is of no recognized type.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Ocurrió un error desconocido";

const CHOICE_MESSAGE: &str = "Seleccione una opción válida";
const NEGATIVE_RATE_MESSAGE: &str = "No puede ser negativa";
const TERM_MESSAGE: &str = "Debe ser de al menos 1 mes";
const OVERFLOW_MESSAGE: &str =
    "Los valores del préstamo son demasiado grandes para calcular el pago";

/// Separator between rendered field messages.
pub const FIELD_SEPARATOR: &str = "\n";

const FIELD_LABELS: &[(&str, &str)] = &[
    ("nombre", "Nombre"),
    ("apellido", "Apellido"),
    ("email", "Email"),
    ("telefono", "Teléfono"),
    ("direccion", "Dirección"),
    ("fecha_nacimiento", "Fecha de Nacimiento"),
    ("tipo_persona", "Tipo de Persona"),
    ("rfc", "RFC"),
    ("curp", "CURP"),
    ("cliente", "Cliente"),
    ("banco", "Banco"),
    ("tipo", "Tipo"),
    ("monto", "Monto"),
    ("tasa_interes", "Tasa de Interés"),
    ("plazo_meses", "Plazo (meses)"),
    ("pago_minimo", "Pago Mínimo"),
    ("fecha_otorgamiento", "Fecha de Otorgamiento"),
    ("fecha_vencimiento", "Fecha de Vencimiento"),
    ("estado", "Estado"),
    ("principal", "Monto"),
    ("annualRatePercent", "Tasa de Interés"),
    ("termMonths", "Plazo (meses)"),
    ("username", "Usuario"),
    ("password", "Contraseña"),
];

/// Human-readable label for an API field key; unknown keys pass through.
pub fn field_label(key: &str) -> Cow<'_, str> {
    FIELD_LABELS
        .iter()
        .find(|(field, _)| *field == key)
        .map_or(Cow::Borrowed(key), |(_, label)| Cow::Borrowed(*label))
}

/// `"<Label>: <message>"` for every pair, one per line.
pub fn render_field_messages(messages: &FieldMessages) -> String {
    messages
        .pairs()
        .map(|(field, message)| format!("{}: {message}", field_label(field)))
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

pub fn render(body: &ApiErrorBody) -> String {
    match body {
        ApiErrorBody::Details(messages) | ApiErrorBody::Errors(messages) => {
            render_field_messages(messages)
        }
        ApiErrorBody::Detail(text) | ApiErrorBody::Message(text) => text.clone(),
    }
}

fn labelled(field: &str, message: &str) -> String {
    format!("{}: {message}", field_label(field))
}

/// Spanish text for a rejected domain value; `Display` stays for logs.
pub fn validation_error_message(error: &ValidationError) -> String {
    match error {
        ValidationError::Empty { field } => labelled(field, REQUIRED_MESSAGE),
        ValidationError::NotPositive { field, .. } => labelled(field, POSITIVE_NUMBER_MESSAGE),
        ValidationError::OutOfRange {
            field, min, max, ..
        } => labelled(field, &format!("Debe estar entre {min} y {max}")),
        ValidationError::InvalidEmail { .. } => labelled(EmailAddress::FIELD, EMAIL_MESSAGE),
        ValidationError::InvalidPhoneNumber { .. } => labelled(PhoneNumber::FIELD, PHONE_MESSAGE),
        ValidationError::InvalidDate { field, .. } => labelled(field, DATE_MESSAGE),
        ValidationError::UnknownChoice { field, .. } => labelled(field, CHOICE_MESSAGE),
    }
}

/// Spanish text for loan parameters the calculator rejected.
pub fn calculation_error_message(error: &CalculationError) -> String {
    match error {
        CalculationError::NonPositivePrincipal(_) => {
            labelled(Principal::FIELD, POSITIVE_NUMBER_MESSAGE)
        }
        CalculationError::NegativeRate(_) => {
            labelled(AnnualRatePercent::FIELD, NEGATIVE_RATE_MESSAGE)
        }
        CalculationError::NonPositiveTerm => labelled(TermMonths::FIELD, TERM_MESSAGE),
        CalculationError::Overflow => OVERFLOW_MESSAGE.to_owned(),
    }
}

impl ApiErrorPayload {
    /// Rendered highest-priority part, if any part is populated.
    pub fn user_message(&self) -> Option<String> {
        self.body().as_ref().map(render)
    }
}

impl ClientError {
    /// Message for the user: the API payload when it has something to say,
    /// otherwise this error's own description.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { payload, .. } => payload
                .user_message()
                .unwrap_or_else(|| self.to_string()),
            Self::Validation(err) => validation_error_message(err),
            other => other.to_string(),
        }
    }
}

/// Message for any error value.
///
/// Recognizes [`ClientError`], [`ApiErrorPayload`], [`ValidationError`] and
/// [`CalculationError`] (also behind a `Box<dyn Error>`); everything else,
/// including bare strings, yields [`UNKNOWN_ERROR_MESSAGE`].
pub fn get_error_message(error: &(dyn Any + 'static)) -> String {
    if let Some(boxed) = error.downcast_ref::<Box<dyn std::error::Error + Send + Sync>>() {
        return known_error_message(boxed.as_ref() as &(dyn std::error::Error + 'static));
    }
    if let Some(boxed) = error.downcast_ref::<Box<dyn std::error::Error>>() {
        return known_error_message(boxed.as_ref());
    }
    if let Some(err) = error.downcast_ref::<ClientError>() {
        return err.user_message();
    }
    if let Some(payload) = error.downcast_ref::<ApiErrorPayload>() {
        return payload
            .user_message()
            .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_owned());
    }
    if let Some(err) = error.downcast_ref::<ValidationError>() {
        return validation_error_message(err);
    }
    if let Some(err) = error.downcast_ref::<CalculationError>() {
        return calculation_error_message(err);
    }
    UNKNOWN_ERROR_MESSAGE.to_owned()
}

fn known_error_message(error: &(dyn std::error::Error + 'static)) -> String {
    if let Some(err) = error.downcast_ref::<ClientError>() {
        return err.user_message();
    }
    if let Some(err) = error.downcast_ref::<ValidationError>() {
        return validation_error_message(err);
    }
    if let Some(err) = error.downcast_ref::<CalculationError>() {
        return calculation_error_message(err);
    }
    error.to_string()
}
