use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculator;
use crate::domain::quote::LoanQuoteForm;
use crate::domain::validation::{FieldErrors, FieldValidationError};
use crate::domain::validators::{
    EMAIL_MESSAGE, FieldValue, PHONE_MESSAGE, REQUIRED_MESSAGE, get_email_error,
    get_phone_error, get_required_error, is_required,
};
use crate::domain::value::{EmailAddress, PhoneNumber, Principal};

pub const DATE_MESSAGE: &str = "Ingrese una fecha válida (AAAA-MM-DD)";
pub const TIPO_PERSONA_MESSAGE: &str = "Seleccione un tipo de persona válido";
pub const ID_MESSAGE: &str = "Seleccione un registro válido";
pub const QUOTE_MESSAGE: &str = "No se pudo calcular el pago mensual";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Legal form of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoPersona {
    Fisica,
    Moral,
}

impl TipoPersona {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "fisica" | "física" => Some(Self::Fisica),
            "moral" => Some(Self::Moral),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub fecha_nacimiento: NaiveDate,
    pub tipo_persona: TipoPersona,
    #[serde(default)]
    pub direccion: Option<String>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerDraft {
    pub nombre: String,
    pub apellido: String,
    pub email: EmailAddress,
    pub telefono: PhoneNumber,
    pub fecha_nacimiento: NaiveDate,
    pub tipo_persona: TipoPersona,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Bank {
    pub id: u64,
    pub nombre: String,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankDraft {
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<PhoneNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Loan {
    pub id: u64,
    pub cliente: u64,
    pub banco: u64,
    pub monto: Decimal,
    pub tasa_interes: Decimal,
    pub plazo_meses: u32,
    #[serde(default)]
    pub pago_minimo: Option<Decimal>,
    #[serde(default)]
    pub fecha_otorgamiento: Option<NaiveDate>,
    #[serde(default)]
    pub estado: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanDraft {
    pub cliente: u64,
    pub banco: u64,
    pub monto: Decimal,
    pub tasa_interes: Decimal,
    pub plazo_meses: u32,
    /// Installment computed from the other terms.
    pub pago_minimo: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_otorgamiento: Option<NaiveDate>,
}

/// Paginated list envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Pagination and free-text search for list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Blank search terms are ignored.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let trimmed = term.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    pub nombre: FieldValue,
    pub apellido: FieldValue,
    pub email: FieldValue,
    pub telefono: FieldValue,
    pub fecha_nacimiento: FieldValue,
    pub tipo_persona: FieldValue,
    pub direccion: FieldValue,
}

impl CustomerForm {
    pub fn validate(&self) -> Result<CustomerDraft, Vec<FieldValidationError>> {
        let mut errors = FieldErrors::default();

        errors.check("nombre", get_required_error(&self.nombre));
        errors.check("apellido", get_required_error(&self.apellido));
        errors.check(EmailAddress::FIELD, get_email_error(&self.email));
        errors.check(PhoneNumber::FIELD, get_phone_error(&self.telefono));

        let email = parsed(&mut errors, EmailAddress::FIELD, EMAIL_MESSAGE, || {
            EmailAddress::new(text(&self.email)).ok()
        });
        let telefono = parsed(&mut errors, PhoneNumber::FIELD, PHONE_MESSAGE, || {
            PhoneNumber::parse(Some(PhoneNumber::DEFAULT_REGION), text(&self.telefono)).ok()
        });
        let fecha_nacimiento =
            required_date(&mut errors, "fecha_nacimiento", &self.fecha_nacimiento);
        let tipo_persona = match self.tipo_persona.as_text().filter(|value| !value.is_empty()) {
            None => {
                errors.push("tipo_persona", REQUIRED_MESSAGE);
                None
            }
            Some(value) => {
                let parsed = TipoPersona::parse(value);
                if parsed.is_none() {
                    errors.push("tipo_persona", TIPO_PERSONA_MESSAGE);
                }
                parsed
            }
        };

        match (email, telefono, fecha_nacimiento, tipo_persona) {
            (Some(email), Some(telefono), Some(fecha_nacimiento), Some(tipo_persona))
                if errors.is_empty() =>
            {
                Ok(CustomerDraft {
                    nombre: text(&self.nombre),
                    apellido: text(&self.apellido),
                    email,
                    telefono,
                    fecha_nacimiento,
                    tipo_persona,
                    direccion: optional_text(&self.direccion),
                })
            }
            _ => Err(errors.into_vec()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BankForm {
    pub nombre: FieldValue,
    pub tipo: FieldValue,
    pub direccion: FieldValue,
    pub telefono: FieldValue,
    pub email: FieldValue,
}

impl BankForm {
    /// Only `nombre` is required; contact fields are shape-checked when present.
    pub fn validate(&self) -> Result<BankDraft, Vec<FieldValidationError>> {
        let mut errors = FieldErrors::default();

        errors.check("nombre", get_required_error(&self.nombre));

        let email = if is_required(&self.email) {
            errors.check(EmailAddress::FIELD, get_email_error(&self.email));
            parsed(&mut errors, EmailAddress::FIELD, EMAIL_MESSAGE, || {
                EmailAddress::new(text(&self.email)).ok()
            })
        } else {
            None
        };
        let telefono = if is_required(&self.telefono) {
            errors.check(PhoneNumber::FIELD, get_phone_error(&self.telefono));
            parsed(&mut errors, PhoneNumber::FIELD, PHONE_MESSAGE, || {
                PhoneNumber::parse(Some(PhoneNumber::DEFAULT_REGION), text(&self.telefono)).ok()
            })
        } else {
            None
        };

        if !errors.is_empty() {
            return Err(errors.into_vec());
        }

        Ok(BankDraft {
            nombre: text(&self.nombre),
            tipo: optional_text(&self.tipo),
            direccion: optional_text(&self.direccion),
            telefono,
            email,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoanForm {
    pub cliente: FieldValue,
    pub banco: FieldValue,
    #[serde(flatten)]
    pub terms: LoanQuoteForm,
    pub fecha_otorgamiento: FieldValue,
}

impl LoanForm {
    /// Validate the loan and compute `pago_minimo` from its terms.
    pub fn validate(&self) -> Result<LoanDraft, Vec<FieldValidationError>> {
        let mut errors = FieldErrors::default();

        let cliente = required_id(&mut errors, "cliente", &self.cliente);
        let banco = required_id(&mut errors, "banco", &self.banco);
        let terms = match self.terms.validate() {
            Ok(terms) => Some(terms),
            Err(field_errors) => {
                errors.extend(field_errors);
                None
            }
        };
        let fecha_otorgamiento = if is_required(&self.fecha_otorgamiento) {
            required_date(&mut errors, "fecha_otorgamiento", &self.fecha_otorgamiento)
        } else {
            None
        };

        let (Some(cliente), Some(banco), Some(terms)) = (cliente, banco, terms) else {
            return Err(errors.into_vec());
        };
        if !errors.is_empty() {
            return Err(errors.into_vec());
        }

        let quote = calculator::quote(&terms)
            .map_err(|_| vec![FieldValidationError::new(Principal::FIELD, QUOTE_MESSAGE)])?;

        Ok(LoanDraft {
            cliente,
            banco,
            monto: terms.principal().value(),
            tasa_interes: terms.annual_rate().value(),
            plazo_meses: terms.term().value(),
            pago_minimo: quote.monthly_payment,
            fecha_otorgamiento,
        })
    }
}

fn text(value: &FieldValue) -> String {
    value.as_text().unwrap_or_default().to_owned()
}

fn optional_text(value: &FieldValue) -> Option<String> {
    value
        .as_text()
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// Run `parse` only when the field has no message yet.
fn parsed<T>(
    errors: &mut FieldErrors,
    field_key: &str,
    message: &str,
    parse: impl FnOnce() -> Option<T>,
) -> Option<T> {
    if errors.has(field_key) {
        return None;
    }
    let value = parse();
    if value.is_none() {
        errors.push(field_key, message);
    }
    value
}

fn required_date(
    errors: &mut FieldErrors,
    field_key: &str,
    value: &FieldValue,
) -> Option<NaiveDate> {
    if let Some(message) = get_required_error(value) {
        errors.push(field_key, message);
        return None;
    }
    let date = value
        .as_text()
        .and_then(|text| NaiveDate::parse_from_str(text, DATE_FORMAT).ok());
    if date.is_none() {
        errors.push(field_key, DATE_MESSAGE);
    }
    date
}

fn required_id(errors: &mut FieldErrors, field_key: &str, value: &FieldValue) -> Option<u64> {
    if let Some(message) = get_required_error(value) {
        errors.push(field_key, message);
        return None;
    }
    let id = value
        .as_number()
        .filter(|number| *number >= 1.0 && number.fract() == 0.0 && *number < u64::MAX as f64)
        .map(|number| number as u64);
    if id.is_none() {
        errors.push(field_key, ID_MESSAGE);
    }
    id
}
