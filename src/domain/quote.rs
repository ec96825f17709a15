use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::validation::{FieldErrors, FieldValidationError, ValidationError};
use crate::domain::validators::{
    FieldValue, NUMBER_MESSAGE, POSITIVE_NUMBER_MESSAGE, get_positive_number_error,
    get_range_error,
};
use crate::domain::value::{AnnualRatePercent, Principal, TermMonths};

pub const WHOLE_MONTHS_MESSAGE: &str = "Debe ser un número entero de meses";

const RATE_MAX_PERCENT: f64 = 100.0;

/// Parameters of a fixed-rate, fixed-term loan quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanQuoteInput {
    principal: Principal,
    annual_rate: AnnualRatePercent,
    term: TermMonths,
}

impl LoanQuoteInput {
    pub fn new(principal: Principal, annual_rate: AnnualRatePercent, term: TermMonths) -> Self {
        Self {
            principal,
            annual_rate,
            term,
        }
    }

    /// Validate raw values and build the input.
    pub fn try_from_parts(
        principal: Decimal,
        annual_rate_percent: Decimal,
        term_months: u32,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            principal: Principal::new(principal)?,
            annual_rate: AnnualRatePercent::new(annual_rate_percent)?,
            term: TermMonths::new(term_months)?,
        })
    }

    pub fn principal(&self) -> Principal {
        self.principal
    }

    pub fn annual_rate(&self) -> AnnualRatePercent {
        self.annual_rate
    }

    pub fn term(&self) -> TermMonths {
        self.term
    }
}

/// Monthly installment and total repaid, both rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanQuoteResult {
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_payment: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_payment: Decimal,
}

/// One row of an amortization preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Installment {
    pub number: u32,
    pub payment: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    pub balance: Decimal,
}

/// Keys used when reporting quote form errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteFieldKeys {
    pub principal: &'static str,
    pub annual_rate: &'static str,
    pub term: &'static str,
}

impl QuoteFieldKeys {
    /// Keys of the loan form and the lending API.
    pub const API: Self = Self {
        principal: Principal::FIELD,
        annual_rate: AnnualRatePercent::FIELD,
        term: TermMonths::FIELD,
    };

    /// Keys of the `POST /loan-quote` body.
    pub const SERVICE: Self = Self {
        principal: "principal",
        annual_rate: "annualRatePercent",
        term: "termMonths",
    };
}

/// Raw loan form values, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoanQuoteForm {
    pub monto: FieldValue,
    pub tasa_interes: FieldValue,
    pub plazo_meses: FieldValue,
}

/// Body of a loan-quote request: `{principal, annualRatePercent, termMonths}`.
///
/// Other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoanQuoteRequest {
    pub principal: FieldValue,
    pub annual_rate_percent: FieldValue,
    pub term_months: FieldValue,
}

impl From<LoanQuoteRequest> for LoanQuoteForm {
    fn from(request: LoanQuoteRequest) -> Self {
        Self {
            monto: request.principal,
            tasa_interes: request.annual_rate_percent,
            plazo_meses: request.term_months,
        }
    }
}

impl LoanQuoteForm {
    /// Validate against the loan form keys (`monto`, `tasa_interes`, `plazo_meses`).
    pub fn validate(&self) -> Result<LoanQuoteInput, Vec<FieldValidationError>> {
        self.validate_with_keys(QuoteFieldKeys::API)
    }

    pub fn validate_with_keys(
        &self,
        keys: QuoteFieldKeys,
    ) -> Result<LoanQuoteInput, Vec<FieldValidationError>> {
        let mut errors = FieldErrors::default();

        errors.check(keys.principal, get_positive_number_error(&self.monto));
        errors.check(
            keys.annual_rate,
            get_positive_number_error(&self.tasa_interes)
                .or_else(|| get_range_error(&self.tasa_interes, 0.0, RATE_MAX_PERCENT)),
        );
        errors.check(
            keys.term,
            get_range_error(
                &self.plazo_meses,
                TermMonths::MIN.into(),
                TermMonths::MAX.into(),
            ),
        );

        let principal = typed(
            &mut errors,
            keys.principal,
            &self.monto,
            POSITIVE_NUMBER_MESSAGE,
            |value| Principal::new(value).ok(),
        );
        let annual_rate = typed(
            &mut errors,
            keys.annual_rate,
            &self.tasa_interes,
            POSITIVE_NUMBER_MESSAGE,
            |value| AnnualRatePercent::new(value).ok(),
        );
        let term = typed(
            &mut errors,
            keys.term,
            &self.plazo_meses,
            WHOLE_MONTHS_MESSAGE,
            whole_months,
        );

        match (principal, annual_rate, term) {
            (Some(principal), Some(annual_rate), Some(term)) => {
                Ok(LoanQuoteInput::new(principal, annual_rate, term))
            }
            _ => Err(errors.into_vec()),
        }
    }
}

fn whole_months(value: Decimal) -> Option<TermMonths> {
    if !value.fract().is_zero() {
        return None;
    }
    value.to_u32().and_then(|months| TermMonths::new(months).ok())
}

/// Convert a field that passed its shape checks into a strong type, recording
/// `message` when the conversion still fails.
fn typed<T>(
    errors: &mut FieldErrors,
    field_key: &'static str,
    value: &FieldValue,
    message: &str,
    convert: impl FnOnce(Decimal) -> Option<T>,
) -> Option<T> {
    if errors.has(field_key) {
        return None;
    }
    let Some(decimal) = value.as_decimal() else {
        errors.push(field_key, NUMBER_MESSAGE);
        return None;
    };
    let converted = convert(decimal);
    if converted.is_none() {
        errors.push(field_key, message);
    }
    converted
}
