//! Domain layer: strong types, validators and form rules (no I/O).

mod api_error;
mod entity;
mod quote;
mod validation;
pub mod validators;
mod value;

pub use api_error::{ApiErrorBody, ApiErrorPayload, FieldMessages};
pub use entity::{
    Bank, BankDraft, BankForm, Customer, CustomerDraft, CustomerForm, DATE_MESSAGE, ID_MESSAGE,
    ListQuery, Loan, LoanDraft, LoanForm, Page, QUOTE_MESSAGE, TIPO_PERSONA_MESSAGE, TipoPersona,
};
pub use quote::{
    Installment, LoanQuoteForm, LoanQuoteInput, LoanQuoteRequest, LoanQuoteResult,
    QuoteFieldKeys, WHOLE_MONTHS_MESSAGE,
};
pub use validation::{FieldValidationError, ValidationError};
pub use validators::FieldValue;
pub use value::{AnnualRatePercent, EmailAddress, PhoneNumber, Principal, TermMonths};
