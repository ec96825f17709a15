//! Core of the Tu Crédito lending back-office.
//!
//! The crate is layered like its API: a domain layer of strong types and form
//! rules, a transport layer for wire-format quirks, and a small client layer
//! that talks to the REST API. Around it sit the loan calculator, the error
//! normalizer that turns API errors into user-facing text, display formatters
//! and an HTTP service exposing the calculator.
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use tucredito::{LoanQuoteInput, calculator};
//!
//! let input = LoanQuoteInput::try_from_parts(dec!(100000), dec!(12), 24).unwrap();
//! let quote = calculator::quote(&input).unwrap();
//! assert_eq!(quote.monthly_payment, dec!(4707.35));
//! assert_eq!(quote.total_payment, dec!(112976.40));
//! ```
//!
//! ```rust,no_run
//! use tucredito::{Customer, DataGateway, ListQuery, TuCreditoClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tucredito::ClientError> {
//!     let client = TuCreditoClient::builder("https://api.example.com/api/")
//!         .bearer_token("...")
//!         .build()?;
//!     let page = client
//!         .list::<Customer>(&ListQuery::default().search("López"))
//!         .await?;
//!     for customer in page.results {
//!         println!("{}", customer.full_name());
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod calculator;
pub mod client;
pub mod config;
pub mod domain;
pub mod format;
pub mod message;
pub mod service;
mod transport;

pub use calculator::{CalculationError, compute_monthly_payment, compute_total_payment};
pub use client::{
    ClientError, DataGateway, LoadingTracker, Method, NoopObserver, RequestObserver, Resource,
    TuCreditoClient, TuCreditoClientBuilder,
};
pub use domain::validators::{
    get_email_error, get_phone_error, get_positive_number_error, get_range_error,
    get_required_error, is_in_range, is_positive_number, is_required, is_valid_email_shape,
    is_valid_phone_shape,
};
pub use domain::{
    ApiErrorBody, ApiErrorPayload, Bank, BankDraft, BankForm, Customer, CustomerDraft,
    CustomerForm, FieldMessages, FieldValidationError, FieldValue, ListQuery, Loan, LoanDraft,
    LoanForm, LoanQuoteForm, LoanQuoteInput, LoanQuoteRequest, LoanQuoteResult, Page,
    TipoPersona, ValidationError,
};
pub use format::{format_currency, format_date, format_percent};
pub use message::{UNKNOWN_ERROR_MESSAGE, get_error_message};
pub use transport::TransportError;
