//! Display formatting for amounts, dates and rates.
//!
//! Every function here returns a string for any input; invalid values render
//! as zero (numbers) or as an empty string (dates).

use chrono::{DateTime, Datelike, NaiveDate};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Currency used when the caller has no preference.
pub const DEFAULT_CURRENCY: &str = "USD";

fn currency_prefix(code: &str) -> String {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" | "MXN" => "$".to_owned(),
        "EUR" => "€".to_owned(),
        other => format!("{other} "),
    }
}

/// `"$1,234.50"`, `"€9.99"`, `"GBP 3.00"`. NaN and infinities render as zero.
///
/// Amounts beyond the `Decimal` range are rendered from the float itself.
pub fn format_currency(amount: f64, currency_code: &str) -> String {
    if !amount.is_finite() {
        return format_currency_decimal(Decimal::ZERO, currency_code);
    }
    match Decimal::from_f64(amount) {
        Some(amount) => format_currency_decimal(amount, currency_code),
        None => with_prefix(
            amount < 0.0,
            currency_code,
            &format!("{:.2}", amount.abs()),
        ),
    }
}

pub fn format_currency_decimal(amount: Decimal, currency_code: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    with_prefix(
        rounded.is_sign_negative() && !rounded.is_zero(),
        currency_code,
        &format!("{:.2}", rounded.abs()),
    )
}

fn with_prefix(negative: bool, currency_code: &str, fixed: &str) -> String {
    let sign = if negative { "-" } else { "" };
    format!(
        "{sign}{}{}",
        currency_prefix(currency_code),
        group_thousands(fixed)
    )
}

fn group_thousands(fixed: &str) -> String {
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed, "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{grouped}.{frac_part}")
}

/// Long Spanish date, e.g. `"15 de marzo de 2024"`.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (the date part is used as
/// written, without converting the offset). Anything else yields `""`.
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|ts| ts.date_naive())
        });
    date.map(format_naive_date).unwrap_or_default()
}

pub fn format_naive_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS_ES[date.month0() as usize],
        date.year()
    )
}

/// `"12.50%"`; NaN and infinities render as `"0.00%"`.
pub fn format_percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.2}%")
}
