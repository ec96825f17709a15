//! Fixed-rate annuity calculator.
//!
//! The monthly installment uses the standard annuity formula
//! `PMT = P * [r(1 + r)^n] / [(1 + r)^n - 1]` with `r = annual% / 100 / 12`.
//! Amounts are rounded to cents with round-half-away-from-zero, and the total is
//! computed from the already rounded installment.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::domain::{Installment, LoanQuoteInput, LoanQuoteResult};

/// Decimal places kept for every amount shown to a customer.
pub const MONEY_DP: u32 = 2;

const MONTHS_PER_YEAR: Decimal = dec!(12);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
/// Loan parameters outside the domain of the annuity formula.
pub enum CalculationError {
    #[error("principal must be greater than zero: {0}")]
    NonPositivePrincipal(Decimal),

    #[error("annual rate must not be negative: {0}")]
    NegativeRate(Decimal),

    #[error("term must be at least one month")]
    NonPositiveTerm,

    #[error("loan parameters overflow decimal arithmetic")]
    Overflow,
}

/// Round an amount to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Monthly rate as a fraction, e.g. `12` (percent per year) becomes `0.01`.
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR
}

/// Fixed monthly installment for a fully amortizing loan, rounded to cents.
///
/// A zero rate falls back to straight-line repayment (`principal / term`).
///
/// # Errors
///
/// Returns [`CalculationError`] for a non-positive principal, a negative rate, a
/// zero term, or when the power term does not fit a `Decimal`.
pub fn compute_monthly_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> Result<Decimal, CalculationError> {
    let payment = exact_monthly_payment(principal, annual_rate_percent, term_months)?;
    Ok(round_money(payment))
}

/// Total repaid: the rounded installment times the term, rounded to cents.
///
/// Saturates at [`Decimal::MAX`]; installments produced by
/// [`compute_monthly_payment`] stay far below it.
pub fn compute_total_payment(monthly_payment: Decimal, term_months: u32) -> Decimal {
    round_money(monthly_payment.saturating_mul(Decimal::from(term_months)))
}

/// Installment and total for a validated quote input.
pub fn quote(input: &LoanQuoteInput) -> Result<LoanQuoteResult, CalculationError> {
    let term_months = input.term().value();
    let monthly_payment = compute_monthly_payment(
        input.principal().value(),
        input.annual_rate().value(),
        term_months,
    )?;

    Ok(LoanQuoteResult {
        monthly_payment,
        total_payment: compute_total_payment(monthly_payment, term_months),
    })
}

/// Month-by-month split of the rounded installment into interest and principal.
///
/// Interest is rounded to cents each month. The final installment repays the
/// remaining balance, so it may differ from the others by a few cents and the
/// balance always ends at zero.
pub fn amortization_schedule(
    input: &LoanQuoteInput,
) -> Result<Vec<Installment>, CalculationError> {
    let principal = input.principal().value();
    let annual_rate_percent = input.annual_rate().value();
    let term_months = input.term().value();

    let payment = compute_monthly_payment(principal, annual_rate_percent, term_months)?;
    let rate = monthly_rate(annual_rate_percent);

    let mut balance = principal;
    let mut schedule = Vec::with_capacity(term_months as usize);

    for number in 1..=term_months {
        let interest = round_money(balance.checked_mul(rate).ok_or(CalculationError::Overflow)?);
        let (payment, amortization) = if number == term_months {
            (balance + interest, balance)
        } else {
            (payment, payment - interest)
        };
        balance -= amortization;
        schedule.push(Installment {
            number,
            payment,
            interest,
            principal: amortization,
            balance,
        });
    }

    Ok(schedule)
}

fn exact_monthly_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> Result<Decimal, CalculationError> {
    if principal <= Decimal::ZERO {
        return Err(CalculationError::NonPositivePrincipal(principal));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(CalculationError::NegativeRate(annual_rate_percent));
    }
    if term_months == 0 {
        return Err(CalculationError::NonPositiveTerm);
    }

    let months = Decimal::from(term_months);
    let rate = monthly_rate(annual_rate_percent);
    if rate.is_zero() {
        return Ok(principal / months);
    }

    let growth = (Decimal::ONE + rate)
        .checked_powu(term_months.into())
        .ok_or(CalculationError::Overflow)?;
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        // Rate too small to register after 28 significant digits.
        return Ok(principal / months);
    }

    principal
        .checked_mul(rate)
        .and_then(|value| value.checked_mul(growth))
        .and_then(|value| value.checked_div(denominator))
        .ok_or(CalculationError::Overflow)
}
