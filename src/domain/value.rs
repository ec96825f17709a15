use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use phonenumber::country;

use crate::domain::validation::ValidationError;
use crate::domain::validators::is_valid_email_shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Loan principal (`monto`).
///
/// Invariant: strictly positive.
pub struct Principal(Decimal);

impl Principal {
    /// API field name (`monto`).
    pub const FIELD: &'static str = "monto";

    /// Create a validated [`Principal`].
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::NotPositive {
                field: Self::FIELD,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Nominal annual interest rate in percent (`tasa_interes`), e.g. `12.5`.
///
/// Invariant: `0 < value <= 100`.
pub struct AnnualRatePercent(Decimal);

impl AnnualRatePercent {
    /// API field name (`tasa_interes`).
    pub const FIELD: &'static str = "tasa_interes";

    /// Exclusive lower bound.
    pub const MIN: Decimal = Decimal::ZERO;
    /// Inclusive upper bound.
    pub const MAX: Decimal = Decimal::ONE_HUNDRED;

    /// Create a validated rate.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Self::MIN || value > Self::MAX {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Loan term in monthly installments (`plazo_meses`).
///
/// Invariant: `1..=600`.
pub struct TermMonths(u32);

impl TermMonths {
    /// API field name (`plazo_meses`).
    pub const FIELD: &'static str = "plazo_meses";

    pub const MIN: u32 = 1;
    pub const MAX: u32 = 600;

    /// Create a validated term.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: Self::MIN.into(),
                max: Self::MAX.into(),
                actual: value.into(),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Contact email (`email`).
///
/// Invariant: trimmed and shaped like `local@domain.tld`.
pub struct EmailAddress(String);

impl EmailAddress {
    /// API field name (`email`).
    pub const FIELD: &'static str = "email";

    /// Create a validated [`EmailAddress`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !is_valid_email_shape(trimmed) {
            return Err(ValidationError::InvalidEmail {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation (`telefono`).
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
}

impl PhoneNumber {
    /// API field name (`telefono`).
    pub const FIELD: &'static str = "telefono";

    /// Region assumed when the input has no country prefix.
    pub const DEFAULT_REGION: country::Id = country::Id::MX;

    /// Parse and normalize a phone number into E.164.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164 })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation, as sent to the API.
    pub fn e164(&self) -> &str {
        &self.e164
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.e164)
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(Some(Self::DEFAULT_REGION), raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn principal_must_be_positive() {
        assert!(Principal::new(dec!(0)).is_err());
        assert!(Principal::new(dec!(-1)).is_err());
        assert_eq!(Principal::new(dec!(100000)).unwrap().value(), dec!(100000));
    }

    #[test]
    fn rate_excludes_zero_and_includes_one_hundred() {
        assert!(AnnualRatePercent::new(dec!(0)).is_err());
        assert!(AnnualRatePercent::new(dec!(0.01)).is_ok());
        assert!(AnnualRatePercent::new(dec!(100)).is_ok());
        assert!(matches!(
            AnnualRatePercent::new(dec!(100.01)),
            Err(ValidationError::OutOfRange {
                field: AnnualRatePercent::FIELD,
                ..
            })
        ));
    }

    #[test]
    fn term_range_is_enforced() {
        assert!(TermMonths::new(0).is_err());
        assert!(TermMonths::new(1).is_ok());
        assert!(TermMonths::new(600).is_ok());
        assert!(TermMonths::new(601).is_err());
    }

    #[test]
    fn email_is_trimmed_and_shape_checked() {
        assert_eq!(
            EmailAddress::new("  ana@tucredito.mx ").unwrap().as_str(),
            "ana@tucredito.mx"
        );
        assert!(matches!(
            EmailAddress::new("ana@tucredito"),
            Err(ValidationError::InvalidEmail { .. })
        ));
        assert!(matches!(
            EmailAddress::new("   "),
            Err(ValidationError::Empty {
                field: EmailAddress::FIELD
            })
        ));
    }

    #[test]
    fn phone_number_normalizes_to_e164_with_default_region() {
        let pn = PhoneNumber::parse(Some(PhoneNumber::DEFAULT_REGION), " 55 1234 5678 ").unwrap();
        assert_eq!(pn.raw(), "55 1234 5678");
        assert_eq!(pn.e164(), "+525512345678");

        let explicit = PhoneNumber::parse(None, "+52 55 1234 5678").unwrap();
        assert_eq!(pn, explicit);
    }

    #[test]
    fn phone_number_rejects_empty() {
        assert!(matches!(
            PhoneNumber::parse(None, "  "),
            Err(ValidationError::Empty {
                field: PhoneNumber::FIELD
            })
        ));
    }
}
