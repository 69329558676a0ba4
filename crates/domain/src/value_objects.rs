//! Self-validating value objects shared across the domain.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated email address.
///
/// The format check is deliberately loose (`local@domain.tld`): anything with
/// a local part, an `@`, and a dotted domain passes. Deliverability is the
/// email service's problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub const MAX_LENGTH: usize = 255;

    /// Validates and wraps an email address.
    pub fn create(value: &str) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ValidationError::EmailTooLong);
        }
        if !Self::is_valid_format(value) {
            return Err(ValidationError::EmailInvalidFormat);
        }
        Ok(Self(value.to_string()))
    }

    // Equivalent to ^[^@]+@[^@]+\.[^@]+$
    fn is_valid_format(value: &str) -> bool {
        let mut parts = value.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let Some(domain) = parts.next() else {
            return false;
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return false;
        }
        match domain.rsplit_once('.') {
            Some((name, tld)) => !name.is_empty() && !tld.is_empty(),
            None => false,
        }
    }

    /// Returns the email address as a string slice.
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's first name. Non-empty, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FirstName(String);

impl FirstName {
    pub const MAX_LENGTH: usize = 100;

    pub fn create(value: &str) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::FirstNameRequired);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ValidationError::FirstNameTooLong);
        }
        Ok(Self(value.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

/// A user's last name. Non-empty, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LastName(String);

impl LastName {
    pub const MAX_LENGTH: usize = 100;

    pub fn create(value: &str) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::LastNameRequired);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ValidationError::LastNameTooLong);
        }
        Ok(Self(value.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Supported settlement currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    /// Parses a three-letter currency code, defaulting unknown codes to USD.
    pub fn parse(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "EUR" => Currency::Eur,
            _ => Currency::Usd,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Money amount in minor units (cents) with a currency.
///
/// Stored in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    cents: i64,
    currency: Currency,
}

impl Money {
    /// Creates a money amount from cents in the given currency.
    pub fn new(cents: i64, currency: Currency) -> Self {
        Self { cents, currency }
    }

    /// Creates a USD amount from cents.
    pub fn usd(cents: i64) -> Self {
        Self::new(cents, Currency::Usd)
    }

    /// Returns zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Adds another amount of the same currency.
    ///
    /// Returns None on currency mismatch; callers surface that as a domain
    /// error in their own vocabulary.
    pub fn try_add(&self, other: Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(self.cents + other.cents, self.currency))
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money::new(self.cents * i64::from(quantity), self.currency)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.abs();
        write!(f, "{sign}{}.{:02} {}", abs / 100, abs % 100, self.currency)
    }
}

/// A carrier-issued tracking number for a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    pub fn create(value: &str) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::TrackingNumberEmpty);
        }
        Ok(Self(value.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
