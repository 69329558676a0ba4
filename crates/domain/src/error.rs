//! Domain error types.
//!
//! Every error carries a stable machine-readable code (e.g. `Order.NotPending`)
//! alongside its human-readable message. The API layer maps codes to HTTP
//! statuses without inspecting message text.

use thiserror::Error;

/// Errors produced while constructing value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email is required")]
    EmailRequired,

    #[error("Email is too long")]
    EmailTooLong,

    #[error("Email format is invalid")]
    EmailInvalidFormat,

    #[error("First name is required")]
    FirstNameRequired,

    #[error("First name is too long")]
    FirstNameTooLong,

    #[error("Last name is required")]
    LastNameRequired,

    #[error("Last name is too long")]
    LastNameTooLong,

    #[error("Tracking number cannot be empty")]
    TrackingNumberEmpty,
}

impl ValidationError {
    /// Returns the stable error code for this validation failure.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmailRequired => "Email.Required",
            ValidationError::EmailTooLong => "Email.TooLong",
            ValidationError::EmailInvalidFormat => "Email.InvalidFormat",
            ValidationError::FirstNameRequired => "FirstName.Required",
            ValidationError::FirstNameTooLong => "FirstName.TooLong",
            ValidationError::LastNameRequired => "LastName.Required",
            ValidationError::LastNameTooLong => "LastName.TooLong",
            ValidationError::TrackingNumberEmpty => "TrackingNumber.Empty",
        }
    }
}

/// Errors raised by the user aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("The user account is banned.")]
    Banned,

    #[error("Invalid or expired password reset token.")]
    InvalidResetToken,

    #[error("Two-factor authentication is already enabled.")]
    TwoFactorAlreadyEnabled,

    #[error("The two-factor verification code is invalid.")]
    InvalidTwoFactorCode,

    #[error("Two-factor authentication is not enabled for this account.")]
    TwoFactorNotEnabled,
}

impl UserError {
    pub fn code(&self) -> &'static str {
        match self {
            UserError::Banned => "User.Banned",
            UserError::InvalidResetToken => "User.InvalidResetToken",
            UserError::TwoFactorAlreadyEnabled => "User.TwoFactorAlreadyEnabled",
            UserError::InvalidTwoFactorCode => "User.InvalidTwoFactorCode",
            UserError::TwoFactorNotEnabled => "User.TwoFactorNotEnabled",
        }
    }
}

/// Errors raised by the order aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("Order must have at least one item.")]
    NoItems,

    #[error("Only pending orders can be paid.")]
    NotPending,

    #[error("Item quantity must be greater than zero.")]
    InvalidQuantity,

    #[error("Item currency does not match the order currency.")]
    CurrencyMismatch,
}

impl OrderError {
    pub fn code(&self) -> &'static str {
        match self {
            OrderError::NoItems => "Order.NoItems",
            OrderError::NotPending => "Order.NotPending",
            OrderError::InvalidQuantity => "Order.InvalidQuantity",
            OrderError::CurrencyMismatch => "Order.CurrencyMismatch",
        }
    }
}

/// Errors raised by the shipment aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShipmentError {
    #[error("Label already generated or shipped.")]
    InvalidState,
}

impl ShipmentError {
    pub fn code(&self) -> &'static str {
        match self {
            ShipmentError::InvalidState => "Shipment.InvalidState",
        }
    }
}

/// Errors raised by the support ticket aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    #[error("Subject is required.")]
    EmptySubject,

    #[error("Initial message is required.")]
    EmptyMessage,
}

impl TicketError {
    pub fn code(&self) -> &'static str {
        match self {
            TicketError::EmptySubject => "Ticket.EmptySubject",
            TicketError::EmptyMessage => "Ticket.EmptyMessage",
        }
    }
}

/// Errors raised by the pet aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PetError {
    #[error("Pet name cannot be empty.")]
    EmptyName,
}

impl PetError {
    pub fn code(&self) -> &'static str {
        match self {
            PetError::EmptyName => "Pet.EmptyName",
        }
    }
}

/// Errors raised by the role aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    #[error("Role name cannot be empty.")]
    EmptyName,
}

impl RoleError {
    pub fn code(&self) -> &'static str {
        match self {
            RoleError::EmptyName => "Role.EmptyName",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ValidationError::EmailInvalidFormat.code(), "Email.InvalidFormat");
        assert_eq!(UserError::Banned.code(), "User.Banned");
        assert_eq!(OrderError::NoItems.code(), "Order.NoItems");
        assert_eq!(OrderError::NotPending.code(), "Order.NotPending");
        assert_eq!(ShipmentError::InvalidState.code(), "Shipment.InvalidState");
    }

    #[test]
    fn messages_match_codes() {
        let err = OrderError::NotPending;
        assert_eq!(err.to_string(), "Only pending orders can be paid.");
    }
}
