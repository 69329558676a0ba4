//! Application-layer errors.
//!
//! Use-case handlers return these instead of throwing across the boundary.
//! Every variant carries a stable `code()` the HTTP layer maps to a status.

use domain::{
    OrderError, PetError, RoleError, ShipmentError, TicketError, UserError, ValidationError,
};
use store::DispatchError;
use thiserror::Error;

/// Errors surfaced by command and query handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// The supplied login email is not even well formed.
    #[error("Invalid email format.")]
    InvalidEmail,

    /// Same message for unknown email and wrong password, so responses do
    /// not reveal which accounts exist.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("A user with this email already exists.")]
    EmailAlreadyExists,

    #[error("Invalid refresh token.")]
    InvalidRefreshToken,

    #[error("Refresh token has expired.")]
    RefreshTokenExpired,

    #[error("User not found.")]
    UserNotFound,

    #[error("Order not found.")]
    OrderNotFound,

    #[error("No order found for this payment.")]
    PaymentOrderNotFound,

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error("Lab test not found.")]
    LabTestNotFound,

    #[error("Report not found.")]
    ReportNotFound,

    #[error("Ticket not found.")]
    TicketNotFound,

    #[error("Role not found.")]
    RoleNotFound,

    #[error("A role with this name already exists.")]
    RoleAlreadyExists,

    #[error("A shipment already exists for this order.")]
    ShipmentAlreadyExists,

    #[error("Shipment not found.")]
    ShipmentNotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Shipment(#[from] ShipmentError),

    #[error(transparent)]
    Ticket(#[from] TicketError),

    #[error(transparent)]
    Pet(#[from] PetError),

    #[error(transparent)]
    Role(#[from] RoleError),

    #[error("event dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for the HTTP error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidEmail => "User.InvalidEmail",
            AppError::InvalidCredentials => "User.InvalidCredentials",
            AppError::EmailAlreadyExists => "User.EmailAlreadyExists",
            AppError::InvalidRefreshToken => "RefreshToken.Invalid",
            AppError::RefreshTokenExpired => "RefreshToken.Expired",
            AppError::UserNotFound => "User.NotFound",
            AppError::OrderNotFound => "Order.NotFound",
            AppError::PaymentOrderNotFound => "Payment.OrderNotFound",
            AppError::PaymentFailed(_) => "Payment.Failed",
            AppError::LabTestNotFound => "LabTest.NotFound",
            AppError::ReportNotFound => "Report.NotFound",
            AppError::TicketNotFound => "Ticket.NotFound",
            AppError::RoleNotFound => "Role.NotFound",
            AppError::RoleAlreadyExists => "Role.AlreadyExists",
            AppError::ShipmentAlreadyExists => "Shipment.AlreadyExists",
            AppError::ShipmentNotFound => "Shipment.NotFound",
            AppError::Validation(e) => e.code(),
            AppError::User(e) => e.code(),
            AppError::Order(e) => e.code(),
            AppError::Shipment(e) => e.code(),
            AppError::Ticket(e) => e.code(),
            AppError::Pet(e) => e.code(),
            AppError::Role(e) => e.code(),
            AppError::Dispatch(_) | AppError::Internal(_) => "Internal",
        }
    }

    /// True for codes that should map to HTTP 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::UserNotFound
                | AppError::OrderNotFound
                | AppError::PaymentOrderNotFound
                | AppError::LabTestNotFound
                | AppError::ReportNotFound
                | AppError::TicketNotFound
                | AppError::RoleNotFound
                | AppError::ShipmentNotFound
        )
    }

    /// True for failures that should map to HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AppError::InvalidCredentials
                | AppError::InvalidRefreshToken
                | AppError::RefreshTokenExpired
                | AppError::User(UserError::Banned)
        )
    }
}

impl From<crate::services::password::PasswordHashError> for AppError {
    fn from(err: crate::services::password::PasswordHashError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<crate::services::token::TokenError> for AppError {
    fn from(err: crate::services::token::TokenError) -> Self {
        AppError::Internal(err.to_string())
    }
}
