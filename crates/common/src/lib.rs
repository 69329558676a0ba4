//! Shared types used across the petlab workspace.

pub mod types;

pub use types::{
    LabTestId, NotificationId, OrderId, OrderItemId, PaymentId, PetId, ProductId, ReportId,
    RoleId, ShipmentId, TicketId, TicketMessageId, UserId,
};
