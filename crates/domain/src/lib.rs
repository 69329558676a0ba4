//! Domain layer for the petlab platform.
//!
//! This crate provides the core domain model:
//! - Aggregate roots that own their invariants and raise domain events
//! - The `DomainEvent` tagged union describing facts that have happened
//! - Self-validating value objects (Email, Money, names, tracking numbers)
//!
//! Aggregates buffer the events they raise; the store crate drains and
//! dispatches them when a unit of work commits.

pub mod aggregate;
pub mod error;
pub mod event;
pub mod lab;
pub mod notification;
pub mod order;
pub mod payment;
pub mod pet;
pub mod report;
pub mod role;
pub mod shipment;
pub mod ticket;
pub mod user;
pub mod value_objects;

pub use aggregate::{AggregateRoot, EventBuffer};
pub use error::{
    OrderError, PetError, RoleError, ShipmentError, TicketError, UserError, ValidationError,
};
pub use event::DomainEvent;
pub use lab::{LabTest, LabTestStatus};
pub use notification::{Notification, NotificationStatus, NotificationType};
pub use order::{KitType, Order, OrderItem, OrderStatus};
pub use payment::{Payment, PaymentStatus};
pub use pet::{Pet, PetType};
pub use report::HealthReport;
pub use role::{Permission, Role, permissions};
pub use shipment::{Carrier, Shipment, ShipmentStatus};
pub use ticket::{Ticket, TicketMessage, TicketStatus};
pub use user::{PasswordReset, RefreshToken, User};
pub use value_objects::{Currency, Email, FirstName, LastName, Money, TrackingNumber};
