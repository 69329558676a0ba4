//! Application layer: use-case services, event handlers, and external
//! collaborator contracts.
//!
//! Each service owns one area's commands and queries. Writes go through
//! the shared unit of work, whose commit drains aggregate events and runs
//! the handler pipeline (payment to order, order to lab test, results to
//! report, report to notification, notification to email).

pub mod app;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod lab;
pub mod orders;
pub mod payments;
pub mod pets;
pub mod reports;
pub mod roles;
pub mod services;
pub mod shipments;
pub mod support;
pub mod users;

pub use app::App;
pub use auth::{AuthService, LoginResponse};
pub use error::AppError;
pub use lab::{LabService, LabTestResponse};
pub use orders::{CreateOrderRequest, OrderItemRequest, OrderResponse, OrderService};
pub use payments::{PaymentResponse, PaymentService};
pub use pets::{CreatePetRequest, PetResponse, PetService};
pub use reports::{ReportResponse, ReportService};
pub use roles::{PermissionResponse, RoleResponse, RoleService};
pub use services::{Claims, TokenIssuer};
pub use shipments::{CreateShipmentRequest, ShipmentResponse, ShipmentService};
pub use support::{SupportService, TicketResponse};
pub use users::{CreateUserRequest, RegisterUserRequest, UserProfileResponse, UserService};
