//! External collaborator contracts and their implementations.

pub mod email;
pub mod password;
pub mod payment_gateway;
pub mod shipping;
pub mod token;
pub mod two_factor;

pub use email::{EmailService, MockEmailService};
pub use password::{Argon2PasswordHasher, PasswordHasher};
pub use payment_gateway::{MockPaymentGateway, PaymentGateway};
pub use shipping::{MockShippingService, ShippingService};
pub use token::{Claims, TokenIssuer, generate_opaque_token};
pub use two_factor::{MockTwoFactorService, TwoFactorService};
