pub mod auth;
pub mod health;
pub mod lab;
pub mod metrics;
pub mod orders;
pub mod payments;
pub mod pets;
pub mod reports;
pub mod roles;
pub mod shipments;
pub mod tickets;
pub mod users;
