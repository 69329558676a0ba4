//! In-memory persistence and the domain-event dispatch pipeline.
//!
//! Repositories hold aggregate state behind async locks. The store groups
//! one repository per aggregate type. A unit of work commits by draining
//! every aggregate's pending events and dispatching them sequentially to
//! registered handlers, which may mutate other aggregates and commit again.

pub mod dispatch;
pub mod error;
pub mod memory;
pub mod store;

pub use dispatch::{EventHandler, UnitOfWork};
pub use error::DispatchError;
pub use memory::InMemoryRepository;
pub use store::PetlabStore;
