//! Unit of work and the event dispatcher.

use std::sync::Arc;

use async_trait::async_trait;
use domain::DomainEvent;
use futures_util::future::BoxFuture;
use metrics::counter;
use tracing::debug;

use crate::error::DispatchError;
use crate::store::PetlabStore;

/// Reacts to a domain event after a commit.
///
/// Handlers receive the unit of work so they can load other aggregates,
/// mutate them, and trigger a nested commit for the events they raise.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Stable handler name, used in logs and dispatch errors.
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &DomainEvent, uow: &UnitOfWork) -> Result<(), DispatchError>;
}

/// Commits aggregate changes and publishes the events they raised.
///
/// `save_changes` drains every aggregate's event buffer, then dispatches
/// each event sequentially to every registered handler, awaiting each one.
/// Handlers that commit again recurse through `save_changes`; there is no
/// cycle guard, so a handler must never re-raise the event it reacts to on
/// the same aggregate.
pub struct UnitOfWork {
    store: Arc<PetlabStore>,
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl UnitOfWork {
    pub fn new(store: Arc<PetlabStore>) -> Self {
        Self {
            store,
            handlers: Vec::new(),
        }
    }

    pub fn register_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn store(&self) -> &Arc<PetlabStore> {
        &self.store
    }

    /// Drains and dispatches pending events until none remain for this
    /// commit. Returns a boxed future because handlers call back into
    /// `save_changes` for their own commits.
    pub fn save_changes(&self) -> BoxFuture<'_, Result<(), DispatchError>> {
        Box::pin(async move {
            let events = self.store.drain_all_events().await;
            for event in events {
                let event_type = event.event_type();
                counter!("events_dispatched_total", "event_type" => event_type).increment(1);

                for handler in &self.handlers {
                    debug!(event_type, handler = handler.name(), "dispatching event");
                    handler.handle(&event, self).await?;
                }
            }
            Ok(())
        })
    }
}
