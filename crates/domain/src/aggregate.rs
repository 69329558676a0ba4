//! Core aggregate abstractions.

use std::hash::Hash;

use crate::event::DomainEvent;

/// Trait for aggregate roots.
///
/// An aggregate is a cluster of domain objects treated as a single unit.
/// The aggregate root ensures consistency of changes made within the
/// aggregate and raises domain events describing its state transitions.
///
/// Events accumulate in the aggregate's buffer until a unit of work
/// commits, at which point they are drained and dispatched to handlers.
pub trait AggregateRoot: Clone + Send + Sync {
    /// The identifier type for this aggregate.
    type Id: Copy + Eq + Hash + Send + Sync;

    /// Returns the aggregate's unique identifier.
    fn id(&self) -> Self::Id;

    /// Drains and returns the events raised since the last commit.
    fn take_events(&mut self) -> Vec<DomainEvent>;

    /// Returns true if the aggregate has raised events not yet dispatched.
    fn has_pending_events(&self) -> bool;
}

/// Buffer of domain events raised by an aggregate.
///
/// Cleared when the unit of work collects events at commit time.
#[derive(Debug, Clone, Default)]
pub struct EventBuffer {
    events: Vec<DomainEvent>,
}

impl EventBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to the buffer.
    pub fn raise(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    /// Drains all buffered events, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns the buffered events without draining them.
    pub fn pending(&self) -> &[DomainEvent] {
        &self.events
    }

    /// Returns true if no events are buffered.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;

    #[test]
    fn buffer_accumulates_in_raise_order() {
        let user_id = UserId::new();
        let mut buffer = EventBuffer::new();
        buffer.raise(DomainEvent::user_registered(user_id));
        buffer.raise(DomainEvent::user_email_verified(user_id));

        let events = buffer.take();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), "UserRegistered");
        assert_eq!(events[1].event_type(), "UserEmailVerified");
    }

    #[test]
    fn take_clears_the_buffer() {
        let mut buffer = EventBuffer::new();
        buffer.raise(DomainEvent::user_banned(UserId::new()));
        assert!(!buffer.is_empty());

        let _ = buffer.take();
        assert!(buffer.is_empty());
        assert!(buffer.take().is_empty());
    }
}
