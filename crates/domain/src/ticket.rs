//! Support ticket aggregate.

use chrono::{DateTime, Utc};
use common::{TicketId, TicketMessageId, UserId};
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, EventBuffer};
use crate::error::TicketError;
use crate::event::DomainEvent;

/// Ticket lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

/// A single message within a ticket conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMessage {
    id: TicketMessageId,
    author_id: UserId,
    content: String,
    is_from_customer: bool,
    created_at: DateTime<Utc>,
}

impl TicketMessage {
    pub fn id(&self) -> TicketMessageId {
        self.id
    }

    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_from_customer(&self) -> bool {
        self.is_from_customer
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A customer support ticket.
///
/// The first message is always the customer's. The first staff reply moves
/// Open to InProgress; customer replies never change status.
#[derive(Debug, Clone)]
pub struct Ticket {
    id: TicketId,
    customer_id: UserId,
    subject: String,
    status: TicketStatus,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
    messages: Vec<TicketMessage>,
    events: EventBuffer,
}

impl AggregateRoot for Ticket {
    type Id = TicketId;

    fn id(&self) -> TicketId {
        self.id
    }

    fn take_events(&mut self) -> Vec<DomainEvent> {
        self.events.take()
    }

    fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl Ticket {
    /// Opens a ticket with the customer's initial message.
    pub fn create(
        customer_id: UserId,
        subject: &str,
        initial_message: &str,
    ) -> Result<Self, TicketError> {
        if subject.trim().is_empty() {
            return Err(TicketError::EmptySubject);
        }
        if initial_message.trim().is_empty() {
            return Err(TicketError::EmptyMessage);
        }

        let now = Utc::now();
        let mut ticket = Self {
            id: TicketId::new(),
            customer_id,
            subject: subject.to_string(),
            status: TicketStatus::Open,
            created_at: now,
            last_activity_at: now,
            messages: Vec::new(),
            events: EventBuffer::new(),
        };
        ticket.add_reply(customer_id, initial_message, true);
        Ok(ticket)
    }

    /// Restores a ticket from persisted fields.
    #[allow(clippy::too_many_arguments)]
    pub fn rehydrate(
        id: TicketId,
        customer_id: UserId,
        subject: String,
        status: TicketStatus,
        created_at: DateTime<Utc>,
        last_activity_at: DateTime<Utc>,
        messages: Vec<TicketMessage>,
    ) -> Self {
        Self {
            id,
            customer_id,
            subject,
            status,
            created_at,
            last_activity_at,
            messages,
            events: EventBuffer::new(),
        }
    }

    pub fn customer_id(&self) -> UserId {
        self.customer_id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    pub fn messages(&self) -> &[TicketMessage] {
        &self.messages
    }

    /// Appends a reply and updates activity time. The first non-customer
    /// reply on an open ticket moves it to InProgress.
    pub fn add_reply(&mut self, author_id: UserId, content: &str, is_from_customer: bool) {
        self.messages.push(TicketMessage {
            id: TicketMessageId::new(),
            author_id,
            content: content.to_string(),
            is_from_customer,
            created_at: Utc::now(),
        });
        self.last_activity_at = Utc::now();

        if !is_from_customer && self.status == TicketStatus::Open {
            self.status = TicketStatus::InProgress;
        }
    }

    /// Resolves the ticket.
    pub fn resolve(&mut self) {
        self.status = TicketStatus::Resolved;
        self.last_activity_at = Utc::now();
    }
}
