//! Support ticket use cases.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{TicketId, UserId};
use domain::{AggregateRoot, Ticket, TicketStatus};
use serde::Serialize;
use store::UnitOfWork;
use tracing::instrument;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct TicketMessageResponse {
    pub author_id: UserId,
    pub content: String,
    pub is_from_customer: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketResponse {
    pub id: TicketId,
    pub subject: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub messages: Vec<TicketMessageResponse>,
}

impl TicketResponse {
    fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id(),
            subject: ticket.subject().to_string(),
            status: ticket.status(),
            created_at: ticket.created_at(),
            last_activity_at: ticket.last_activity_at(),
            messages: ticket
                .messages()
                .iter()
                .map(|m| TicketMessageResponse {
                    author_id: m.author_id(),
                    content: m.content().to_string(),
                    is_from_customer: m.is_from_customer(),
                    created_at: m.created_at(),
                })
                .collect(),
        }
    }
}

/// Ticket creation and conversation handling.
#[derive(Clone)]
pub struct SupportService {
    uow: Arc<UnitOfWork>,
}

impl SupportService {
    pub fn new(uow: Arc<UnitOfWork>) -> Self {
        Self { uow }
    }

    #[instrument(skip(self, subject, message))]
    pub async fn create_ticket(
        &self,
        customer_id: UserId,
        subject: &str,
        message: &str,
    ) -> Result<TicketId, AppError> {
        let ticket = Ticket::create(customer_id, subject, message)?;
        let ticket_id = ticket.id();
        self.uow.store().tickets.save(ticket).await;
        Ok(ticket_id)
    }

    /// Adds a reply. Whether the author is the customer decides the status
    /// transition inside the aggregate.
    #[instrument(skip(self, content))]
    pub async fn add_reply(
        &self,
        ticket_id: TicketId,
        author_id: UserId,
        content: &str,
    ) -> Result<TicketResponse, AppError> {
        let store = self.uow.store();
        let mut ticket = store
            .tickets
            .get(ticket_id)
            .await
            .ok_or(AppError::TicketNotFound)?;

        let is_from_customer = ticket.customer_id() == author_id;
        ticket.add_reply(author_id, content, is_from_customer);

        let response = TicketResponse::from_ticket(&ticket);
        store.tickets.save(ticket).await;
        Ok(response)
    }

    #[instrument(skip(self))]
    pub async fn resolve_ticket(&self, ticket_id: TicketId) -> Result<(), AppError> {
        let store = self.uow.store();
        let mut ticket = store
            .tickets
            .get(ticket_id)
            .await
            .ok_or(AppError::TicketNotFound)?;
        ticket.resolve();
        store.tickets.save(ticket).await;
        Ok(())
    }

    pub async fn get_my_tickets(&self, customer_id: UserId) -> Vec<TicketResponse> {
        let mut tickets = self.uow.store().tickets_for_customer(customer_id).await;
        tickets.sort_by_key(|t| std::cmp::Reverse(t.last_activity_at()));
        tickets.iter().map(TicketResponse::from_ticket).collect()
    }
}
