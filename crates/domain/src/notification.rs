//! Notification aggregate.

use chrono::{DateTime, Utc};
use common::{NotificationId, UserId};
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, EventBuffer};
use crate::event::DomainEvent;

/// What kind of message a notification carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    WelcomeEmail,
    ReportReady,
    PasswordReset,
    Generic,
}

/// Delivery state. Set once by the delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

/// An outbound notification awaiting delivery by the email handler.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    user_id: UserId,
    notification_type: NotificationType,
    message: String,
    status: NotificationStatus,
    created_at: DateTime<Utc>,
    sent_at: Option<DateTime<Utc>>,
    events: EventBuffer,
}

impl AggregateRoot for Notification {
    type Id = NotificationId;

    fn id(&self) -> NotificationId {
        self.id
    }

    fn take_events(&mut self) -> Vec<DomainEvent> {
        self.events.take()
    }

    fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl Notification {
    /// Creates a pending notification and raises the created event that
    /// triggers delivery.
    pub fn create(
        user_id: UserId,
        notification_type: NotificationType,
        message: impl Into<String>,
    ) -> Self {
        let mut notification = Self {
            id: NotificationId::new(),
            user_id,
            notification_type,
            message: message.into(),
            status: NotificationStatus::Pending,
            created_at: Utc::now(),
            sent_at: None,
            events: EventBuffer::new(),
        };
        let event = DomainEvent::notification_created(notification.id);
        notification.events.raise(event);
        notification
    }

    /// Restores a notification from persisted fields.
    pub fn rehydrate(
        id: NotificationId,
        user_id: UserId,
        notification_type: NotificationType,
        message: String,
        status: NotificationStatus,
        created_at: DateTime<Utc>,
        sent_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            user_id,
            notification_type,
            message,
            status,
            created_at,
            sent_at,
            events: EventBuffer::new(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn notification_type(&self) -> NotificationType {
        self.notification_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> NotificationStatus {
        self.status
    }

    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.sent_at
    }

    pub fn mark_as_sent(&mut self) {
        self.status = NotificationStatus::Sent;
        self.sent_at = Some(Utc::now());
    }

    pub fn mark_as_failed(&mut self) {
        self.status = NotificationStatus::Failed;
    }
}
