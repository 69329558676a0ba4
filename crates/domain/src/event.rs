//! Domain events raised by aggregates.
//!
//! Events are immutable facts named in past tense. They form a single
//! tagged union so the dispatcher can route any event to any handler
//! without dynamic typing.

use chrono::{DateTime, Utc};
use common::{LabTestId, NotificationId, OrderId, PaymentId, PetId, ReportId, UserId};
use serde::{Deserialize, Serialize};

/// Events that can occur across the petlab domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DomainEvent {
    /// A user registered through the public signup flow.
    UserRegistered(UserRegisteredData),

    /// A user account was created by an administrator.
    UserCreated(UserCreatedData),

    /// A user verified their email address.
    UserEmailVerified(UserEmailVerifiedData),

    /// A user account was banned.
    UserBanned(UserBannedData),

    /// A user requested a password reset token.
    UserPasswordResetRequested(UserPasswordResetRequestedData),

    /// A user's password was changed via the reset flow.
    UserPasswordChanged(UserPasswordChangedData),

    /// An order was finalized with at least one item.
    OrderCreated(OrderCreatedData),

    /// An order transitioned from Pending to Paid.
    OrderPaid(OrderPaidData),

    /// A payment completed successfully at the gateway.
    PaymentSucceeded(PaymentSucceededData),

    /// Lab results were recorded for a test.
    LabTestResultsRecorded(LabTestResultsRecordedData),

    /// A health report was generated from lab results.
    ReportGenerated(ReportGeneratedData),

    /// A notification was created and is awaiting delivery.
    NotificationCreated(NotificationCreatedData),
}

impl DomainEvent {
    /// Returns the event type name, used for logging and routing.
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::UserRegistered(_) => "UserRegistered",
            DomainEvent::UserCreated(_) => "UserCreated",
            DomainEvent::UserEmailVerified(_) => "UserEmailVerified",
            DomainEvent::UserBanned(_) => "UserBanned",
            DomainEvent::UserPasswordResetRequested(_) => "UserPasswordResetRequested",
            DomainEvent::UserPasswordChanged(_) => "UserPasswordChanged",
            DomainEvent::OrderCreated(_) => "OrderCreated",
            DomainEvent::OrderPaid(_) => "OrderPaid",
            DomainEvent::PaymentSucceeded(_) => "PaymentSucceeded",
            DomainEvent::LabTestResultsRecorded(_) => "LabTestResultsRecorded",
            DomainEvent::ReportGenerated(_) => "ReportGenerated",
            DomainEvent::NotificationCreated(_) => "NotificationCreated",
        }
    }
}

/// Data for UserRegistered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRegisteredData {
    /// The newly registered user.
    pub user_id: UserId,

    /// When the registration happened.
    pub occurred_at: DateTime<Utc>,
}

/// Data for UserCreated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreatedData {
    /// The newly created user.
    pub user_id: UserId,

    /// The temporary password to include in the welcome email.
    pub temporary_password: String,
}

/// Data for UserEmailVerified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEmailVerifiedData {
    pub user_id: UserId,
}

/// Data for UserBanned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBannedData {
    pub user_id: UserId,
}

/// Data for UserPasswordResetRequested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPasswordResetRequestedData {
    pub user_id: UserId,

    /// The single-use reset token to email to the user.
    pub token: String,
}

/// Data for UserPasswordChanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPasswordChangedData {
    pub user_id: UserId,
}

/// Data for OrderCreated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreatedData {
    pub order_id: OrderId,

    /// The customer who placed the order.
    pub customer_id: UserId,
}

/// Data for OrderPaid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPaidData {
    pub order_id: OrderId,
}

/// Data for PaymentSucceeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSucceededData {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
}

/// Data for LabTestResultsRecorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabTestResultsRecordedData {
    pub lab_test_id: LabTestId,
    pub order_id: OrderId,
    pub pet_id: PetId,
}

/// Data for ReportGenerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportGeneratedData {
    pub report_id: ReportId,
    pub pet_id: PetId,
    pub health_score: i32,
}

/// Data for NotificationCreated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreatedData {
    pub notification_id: NotificationId,
}

// Convenience constructors
impl DomainEvent {
    pub fn user_registered(user_id: UserId) -> Self {
        DomainEvent::UserRegistered(UserRegisteredData {
            user_id,
            occurred_at: Utc::now(),
        })
    }

    pub fn user_created(user_id: UserId, temporary_password: impl Into<String>) -> Self {
        DomainEvent::UserCreated(UserCreatedData {
            user_id,
            temporary_password: temporary_password.into(),
        })
    }

    pub fn user_email_verified(user_id: UserId) -> Self {
        DomainEvent::UserEmailVerified(UserEmailVerifiedData { user_id })
    }

    pub fn user_banned(user_id: UserId) -> Self {
        DomainEvent::UserBanned(UserBannedData { user_id })
    }

    pub fn user_password_reset_requested(user_id: UserId, token: impl Into<String>) -> Self {
        DomainEvent::UserPasswordResetRequested(UserPasswordResetRequestedData {
            user_id,
            token: token.into(),
        })
    }

    pub fn user_password_changed(user_id: UserId) -> Self {
        DomainEvent::UserPasswordChanged(UserPasswordChangedData { user_id })
    }

    pub fn order_created(order_id: OrderId, customer_id: UserId) -> Self {
        DomainEvent::OrderCreated(OrderCreatedData {
            order_id,
            customer_id,
        })
    }

    pub fn order_paid(order_id: OrderId) -> Self {
        DomainEvent::OrderPaid(OrderPaidData { order_id })
    }

    pub fn payment_succeeded(payment_id: PaymentId, order_id: OrderId) -> Self {
        DomainEvent::PaymentSucceeded(PaymentSucceededData {
            payment_id,
            order_id,
        })
    }

    pub fn lab_test_results_recorded(
        lab_test_id: LabTestId,
        order_id: OrderId,
        pet_id: PetId,
    ) -> Self {
        DomainEvent::LabTestResultsRecorded(LabTestResultsRecordedData {
            lab_test_id,
            order_id,
            pet_id,
        })
    }

    pub fn report_generated(report_id: ReportId, pet_id: PetId, health_score: i32) -> Self {
        DomainEvent::ReportGenerated(ReportGeneratedData {
            report_id,
            pet_id,
            health_score,
        })
    }

    pub fn notification_created(notification_id: NotificationId) -> Self {
        DomainEvent::NotificationCreated(NotificationCreatedData { notification_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_names() {
        let user_id = UserId::new();
        assert_eq!(
            DomainEvent::user_registered(user_id).event_type(),
            "UserRegistered"
        );
        assert_eq!(
            DomainEvent::order_paid(OrderId::new()).event_type(),
            "OrderPaid"
        );
        assert_eq!(
            DomainEvent::payment_succeeded(PaymentId::new(), OrderId::new()).event_type(),
            "PaymentSucceeded"
        );
        assert_eq!(
            DomainEvent::notification_created(NotificationId::new()).event_type(),
            "NotificationCreated"
        );
    }

    #[test]
    fn event_serialization_roundtrip() {
        let order_id = OrderId::new();
        let customer_id = UserId::new();
        let event = DomainEvent::order_created(order_id, customer_id);

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("OrderCreated"));

        let deserialized: DomainEvent = serde_json::from_str(&json).unwrap();
        if let DomainEvent::OrderCreated(data) = deserialized {
            assert_eq!(data.order_id, order_id);
            assert_eq!(data.customer_id, customer_id);
        } else {
            panic!("Expected OrderCreated event");
        }
    }

    #[test]
    fn report_generated_carries_score() {
        let event = DomainEvent::report_generated(ReportId::new(), PetId::new(), 87);
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: DomainEvent = serde_json::from_str(&json).unwrap();

        if let DomainEvent::ReportGenerated(data) = deserialized {
            assert_eq!(data.health_score, 87);
        } else {
            panic!("Expected ReportGenerated event");
        }
    }
}
