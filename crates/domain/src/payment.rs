//! Payment aggregate.

use common::{OrderId, PaymentId};
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, EventBuffer};
use crate::event::DomainEvent;
use crate::value_objects::Money;

/// Payment lifecycle states. Completed and Failed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// A payment attempt against an order.
///
/// Terminal transitions are silent no-ops once the payment left Pending, so
/// duplicate gateway callbacks cannot corrupt a settled record.
#[derive(Debug, Clone)]
pub struct Payment {
    id: PaymentId,
    order_id: OrderId,
    amount: Money,
    status: PaymentStatus,
    gateway_transaction_id: Option<String>,
    failure_reason: Option<String>,
    events: EventBuffer,
}

impl AggregateRoot for Payment {
    type Id = PaymentId;

    fn id(&self) -> PaymentId {
        self.id
    }

    fn take_events(&mut self) -> Vec<DomainEvent> {
        self.events.take()
    }

    fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl Payment {
    /// Creates a pending payment for an order.
    pub fn create(order_id: OrderId, amount: Money) -> Self {
        Self {
            id: PaymentId::new(),
            order_id,
            amount,
            status: PaymentStatus::Pending,
            gateway_transaction_id: None,
            failure_reason: None,
            events: EventBuffer::new(),
        }
    }

    /// Restores a payment from persisted fields.
    pub fn rehydrate(
        id: PaymentId,
        order_id: OrderId,
        amount: Money,
        status: PaymentStatus,
        gateway_transaction_id: Option<String>,
        failure_reason: Option<String>,
    ) -> Self {
        Self {
            id,
            order_id,
            amount,
            status,
            gateway_transaction_id,
            failure_reason,
            events: EventBuffer::new(),
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn gateway_transaction_id(&self) -> Option<&str> {
        self.gateway_transaction_id.as_deref()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Settles the payment. No-op unless Pending.
    pub fn mark_as_completed(&mut self, gateway_transaction_id: impl Into<String>) {
        if self.status != PaymentStatus::Pending {
            return;
        }
        self.status = PaymentStatus::Completed;
        self.gateway_transaction_id = Some(gateway_transaction_id.into());
        self.events
            .raise(DomainEvent::payment_succeeded(self.id, self.order_id));
    }

    /// Records a gateway failure. No-op unless Pending.
    pub fn mark_as_failed(&mut self, failure_reason: impl Into<String>) {
        if self.status != PaymentStatus::Pending {
            return;
        }
        self.status = PaymentStatus::Failed;
        self.failure_reason = Some(failure_reason.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_payment_raises_payment_succeeded() {
        let mut payment = Payment::create(OrderId::new(), Money::usd(2000));
        payment.mark_as_completed("txn-123");

        assert_eq!(payment.status(), PaymentStatus::Completed);
        assert_eq!(payment.gateway_transaction_id(), Some("txn-123"));

        let events = payment.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "PaymentSucceeded");
    }

    #[test]
    fn failed_payment_records_reason_without_event() {
        let mut payment = Payment::create(OrderId::new(), Money::usd(2000));
        payment.mark_as_failed("card declined");

        assert_eq!(payment.status(), PaymentStatus::Failed);
        assert_eq!(payment.failure_reason(), Some("card declined"));
        assert!(payment.take_events().is_empty());
    }

    #[test]
    fn terminal_transitions_are_silent_no_ops() {
        let mut payment = Payment::create(OrderId::new(), Money::usd(500));
        payment.mark_as_completed("txn-1");
        payment.take_events();

        payment.mark_as_failed("too late");
        assert_eq!(payment.status(), PaymentStatus::Completed);
        assert!(payment.failure_reason().is_none());

        payment.mark_as_completed("txn-2");
        assert_eq!(payment.gateway_transaction_id(), Some("txn-1"));
        assert!(payment.take_events().is_empty());
    }

    #[test]
    fn rehydrated_completed_payment_stays_terminal() {
        let mut payment = Payment::rehydrate(
            PaymentId::new(),
            OrderId::new(),
            Money::usd(1000),
            PaymentStatus::Completed,
            Some("txn-1".to_string()),
            None,
        );

        payment.mark_as_failed("late decline");
        assert_eq!(payment.status(), PaymentStatus::Completed);
        assert!(payment.failure_reason().is_none());
        assert!(!payment.has_pending_events());
    }
}
