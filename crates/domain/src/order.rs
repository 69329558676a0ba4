//! Order aggregate and its items.

use chrono::{DateTime, Utc};
use common::{OrderId, OrderItemId, PetId, ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, EventBuffer};
use crate::error::OrderError;
use crate::event::DomainEvent;
use crate::value_objects::Money;

/// The kind of lab test kit an order line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KitType {
    Dna,
    Allergy,
    Microbiome,
    Wellness,
}

/// Order lifecycle states. Pending orders can be paid exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Paid,
}

/// A single line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    product_id: ProductId,
    product_name: String,
    unit_price: Money,
    quantity: u32,
    kit_type: KitType,
    pet_id: Option<PetId>,
}

impl OrderItem {
    pub fn id(&self) -> OrderItemId {
        self.id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn kit_type(&self) -> KitType {
        self.kit_type
    }

    pub fn pet_id(&self) -> Option<PetId> {
        self.pet_id
    }

    pub fn total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Order aggregate root.
///
/// Built in three steps: `create` an empty pending order, `add_item` for each
/// line, then `finalize` which enforces the at-least-one-item invariant and
/// raises the created event. An order that never finalizes is never persisted.
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    customer_id: UserId,
    order_date: DateTime<Utc>,
    status: OrderStatus,
    items: Vec<OrderItem>,
    events: EventBuffer,
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }

    fn take_events(&mut self) -> Vec<DomainEvent> {
        self.events.take()
    }

    fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl Order {
    /// Starts an empty pending order for a customer.
    pub fn create(customer_id: UserId) -> Self {
        Self {
            id: OrderId::new(),
            customer_id,
            order_date: Utc::now(),
            status: OrderStatus::Pending,
            items: Vec::new(),
            events: EventBuffer::new(),
        }
    }

    /// Restores an order from persisted fields.
    pub fn rehydrate(
        id: OrderId,
        customer_id: UserId,
        order_date: DateTime<Utc>,
        status: OrderStatus,
        items: Vec<OrderItem>,
    ) -> Self {
        Self {
            id,
            customer_id,
            order_date,
            status,
            items,
            events: EventBuffer::new(),
        }
    }

    pub fn customer_id(&self) -> UserId {
        self.customer_id
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Sum of every line total, in the order's currency.
    ///
    /// `add_item` keeps every line in one currency, so the fold cannot
    /// mismatch. An empty order totals zero in the default currency.
    pub fn total(&self) -> Money {
        let currency = self
            .items
            .first()
            .map(|item| item.unit_price().currency())
            .unwrap_or_default();
        self.items.iter().fold(Money::zero(currency), |acc, item| {
            acc.try_add(item.total()).unwrap_or(acc)
        })
    }

    /// Adds a line to the order.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
        kit_type: KitType,
        pet_id: Option<PetId>,
    ) -> Result<(), OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity);
        }
        if let Some(first) = self.items.first() {
            if first.unit_price().currency() != unit_price.currency() {
                return Err(OrderError::CurrencyMismatch);
            }
        }

        self.items.push(OrderItem {
            id: OrderItemId::new(),
            product_id,
            product_name: product_name.into(),
            unit_price,
            quantity,
            kit_type,
            pet_id,
        });
        Ok(())
    }

    /// Finalizes creation once all items are added.
    pub fn finalize(&mut self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::NoItems);
        }
        self.events
            .raise(DomainEvent::order_created(self.id, self.customer_id));
        Ok(())
    }

    /// Transitions Pending to Paid. Paying twice fails.
    pub fn mark_as_paid(&mut self) -> Result<(), OrderError> {
        if self.status != OrderStatus::Pending {
            return Err(OrderError::NotPending);
        }
        self.status = OrderStatus::Paid;
        self.events.raise(DomainEvent::order_paid(self.id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Currency;

    fn order_with_one_item() -> Order {
        let mut order = Order::create(UserId::new());
        order
            .add_item(
                ProductId::new("KIT-DNA-01"),
                "Canine DNA Kit",
                Money::usd(1000),
                2,
                KitType::Dna,
                Some(PetId::new()),
            )
            .unwrap();
        order
    }

    #[test]
    fn total_is_sum_of_line_totals() {
        let mut order = order_with_one_item();
        order
            .add_item(
                ProductId::new("KIT-ALG-01"),
                "Allergy Panel",
                Money::usd(2500),
                1,
                KitType::Allergy,
                None,
            )
            .unwrap();

        assert_eq!(order.total().cents(), 4500);
    }

    #[test]
    fn finalize_requires_at_least_one_item() {
        let mut order = Order::create(UserId::new());
        assert_eq!(order.finalize(), Err(OrderError::NoItems));
        assert!(!order.has_pending_events());
    }

    #[test]
    fn finalize_raises_order_created() {
        let mut order = order_with_one_item();
        order.finalize().unwrap();

        let events = order.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "OrderCreated");
    }

    #[test]
    fn add_item_rejects_zero_quantity() {
        let mut order = Order::create(UserId::new());
        let result = order.add_item(
            ProductId::new("KIT-DNA-01"),
            "Canine DNA Kit",
            Money::usd(1000),
            0,
            KitType::Dna,
            None,
        );
        assert_eq!(result, Err(OrderError::InvalidQuantity));
        assert!(order.items().is_empty());
    }

    #[test]
    fn total_keeps_the_order_currency() {
        let mut order = Order::create(UserId::new());
        order
            .add_item(
                ProductId::new("KIT-EUR-01"),
                "Euro Kit",
                Money::new(1000, Currency::Eur),
                2,
                KitType::Wellness,
                None,
            )
            .unwrap();

        assert_eq!(order.total().cents(), 2000);
        assert_eq!(order.total().currency(), Currency::Eur);
    }

    #[test]
    fn add_item_rejects_currency_mismatch() {
        let mut order = order_with_one_item();
        let result = order.add_item(
            ProductId::new("KIT-EUR-01"),
            "Euro Kit",
            Money::new(1000, Currency::Eur),
            1,
            KitType::Wellness,
            None,
        );
        assert_eq!(result, Err(OrderError::CurrencyMismatch));
        assert_eq!(order.items().len(), 1);
    }

    #[test]
    fn mark_as_paid_transitions_exactly_once() {
        let mut order = order_with_one_item();
        order.finalize().unwrap();
        order.take_events();

        order.mark_as_paid().unwrap();
        assert_eq!(order.status(), OrderStatus::Paid);

        let events = order.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "OrderPaid");

        assert_eq!(order.mark_as_paid(), Err(OrderError::NotPending));
        assert_eq!(order.status(), OrderStatus::Paid);
    }

    #[test]
    fn rehydrated_paid_order_cannot_be_paid_again() {
        let mut order = order_with_one_item();
        order.finalize().unwrap();
        order.mark_as_paid().unwrap();

        let mut restored = Order::rehydrate(
            order.id(),
            order.customer_id(),
            order.order_date(),
            order.status(),
            order.items().to_vec(),
        );

        assert_eq!(restored.total(), order.total());
        assert_eq!(restored.mark_as_paid(), Err(OrderError::NotPending));
        assert!(!restored.has_pending_events());
    }
}
