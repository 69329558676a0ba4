//! Generic in-memory repository.

use std::collections::HashMap;

use domain::AggregateRoot;
use tokio::sync::RwLock;

/// Stores aggregates of one type in a map guarded by an async lock.
///
/// Reads clone the stored aggregate; callers mutate their copy and `save`
/// it back, which overwrites the stored state including any buffered
/// events. Concurrent writers to the same aggregate follow last-write-wins,
/// acceptable for an in-memory backend.
pub struct InMemoryRepository<A: AggregateRoot> {
    items: RwLock<HashMap<A::Id, A>>,
}

impl<A: AggregateRoot> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: AggregateRoot> InMemoryRepository<A> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a copy of the aggregate, if present.
    pub async fn get(&self, id: A::Id) -> Option<A> {
        self.items.read().await.get(&id).cloned()
    }

    /// Inserts or overwrites the aggregate.
    pub async fn save(&self, aggregate: A) {
        self.items.write().await.insert(aggregate.id(), aggregate);
    }

    /// Returns a copy of the first aggregate matching the predicate.
    pub async fn find<P>(&self, predicate: P) -> Option<A>
    where
        P: Fn(&A) -> bool,
    {
        self.items.read().await.values().find(|a| predicate(a)).cloned()
    }

    /// Returns copies of every aggregate matching the predicate.
    pub async fn filter<P>(&self, predicate: P) -> Vec<A>
    where
        P: Fn(&A) -> bool,
    {
        self.items
            .read()
            .await
            .values()
            .filter(|a| predicate(a))
            .cloned()
            .collect()
    }

    /// Returns copies of every stored aggregate.
    pub async fn all(&self) -> Vec<A> {
        self.items.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Drains pending events from every stored aggregate.
    ///
    /// Order is stable within one aggregate (emission order) and arbitrary
    /// across aggregates.
    pub async fn drain_events(&self) -> Vec<domain::DomainEvent> {
        let mut items = self.items.write().await;
        let mut events = Vec::new();
        for aggregate in items.values_mut() {
            if aggregate.has_pending_events() {
                events.extend(aggregate.take_events());
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{OrderId, UserId};
    use domain::value_objects::Money;
    use domain::{KitType, Order};

    fn finalized_order(customer_id: UserId) -> Order {
        let mut order = Order::create(customer_id);
        order
            .add_item(
                common::ProductId::new("KIT-01"),
                "Kit",
                Money::usd(1000),
                1,
                KitType::Dna,
                None,
            )
            .unwrap();
        order.finalize().unwrap();
        order
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let repo: InMemoryRepository<Order> = InMemoryRepository::new();
        let order = finalized_order(UserId::new());
        let id = order.id();

        repo.save(order).await;
        let loaded = repo.get(id).await.unwrap();
        assert_eq!(loaded.id(), id);

        assert!(repo.get(OrderId::new()).await.is_none());
    }

    #[tokio::test]
    async fn save_overwrites_existing_state() {
        let repo: InMemoryRepository<Order> = InMemoryRepository::new();
        let mut order = finalized_order(UserId::new());
        let id = order.id();
        repo.save(order.clone()).await;

        order.take_events();
        order.mark_as_paid().unwrap();
        repo.save(order).await;

        let loaded = repo.get(id).await.unwrap();
        assert_eq!(loaded.status(), domain::OrderStatus::Paid);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn drain_events_clears_buffers() {
        let repo: InMemoryRepository<Order> = InMemoryRepository::new();
        repo.save(finalized_order(UserId::new())).await;
        repo.save(finalized_order(UserId::new())).await;

        let events = repo.drain_events().await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.event_type() == "OrderCreated"));

        assert!(repo.drain_events().await.is_empty());
    }

    #[tokio::test]
    async fn filter_selects_by_predicate() {
        let repo: InMemoryRepository<Order> = InMemoryRepository::new();
        let customer = UserId::new();
        repo.save(finalized_order(customer)).await;
        repo.save(finalized_order(customer)).await;
        repo.save(finalized_order(UserId::new())).await;

        let mine = repo.filter(|o| o.customer_id() == customer).await;
        assert_eq!(mine.len(), 2);
    }
}
