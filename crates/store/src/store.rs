//! The application's store: one repository per aggregate type.

use common::{OrderId, UserId};
use domain::{
    DomainEvent, HealthReport, LabTest, Notification, Order, Payment, Pet, Role, Shipment, Ticket,
    User,
};

use crate::memory::InMemoryRepository;

/// Groups every aggregate repository behind one explicitly constructed
/// object, threaded through the application instead of global state.
#[derive(Default)]
pub struct PetlabStore {
    pub users: InMemoryRepository<User>,
    pub roles: InMemoryRepository<Role>,
    pub orders: InMemoryRepository<Order>,
    pub payments: InMemoryRepository<Payment>,
    pub lab_tests: InMemoryRepository<LabTest>,
    pub reports: InMemoryRepository<HealthReport>,
    pub notifications: InMemoryRepository<Notification>,
    pub shipments: InMemoryRepository<Shipment>,
    pub tickets: InMemoryRepository<Ticket>,
    pub pets: InMemoryRepository<Pet>,
}

impl PetlabStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains pending events from every repository.
    pub async fn drain_all_events(&self) -> Vec<DomainEvent> {
        let mut events = Vec::new();
        events.extend(self.users.drain_events().await);
        events.extend(self.roles.drain_events().await);
        events.extend(self.orders.drain_events().await);
        events.extend(self.payments.drain_events().await);
        events.extend(self.lab_tests.drain_events().await);
        events.extend(self.reports.drain_events().await);
        events.extend(self.notifications.drain_events().await);
        events.extend(self.shipments.drain_events().await);
        events.extend(self.tickets.drain_events().await);
        events.extend(self.pets.drain_events().await);
        events
    }

    /// Case-insensitive lookup by email.
    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        let needle = email.to_ascii_lowercase();
        self.users
            .find(|u| u.email().value().to_ascii_lowercase() == needle)
            .await
    }

    pub async fn find_user_by_refresh_token(&self, token: &str) -> Option<User> {
        self.users
            .find(|u| u.refresh_token().is_some_and(|rt| rt.token() == token))
            .await
    }

    pub async fn find_role_by_name(&self, name: &str) -> Option<Role> {
        self.roles.find(|r| r.name() == name).await
    }

    pub async fn find_payment_by_order(&self, order_id: OrderId) -> Option<Payment> {
        self.payments.find(|p| p.order_id() == order_id).await
    }

    pub async fn find_lab_test_by_order(&self, order_id: OrderId) -> Option<LabTest> {
        self.lab_tests.find(|t| t.order_id() == order_id).await
    }

    pub async fn find_shipment_by_order(&self, order_id: OrderId) -> Option<Shipment> {
        self.shipments.find(|s| s.order_id() == order_id).await
    }

    pub async fn orders_for_customer(&self, customer_id: UserId) -> Vec<Order> {
        self.orders.filter(|o| o.customer_id() == customer_id).await
    }

    pub async fn tickets_for_customer(&self, customer_id: UserId) -> Vec<Ticket> {
        self.tickets.filter(|t| t.customer_id() == customer_id).await
    }

    pub async fn pets_for_owner(&self, owner_id: UserId) -> Vec<Pet> {
        self.pets.filter(|p| p.owner_id() == owner_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::AggregateRoot;
    use domain::value_objects::{Email, FirstName, LastName};

    fn registered_user(email: &str) -> User {
        User::register(
            FirstName::create("John").unwrap(),
            LastName::create("Doe").unwrap(),
            Email::create(email).unwrap(),
            "hash".to_string(),
            common::RoleId::new(),
        )
    }

    #[tokio::test]
    async fn email_lookup_is_case_insensitive() {
        let store = PetlabStore::new();
        store.users.save(registered_user("John@Example.com")).await;

        assert!(store.find_user_by_email("john@example.com").await.is_some());
        assert!(store.find_user_by_email("other@example.com").await.is_none());
    }

    #[tokio::test]
    async fn drain_all_events_covers_every_repository() {
        let store = PetlabStore::new();
        store.users.save(registered_user("a@b.com")).await;

        let mut ticket = Ticket::create(UserId::new(), "Subject", "Message").unwrap();
        ticket.take_events();
        store.tickets.save(ticket).await;

        let notification = Notification::create(
            UserId::new(),
            domain::NotificationType::Generic,
            "hello",
        );
        store.notifications.save(notification).await;

        let events = store.drain_all_events().await;
        let types: Vec<_> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(events.len(), 2);
        assert!(types.contains(&"UserRegistered"));
        assert!(types.contains(&"NotificationCreated"));

        assert!(store.drain_all_events().await.is_empty());
    }
}
