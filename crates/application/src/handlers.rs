//! Event handlers registered on the unit of work.
//!
//! Together they form the pipeline: a successful payment marks the order
//! paid, a paid order registers lab tests, recorded results generate a
//! report, a report creates a notification, and a notification sends an
//! email. Missing aggregates are logged and skipped, never errored, so a
//! stray event cannot wedge an unrelated commit.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{AggregateRoot, DomainEvent, HealthReport, LabTest, Notification, NotificationType};
use rand::Rng;
use store::{DispatchError, EventHandler, UnitOfWork};
use tracing::{info, warn};

use crate::services::EmailService;

/// Sends a welcome email on registration. Fire-and-forget: a delivery
/// failure is logged, not propagated.
pub struct WelcomeEmailHandler {
    email: Arc<dyn EmailService>,
}

impl WelcomeEmailHandler {
    pub fn new(email: Arc<dyn EmailService>) -> Self {
        Self { email }
    }
}

#[async_trait]
impl EventHandler for WelcomeEmailHandler {
    fn name(&self) -> &'static str {
        "welcome-email"
    }

    async fn handle(&self, event: &DomainEvent, uow: &UnitOfWork) -> Result<(), DispatchError> {
        let DomainEvent::UserRegistered(data) = event else {
            return Ok(());
        };

        let Some(user) = uow.store().users.get(data.user_id).await else {
            warn!(user_id = %data.user_id, "registered user not found");
            return Ok(());
        };

        let body = format!(
            "Hi {}, welcome to Petlab! Please verify your email.",
            user.first_name().value()
        );
        if let Err(reason) = self
            .email
            .send(user.email().value(), "Welcome to Petlab!", &body)
            .await
        {
            warn!(user_id = %data.user_id, reason, "welcome email failed");
        }
        Ok(())
    }
}

/// Emails admin-created accounts their temporary password.
pub struct AccountCreatedEmailHandler {
    email: Arc<dyn EmailService>,
}

impl AccountCreatedEmailHandler {
    pub fn new(email: Arc<dyn EmailService>) -> Self {
        Self { email }
    }
}

#[async_trait]
impl EventHandler for AccountCreatedEmailHandler {
    fn name(&self) -> &'static str {
        "account-created-email"
    }

    async fn handle(&self, event: &DomainEvent, uow: &UnitOfWork) -> Result<(), DispatchError> {
        let DomainEvent::UserCreated(data) = event else {
            return Ok(());
        };

        let Some(user) = uow.store().users.get(data.user_id).await else {
            warn!(user_id = %data.user_id, "created user not found");
            return Ok(());
        };

        let body = format!(
            "Hi {}, an account was created for you. Your temporary password is: {}",
            user.first_name().value(),
            data.temporary_password
        );
        if let Err(reason) = self
            .email
            .send(user.email().value(), "Your Petlab account", &body)
            .await
        {
            warn!(user_id = %data.user_id, reason, "account-created email failed");
        }
        Ok(())
    }
}

/// Emails the password reset token.
pub struct PasswordResetEmailHandler {
    email: Arc<dyn EmailService>,
}

impl PasswordResetEmailHandler {
    pub fn new(email: Arc<dyn EmailService>) -> Self {
        Self { email }
    }
}

#[async_trait]
impl EventHandler for PasswordResetEmailHandler {
    fn name(&self) -> &'static str {
        "password-reset-email"
    }

    async fn handle(&self, event: &DomainEvent, uow: &UnitOfWork) -> Result<(), DispatchError> {
        let DomainEvent::UserPasswordResetRequested(data) = event else {
            return Ok(());
        };

        let Some(user) = uow.store().users.get(data.user_id).await else {
            warn!(user_id = %data.user_id, "user requesting reset not found");
            return Ok(());
        };

        let body = format!("Use this token to reset your password: {}", data.token);
        if let Err(reason) = self
            .email
            .send(user.email().value(), "Password reset", &body)
            .await
        {
            warn!(user_id = %data.user_id, reason, "password reset email failed");
        }
        Ok(())
    }
}

/// Marks the order paid when its payment succeeds.
pub struct OrderPaymentHandler;

#[async_trait]
impl EventHandler for OrderPaymentHandler {
    fn name(&self) -> &'static str {
        "order-payment"
    }

    async fn handle(&self, event: &DomainEvent, uow: &UnitOfWork) -> Result<(), DispatchError> {
        let DomainEvent::PaymentSucceeded(data) = event else {
            return Ok(());
        };

        let store = uow.store();
        let Some(mut order) = store.orders.get(data.order_id).await else {
            warn!(order_id = %data.order_id, "payment succeeded for unknown order");
            return Ok(());
        };

        if order.mark_as_paid().is_ok() {
            store.orders.save(order).await;
            uow.save_changes().await?;
        }
        Ok(())
    }
}

/// Registers a lab test for every order item naming a pet once the order
/// is paid.
pub struct LabRegistrationHandler;

#[async_trait]
impl EventHandler for LabRegistrationHandler {
    fn name(&self) -> &'static str {
        "lab-registration"
    }

    async fn handle(&self, event: &DomainEvent, uow: &UnitOfWork) -> Result<(), DispatchError> {
        let DomainEvent::OrderPaid(data) = event else {
            return Ok(());
        };

        let store = uow.store();
        let Some(order) = store.orders.get(data.order_id).await else {
            warn!(order_id = %data.order_id, "paid order not found");
            return Ok(());
        };

        for item in order.items() {
            if let Some(pet_id) = item.pet_id() {
                let test = LabTest::register(data.order_id, pet_id);
                info!(order_id = %data.order_id, %pet_id, lab_test_id = %test.id(), "lab test registered");
                store.lab_tests.save(test).await;
            }
        }
        Ok(())
    }
}

/// Generates a health report from recorded lab results.
pub struct ReportGenerationHandler;

#[async_trait]
impl EventHandler for ReportGenerationHandler {
    fn name(&self) -> &'static str {
        "report-generation"
    }

    async fn handle(&self, event: &DomainEvent, uow: &UnitOfWork) -> Result<(), DispatchError> {
        let DomainEvent::LabTestResultsRecorded(data) = event else {
            return Ok(());
        };

        let store = uow.store();
        let Some(test) = store.lab_tests.get(data.lab_test_id).await else {
            warn!(lab_test_id = %data.lab_test_id, "lab test not found for report generation");
            return Ok(());
        };

        // Mock analysis.
        let health_score = rand::thread_rng().gen_range(60..100);
        let content = format!(
            "Analysis for pet {}. Based on raw data: {}... Gut microbiome is balanced.",
            data.pet_id,
            test.raw_data_json().unwrap_or_default()
        );

        let report = HealthReport::generate(data.lab_test_id, data.pet_id, content, health_score);
        store.reports.save(report).await;
        uow.save_changes().await?;
        Ok(())
    }
}

/// Notifies the pet's owner that their report is ready.
pub struct ReportNotificationHandler;

#[async_trait]
impl EventHandler for ReportNotificationHandler {
    fn name(&self) -> &'static str {
        "report-notification"
    }

    async fn handle(&self, event: &DomainEvent, uow: &UnitOfWork) -> Result<(), DispatchError> {
        let DomainEvent::ReportGenerated(data) = event else {
            return Ok(());
        };

        let store = uow.store();
        let Some(pet) = store.pets.get(data.pet_id).await else {
            warn!(pet_id = %data.pet_id, "pet not found for report notification");
            return Ok(());
        };

        let notification = Notification::create(
            pet.owner_id(),
            NotificationType::ReportReady,
            format!("Good news! The health report for {} is ready.", pet.name()),
        );
        store.notifications.save(notification).await;
        uow.save_changes().await?;
        Ok(())
    }
}

/// Delivers a created notification by email. A send failure becomes
/// notification state, not a dispatch error.
pub struct NotificationDeliveryHandler {
    email: Arc<dyn EmailService>,
}

impl NotificationDeliveryHandler {
    pub fn new(email: Arc<dyn EmailService>) -> Self {
        Self { email }
    }
}

#[async_trait]
impl EventHandler for NotificationDeliveryHandler {
    fn name(&self) -> &'static str {
        "notification-delivery"
    }

    async fn handle(&self, event: &DomainEvent, uow: &UnitOfWork) -> Result<(), DispatchError> {
        let DomainEvent::NotificationCreated(data) = event else {
            return Ok(());
        };

        let store = uow.store();
        let Some(mut notification) = store.notifications.get(data.notification_id).await else {
            warn!(notification_id = %data.notification_id, "notification not found");
            return Ok(());
        };
        let Some(user) = store.users.get(notification.user_id()).await else {
            warn!(notification_id = %data.notification_id, "notification user not found");
            return Ok(());
        };

        match self
            .email
            .send(
                user.email().value(),
                "Petlab notification",
                notification.message(),
            )
            .await
        {
            Ok(()) => notification.mark_as_sent(),
            Err(reason) => {
                warn!(notification_id = %data.notification_id, reason, "notification delivery failed");
                notification.mark_as_failed();
            }
        }

        store.notifications.save(notification).await;
        Ok(())
    }
}
