//! Application wiring.

use std::sync::Arc;

use chrono::Duration;
use domain::role::permissions;
use domain::Role;
use store::{PetlabStore, UnitOfWork};

use crate::auth::AuthService;
use crate::handlers::{
    AccountCreatedEmailHandler, LabRegistrationHandler, NotificationDeliveryHandler,
    OrderPaymentHandler, PasswordResetEmailHandler, ReportGenerationHandler,
    ReportNotificationHandler, WelcomeEmailHandler,
};
use crate::lab::LabService;
use crate::orders::OrderService;
use crate::payments::PaymentService;
use crate::pets::PetService;
use crate::reports::ReportService;
use crate::roles::RoleService;
use crate::services::{
    Argon2PasswordHasher, MockEmailService, MockPaymentGateway, MockShippingService,
    MockTwoFactorService, TokenIssuer,
};
use crate::shipments::ShipmentService;
use crate::support::SupportService;
use crate::users::UserService;

/// Everything a caller needs to run use cases: the store, the unit of work
/// with all pipeline handlers registered, and one service per area.
///
/// The mock collaborators are exposed so tests can force failures and
/// inspect outbound traffic.
#[derive(Clone)]
pub struct App {
    pub store: Arc<PetlabStore>,
    pub uow: Arc<UnitOfWork>,
    pub auth: AuthService,
    pub users: UserService,
    pub orders: OrderService,
    pub payments: PaymentService,
    pub lab: LabService,
    pub reports: ReportService,
    pub shipments: ShipmentService,
    pub support: SupportService,
    pub roles: RoleService,
    pub pets: PetService,
    pub tokens: TokenIssuer,
    pub email: MockEmailService,
    pub gateway: MockPaymentGateway,
}

impl App {
    /// Builds the application with an empty store and seeded default roles.
    pub async fn new(jwt_secret: &str, access_token_ttl: Duration) -> Self {
        let store = Arc::new(PetlabStore::new());
        seed_default_roles(&store).await;

        let email = MockEmailService::new();
        let gateway = MockPaymentGateway::new();
        let shipping = Arc::new(MockShippingService::new());
        let two_factor = Arc::new(MockTwoFactorService::new());
        let hasher = Arc::new(Argon2PasswordHasher::new());
        let tokens = TokenIssuer::new(jwt_secret, access_token_ttl);

        let email_arc: Arc<dyn crate::services::EmailService> = Arc::new(email.clone());

        let mut uow = UnitOfWork::new(store.clone());
        uow.register_handler(Arc::new(WelcomeEmailHandler::new(email_arc.clone())));
        uow.register_handler(Arc::new(AccountCreatedEmailHandler::new(email_arc.clone())));
        uow.register_handler(Arc::new(PasswordResetEmailHandler::new(email_arc.clone())));
        uow.register_handler(Arc::new(OrderPaymentHandler));
        uow.register_handler(Arc::new(LabRegistrationHandler));
        uow.register_handler(Arc::new(ReportGenerationHandler));
        uow.register_handler(Arc::new(ReportNotificationHandler));
        uow.register_handler(Arc::new(NotificationDeliveryHandler::new(email_arc)));
        let uow = Arc::new(uow);

        let payments = PaymentService::new(uow.clone(), Arc::new(gateway.clone()));

        Self {
            auth: AuthService::new(
                uow.clone(),
                hasher.clone(),
                tokens.clone(),
                two_factor,
            ),
            users: UserService::new(uow.clone(), hasher),
            orders: OrderService::new(uow.clone(), payments.clone()),
            payments,
            lab: LabService::new(uow.clone()),
            reports: ReportService::new(uow.clone()),
            shipments: ShipmentService::new(uow.clone(), shipping),
            support: SupportService::new(uow.clone()),
            roles: RoleService::new(uow.clone()),
            pets: PetService::new(uow.clone()),
            tokens,
            email,
            gateway,
            store,
            uow,
        }
    }
}

/// Seeds the Customer and Admin roles the system expects to exist.
async fn seed_default_roles(store: &PetlabStore) {
    if store.find_role_by_name("Customer").await.is_none() {
        if let Ok(role) = Role::create("Customer", "Default customer role") {
            store.roles.save(role).await;
        }
    }

    if store.find_role_by_name("Admin").await.is_none() {
        if let Ok(mut role) = Role::create("Admin", "Full administrative access") {
            for permission in permissions::all() {
                role.add_permission(permission);
            }
            store.roles.save(role).await;
        }
    }
}
