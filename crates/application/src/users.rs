//! User account use cases.

use std::sync::Arc;

use common::{RoleId, UserId};
use domain::value_objects::{Email, FirstName, LastName};
use domain::{AggregateRoot, User};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use store::UnitOfWork;
use tracing::instrument;

use crate::error::AppError;
use crate::services::PasswordHasher;

/// Input for the public registration flow.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Input for admin-driven account creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role_id: RoleId,
}

/// A user's own profile view.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfileResponse {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub email_verified: bool,
}

/// Registration, profile, and password management.
#[derive(Clone)]
pub struct UserService {
    uow: Arc<UnitOfWork>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Role assigned to self-registered accounts.
    pub const DEFAULT_ROLE: &'static str = "Customer";

    pub fn new(uow: Arc<UnitOfWork>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { uow, hasher }
    }

    /// Registers a new account with the default customer role.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterUserRequest) -> Result<UserId, AppError> {
        let first_name = FirstName::create(&request.first_name)?;
        let last_name = LastName::create(&request.last_name)?;
        let email = Email::create(&request.email)?;

        let store = self.uow.store();
        if store.find_user_by_email(email.value()).await.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let role = store
            .find_role_by_name(Self::DEFAULT_ROLE)
            .await
            .ok_or(AppError::RoleNotFound)?;

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::register(first_name, last_name, email, password_hash, role.id());
        let user_id = user.id();

        store.users.save(user).await;
        self.uow.save_changes().await?;
        Ok(user_id)
    }

    /// Creates an account on behalf of an administrator. The generated
    /// temporary password reaches the user through the welcome email.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserId, AppError> {
        let first_name = FirstName::create(&request.first_name)?;
        let last_name = LastName::create(&request.last_name)?;
        let email = Email::create(&request.email)?;

        let store = self.uow.store();
        if store.find_user_by_email(email.value()).await.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }
        if store.roles.get(request.role_id).await.is_none() {
            return Err(AppError::RoleNotFound);
        }

        let temporary_password = generate_temporary_password();
        let password_hash = self.hasher.hash(&temporary_password)?;
        let user = User::create(
            first_name,
            last_name,
            email,
            password_hash,
            request.role_id,
            &temporary_password,
        );
        let user_id = user.id();

        store.users.save(user).await;
        self.uow.save_changes().await?;
        Ok(user_id)
    }

    pub async fn get_profile(&self, user_id: UserId) -> Result<UserProfileResponse, AppError> {
        let store = self.uow.store();
        let user = store.users.get(user_id).await.ok_or(AppError::UserNotFound)?;
        let role = store
            .roles
            .get(user.role_id())
            .await
            .ok_or(AppError::RoleNotFound)?;

        Ok(UserProfileResponse {
            id: user.id(),
            first_name: user.first_name().value().to_string(),
            last_name: user.last_name().value().to_string(),
            email: user.email().value().to_string(),
            role: role.name().to_string(),
            email_verified: user.is_email_verified(),
        })
    }

    #[instrument(skip(self))]
    pub async fn update_profile(
        &self,
        user_id: UserId,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), AppError> {
        let first_name = FirstName::create(first_name)?;
        let last_name = LastName::create(last_name)?;

        let store = self.uow.store();
        let mut user = store.users.get(user_id).await.ok_or(AppError::UserNotFound)?;
        user.update_profile(first_name, last_name);
        store.users.save(user).await;
        Ok(())
    }

    /// Changes the password after verifying the current one.
    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let store = self.uow.store();
        let mut user = store.users.get(user_id).await.ok_or(AppError::UserNotFound)?;

        if !self.hasher.verify(current_password, user.password_hash()) {
            return Err(AppError::InvalidCredentials);
        }

        let new_hash = self.hasher.hash(new_password)?;
        user.change_password(new_hash);
        store.users.save(user).await;
        Ok(())
    }
}

/// Random 12-character temporary password for admin-created accounts.
fn generate_temporary_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect()
}
