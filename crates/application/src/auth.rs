//! Authentication use cases.

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::UserId;
use domain::value_objects::Email;
use domain::{AggregateRoot, RefreshToken, User};
use serde::Serialize;
use store::UnitOfWork;
use tracing::instrument;

use crate::error::AppError;
use crate::services::token::generate_opaque_token;
use crate::services::{PasswordHasher, TokenIssuer, TwoFactorService};

/// Outcome of a successful login or token refresh.
///
/// When the account has two-factor enabled, a plain login returns only
/// `requires_two_factor = true` and the client retries via the 2FA login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub requires_two_factor: bool,
}

/// Login, token refresh, password reset, and two-factor flows.
#[derive(Clone)]
pub struct AuthService {
    uow: Arc<UnitOfWork>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenIssuer,
    two_factor: Arc<dyn TwoFactorService>,
    refresh_ttl: Duration,
    reset_ttl: Duration,
}

impl AuthService {
    pub fn new(
        uow: Arc<UnitOfWork>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenIssuer,
        two_factor: Arc<dyn TwoFactorService>,
    ) -> Self {
        Self {
            uow,
            hasher,
            tokens,
            two_factor,
            refresh_ttl: Duration::days(7),
            reset_ttl: Duration::hours(1),
        }
    }

    /// Authenticates credentials and issues tokens, or asks for a 2FA code.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let user = self.authenticate(email, password).await?;

        if user.two_factor_enabled() {
            return Ok(LoginResponse {
                access_token: None,
                refresh_token: None,
                requires_two_factor: true,
            });
        }

        self.issue_tokens(user).await
    }

    /// Authenticates credentials plus a two-factor code.
    #[instrument(skip(self, password, code))]
    pub async fn login_two_factor(
        &self,
        email: &str,
        password: &str,
        code: &str,
    ) -> Result<LoginResponse, AppError> {
        let user = self.authenticate(email, password).await?;

        let code_is_valid = match user.two_factor_secret() {
            Some(secret) => self.two_factor.validate_code(secret, code).await,
            None => false,
        };
        user.verify_two_factor_login(code_is_valid)?;

        self.issue_tokens(user).await
    }

    /// Rotates a refresh token and issues a fresh access token.
    #[instrument(skip_all)]
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<LoginResponse, AppError> {
        let store = self.uow.store();
        let user = store
            .find_user_by_refresh_token(refresh_token)
            .await
            .ok_or(AppError::InvalidRefreshToken)?;

        let current = user.refresh_token().ok_or(AppError::InvalidRefreshToken)?;
        if current.is_expired(Utc::now()) {
            return Err(AppError::RefreshTokenExpired);
        }
        user.ensure_login_eligibility()?;

        self.issue_tokens(user).await
    }

    /// Revokes the user's refresh token.
    #[instrument(skip(self))]
    pub async fn logout(&self, user_id: UserId) -> Result<(), AppError> {
        let store = self.uow.store();
        let mut user = store.users.get(user_id).await.ok_or(AppError::UserNotFound)?;
        user.revoke_refresh_token();
        store.users.save(user).await;
        Ok(())
    }

    /// Starts the password reset flow.
    ///
    /// Unknown emails succeed silently so the endpoint cannot be used to
    /// probe for accounts.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let store = self.uow.store();
        let Some(mut user) = store.find_user_by_email(email).await else {
            return Ok(());
        };

        let token = generate_opaque_token();
        user.request_password_reset(&token, Utc::now() + self.reset_ttl);
        store.users.save(user).await;
        self.uow.save_changes().await?;
        Ok(())
    }

    /// Completes the password reset flow with the emailed token.
    #[instrument(skip(self, token, new_password))]
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let store = self.uow.store();
        let mut user = store
            .find_user_by_email(email)
            .await
            .ok_or(AppError::User(domain::UserError::InvalidResetToken))?;

        let new_hash = self.hasher.hash(new_password)?;
        user.reset_password(token, new_hash)?;
        store.users.save(user).await;
        self.uow.save_changes().await?;
        Ok(())
    }

    /// Generates a two-factor secret for the user to confirm via `enable`.
    pub async fn generate_two_factor_secret(&self) -> String {
        self.two_factor.generate_secret().await
    }

    /// Enables two-factor authentication once the user proves they hold the
    /// secret by supplying a valid code.
    #[instrument(skip(self, secret, code))]
    pub async fn enable_two_factor(
        &self,
        user_id: UserId,
        secret: &str,
        code: &str,
    ) -> Result<(), AppError> {
        let store = self.uow.store();
        let mut user = store.users.get(user_id).await.ok_or(AppError::UserNotFound)?;

        let code_is_valid = self.two_factor.validate_code(secret, code).await;
        user.enable_two_factor(secret.to_string(), code_is_valid)?;
        store.users.save(user).await;
        Ok(())
    }

    /// Shared credential check. Unknown emails and wrong passwords fail
    /// with the same error; a malformed email is called out as such.
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = Email::create(email).map_err(|_| AppError::InvalidEmail)?;

        let user = self
            .uow
            .store()
            .find_user_by_email(email.value())
            .await
            .ok_or(AppError::InvalidCredentials)?;

        if !self.hasher.verify(password, user.password_hash()) {
            return Err(AppError::InvalidCredentials);
        }
        user.ensure_login_eligibility()?;
        Ok(user)
    }

    async fn issue_tokens(&self, mut user: User) -> Result<LoginResponse, AppError> {
        let store = self.uow.store();
        let role = store
            .roles
            .get(user.role_id())
            .await
            .ok_or(AppError::RoleNotFound)?;

        let name = format!("{} {}", user.first_name().value(), user.last_name().value());
        let access_token = self.tokens.issue(
            user.id(),
            &name,
            user.email().value(),
            role.name(),
            role.permission_codes(),
        )?;

        let refresh = generate_opaque_token();
        user.set_refresh_token(RefreshToken::new(
            refresh.clone(),
            Utc::now() + self.refresh_ttl,
        ));
        store.users.save(user).await;

        Ok(LoginResponse {
            access_token: Some(access_token),
            refresh_token: Some(refresh),
            requires_two_factor: false,
        })
    }
}
