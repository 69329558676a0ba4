//! User aggregate.

use chrono::{DateTime, Utc};
use common::{RoleId, UserId};
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, EventBuffer};
use crate::error::UserError;
use crate::event::DomainEvent;
use crate::value_objects::{Email, FirstName, LastName};

/// A refresh token issued to a user, rotated on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// A pending password reset request. Single use and time limited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReset {
    token: String,
    expires_at: DateTime<Utc>,
}

impl PasswordReset {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// User account aggregate root.
///
/// Bans and email verification are one-way and idempotent. Credential
/// material (password hash, refresh token, reset token, two-factor secret)
/// lives here so every change goes through the aggregate's rules.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    first_name: FirstName,
    last_name: LastName,
    email: Email,
    password_hash: String,
    role_id: RoleId,
    is_email_verified: bool,
    is_banned: bool,
    refresh_token: Option<RefreshToken>,
    password_reset: Option<PasswordReset>,
    two_factor_secret: Option<String>,
    two_factor_enabled: bool,
    events: EventBuffer,
}

impl AggregateRoot for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }

    fn take_events(&mut self) -> Vec<DomainEvent> {
        self.events.take()
    }

    fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl User {
    fn new(
        first_name: FirstName,
        last_name: LastName,
        email: Email,
        password_hash: String,
        role_id: RoleId,
    ) -> Self {
        Self {
            id: UserId::new(),
            first_name,
            last_name,
            email,
            password_hash,
            role_id,
            is_email_verified: false,
            is_banned: false,
            refresh_token: None,
            password_reset: None,
            two_factor_secret: None,
            two_factor_enabled: false,
            events: EventBuffer::new(),
        }
    }

    /// Registers a user through the public signup flow.
    pub fn register(
        first_name: FirstName,
        last_name: LastName,
        email: Email,
        password_hash: String,
        role_id: RoleId,
    ) -> Self {
        let mut user = Self::new(first_name, last_name, email, password_hash, role_id);
        let event = DomainEvent::user_registered(user.id);
        user.events.raise(event);
        user
    }

    /// Creates a user on behalf of an administrator.
    ///
    /// The temporary password travels in the event so the welcome email
    /// handler can include it.
    pub fn create(
        first_name: FirstName,
        last_name: LastName,
        email: Email,
        password_hash: String,
        role_id: RoleId,
        temporary_password: &str,
    ) -> Self {
        let mut user = Self::new(first_name, last_name, email, password_hash, role_id);
        let event = DomainEvent::user_created(user.id, temporary_password);
        user.events.raise(event);
        user
    }

    /// Restores a user from persisted fields, bypassing re-validation.
    #[allow(clippy::too_many_arguments)]
    pub fn rehydrate(
        id: UserId,
        first_name: FirstName,
        last_name: LastName,
        email: Email,
        password_hash: String,
        role_id: RoleId,
        is_email_verified: bool,
        is_banned: bool,
        refresh_token: Option<RefreshToken>,
        password_reset: Option<PasswordReset>,
        two_factor_secret: Option<String>,
        two_factor_enabled: bool,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            password_hash,
            role_id,
            is_email_verified,
            is_banned,
            refresh_token,
            password_reset,
            two_factor_secret,
            two_factor_enabled,
            events: EventBuffer::new(),
        }
    }

    pub fn first_name(&self) -> &FirstName {
        &self.first_name
    }

    pub fn last_name(&self) -> &LastName {
        &self.last_name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    pub fn is_email_verified(&self) -> bool {
        self.is_email_verified
    }

    pub fn is_banned(&self) -> bool {
        self.is_banned
    }

    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }

    pub fn two_factor_enabled(&self) -> bool {
        self.two_factor_enabled
    }

    pub fn two_factor_secret(&self) -> Option<&str> {
        self.two_factor_secret.as_deref()
    }

    /// Marks the email as verified. No-op if already verified.
    pub fn verify_email(&mut self) {
        if self.is_email_verified {
            return;
        }
        self.is_email_verified = true;
        self.events.raise(DomainEvent::user_email_verified(self.id));
    }

    /// Bans the account. No-op if already banned.
    pub fn ban(&mut self) {
        if self.is_banned {
            return;
        }
        self.is_banned = true;
        self.events.raise(DomainEvent::user_banned(self.id));
    }

    /// Checks whether the account may log in.
    pub fn ensure_login_eligibility(&self) -> Result<(), UserError> {
        if self.is_banned {
            return Err(UserError::Banned);
        }
        Ok(())
    }

    /// Replaces the password hash. No-op if the hash is unchanged.
    pub fn change_password(&mut self, new_password_hash: String) {
        if new_password_hash == self.password_hash {
            return;
        }
        self.password_hash = new_password_hash;
    }

    pub fn update_profile(&mut self, first_name: FirstName, last_name: LastName) {
        self.first_name = first_name;
        self.last_name = last_name;
    }

    pub fn set_refresh_token(&mut self, refresh_token: RefreshToken) {
        self.refresh_token = Some(refresh_token);
    }

    pub fn revoke_refresh_token(&mut self) {
        self.refresh_token = None;
    }

    /// Stores a password reset token and raises the event that triggers the
    /// reset email.
    pub fn request_password_reset(&mut self, token: &str, expires_at: DateTime<Utc>) {
        self.password_reset = Some(PasswordReset::new(token, expires_at));
        self.events
            .raise(DomainEvent::user_password_reset_requested(self.id, token));
    }

    /// Consumes the reset token and replaces the password hash.
    ///
    /// The token is single use: it is cleared on success and rejected once
    /// expired or mismatched.
    pub fn reset_password(
        &mut self,
        token: &str,
        new_password_hash: String,
    ) -> Result<(), UserError> {
        let valid = self
            .password_reset
            .as_ref()
            .is_some_and(|reset| reset.token() == token && !reset.is_expired(Utc::now()));
        if !valid {
            return Err(UserError::InvalidResetToken);
        }

        self.password_hash = new_password_hash;
        self.password_reset = None;
        self.events.raise(DomainEvent::user_password_changed(self.id));
        Ok(())
    }

    /// Enables two-factor authentication with a verified secret.
    ///
    /// `code_is_valid` is the outcome of checking the user-supplied code
    /// against the secret with the two-factor service.
    pub fn enable_two_factor(&mut self, secret: String, code_is_valid: bool) -> Result<(), UserError> {
        if self.two_factor_enabled {
            return Err(UserError::TwoFactorAlreadyEnabled);
        }
        if !code_is_valid {
            return Err(UserError::InvalidTwoFactorCode);
        }
        self.two_factor_secret = Some(secret);
        self.two_factor_enabled = true;
        Ok(())
    }

    /// Checks a two-factor login code result against the account state.
    pub fn verify_two_factor_login(&self, code_is_valid: bool) -> Result<(), UserError> {
        if !self.two_factor_enabled {
            return Err(UserError::TwoFactorNotEnabled);
        }
        if !code_is_valid {
            return Err(UserError::InvalidTwoFactorCode);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn register_user() -> User {
        User::register(
            FirstName::create("John").unwrap(),
            LastName::create("Doe").unwrap(),
            Email::create("a@b.com").unwrap(),
            "hash".to_string(),
            RoleId::new(),
        )
    }

    #[test]
    fn register_raises_user_registered() {
        let mut user = register_user();
        let events = user.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "UserRegistered");
    }

    #[test]
    fn create_raises_user_created_with_temporary_password() {
        let mut user = User::create(
            FirstName::create("Jane").unwrap(),
            LastName::create("Doe").unwrap(),
            Email::create("jane@b.com").unwrap(),
            "hash".to_string(),
            RoleId::new(),
            "Temp123!",
        );
        let events = user.take_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            DomainEvent::UserCreated(data) => {
                assert_eq!(data.temporary_password, "Temp123!");
            }
            other => panic!("unexpected event: {}", other.event_type()),
        }
    }

    #[test]
    fn verify_email_is_one_way_idempotent() {
        let mut user = register_user();
        user.take_events();

        user.verify_email();
        assert!(user.is_email_verified());
        assert_eq!(user.take_events().len(), 1);

        user.verify_email();
        assert!(user.is_email_verified());
        assert!(user.take_events().is_empty());
    }

    #[test]
    fn ban_is_one_way_idempotent() {
        let mut user = register_user();
        user.take_events();

        user.ban();
        user.ban();
        assert!(user.is_banned());
        assert_eq!(user.take_events().len(), 1);
    }

    #[test]
    fn banned_user_cannot_log_in() {
        let mut user = register_user();
        assert!(user.ensure_login_eligibility().is_ok());
        user.ban();
        assert_eq!(user.ensure_login_eligibility(), Err(UserError::Banned));
    }

    #[test]
    fn change_password_skips_identical_hash() {
        let mut user = register_user();
        user.change_password("hash".to_string());
        assert_eq!(user.password_hash(), "hash");

        user.change_password("new-hash".to_string());
        assert_eq!(user.password_hash(), "new-hash");
    }

    #[test]
    fn reset_password_consumes_token() {
        let mut user = register_user();
        user.request_password_reset("token-1", Utc::now() + Duration::hours(1));
        user.take_events();

        user.reset_password("token-1", "new-hash".to_string()).unwrap();
        assert_eq!(user.password_hash(), "new-hash");

        // Second use of the same token fails.
        let result = user.reset_password("token-1", "other".to_string());
        assert_eq!(result, Err(UserError::InvalidResetToken));
    }

    #[test]
    fn reset_password_rejects_wrong_or_expired_token() {
        let mut user = register_user();
        user.request_password_reset("token-1", Utc::now() + Duration::hours(1));
        assert_eq!(
            user.reset_password("wrong", "x".to_string()),
            Err(UserError::InvalidResetToken)
        );

        user.request_password_reset("token-2", Utc::now() - Duration::minutes(1));
        assert_eq!(
            user.reset_password("token-2", "x".to_string()),
            Err(UserError::InvalidResetToken)
        );
    }

    #[test]
    fn enable_two_factor_rules() {
        let mut user = register_user();
        assert_eq!(
            user.enable_two_factor("SECRET".to_string(), false),
            Err(UserError::InvalidTwoFactorCode)
        );

        user.enable_two_factor("SECRET".to_string(), true).unwrap();
        assert!(user.two_factor_enabled());

        assert_eq!(
            user.enable_two_factor("OTHER".to_string(), true),
            Err(UserError::TwoFactorAlreadyEnabled)
        );
    }

    #[test]
    fn two_factor_login_requires_enabled_account() {
        let mut user = register_user();
        assert_eq!(
            user.verify_two_factor_login(true),
            Err(UserError::TwoFactorNotEnabled)
        );

        user.enable_two_factor("SECRET".to_string(), true).unwrap();
        assert!(user.verify_two_factor_login(true).is_ok());
        assert_eq!(
            user.verify_two_factor_login(false),
            Err(UserError::InvalidTwoFactorCode)
        );
    }

    #[test]
    fn rehydrate_restores_state_without_events() {
        let user = User::rehydrate(
            UserId::new(),
            FirstName::create("John").unwrap(),
            LastName::create("Doe").unwrap(),
            Email::create("a@b.com").unwrap(),
            "hash".to_string(),
            RoleId::new(),
            true,
            false,
            None,
            None,
            Some("SECRET".to_string()),
            true,
        );
        assert!(user.is_email_verified());
        assert!(user.two_factor_enabled());
        assert!(!user.has_pending_events());
    }

    #[test]
    fn refresh_token_rotation() {
        let mut user = register_user();
        user.set_refresh_token(RefreshToken::new("rt-1", Utc::now() + Duration::days(7)));
        assert_eq!(user.refresh_token().unwrap().token(), "rt-1");

        user.revoke_refresh_token();
        assert!(user.refresh_token().is_none());
    }
}
