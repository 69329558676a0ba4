//! JWT access tokens and opaque token generation.

use chrono::{Duration, Utc};
use common::UserId;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,

    /// Full display name.
    pub name: String,

    pub email: String,

    /// Role name.
    pub role: String,

    /// Permission codes granted through the role.
    pub permissions: Vec<String>,

    /// Expiry, seconds since the epoch.
    pub exp: i64,

    /// Issued-at, seconds since the epoch.
    pub iat: i64,
}

#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("failed to sign token")]
    Sign,

    #[error("invalid or expired token")]
    Invalid,
}

/// Issues and verifies signed access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Signs a token carrying the user's identity and permissions.
    pub fn issue(
        &self,
        user_id: UserId,
        name: &str,
        email: &str,
        role: &str,
        permissions: Vec<String>,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            permissions,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(|_| TokenError::Sign)
    }

    /// Verifies a token's signature and expiry and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

/// Generates a random alphanumeric token for refresh and reset flows.
pub fn generate_opaque_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", Duration::minutes(15))
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let user_id = UserId::new();
        let token = issuer()
            .issue(
                user_id,
                "John Doe",
                "a@b.com",
                "Customer",
                vec!["Users:Read".to_string()],
            )
            .unwrap();

        let claims = issuer().verify(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "Customer");
        assert_eq!(claims.permissions, vec!["Users:Read".to_string()]);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = issuer()
            .issue(UserId::new(), "John", "a@b.com", "Customer", vec![])
            .unwrap();

        let other = TokenIssuer::new("other-secret", Duration::minutes(15));
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn opaque_tokens_are_long_and_unique() {
        let a = generate_opaque_token();
        let b = generate_opaque_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
