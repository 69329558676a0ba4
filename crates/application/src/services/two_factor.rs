//! Two-factor authentication contract and in-memory implementation.

use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Uniform;

/// Generates per-user secrets and validates time-based codes.
#[async_trait]
pub trait TwoFactorService: Send + Sync {
    async fn generate_secret(&self) -> String;

    async fn validate_code(&self, secret: &str, code: &str) -> bool;
}

/// In-memory two-factor service: any secret, fixed valid code.
#[derive(Debug, Clone, Default)]
pub struct MockTwoFactorService;

impl MockTwoFactorService {
    /// The only code this implementation accepts.
    pub const VALID_CODE: &'static str = "123456";

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TwoFactorService for MockTwoFactorService {
    async fn generate_secret(&self) -> String {
        let mut rng = rand::thread_rng();
        let range = Uniform::new_inclusive(b'A', b'Z');
        (0..10).map(|_| rng.sample(range) as char).collect()
    }

    async fn validate_code(&self, _secret: &str, code: &str) -> bool {
        code == Self::VALID_CODE
    }
}
