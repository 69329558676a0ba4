//! Payment gateway contract and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::value_objects::Money;
use uuid::Uuid;

/// Charges cards through an external processor. Errors carry the gateway's
/// failure reason; callers record it on the payment rather than propagating.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges the amount against a tokenized payment method and returns
    /// the gateway transaction id.
    async fn charge(&self, amount: Money, payment_token: &str) -> Result<String, String>;
}

#[derive(Debug, Default)]
struct MockGatewayState {
    charges: Vec<(Money, String)>,
    fail_on_charge: bool,
}

/// In-memory gateway that approves everything unless told to fail.
#[derive(Debug, Clone, Default)]
pub struct MockPaymentGateway {
    state: Arc<RwLock<MockGatewayState>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to decline subsequent charges.
    pub fn set_fail_on_charge(&self, fail: bool) {
        self.state.write().unwrap().fail_on_charge = fail;
    }

    pub fn charge_count(&self) -> usize {
        self.state.read().unwrap().charges.len()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn charge(&self, amount: Money, payment_token: &str) -> Result<String, String> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_charge {
            return Err("Card declined".to_string());
        }

        state.charges.push((amount, payment_token.to_string()));
        Ok(format!("txn_{}", Uuid::new_v4()))
    }
}
