//! Shipping carrier contract and in-memory implementation.

use async_trait::async_trait;
use common::OrderId;
use domain::Carrier;

/// Talks to a carrier for tracking numbers.
#[async_trait]
pub trait ShippingService: Send + Sync {
    async fn generate_tracking_number(
        &self,
        carrier: Carrier,
        order_id: OrderId,
    ) -> Result<String, String>;
}

/// In-memory shipping service producing deterministic tracking numbers.
#[derive(Debug, Clone, Default)]
pub struct MockShippingService;

impl MockShippingService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ShippingService for MockShippingService {
    async fn generate_tracking_number(
        &self,
        carrier: Carrier,
        order_id: OrderId,
    ) -> Result<String, String> {
        let prefix: String = order_id
            .to_string()
            .chars()
            .take(8)
            .collect::<String>()
            .to_uppercase();
        Ok(format!("TRK-{carrier}-{prefix}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracking_number_embeds_carrier_and_order() {
        let service = MockShippingService::new();
        let order_id = OrderId::new();
        let tracking = service
            .generate_tracking_number(Carrier::Ups, order_id)
            .await
            .unwrap();

        assert!(tracking.starts_with("TRK-UPS-"));
        assert_eq!(tracking.len(), "TRK-UPS-".len() + 8);
    }
}
