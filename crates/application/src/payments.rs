//! Payment use cases.

use std::sync::Arc;

use common::{OrderId, PaymentId};
use domain::{AggregateRoot, OrderError, OrderStatus, Payment, PaymentStatus};
use serde::Serialize;
use store::UnitOfWork;
use tracing::{instrument, warn};

use crate::error::AppError;
use crate::services::PaymentGateway;

#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub status: PaymentStatus,
    pub gateway_transaction_id: Option<String>,
}

/// Charges orders through the payment gateway.
#[derive(Clone)]
pub struct PaymentService {
    uow: Arc<UnitOfWork>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    pub fn new(uow: Arc<UnitOfWork>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { uow, gateway }
    }

    /// Charges the order's total. Only pending orders are chargeable;
    /// a paid order fails before the gateway is contacted.
    ///
    /// The payment record is persisted whether the gateway approves or
    /// declines; a decline is then surfaced as `Payment.Failed`. A
    /// successful charge commits the PaymentSucceeded event, which marks
    /// the order paid and drives the lab pipeline.
    #[instrument(skip(self, payment_token))]
    pub async fn process_payment(
        &self,
        order_id: OrderId,
        payment_token: &str,
    ) -> Result<PaymentResponse, AppError> {
        let store = self.uow.store();
        let order = store
            .orders
            .get(order_id)
            .await
            .ok_or(AppError::PaymentOrderNotFound)?;
        if order.status() != OrderStatus::Pending {
            return Err(OrderError::NotPending.into());
        }

        let mut payment = Payment::create(order_id, order.total());
        let outcome = self.gateway.charge(order.total(), payment_token).await;

        let failure = match outcome {
            Ok(transaction_id) => {
                payment.mark_as_completed(transaction_id);
                None
            }
            Err(reason) => {
                warn!(%order_id, reason, "payment gateway declined charge");
                payment.mark_as_failed(reason.clone());
                Some(reason)
            }
        };

        let response = PaymentResponse {
            payment_id: payment.id(),
            order_id,
            status: payment.status(),
            gateway_transaction_id: payment.gateway_transaction_id().map(String::from),
        };

        store.payments.save(payment).await;
        self.uow.save_changes().await?;

        match failure {
            Some(reason) => Err(AppError::PaymentFailed(reason)),
            None => Ok(response),
        }
    }
}
