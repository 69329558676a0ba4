//! Order use cases.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{OrderId, PetId, ProductId, UserId};
use domain::value_objects::{Currency, Money};
use domain::{AggregateRoot, KitType, Order, OrderStatus};
use serde::{Deserialize, Serialize};
use store::UnitOfWork;
use tracing::instrument;

use crate::error::AppError;
use crate::payments::{PaymentResponse, PaymentService};

/// One requested order line.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub product_name: String,
    pub unit_price_cents: i64,
    #[serde(default)]
    pub currency: Option<String>,
    pub quantity: u32,
    pub kit_type: KitType,
    #[serde(default)]
    pub pet_id: Option<PetId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
    pub kit_type: KitType,
    pub pet_id: Option<PetId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub currency: String,
    pub items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    fn from_order(order: &Order) -> Self {
        Self {
            id: order.id(),
            order_date: order.order_date(),
            status: order.status(),
            total_cents: order.total().cents(),
            currency: order.total().currency().to_string(),
            items: order
                .items()
                .iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id().as_str().to_string(),
                    product_name: item.product_name().to_string(),
                    unit_price_cents: item.unit_price().cents(),
                    quantity: item.quantity(),
                    kit_type: item.kit_type(),
                    pet_id: item.pet_id(),
                })
                .collect(),
        }
    }
}

/// Order creation, listing, and the pay shortcut.
#[derive(Clone)]
pub struct OrderService {
    uow: Arc<UnitOfWork>,
    payments: PaymentService,
}

impl OrderService {
    pub fn new(uow: Arc<UnitOfWork>, payments: PaymentService) -> Self {
        Self { uow, payments }
    }

    /// Builds an order from requested items and finalizes it.
    #[instrument(skip(self, request), fields(item_count = request.items.len()))]
    pub async fn create_order(
        &self,
        customer_id: UserId,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, AppError> {
        let mut order = Order::create(customer_id);
        for item in &request.items {
            let currency = item
                .currency
                .as_deref()
                .map(Currency::parse)
                .unwrap_or_default();
            order.add_item(
                ProductId::new(item.product_id.clone()),
                item.product_name.clone(),
                Money::new(item.unit_price_cents, currency),
                item.quantity,
                item.kit_type,
                item.pet_id,
            )?;
        }
        order.finalize()?;

        let response = OrderResponse::from_order(&order);
        self.uow.store().orders.save(order).await;
        self.uow.save_changes().await?;
        Ok(response)
    }

    pub async fn get_my_orders(&self, customer_id: UserId) -> Vec<OrderResponse> {
        let mut orders = self.uow.store().orders_for_customer(customer_id).await;
        orders.sort_by_key(|o| std::cmp::Reverse(o.order_date()));
        orders.iter().map(OrderResponse::from_order).collect()
    }

    /// Pays one of the customer's own orders.
    #[instrument(skip(self, payment_token))]
    pub async fn pay_order(
        &self,
        customer_id: UserId,
        order_id: OrderId,
        payment_token: &str,
    ) -> Result<PaymentResponse, AppError> {
        let order = self
            .uow
            .store()
            .orders
            .get(order_id)
            .await
            .ok_or(AppError::OrderNotFound)?;
        if order.customer_id() != customer_id {
            return Err(AppError::OrderNotFound);
        }

        self.payments.process_payment(order_id, payment_token).await
    }
}
