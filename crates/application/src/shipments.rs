//! Shipment use cases.

use std::sync::Arc;

use common::{OrderId, ShipmentId};
use domain::value_objects::TrackingNumber;
use domain::{AggregateRoot, Carrier, Shipment, ShipmentStatus};
use serde::{Deserialize, Serialize};
use store::UnitOfWork;
use tracing::instrument;

use crate::error::AppError;
use crate::services::ShippingService;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateShipmentRequest {
    pub order_id: OrderId,
    pub carrier: Carrier,
    pub destination_address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipmentResponse {
    pub id: ShipmentId,
    pub order_id: OrderId,
    pub carrier: Carrier,
    pub status: ShipmentStatus,
    pub tracking_number: Option<String>,
}

impl ShipmentResponse {
    fn from_shipment(shipment: &Shipment) -> Self {
        Self {
            id: shipment.id(),
            order_id: shipment.order_id(),
            carrier: shipment.carrier(),
            status: shipment.status(),
            tracking_number: shipment.tracking_number().map(|t| t.value().to_string()),
        }
    }
}

/// Creating kit shipments and tracking their progress.
#[derive(Clone)]
pub struct ShipmentService {
    uow: Arc<UnitOfWork>,
    shipping: Arc<dyn ShippingService>,
}

impl ShipmentService {
    pub fn new(uow: Arc<UnitOfWork>, shipping: Arc<dyn ShippingService>) -> Self {
        Self { uow, shipping }
    }

    /// Creates a shipment for an order and generates its label. One
    /// shipment per order.
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn create_shipment(
        &self,
        request: CreateShipmentRequest,
    ) -> Result<ShipmentResponse, AppError> {
        let store = self.uow.store();
        if store.orders.get(request.order_id).await.is_none() {
            return Err(AppError::OrderNotFound);
        }
        if store.find_shipment_by_order(request.order_id).await.is_some() {
            return Err(AppError::ShipmentAlreadyExists);
        }

        let mut shipment = Shipment::create(
            request.order_id,
            request.carrier,
            request.destination_address,
        );

        // State check first so no tracking number is minted for a shipment
        // that cannot accept one.
        shipment.ensure_label_can_be_generated()?;
        let tracking = self
            .shipping
            .generate_tracking_number(request.carrier, request.order_id)
            .await
            .map_err(AppError::Internal)?;
        shipment.generate_label(TrackingNumber::create(&tracking)?)?;

        let response = ShipmentResponse::from_shipment(&shipment);
        store.shipments.save(shipment).await;
        Ok(response)
    }

    /// Marks a labeled shipment as handed to the carrier.
    #[instrument(skip(self))]
    pub async fn mark_as_shipped(&self, shipment_id: ShipmentId) -> Result<ShipmentResponse, AppError> {
        let store = self.uow.store();
        let mut shipment = store
            .shipments
            .get(shipment_id)
            .await
            .ok_or(AppError::ShipmentNotFound)?;

        shipment.mark_as_shipped();
        let response = ShipmentResponse::from_shipment(&shipment);
        store.shipments.save(shipment).await;
        Ok(response)
    }
}
