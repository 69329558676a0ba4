//! Shipment aggregate.

use chrono::{DateTime, Utc};
use common::{OrderId, ShipmentId};
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, EventBuffer};
use crate::error::ShipmentError;
use crate::event::DomainEvent;
use crate::value_objects::TrackingNumber;

/// Supported carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Carrier {
    Ups,
    Fedex,
    Usps,
    Dhl,
}

impl Carrier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Carrier::Ups => "UPS",
            Carrier::Fedex => "FEDEX",
            Carrier::Usps => "USPS",
            Carrier::Dhl => "DHL",
        }
    }
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shipment lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipmentStatus {
    Created,
    LabelGenerated,
    Shipped,
    InTransit,
    Delivered,
    Failed,
}

/// A kit shipment for an order.
///
/// The tracking number comes from the shipping service; the caller fetches it
/// after the label-state check and hands it to `generate_label`.
#[derive(Debug, Clone)]
pub struct Shipment {
    id: ShipmentId,
    order_id: OrderId,
    carrier: Carrier,
    destination_address: String,
    status: ShipmentStatus,
    tracking_number: Option<TrackingNumber>,
    created_at: DateTime<Utc>,
    shipped_at: Option<DateTime<Utc>>,
    events: EventBuffer,
}

impl AggregateRoot for Shipment {
    type Id = ShipmentId;

    fn id(&self) -> ShipmentId {
        self.id
    }

    fn take_events(&mut self) -> Vec<DomainEvent> {
        self.events.take()
    }

    fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl Shipment {
    /// Creates a shipment awaiting a label.
    pub fn create(order_id: OrderId, carrier: Carrier, destination_address: impl Into<String>) -> Self {
        Self {
            id: ShipmentId::new(),
            order_id,
            carrier,
            destination_address: destination_address.into(),
            status: ShipmentStatus::Created,
            tracking_number: None,
            created_at: Utc::now(),
            shipped_at: None,
            events: EventBuffer::new(),
        }
    }

    /// Restores a shipment from persisted fields.
    #[allow(clippy::too_many_arguments)]
    pub fn rehydrate(
        id: ShipmentId,
        order_id: OrderId,
        carrier: Carrier,
        destination_address: String,
        status: ShipmentStatus,
        tracking_number: Option<TrackingNumber>,
        created_at: DateTime<Utc>,
        shipped_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            order_id,
            carrier,
            destination_address,
            status,
            tracking_number,
            created_at,
            shipped_at,
            events: EventBuffer::new(),
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn carrier(&self) -> Carrier {
        self.carrier
    }

    pub fn destination_address(&self) -> &str {
        &self.destination_address
    }

    pub fn status(&self) -> ShipmentStatus {
        self.status
    }

    pub fn tracking_number(&self) -> Option<&TrackingNumber> {
        self.tracking_number.as_ref()
    }

    /// Checks that a label may be generated in the current state.
    ///
    /// Called before the shipping service round trip so no tracking number
    /// is fetched for a shipment that cannot accept one.
    pub fn ensure_label_can_be_generated(&self) -> Result<(), ShipmentError> {
        if self.status != ShipmentStatus::Created {
            return Err(ShipmentError::InvalidState);
        }
        Ok(())
    }

    /// Attaches a carrier tracking number and moves to LabelGenerated.
    pub fn generate_label(&mut self, tracking_number: TrackingNumber) -> Result<(), ShipmentError> {
        self.ensure_label_can_be_generated()?;
        self.tracking_number = Some(tracking_number);
        self.status = ShipmentStatus::LabelGenerated;
        Ok(())
    }

    /// Marks the shipment as handed to the carrier. No-op unless the label
    /// was generated.
    pub fn mark_as_shipped(&mut self) {
        if self.status != ShipmentStatus::LabelGenerated {
            return;
        }
        self.status = ShipmentStatus::Shipped;
        self.shipped_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracking() -> TrackingNumber {
        TrackingNumber::create("TRK-UPS-ABCD1234").unwrap()
    }

    #[test]
    fn label_generated_only_from_created() {
        let mut shipment = Shipment::create(OrderId::new(), Carrier::Ups, "1 Main St");
        shipment.generate_label(tracking()).unwrap();

        assert_eq!(shipment.status(), ShipmentStatus::LabelGenerated);
        assert_eq!(
            shipment.tracking_number().unwrap().value(),
            "TRK-UPS-ABCD1234"
        );

        assert_eq!(
            shipment.generate_label(tracking()),
            Err(ShipmentError::InvalidState)
        );
    }

    #[test]
    fn mark_as_shipped_requires_label() {
        let mut shipment = Shipment::create(OrderId::new(), Carrier::Fedex, "1 Main St");

        shipment.mark_as_shipped();
        assert_eq!(shipment.status(), ShipmentStatus::Created);

        shipment.generate_label(tracking()).unwrap();
        shipment.mark_as_shipped();
        assert_eq!(shipment.status(), ShipmentStatus::Shipped);

        // Shipped is past LabelGenerated, so a second call changes nothing.
        let shipped_at = shipment.shipped_at;
        shipment.mark_as_shipped();
        assert_eq!(shipment.shipped_at, shipped_at);
    }

    #[test]
    fn rehydrated_labeled_shipment_can_ship() {
        let mut shipment = Shipment::rehydrate(
            ShipmentId::new(),
            OrderId::new(),
            Carrier::Ups,
            "1 Main St".to_string(),
            ShipmentStatus::LabelGenerated,
            Some(tracking()),
            Utc::now(),
            None,
        );
        assert!(!shipment.has_pending_events());

        shipment.mark_as_shipped();
        assert_eq!(shipment.status(), ShipmentStatus::Shipped);
        assert!(shipment.shipped_at.is_some());
    }
}
