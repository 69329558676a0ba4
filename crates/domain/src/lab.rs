//! Lab test aggregate.

use chrono::{DateTime, Utc};
use common::{LabTestId, OrderId, PetId};
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, EventBuffer};
use crate::event::DomainEvent;

/// Lab test lifecycle states. Failed is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabTestStatus {
    Registered,
    KitSent,
    SampleReceived,
    Processing,
    AnalysisCompleted,
    Failed,
}

/// A lab test tied to one order and one pet.
///
/// `record_results` is deliberately lenient: results can arrive out-of-band
/// from any non-Failed state and jump straight to AnalysisCompleted.
#[derive(Debug, Clone)]
pub struct LabTest {
    id: LabTestId,
    order_id: OrderId,
    pet_id: PetId,
    status: LabTestStatus,
    registered_at: DateTime<Utc>,
    received_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    raw_data_json: Option<String>,
    events: EventBuffer,
}

impl AggregateRoot for LabTest {
    type Id = LabTestId;

    fn id(&self) -> LabTestId {
        self.id
    }

    fn take_events(&mut self) -> Vec<DomainEvent> {
        self.events.take()
    }

    fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl LabTest {
    /// Registers a new lab test for an order item's pet.
    pub fn register(order_id: OrderId, pet_id: PetId) -> Self {
        Self {
            id: LabTestId::new(),
            order_id,
            pet_id,
            status: LabTestStatus::Registered,
            registered_at: Utc::now(),
            received_at: None,
            completed_at: None,
            raw_data_json: None,
            events: EventBuffer::new(),
        }
    }

    /// Restores a lab test from persisted fields.
    #[allow(clippy::too_many_arguments)]
    pub fn rehydrate(
        id: LabTestId,
        order_id: OrderId,
        pet_id: PetId,
        status: LabTestStatus,
        registered_at: DateTime<Utc>,
        received_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
        raw_data_json: Option<String>,
    ) -> Self {
        Self {
            id,
            order_id,
            pet_id,
            status,
            registered_at,
            received_at,
            completed_at,
            raw_data_json,
            events: EventBuffer::new(),
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn pet_id(&self) -> PetId {
        self.pet_id
    }

    pub fn status(&self) -> LabTestStatus {
        self.status
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn raw_data_json(&self) -> Option<&str> {
        self.raw_data_json.as_deref()
    }

    /// Marks the sample as received at the lab.
    pub fn receive_sample(&mut self) {
        self.status = LabTestStatus::SampleReceived;
        self.received_at = Some(Utc::now());
    }

    /// Moves a received sample into processing.
    pub fn start_processing(&mut self) {
        if self.status == LabTestStatus::SampleReceived {
            self.status = LabTestStatus::Processing;
        }
    }

    /// Records analysis results. No-op once Failed; otherwise completes the
    /// test from any state and raises the results event.
    pub fn record_results(&mut self, raw_data_json: impl Into<String>) {
        if self.status == LabTestStatus::Failed {
            return;
        }
        self.status = LabTestStatus::AnalysisCompleted;
        self.raw_data_json = Some(raw_data_json.into());
        self.completed_at = Some(Utc::now());
        self.events.raise(DomainEvent::lab_test_results_recorded(
            self.id,
            self.order_id,
            self.pet_id,
        ));
    }

    /// Fails the test. Failed is absorbing.
    pub fn fail(&mut self) {
        self.status = LabTestStatus::Failed;
    }
}
