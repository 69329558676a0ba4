//! Health report aggregate. Immutable once generated.

use chrono::{DateTime, Utc};
use common::{LabTestId, PetId, ReportId};

use crate::aggregate::{AggregateRoot, EventBuffer};
use crate::event::DomainEvent;

/// A health report derived from completed lab results.
#[derive(Debug, Clone)]
pub struct HealthReport {
    id: ReportId,
    lab_test_id: LabTestId,
    pet_id: PetId,
    content: String,
    health_score: i32,
    generated_at: DateTime<Utc>,
    events: EventBuffer,
}

impl AggregateRoot for HealthReport {
    type Id = ReportId;

    fn id(&self) -> ReportId {
        self.id
    }

    fn take_events(&mut self) -> Vec<DomainEvent> {
        self.events.take()
    }

    fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl HealthReport {
    /// Generates a report and raises the generated event.
    pub fn generate(
        lab_test_id: LabTestId,
        pet_id: PetId,
        content: impl Into<String>,
        health_score: i32,
    ) -> Self {
        let mut report = Self {
            id: ReportId::new(),
            lab_test_id,
            pet_id,
            content: content.into(),
            health_score,
            generated_at: Utc::now(),
            events: EventBuffer::new(),
        };
        let event = DomainEvent::report_generated(report.id, pet_id, health_score);
        report.events.raise(event);
        report
    }

    /// Restores a report from persisted fields.
    pub fn rehydrate(
        id: ReportId,
        lab_test_id: LabTestId,
        pet_id: PetId,
        content: String,
        health_score: i32,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            lab_test_id,
            pet_id,
            content,
            health_score,
            generated_at,
            events: EventBuffer::new(),
        }
    }

    pub fn lab_test_id(&self) -> LabTestId {
        self.lab_test_id
    }

    pub fn pet_id(&self) -> PetId {
        self.pet_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn health_score(&self) -> i32 {
        self.health_score
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_raises_report_generated_with_score() {
        let pet_id = PetId::new();
        let mut report = HealthReport::generate(LabTestId::new(), pet_id, "All values nominal", 87);

        assert_eq!(report.health_score(), 87);

        let events = report.take_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            DomainEvent::ReportGenerated(data) => {
                assert_eq!(data.report_id, report.id());
                assert_eq!(data.pet_id, pet_id);
                assert_eq!(data.health_score, 87);
            }
            other => panic!("unexpected event: {}", other.event_type()),
        }
    }

    #[test]
    fn rehydrate_restores_report_without_events() {
        let report = HealthReport::rehydrate(
            ReportId::new(),
            LabTestId::new(),
            PetId::new(),
            "All values nominal".to_string(),
            87,
            Utc::now(),
        );

        assert_eq!(report.health_score(), 87);
        assert_eq!(report.content(), "All values nominal");
        assert!(!report.has_pending_events());
    }
}
