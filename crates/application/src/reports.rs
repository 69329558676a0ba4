//! Health report queries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{LabTestId, PetId, ReportId};
use domain::AggregateRoot;
use serde::Serialize;
use store::UnitOfWork;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub id: ReportId,
    pub lab_test_id: LabTestId,
    pub pet_id: PetId,
    pub content: String,
    pub health_score: i32,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ReportService {
    uow: Arc<UnitOfWork>,
}

impl ReportService {
    pub fn new(uow: Arc<UnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn get_report(&self, report_id: ReportId) -> Result<ReportResponse, AppError> {
        let report = self
            .uow
            .store()
            .reports
            .get(report_id)
            .await
            .ok_or(AppError::ReportNotFound)?;

        Ok(ReportResponse {
            id: report.id(),
            lab_test_id: report.lab_test_id(),
            pet_id: report.pet_id(),
            content: report.content().to_string(),
            health_score: report.health_score(),
            generated_at: report.generated_at(),
        })
    }
}
