//! Lab test use cases.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{LabTestId, OrderId, PetId};
use domain::{AggregateRoot, LabTest, LabTestStatus};
use serde::Serialize;
use store::UnitOfWork;
use tracing::instrument;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct LabTestResponse {
    pub id: LabTestId,
    pub order_id: OrderId,
    pub pet_id: PetId,
    pub status: LabTestStatus,
    pub registered_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub raw_data_json: Option<String>,
}

impl LabTestResponse {
    fn from_test(test: &LabTest) -> Self {
        Self {
            id: test.id(),
            order_id: test.order_id(),
            pet_id: test.pet_id(),
            status: test.status(),
            registered_at: test.registered_at(),
            completed_at: test.completed_at(),
            raw_data_json: test.raw_data_json().map(String::from),
        }
    }
}

/// Recording and querying lab results.
#[derive(Clone)]
pub struct LabService {
    uow: Arc<UnitOfWork>,
}

impl LabService {
    pub fn new(uow: Arc<UnitOfWork>) -> Self {
        Self { uow }
    }

    /// Records results for the lab test tied to an order. Committing the
    /// results event generates the health report downstream.
    #[instrument(skip(self, raw_data_json))]
    pub async fn record_results(
        &self,
        order_id: OrderId,
        raw_data_json: &str,
    ) -> Result<LabTestId, AppError> {
        let store = self.uow.store();
        let mut test = store
            .find_lab_test_by_order(order_id)
            .await
            .ok_or(AppError::LabTestNotFound)?;

        test.record_results(raw_data_json);
        let test_id = test.id();
        store.lab_tests.save(test).await;
        self.uow.save_changes().await?;
        Ok(test_id)
    }

    pub async fn get_by_order(&self, order_id: OrderId) -> Result<LabTestResponse, AppError> {
        let test = self
            .uow
            .store()
            .find_lab_test_by_order(order_id)
            .await
            .ok_or(AppError::LabTestNotFound)?;
        Ok(LabTestResponse::from_test(&test))
    }
}
