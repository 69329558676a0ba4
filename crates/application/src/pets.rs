//! Pet use cases.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{PetId, UserId};
use domain::{AggregateRoot, Pet, PetType};
use serde::{Deserialize, Serialize};
use store::UnitOfWork;
use tracing::instrument;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePetRequest {
    pub name: String,
    pub pet_type: PetType,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PetResponse {
    pub id: PetId,
    pub name: String,
    pub pet_type: PetType,
    pub breed: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
}

impl PetResponse {
    fn from_pet(pet: &Pet) -> Self {
        Self {
            id: pet.id(),
            name: pet.name().to_string(),
            pet_type: pet.pet_type(),
            breed: pet.breed().map(String::from),
            date_of_birth: pet.date_of_birth(),
        }
    }
}

/// Pet registration and listing.
#[derive(Clone)]
pub struct PetService {
    uow: Arc<UnitOfWork>,
}

impl PetService {
    pub fn new(uow: Arc<UnitOfWork>) -> Self {
        Self { uow }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_pet(
        &self,
        owner_id: UserId,
        request: CreatePetRequest,
    ) -> Result<PetResponse, AppError> {
        let pet = Pet::create(
            owner_id,
            &request.name,
            request.pet_type,
            request.breed,
            request.date_of_birth,
        )?;

        let response = PetResponse::from_pet(&pet);
        self.uow.store().pets.save(pet).await;
        Ok(response)
    }

    pub async fn get_my_pets(&self, owner_id: UserId) -> Vec<PetResponse> {
        let pets = self.uow.store().pets_for_owner(owner_id).await;
        pets.iter().map(PetResponse::from_pet).collect()
    }
}
