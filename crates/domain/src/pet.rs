//! Pet aggregate.

use chrono::{DateTime, Utc};
use common::{PetId, UserId};
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, EventBuffer};
use crate::error::PetError;
use crate::event::DomainEvent;

/// Species of a registered pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PetType {
    Dog,
    Cat,
    Bird,
    Other,
}

/// A pet owned by a user.
#[derive(Debug, Clone)]
pub struct Pet {
    id: PetId,
    owner_id: UserId,
    name: String,
    pet_type: PetType,
    breed: Option<String>,
    date_of_birth: Option<DateTime<Utc>>,
    events: EventBuffer,
}

impl AggregateRoot for Pet {
    type Id = PetId;

    fn id(&self) -> PetId {
        self.id
    }

    fn take_events(&mut self) -> Vec<DomainEvent> {
        self.events.take()
    }

    fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl Pet {
    /// Registers a pet under an owner.
    pub fn create(
        owner_id: UserId,
        name: &str,
        pet_type: PetType,
        breed: Option<String>,
        date_of_birth: Option<DateTime<Utc>>,
    ) -> Result<Self, PetError> {
        if name.trim().is_empty() {
            return Err(PetError::EmptyName);
        }
        Ok(Self {
            id: PetId::new(),
            owner_id,
            name: name.to_string(),
            pet_type,
            breed,
            date_of_birth,
            events: EventBuffer::new(),
        })
    }

    /// Restores a pet from persisted fields.
    pub fn rehydrate(
        id: PetId,
        owner_id: UserId,
        name: String,
        pet_type: PetType,
        breed: Option<String>,
        date_of_birth: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            owner_id,
            name,
            pet_type,
            breed,
            date_of_birth,
            events: EventBuffer::new(),
        }
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pet_type(&self) -> PetType {
        self.pet_type
    }

    pub fn breed(&self) -> Option<&str> {
        self.breed.as_deref()
    }

    pub fn date_of_birth(&self) -> Option<DateTime<Utc>> {
        self.date_of_birth
    }
}
