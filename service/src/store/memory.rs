use async_trait::async_trait;
use crossbeam_skiplist::SkipMap;

use crate::model::person::Person;

use super::{PersonStore, StoreResult};

/// In-process store, lost on restart
#[derive(Default)]
pub struct MemoryStore {
    people: SkipMap<String, Person>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            people: SkipMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn init(&self) -> StoreResult<()> {
        Ok(())
    }

    #[tracing::instrument(skip(self, person), fields(email = %person.email))]
    async fn save(&self, person: Person) -> StoreResult<()> {
        self.people.insert(person.email.clone(), person);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Person>> {
        Ok(self.people.get(email).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, email: &str) -> StoreResult<bool> {
        Ok(self.people.remove(email).is_some())
    }
}
