use std::sync::Arc;

use thiserror::Error;

use crate::{
    model::person::{Person, PersonValidationError},
    store::{PersonStore, StoreResult},
    stream::{PersonPublisher, PublishError},
};

#[derive(Error, Debug)]
pub enum CreatePersonError {
    #[error(transparent)]
    Invalid(#[from] PersonValidationError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Entry point for the HTTP layer
///
/// Writes only ever go through the publisher, the store is reached by the
/// listener on the other side of the topic. Reads go straight to the store, so
/// a read right after a create may not see it yet.
#[derive(Clone)]
pub struct PersonService {
    publisher: Arc<dyn PersonPublisher>,
    store: Arc<dyn PersonStore>,
}

impl PersonService {
    pub fn new(publisher: Arc<dyn PersonPublisher>, store: Arc<dyn PersonStore>) -> Self {
        Self { publisher, store }
    }

    pub async fn create(&self, person: Person) -> Result<(), CreatePersonError> {
        person.validate()?;

        self.publisher.publish(&person).await?;

        log::info!("Published person [Email: {}]", person.email);

        Ok(())
    }

    pub async fn read(&self, email: &str) -> StoreResult<Option<Person>> {
        self.store.find_by_email(email).await
    }
}
