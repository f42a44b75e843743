use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::person::Person;

use super::{PersonPublisher, PublishError};

/// Publisher that records what it is given instead of sending it anywhere
pub struct MockPublisher {
    accept: bool,
    published: Mutex<Vec<Person>>,
}

impl MockPublisher {
    pub fn new_accepting() -> Self {
        Self {
            accept: true,
            published: Mutex::new(vec![]),
        }
    }

    /// Every publish fails, as a broker that is down would
    pub fn new_failing() -> Self {
        Self {
            accept: false,
            published: Mutex::new(vec![]),
        }
    }

    /// People that were accepted, in publish order
    pub fn published(&self) -> Vec<Person> {
        self.published
            .lock()
            .map(|published| published.clone())
            .unwrap_or_default()
    }

    pub fn publish_count(&self) -> usize {
        self.published().len()
    }
}

#[async_trait]
impl PersonPublisher for MockPublisher {
    async fn publish(&self, person: &Person) -> Result<(), PublishError> {
        if !self.accept {
            return Err(PublishError::Broker("mock publisher rejects".to_string()));
        }

        if let Ok(mut published) = self.published.lock() {
            published.push(person.clone());
        }

        Ok(())
    }
}
