use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::person::Person;

use self::{
    memory::MemoryStore,
    postgres::{PgStore, PostgresOptions},
};

pub mod memory;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod postgres;
pub mod row;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Cannot map row to person: {0}")]
    Mapping(String),

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value persistence for person records, keyed by email
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Prepares the backend, e.g. creates the table
    async fn init(&self) -> StoreResult<()>;

    /// Upsert, overwrites any record stored under the same email
    async fn save(&self, person: Person) -> StoreResult<()>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Person>>;

    /// Returns whether a record was removed
    async fn delete(&self, email: &str) -> StoreResult<bool>;
}

#[derive(Debug, Clone)]
pub enum StorageEngine {
    Memory,
    Postgres(PostgresOptions),
}

impl StorageEngine {
    pub async fn get_engine(self) -> StoreResult<Arc<dyn PersonStore>> {
        let store: Arc<dyn PersonStore> = match self {
            StorageEngine::Memory => Arc::new(MemoryStore::new()),
            StorageEngine::Postgres(options) => Arc::new(PgStore::connect(options).await?),
        };

        store.init().await?;

        Ok(store)
    }
}
