use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::model::person::Person;

use super::{memory::MemoryStore, PersonStore, StoreError, StoreResult};

/// Memory store whose first `failures` calls fail, as a backend that is down would
pub struct FlakyStore {
    inner: MemoryStore,
    failures_left: AtomicUsize,
    attempts: AtomicUsize,
}

impl FlakyStore {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            failures_left: AtomicUsize::new(failures),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Never recovers
    pub fn new_failing() -> Self {
        Self::new(usize::MAX)
    }

    /// Calls made so far, failed ones included
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn check(&self) -> StoreResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();

        if failed {
            return Err(StoreError::Backend("connection refused".to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl PersonStore for FlakyStore {
    async fn init(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn save(&self, person: Person) -> StoreResult<()> {
        self.check()?;
        self.inner.save(person).await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Person>> {
        self.check()?;
        self.inner.find_by_email(email).await
    }

    async fn delete(&self, email: &str) -> StoreResult<bool> {
        self.check()?;
        self.inner.delete(email).await
    }
}
