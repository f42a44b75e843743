use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::{
    model::person::Person,
    store::{PersonStore, StoreResult},
};

/// Reads do not observe a create until the listener has persisted it, callers
/// that need the write poll for it instead of sleeping a fixed amount
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            interval: Duration::from_millis(25),
        }
    }
}

/// Polls until a record for `email` matches `predicate` or the timeout elapses
///
/// Returns the last record seen, `None` if nothing was ever stored.
pub async fn wait_for<F>(
    store: &dyn PersonStore,
    email: &str,
    options: PollOptions,
    predicate: F,
) -> StoreResult<Option<Person>>
where
    F: Fn(&Person) -> bool,
{
    let deadline = Instant::now() + options.timeout;

    loop {
        let found = store.find_by_email(email).await?;

        if found.as_ref().map(&predicate).unwrap_or(false) || Instant::now() >= deadline {
            return Ok(found);
        }

        sleep(options.interval).await;
    }
}

/// Polls until any record for `email` exists
pub async fn wait_for_person(
    store: &dyn PersonStore,
    email: &str,
    options: PollOptions,
) -> StoreResult<Option<Person>> {
    wait_for(store, email, options, |_| true).await
}
