use std::{sync::Arc, time::Duration};

use flume::Receiver;
use num_format::{Locale, ToFormattedString};
use thiserror::Error;

use crate::{
    model::person::Person,
    store::{PersonStore, StoreError},
};

use super::message::{decode_person, Message, MessageError};

#[derive(Error, Debug)]
pub enum ListenerError {
    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Consumer side of the async hop, persists every person it receives
///
/// No deduplication. On the in-process binder a message that fails is logged
/// and dropped.
#[derive(Clone)]
pub struct PersonListener {
    store: Arc<dyn PersonStore>,
}

impl PersonListener {
    pub fn new(store: Arc<dyn PersonStore>) -> Self {
        Self { store }
    }

    pub async fn handle_person(&self, person: Person) -> Result<(), ListenerError> {
        self.store.save(person).await?;
        Ok(())
    }

    pub async fn handle_payload(&self, payload: &[u8]) -> Result<(), ListenerError> {
        let person = decode_person(payload)?;
        self.handle_person(person).await
    }

    /// Saves `person`, retrying store failures every `delay` until one succeeds.
    /// Returns false if `shutdown` fired first, the person is then not stored
    pub async fn handle_person_until_stored(
        &self,
        person: Person,
        delay: Duration,
        shutdown: &mut oneshot::Receiver<()>,
    ) -> bool {
        loop {
            match self.handle_person(person.clone()).await {
                Ok(()) => return true,
                Err(e) => log::warn!(
                    "Failed to store person, retrying in {:?} [Email: {}]: {}",
                    delay,
                    person.email,
                    e
                ),
            }

            tokio::select! {
                _ = &mut *shutdown => return false,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Consumes until `shutdown` fires (or its sender is dropped) or the
    /// channel closes, returns how many messages were persisted
    ///
    /// Messages already queued when `shutdown` fires are persisted before
    /// returning, the producer acknowledged them.
    pub async fn run(
        self,
        receiver: Receiver<Message>,
        mut shutdown: oneshot::Receiver<()>,
    ) -> usize {
        let mut processed: usize = 0;

        log::info!("Listener started");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    while let Ok(message) = receiver.try_recv() {
                        if self.process(&message).await {
                            processed += 1;
                        }
                    }
                    break;
                }
                message = receiver.recv_async() => {
                    let Ok(message) = message else {
                        log::info!("Input destination closed");
                        break;
                    };

                    if self.process(&message).await {
                        processed += 1;
                    }
                }
            }
        }

        log::info!(
            "Listener stopped [Processed: {}]",
            processed.to_formatted_string(&Locale::en)
        );

        processed
    }

    async fn process(&self, message: &Message) -> bool {
        match self.handle_payload(&message.payload).await {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "Failed to handle message [Message: {}, Destination: {}]: {}",
                    message.id,
                    message.destination,
                    e
                );
                false
            }
        }
    }
}
