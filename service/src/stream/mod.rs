use async_trait::async_trait;
use thiserror::Error;

use crate::{consts::consts::DEFAULT_TOPIC, model::person::Person};

pub mod channel;
#[cfg(feature = "kafka")]
pub mod kafka;
pub mod listener;
pub mod message;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Cannot encode person: {0}")]
    Encode(String),

    #[error("Destination is full: {0}")]
    Full(String),

    #[error("Destination is closed: {0}")]
    Closed(String),

    #[error("Destination is not bound: {0}")]
    UnknownDestination(String),

    #[error("Broker did not accept message: {0}")]
    Broker(String),
}

/// Sends a person to the output destination
///
/// `Ok` means the transport accepted the message for delivery, it says nothing
/// about whether the consumer has persisted it yet.
#[async_trait]
pub trait PersonPublisher: Send + Sync {
    async fn publish(&self, person: &Person) -> Result<(), PublishError>;
}

/// Topic names the producer publishes to and the listener consumes from
#[derive(Debug, Clone, PartialEq)]
pub struct Destinations {
    pub output: String,
    pub input: String,
}

impl Destinations {
    pub fn new(output: &str, input: &str) -> Self {
        Self {
            output: output.to_string(),
            input: input.to_string(),
        }
    }
}

impl Default for Destinations {
    fn default() -> Self {
        Destinations::new(DEFAULT_TOPIC, DEFAULT_TOPIC)
    }
}

#[derive(Debug, Clone)]
pub enum BrokerEngine {
    /// In-process channels, messages are lost on restart
    Channel,
    #[cfg(feature = "kafka")]
    Kafka(kafka::KafkaOptions),
}
