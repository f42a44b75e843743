use async_trait::async_trait;
use num_format::{Locale, ToFormattedString};
use rdkafka::{
    consumer::{CommitMode, Consumer, StreamConsumer},
    producer::{FutureProducer, FutureRecord},
    ClientConfig, Message as _,
};

use crate::{
    consts::consts::{
        DEFAULT_CONSUMER_GROUP, PRODUCE_TIMEOUT, RECEIVE_RETRY_DELAY, STORE_RETRY_DELAY,
    },
    model::person::Person,
};

use super::{listener::PersonListener, message::decode_person, PersonPublisher, PublishError};

#[derive(Debug, Clone)]
pub struct KafkaOptions {
    /// Comma separated list of brokers
    pub brokers: String,
    pub group_id: String,
}

impl KafkaOptions {
    pub fn new(brokers: String) -> Self {
        Self {
            brokers,
            group_id: DEFAULT_CONSUMER_GROUP.to_string(),
        }
    }

    pub fn set_group_id(mut self, group_id: String) -> Self {
        self.group_id = group_id;
        self
    }
}

pub struct KafkaProducer {
    inner: FutureProducer,
    topic: String,
}

impl KafkaProducer {
    pub fn new(options: &KafkaOptions, topic: &str) -> Result<Self, rdkafka::error::KafkaError> {
        log::info!(
            "Creating Kafka producer [Brokers: {}, Topic: {}]",
            options.brokers,
            topic
        );

        let inner: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &options.brokers)
            .set("message.timeout.ms", PRODUCE_TIMEOUT.as_millis().to_string())
            .create()?;

        Ok(Self {
            inner,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl PersonPublisher for KafkaProducer {
    async fn publish(&self, person: &Person) -> Result<(), PublishError> {
        let payload =
            serde_json::to_vec(person).map_err(|e| PublishError::Encode(e.to_string()))?;

        // Keyed by email so every version of a person lands on the same partition
        let record = FutureRecord::to(&self.topic)
            .key(person.email.as_str())
            .payload(&payload);

        match self.inner.send(record, PRODUCE_TIMEOUT).await {
            Ok((partition, offset)) => {
                log::debug!(
                    "Published [Topic: {}, Partition: {}, Offset: {}]",
                    self.topic,
                    partition,
                    offset
                );
                Ok(())
            }
            Err((e, _)) => {
                log::error!("Failed to publish to topic {}: {}", self.topic, e);
                Err(PublishError::Broker(e.to_string()))
            }
        }
    }
}

pub struct KafkaSubscription {
    inner: StreamConsumer,
    topic: String,
}

impl KafkaSubscription {
    pub fn new(options: &KafkaOptions, topic: &str) -> Result<Self, rdkafka::error::KafkaError> {
        log::info!(
            "Creating Kafka consumer [Brokers: {}, Group: {}, Topic: {}]",
            options.brokers,
            options.group_id,
            topic
        );

        let inner: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &options.brokers)
            .set("group.id", &options.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("enable.partition.eof", "false")
            .create()?;

        inner.subscribe(&[topic])?;

        Ok(Self {
            inner,
            topic: topic.to_string(),
        })
    }

    /// Feeds the listener until `shutdown` fires
    ///
    /// A message is committed once handled. Undecodable payloads are logged and
    /// committed. Store failures are retried on the same message, so later offsets
    /// are never committed past it. If `shutdown` fires during the retries the
    /// offset stays uncommitted and the message is redelivered on the next start.
    pub async fn run(self, listener: PersonListener, mut shutdown: oneshot::Receiver<()>) -> usize {
        let mut processed: usize = 0;

        log::info!("Kafka listener started [Topic: {}]", self.topic);

        loop {
            let received = tokio::select! {
                _ = &mut shutdown => break,
                received = self.inner.recv() => received,
            };

            let message = match received {
                Ok(message) => message,
                Err(e) => {
                    log::error!("Error receiving from topic {}: {}", self.topic, e);

                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(RECEIVE_RETRY_DELAY) => continue,
                    }
                }
            };

            match message.payload().map(decode_person) {
                None => log::warn!("Message without payload [Offset: {}]", message.offset()),
                Some(Err(e)) => log::error!(
                    "Dropping undecodable message [Partition: {}, Offset: {}]: {}",
                    message.partition(),
                    message.offset(),
                    e
                ),
                Some(Ok(person)) => {
                    let stored = listener
                        .handle_person_until_stored(person, STORE_RETRY_DELAY, &mut shutdown)
                        .await;

                    if !stored {
                        log::warn!(
                            "Stopped before storing [Partition: {}, Offset: {}], left uncommitted",
                            message.partition(),
                            message.offset()
                        );
                        break;
                    }

                    processed += 1;
                }
            }

            if let Err(e) = self.inner.commit_message(&message, CommitMode::Async) {
                log::error!("Failed to commit offset: {}", e);
            }
        }

        log::info!(
            "Kafka listener stopped [Processed: {}]",
            processed.to_formatted_string(&Locale::en)
        );

        processed
    }
}
