use std::collections::HashMap;

use async_trait::async_trait;
use flume::{Receiver, Sender, TrySendError};

use crate::model::person::Person;

use super::{message::Message, Destinations, PersonPublisher, PublishError};

/// Binds destinations to bounded in-process channels, one channel per topic
///
/// While the binder is alive it keeps every topic open, so messages published
/// to a topic nobody listens on queue up until the channel is full.
pub struct ChannelBinder {
    topics: HashMap<String, (Sender<Message>, Receiver<Message>)>,
}

impl ChannelBinder {
    pub fn new(destinations: &Destinations, capacity: usize) -> Self {
        let mut topics = HashMap::new();

        for topic in [&destinations.output, &destinations.input] {
            topics
                .entry(topic.clone())
                .or_insert_with(|| flume::bounded::<Message>(capacity));
        }

        log::info!(
            "Bound channel destinations [Output: {}, Input: {}, Capacity: {}]",
            destinations.output,
            destinations.input,
            capacity
        );

        Self { topics }
    }

    pub fn producer(&self, destination: &str) -> Result<ChannelProducer, PublishError> {
        let (sender, _) = self
            .topics
            .get(destination)
            .ok_or_else(|| PublishError::UnknownDestination(destination.to_string()))?;

        Ok(ChannelProducer {
            destination: destination.to_string(),
            sender: sender.clone(),
        })
    }

    pub fn subscribe(&self, destination: &str) -> Option<Receiver<Message>> {
        self.topics
            .get(destination)
            .map(|(_, receiver)| receiver.clone())
    }
}

#[derive(Clone)]
pub struct ChannelProducer {
    destination: String,
    sender: Sender<Message>,
}

#[async_trait]
impl PersonPublisher for ChannelProducer {
    async fn publish(&self, person: &Person) -> Result<(), PublishError> {
        let message = Message::from_person(&self.destination, person)
            .map_err(|e| PublishError::Encode(e.to_string()))?;

        let message_id = message.id.clone();

        match self.sender.try_send(message) {
            Ok(()) => {
                log::debug!(
                    "Published [Message: {}, Destination: {}]",
                    message_id,
                    self.destination
                );
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(PublishError::Full(self.destination.clone())),
            Err(TrySendError::Disconnected(_)) => {
                Err(PublishError::Closed(self.destination.clone()))
            }
        }
    }
}
