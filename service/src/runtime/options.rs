use crate::{
    consts::consts::DEFAULT_CHANNEL_CAPACITY,
    store::StorageEngine,
    stream::{BrokerEngine, Destinations},
};

#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub storage_engine: StorageEngine,
    pub broker_engine: BrokerEngine,
    pub destinations: Destinations,
    pub channel_capacity: usize,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl ServiceOptions {
    pub fn set_storage_engine(mut self, storage_engine: StorageEngine) -> Self {
        self.storage_engine = storage_engine;
        self
    }

    pub fn set_broker_engine(mut self, broker_engine: BrokerEngine) -> Self {
        self.broker_engine = broker_engine;
        self
    }

    /// Topics the producer writes to and the listener reads from. They must
    /// name the same topic for a POST to ever reach the store.
    pub fn set_destinations(mut self, destinations: Destinations) -> Self {
        self.destinations = destinations;
        self
    }

    /// Only used by the in-process channel binder, publishes fail once this
    /// many messages are waiting on a topic
    pub fn set_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity;
        self
    }

    pub fn new_test() -> Self {
        ServiceOptions::default()
            .set_storage_engine(StorageEngine::Memory)
            .set_broker_engine(BrokerEngine::Channel)
            .set_channel_capacity(64)
    }
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            storage_engine: StorageEngine::Memory,
            broker_engine: BrokerEngine::Channel,
            destinations: Destinations::default(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
