use std::time::Duration;

// Values
pub const DEFAULT_TOPIC: &str = "person";
pub const DEFAULT_TABLE: &str = "person";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
pub const DEFAULT_CONSUMER_GROUP: &str = "person-service";

pub const PUBLISH_FAILED_MESSAGE: &str = "fail to publish Person in topic";

/// How long a Kafka producer waits for the broker to accept a record
pub const PRODUCE_TIMEOUT: Duration = Duration::from_secs(5);

pub const READ_FAILED_MESSAGE: &str = "fail to read Person from store";

/// Pause before a Kafka listener saves the same person again after a store failure
pub const STORE_RETRY_DELAY: Duration = Duration::from_secs(1);
/// Pause after the Kafka consumer fails to receive
pub const RECEIVE_RETRY_DELAY: Duration = Duration::from_secs(1);
