use clap::{Parser, ValueEnum};
use person_service::{
    consts::consts::{
        DEFAULT_CHANNEL_CAPACITY, DEFAULT_CONSUMER_GROUP, DEFAULT_TABLE, DEFAULT_TOPIC,
    },
    runtime::options::ServiceOptions,
    store::{postgres::PostgresOptions, StorageEngine},
    stream::{BrokerEngine, Destinations},
};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum StorageKind {
    Memory,
    Postgres,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum BrokerKind {
    Channel,
    Kafka,
}

/// 👤 Person service, accepts people over HTTP and persists them through a message topic
#[derive(Parser, Debug)]
pub struct Cli {
    /// Port the HTTP server will run on
    #[clap(short, long, default_value = "8080")]
    pub port: u16,

    /// Address the HTTP server will run on
    #[clap(short, long, default_value = "0.0.0.0")]
    pub address: String,

    /// Logs every HTTP request
    #[clap(long)]
    pub log_http: bool,

    #[clap(long, default_value_t = 2)]
    pub http_workers: usize,

    /// Where people are persisted
    #[clap(long, value_enum, default_value_t = StorageKind::Memory)]
    pub storage: StorageKind,

    /// Postgres connection string, used with `--storage postgres`
    #[clap(long, default_value = "host=localhost user=postgres")]
    pub postgres: String,

    /// Table people are stored in
    #[clap(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Transport between the HTTP handler and the listener
    #[clap(long, value_enum, default_value_t = BrokerKind::Channel)]
    pub broker: BrokerKind,

    /// Kafka bootstrap servers, used with `--broker kafka`
    #[clap(long, default_value = "localhost:9092")]
    pub brokers: String,

    /// Kafka consumer group of the listener
    #[clap(long, default_value = DEFAULT_CONSUMER_GROUP)]
    pub group_id: String,

    /// Topic created people are published to
    #[clap(long, default_value = DEFAULT_TOPIC)]
    pub output_topic: String,

    /// Topic the listener persists people from
    #[clap(long, default_value = DEFAULT_TOPIC)]
    pub input_topic: String,

    /// Messages that may wait on an in-process topic before publishing fails
    #[clap(long, default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,
}

impl Cli {
    pub fn service_options(&self) -> Result<ServiceOptions, String> {
        let storage_engine = match self.storage {
            StorageKind::Memory => StorageEngine::Memory,
            StorageKind::Postgres => StorageEngine::Postgres(
                PostgresOptions::new(self.postgres.clone()).set_table(self.table.clone()),
            ),
        };

        Ok(ServiceOptions::default()
            .set_storage_engine(storage_engine)
            .set_broker_engine(self.broker_engine()?)
            .set_destinations(Destinations::new(&self.output_topic, &self.input_topic))
            .set_channel_capacity(self.channel_capacity))
    }

    #[cfg(feature = "kafka")]
    fn broker_engine(&self) -> Result<BrokerEngine, String> {
        use person_service::stream::kafka::KafkaOptions;

        Ok(match self.broker {
            BrokerKind::Channel => BrokerEngine::Channel,
            BrokerKind::Kafka => BrokerEngine::Kafka(
                KafkaOptions::new(self.brokers.clone()).set_group_id(self.group_id.clone()),
            ),
        })
    }

    #[cfg(not(feature = "kafka"))]
    fn broker_engine(&self) -> Result<BrokerEngine, String> {
        match self.broker {
            BrokerKind::Channel => Ok(BrokerEngine::Channel),
            BrokerKind::Kafka => Err(format!(
                "cannot use kafka at {}, built without the `kafka` feature",
                self.brokers
            )),
        }
    }
}
