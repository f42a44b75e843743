use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::{
    store::{PersonStore, StoreError},
    stream::{channel::ChannelBinder, listener::PersonListener, BrokerEngine, PersonPublisher},
};

use super::{options::ServiceOptions, person_service::PersonService};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Cannot start store: {0}")]
    Store(#[from] StoreError),

    #[error("Cannot start broker: {0}")]
    Broker(String),
}

/// A running service: the store, a bound producer and the listener task
pub struct Runtime {
    service: PersonService,
    store: Arc<dyn PersonStore>,
    shutdown: oneshot::Sender<()>,
    listener: JoinHandle<usize>,
    // Keeps in-process topics open while the runtime is alive
    _binder: Option<ChannelBinder>,
}

impl Runtime {
    pub async fn start(options: ServiceOptions) -> Result<Runtime, StartupError> {
        let store = options.storage_engine.clone().get_engine().await?;
        let listener = PersonListener::new(store.clone());
        let (shutdown, shutdown_receiver) = oneshot::channel::<()>();

        let (publisher, listener, binder) = match &options.broker_engine {
            BrokerEngine::Channel => {
                let binder = ChannelBinder::new(&options.destinations, options.channel_capacity);

                let producer = binder
                    .producer(&options.destinations.output)
                    .map_err(|e| StartupError::Broker(e.to_string()))?;

                let receiver = binder.subscribe(&options.destinations.input).ok_or_else(
                    || StartupError::Broker(format!("{} is not bound", options.destinations.input)),
                )?;

                let task = tokio::spawn(listener.run(receiver, shutdown_receiver));

                (Arc::new(producer) as Arc<dyn PersonPublisher>, task, Some(binder))
            }
            #[cfg(feature = "kafka")]
            BrokerEngine::Kafka(kafka_options) => {
                use crate::stream::kafka::{KafkaProducer, KafkaSubscription};

                let producer = KafkaProducer::new(kafka_options, &options.destinations.output)
                    .map_err(|e| StartupError::Broker(e.to_string()))?;

                let subscription =
                    KafkaSubscription::new(kafka_options, &options.destinations.input)
                        .map_err(|e| StartupError::Broker(e.to_string()))?;

                let task = tokio::spawn(subscription.run(listener, shutdown_receiver));

                (Arc::new(producer) as Arc<dyn PersonPublisher>, task, None)
            }
        };

        log::info!(
            "✅ Service started [Output: {}, Input: {}]",
            options.destinations.output,
            options.destinations.input
        );

        Ok(Runtime {
            service: PersonService::new(publisher, store.clone()),
            store,
            shutdown,
            listener,
            _binder: binder,
        })
    }

    pub fn service(&self) -> PersonService {
        self.service.clone()
    }

    pub fn store(&self) -> Arc<dyn PersonStore> {
        self.store.clone()
    }

    /// Stops the listener and waits for it, returns how many messages it persisted
    pub async fn shutdown(self) -> usize {
        // The listener may already be gone, e.g. its channel closed
        let _ = self.shutdown.send(());

        match self.listener.await {
            Ok(processed) => processed,
            Err(e) => {
                log::error!("Listener task failed: {}", e);
                0
            }
        }
    }
}
