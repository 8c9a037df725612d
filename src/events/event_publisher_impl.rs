use crate::domain_model::FriendshipEvent;
use crate::events::EventPublisher;
use crate::settings::Events;
use anyhow::Context;
use rdkafka::ClientConfig;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use std::time::Duration;

pub const EVENT_TYPE_HEADER: &str = "event-type";

/// Publishes JSON events keyed by the unordered pair, so both directions of
/// a friendship land on one partition in order.
pub struct KafkaPublisher {
    producer: FutureProducer,
    delivery_timeout: Duration,
}

impl KafkaPublisher {
    pub fn from_settings(events: &Events) -> anyhow::Result<Self> {
        if events.bootstrap_servers.is_empty() {
            anyhow::bail!("events.bootstrap_servers is required for the kafka backend");
        }

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &events.bootstrap_servers)
            .set("client.id", &events.client_id)
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("message.timeout.ms", events.delivery_timeout_ms.to_string())
            .create()
            .context("create kafka producer")?;

        tracing::info!(
            servers = %events.bootstrap_servers,
            client_id = %events.client_id,
            "kafka publisher ready"
        );

        Ok(Self {
            producer,
            delivery_timeout: Duration::from_millis(events.delivery_timeout_ms),
        })
    }
}

#[async_trait::async_trait]
impl EventPublisher for KafkaPublisher {
    async fn publish(&self, topic: &str, event: &FriendshipEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(event).context("encode friendship event")?;
        let key = event.partition_key();
        let headers = OwnedHeaders::new().insert(Header {
            key: EVENT_TYPE_HEADER,
            value: Some(event.kind.as_str()),
        });

        let record = FutureRecord::to(topic)
            .key(&key)
            .payload(&payload)
            .headers(headers)
            .timestamp(event.occurred_at.timestamp_millis());

        let (partition, offset) = self
            .producer
            .send(record, self.delivery_timeout)
            .await
            .map_err(|(e, _unsent)| anyhow::anyhow!("deliver {}: {e}", event.kind.as_str()))?;

        tracing::trace!(topic, partition, offset, kind = event.kind.as_str(), "event delivered");
        Ok(())
    }
}

/// Writes every event to the log instead of a broker.
#[derive(Debug, Default)]
pub struct LogPublisher;

#[async_trait::async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, topic: &str, event: &FriendshipEvent) -> anyhow::Result<()> {
        tracing::info!(
            topic,
            kind = event.kind.as_str(),
            actor = %event.actor,
            target = %event.target,
            "friendship event"
        );
        Ok(())
    }
}
