use crate::domain_model::FriendshipEvent;

/// Outbound sink for friendship events. Each adapter picks its own encoding.
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, event: &FriendshipEvent) -> anyhow::Result<()>;
}
