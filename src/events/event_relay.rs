use crate::domain_model::FriendshipEvent;
use crate::events::EventPublisher;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

pub struct EventRelay {
    receiver: UnboundedReceiver<FriendshipEvent>,
    event_publisher: Arc<dyn EventPublisher>,
    topic: String,
    cancellation_token: CancellationToken,
}

impl EventRelay {
    pub fn new(
        receiver: UnboundedReceiver<FriendshipEvent>,
        event_publisher: Arc<dyn EventPublisher>,
        topic: &str,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            receiver,
            event_publisher,
            topic: topic.to_owned(),
            cancellation_token,
        }
    }

    async fn deliver(&self, event: &FriendshipEvent) {
        if let Err(e) = self.event_publisher.publish(&self.topic, event).await {
            tracing::error!(kind = event.kind.as_str(), "friendship event not published: {e:#}");
        }
    }

    /// Runs until cancelled or until every sender is gone. Events already
    /// queued at cancellation are still delivered.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("event relay shutting down...");
                    while let Ok(event) = self.receiver.try_recv() {
                        self.deliver(&event).await;
                    }
                    break;
                }
                next = self.receiver.recv() => {
                    match next {
                        Some(event) => self.deliver(&event).await,
                        None => {
                            tracing::info!("event relay channel closed");
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
