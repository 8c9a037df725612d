use crate::application_port::FriendshipNotifier;
use crate::domain_model::FriendshipEvent;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub struct ChannelNotifier {
    sender: UnboundedSender<FriendshipEvent>,
}

impl ChannelNotifier {
    pub fn new(sender: UnboundedSender<FriendshipEvent>) -> Self {
        Self { sender }
    }

    pub fn channel() -> (Self, UnboundedReceiver<FriendshipEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl FriendshipNotifier for ChannelNotifier {
    fn notify(&self, event: FriendshipEvent) {
        if let Err(e) = self.sender.send(event) {
            tracing::warn!(kind = ?e.0.kind, "friendship event dropped (relay stopped?)");
        }
    }
}
