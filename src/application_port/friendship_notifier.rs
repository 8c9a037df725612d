use crate::domain_model::FriendshipEvent;

/// Fire-and-forget sink for transition events. Implementations must not
/// block, and nothing they do can undo the transition that produced the
/// event.
pub trait FriendshipNotifier: Send + Sync {
    fn notify(&self, event: FriendshipEvent);
}

