#![allow(dead_code)]

use friendships::application_impl::{NotifyPolicy, RealFriendshipService};
use friendships::domain_model::{EntityRef, FriendshipEvent, FriendshipEventKind, GroupRegistry};
use friendships::events::ChannelNotifier;
use friendships::infra_memory::{MemoryFriendshipRepo, MemoryGroupTagRepo, MemoryStore, MemoryTxManager};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

pub struct Harness {
    pub service: RealFriendshipService,
    pub store: MemoryStore,
    events: UnboundedReceiver<FriendshipEvent>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(NotifyPolicy::Always)
    }

    pub fn with_policy(policy: NotifyPolicy) -> Self {
        let store = MemoryStore::new();
        let (notifier, events) = ChannelNotifier::channel();
        let groups = GroupRegistry::new([("acquaintances", 0), ("close_friends", 1), ("family", 2)]);

        let service = RealFriendshipService::new(
            Arc::new(MemoryFriendshipRepo::new(store.clone())),
            Arc::new(MemoryGroupTagRepo::new(store.clone())),
            Arc::new(MemoryTxManager::new(store.clone())),
            Arc::new(notifier),
            groups,
            policy,
        );

        Self {
            service,
            store,
            events,
        }
    }

    /// Event kinds emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<FriendshipEventKind> {
        let mut kinds = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            kinds.push(event.kind);
        }
        kinds
    }

    pub fn row_count(&self) -> usize {
        self.store.lock().unwrap().friendships.len()
    }

    pub fn tag_count(&self) -> usize {
        self.store.lock().unwrap().tags.len()
    }
}

pub fn user(name: &str) -> EntityRef {
    EntityRef::named("user", name)
}

pub fn users(prefix: &str, n: usize) -> Vec<EntityRef> {
    (0..n).map(|i| user(&format!("{prefix}{i}"))).collect()
}
