use crate::domain_model::EntityRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum FriendshipEventKind {
    #[serde(rename = "friendship.sent")]
    Sent,
    #[serde(rename = "friendship.accepted")]
    Accepted,
    #[serde(rename = "friendship.denied")]
    Denied,
    #[serde(rename = "friendship.cancelled")]
    Cancelled,
    #[serde(rename = "friendship.blocked")]
    Blocked,
    #[serde(rename = "friendship.unblocked")]
    Unblocked,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FriendshipEvent {
    #[serde(rename = "type")]
    pub kind: FriendshipEventKind,
    pub actor: EntityRef,
    pub target: EntityRef,
    pub occurred_at: DateTime<Utc>,
}

impl FriendshipEventKind {
    /// Same name the event carries in its JSON `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            FriendshipEventKind::Sent => "friendship.sent",
            FriendshipEventKind::Accepted => "friendship.accepted",
            FriendshipEventKind::Denied => "friendship.denied",
            FriendshipEventKind::Cancelled => "friendship.cancelled",
            FriendshipEventKind::Blocked => "friendship.blocked",
            FriendshipEventKind::Unblocked => "friendship.unblocked",
        }
    }
}

impl FriendshipEvent {
    pub fn new(kind: FriendshipEventKind, actor: &EntityRef, target: &EntityRef) -> Self {
        Self {
            kind,
            actor: actor.clone(),
            target: target.clone(),
            occurred_at: Utc::now(),
        }
    }

    /// Partition key: events about the same pair stay ordered.
    pub fn partition_key(&self) -> String {
        let (a, b) = if self.actor <= self.target {
            (&self.actor, &self.target)
        } else {
            (&self.target, &self.actor)
        };
        format!("{a}|{b}")
    }
}
