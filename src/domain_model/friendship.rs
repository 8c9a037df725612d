use crate::application_port::FriendshipError;
use crate::domain_model::EntityRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct FriendshipId(pub u64);

impl fmt::Display for FriendshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of states a friendship row can be in. Stored as a TINYINT.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Denied,
    Blocked,
}

impl FriendshipStatus {
    pub const ALL: [FriendshipStatus; 4] = [
        FriendshipStatus::Pending,
        FriendshipStatus::Accepted,
        FriendshipStatus::Denied,
        FriendshipStatus::Blocked,
    ];

    pub fn code(self) -> i8 {
        match self {
            FriendshipStatus::Pending => 0,
            FriendshipStatus::Accepted => 1,
            FriendshipStatus::Denied => 2,
            FriendshipStatus::Blocked => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
            FriendshipStatus::Denied => "denied",
            FriendshipStatus::Blocked => "blocked",
        }
    }
}

impl TryFrom<i8> for FriendshipStatus {
    type Error = FriendshipError;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        FriendshipStatus::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or_else(|| FriendshipError::InvalidStatus(code.to_string()))
    }
}

impl FromStr for FriendshipStatus {
    type Err = FriendshipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i8>() {
            return FriendshipStatus::try_from(code);
        }
        FriendshipStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FriendshipError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed friendship edge. Sender and recipient are fixed at creation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FriendshipRecord {
    pub id: FriendshipId,
    pub sender: EntityRef,
    pub recipient: EntityRef,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FriendshipRecord {
    pub fn involves(&self, entity: &EntityRef) -> bool {
        &self.sender == entity || &self.recipient == entity
    }

    /// The side that is not `me`. Rows with `me` on both sides yield the
    /// recipient.
    pub fn other_side(&self, me: &EntityRef) -> &EntityRef {
        if &self.sender == me {
            &self.recipient
        } else {
            &self.sender
        }
    }
}
