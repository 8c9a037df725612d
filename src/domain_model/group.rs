use crate::domain_model::{EntityRef, FriendshipId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A per-side classification of a friendship. `friend` is the tagged party,
/// so the tag belongs to the view of the *other* party.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct FriendshipGroupTag {
    pub friendship_id: FriendshipId,
    pub group_id: GroupId,
    pub friend: EntityRef,
}

/// Static slug -> group id table, immutable after startup.
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: HashMap<String, GroupId>,
}

impl GroupRegistry {
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self {
            groups: groups
                .into_iter()
                .map(|(slug, id)| (slug.into(), GroupId(id)))
                .collect(),
        }
    }

    pub fn resolve(&self, slug: &str) -> Option<GroupId> {
        self.groups.get(slug).copied()
    }

    /// Resolves an optional slug; empty or unknown slugs resolve to `None`.
    pub fn resolve_opt(&self, slug: Option<&str>) -> Option<GroupId> {
        slug.filter(|s| !s.is_empty()).and_then(|s| self.resolve(s))
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

impl From<HashMap<String, u32>> for GroupRegistry {
    fn from(groups: HashMap<String, u32>) -> Self {
        GroupRegistry::new(groups)
    }
}
