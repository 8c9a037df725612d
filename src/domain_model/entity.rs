use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct EntityId(pub uuid::Uuid);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(EntityId)
    }
}

/// Polymorphic reference to one side of a friendship: the entity key plus
/// the morph class naming its type.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: String,
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(kind: impl Into<String>, id: EntityId) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }

    /// Deterministic reference derived from a name, handy for fixtures.
    pub fn named(kind: &str, name: &str) -> Self {
        Self::new(
            kind,
            EntityId(uuid::Uuid::new_v5(
                &uuid::Uuid::NAMESPACE_OID,
                format!("{kind}:{name}").as_bytes(),
            )),
        )
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

impl std::str::FromStr for EntityRef {
    type Err = String;

    /// Parses `kind:uuid`; a bare uuid defaults to the `user` kind.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s.split_once(':').unwrap_or(("user", s));
        if kind.is_empty() {
            return Err("empty entity kind".to_string());
        }
        let id = id.parse::<EntityId>().map_err(|e| e.to_string())?;
        Ok(EntityRef::new(kind, id))
    }
}

/// Capability contract for any user-like type that can take part in
/// friendships.
pub trait Friendable {
    fn friendable_id(&self) -> EntityId;

    fn morph_class(&self) -> &str;

    fn as_friend(&self) -> EntityRef {
        EntityRef::new(self.morph_class(), self.friendable_id())
    }
}

impl Friendable for EntityRef {
    fn friendable_id(&self) -> EntityId {
        self.id
    }

    fn morph_class(&self) -> &str {
        &self.kind
    }

    fn as_friend(&self) -> EntityRef {
        self.clone()
    }
}
