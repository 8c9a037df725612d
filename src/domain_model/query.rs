use crate::domain_model::{EntityRef, FriendshipGroupTag, FriendshipRecord, FriendshipStatus, GroupId};

/// Restricts rows to those the viewer filed under a group. The viewer tags
/// the friend, so the matching tag is the one whose friend is not the viewer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GroupScope {
    pub viewer: EntityRef,
    pub group_id: GroupId,
}

/// Composable predicate over friendship rows. Every set field narrows the
/// result; an empty query matches every row.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FriendshipQuery {
    pub between: Option<(EntityRef, EntityRef)>,
    pub sender: Option<EntityRef>,
    pub recipient: Option<EntityRef>,
    pub involving: Option<EntityRef>,
    pub involving_any: Option<Vec<EntityRef>>,
    pub status: Option<FriendshipStatus>,
    pub group: Option<GroupScope>,
}

impl FriendshipQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows between `a` and `b` in either direction.
    pub fn between(a: &EntityRef, b: &EntityRef) -> Self {
        Self {
            between: Some((a.clone(), b.clone())),
            ..Self::default()
        }
    }

    /// Rows where `me` is on either side.
    pub fn involving(me: &EntityRef) -> Self {
        Self {
            involving: Some(me.clone()),
            ..Self::default()
        }
    }

    /// Rows where any of `entities` is on either side.
    pub fn involving_any(entities: Vec<EntityRef>) -> Self {
        Self {
            involving_any: Some(entities),
            ..Self::default()
        }
    }

    pub fn where_sender(mut self, sender: &EntityRef) -> Self {
        self.sender = Some(sender.clone());
        self
    }

    pub fn where_recipient(mut self, recipient: &EntityRef) -> Self {
        self.recipient = Some(recipient.clone());
        self
    }

    pub fn where_status(mut self, status: FriendshipStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn where_status_opt(mut self, status: Option<FriendshipStatus>) -> Self {
        self.status = status;
        self
    }

    /// No-op when `group_id` is `None`.
    pub fn where_group(mut self, viewer: &EntityRef, group_id: Option<GroupId>) -> Self {
        self.group = group_id.map(|group_id| GroupScope {
            viewer: viewer.clone(),
            group_id,
        });
        self
    }

    /// Evaluates the predicate against one row and the tags attached to it.
    pub fn matches(&self, record: &FriendshipRecord, tags: &[FriendshipGroupTag]) -> bool {
        if let Some((a, b)) = &self.between {
            let forward = &record.sender == a && &record.recipient == b;
            let backward = &record.sender == b && &record.recipient == a;
            if !forward && !backward {
                return false;
            }
        }
        if let Some(sender) = &self.sender {
            if &record.sender != sender {
                return false;
            }
        }
        if let Some(recipient) = &self.recipient {
            if &record.recipient != recipient {
                return false;
            }
        }
        if let Some(me) = &self.involving {
            if !record.involves(me) {
                return false;
            }
        }
        if let Some(any) = &self.involving_any {
            if !any.iter().any(|e| record.involves(e)) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(scope) = &self.group {
            let tagged = tags.iter().any(|t| {
                t.friendship_id == record.id
                    && t.group_id == scope.group_id
                    && t.friend != scope.viewer
            });
            if !tagged {
                return false;
            }
        }
        true
    }
}
