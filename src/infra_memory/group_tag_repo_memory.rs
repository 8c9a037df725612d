use super::store::MemoryStore;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MemoryGroupTagRepo {
    store: MemoryStore,
}

impl MemoryGroupTagRepo {
    pub fn new(store: MemoryStore) -> Self {
        MemoryGroupTagRepo { store }
    }
}

#[async_trait::async_trait]
impl GroupTagRepo for MemoryGroupTagRepo {
    async fn first_or_create_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        tag: &FriendshipGroupTag,
    ) -> Result<bool, FriendshipError> {
        let mut tables = self.store.lock()?;
        if !tables.friendships.iter().any(|r| r.id == tag.friendship_id) {
            return Err(FriendshipError::Store(format!(
                "insert group tag: friendship {} does not exist",
                tag.friendship_id
            )));
        }
        if tables.tags.contains(tag) {
            return Ok(false);
        }
        tables.tags.push(tag.clone());
        Ok(true)
    }

    async fn delete_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        friendship_id: FriendshipId,
        friend: &EntityRef,
        group_id: Option<GroupId>,
    ) -> Result<u64, FriendshipError> {
        let mut tables = self.store.lock()?;
        let before = tables.tags.len();
        tables.tags.retain(|t| {
            let hit = t.friendship_id == friendship_id
                && &t.friend == friend
                && group_id.is_none_or(|g| t.group_id == g);
            !hit
        });
        Ok((before - tables.tags.len()) as u64)
    }
}
