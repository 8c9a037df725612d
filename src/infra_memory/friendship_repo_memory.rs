use super::store::MemoryStore;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;

pub struct MemoryFriendshipRepo {
    store: MemoryStore,
}

impl MemoryFriendshipRepo {
    pub fn new(store: MemoryStore) -> Self {
        MemoryFriendshipRepo { store }
    }
}

#[async_trait::async_trait]
impl FriendshipRepo for MemoryFriendshipRepo {
    async fn insert_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        sender: &EntityRef,
        recipient: &EntityRef,
        status: FriendshipStatus,
    ) -> Result<FriendshipRecord, FriendshipError> {
        let mut tables = self.store.lock()?;
        tables.last_friendship_id += 1;

        let now = Utc::now();
        let record = FriendshipRecord {
            id: FriendshipId(tables.last_friendship_id),
            sender: sender.clone(),
            recipient: recipient.clone(),
            status,
            created_at: now,
            updated_at: now,
        };
        tables.friendships.push(record.clone());

        Ok(record)
    }

    async fn find_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<Vec<FriendshipRecord>, FriendshipError> {
        let tables = self.store.lock()?;
        Ok(tables
            .friendships
            .iter()
            .filter(|r| query.matches(r, &tables.tags))
            .cloned()
            .collect())
    }

    async fn first_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<Option<FriendshipRecord>, FriendshipError> {
        let tables = self.store.lock()?;
        Ok(tables
            .friendships
            .iter()
            .find(|r| query.matches(r, &tables.tags))
            .cloned())
    }

    async fn count_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<u64, FriendshipError> {
        let tables = self.store.lock()?;
        Ok(tables
            .friendships
            .iter()
            .filter(|r| query.matches(r, &tables.tags))
            .count() as u64)
    }

    async fn update_status_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
        status: FriendshipStatus,
    ) -> Result<u64, FriendshipError> {
        let mut guard = self.store.lock()?;
        let tables = &mut *guard;
        let now = Utc::now();

        let mut updated = 0;
        for record in tables.friendships.iter_mut() {
            if query.matches(record, &tables.tags) {
                record.status = status;
                record.updated_at = now;
                updated += 1;
            }
        }

        Ok(updated)
    }

    async fn delete_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<u64, FriendshipError> {
        let mut guard = self.store.lock()?;
        let tables = &mut *guard;

        let doomed: Vec<FriendshipId> = tables
            .friendships
            .iter()
            .filter(|r| query.matches(r, &tables.tags))
            .map(|r| r.id)
            .collect();
        if doomed.is_empty() {
            return Ok(0);
        }

        tables.friendships.retain(|r| !doomed.contains(&r.id));
        // cascade
        tables.tags.retain(|t| !doomed.contains(&t.friendship_id));

        Ok(doomed.len() as u64)
    }
}
