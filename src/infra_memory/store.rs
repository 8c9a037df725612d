use crate::application_port::FriendshipError;
use crate::domain_model::*;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    pub last_friendship_id: u64,
    pub friendships: Vec<FriendshipRecord>,
    pub tags: Vec<FriendshipGroupTag>,
}

/// Shared handle to both tables. Cloning shares the data.
///
/// Meant for tests and demos with a single caller: a rolled-back transaction
/// restores the whole store, discarding writes committed by others meanwhile.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<MemoryTables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, MemoryTables>, FriendshipError> {
        self.tables
            .lock()
            .map_err(|e| FriendshipError::Store(format!("memory store poisoned: {e}")))
    }

    pub(crate) fn snapshot(&self) -> anyhow::Result<MemoryTables> {
        Ok(self.lock()?.clone())
    }

    pub(crate) fn restore(&self, tables: MemoryTables) {
        match self.tables.lock() {
            Ok(mut guard) => *guard = tables,
            Err(poisoned) => *poisoned.into_inner() = tables,
        }
    }
}
