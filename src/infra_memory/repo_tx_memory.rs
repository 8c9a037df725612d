use super::store::{MemoryStore, MemoryTables};
use crate::domain_port::{StorageTx, TxManager};

pub const MEMORY_BACKEND: &str = "memory";

pub struct MemoryTxManager {
    store: MemoryStore,
}

impl MemoryTxManager {
    pub fn new(store: MemoryStore) -> Self {
        MemoryTxManager { store }
    }
}

#[async_trait::async_trait]
impl TxManager for MemoryTxManager {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>> {
        let snapshot = self.store.snapshot()?;
        Ok(Box::new(MemoryTx {
            store: self.store.clone(),
            snapshot: Some(snapshot),
        }))
    }
}

/// Restores the snapshot unless committed, including when dropped.
pub struct MemoryTx {
    store: MemoryStore,
    snapshot: Option<MemoryTables>,
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for MemoryTx {
    fn backend(&self) -> &'static str {
        MEMORY_BACKEND
    }

    async fn commit(mut self: Box<Self>) -> anyhow::Result<()> {
        self.snapshot = None;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> anyhow::Result<()> {
        if let Some(snapshot) = self.snapshot.take() {
            self.store.restore(snapshot);
        }
        Ok(())
    }
}

impl Drop for MemoryTx {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            tracing::debug!("memory transaction dropped without commit, rolling back");
            self.store.restore(snapshot);
        }
    }
}
