use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

/// Storage of friendship edges. Every method runs inside the caller's
/// transaction; results are ordered by friendship id ascending.
#[async_trait::async_trait]
pub trait FriendshipRepo: Send + Sync {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        sender: &EntityRef,
        recipient: &EntityRef,
        status: FriendshipStatus,
    ) -> Result<FriendshipRecord, FriendshipError>;

    async fn find_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<Vec<FriendshipRecord>, FriendshipError>;

    async fn first_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<Option<FriendshipRecord>, FriendshipError>;

    async fn count_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<u64, FriendshipError>;

    async fn exists_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<bool, FriendshipError> {
        Ok(self.count_in_tx(tx, query).await? > 0)
    }

    /// Returns the number of rows changed.
    async fn update_status_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
        status: FriendshipStatus,
    ) -> Result<u64, FriendshipError>;

    /// Deletes matching rows together with their group tags.
    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<u64, FriendshipError>;
}
