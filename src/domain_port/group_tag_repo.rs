use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

#[async_trait::async_trait]
pub trait GroupTagRepo: Send + Sync {
    /// Inserts the tag unless an identical one exists. Returns `true` when a
    /// new row was written.
    async fn first_or_create_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        tag: &FriendshipGroupTag,
    ) -> Result<bool, FriendshipError>;

    /// Deletes the tags on `friend` for one friendship, limited to
    /// `group_id` when given. Returns the number of rows deleted.
    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        friendship_id: FriendshipId,
        friend: &EntityRef,
        group_id: Option<GroupId>,
    ) -> Result<u64, FriendshipError>;
}
