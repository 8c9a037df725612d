use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum FriendshipError {
    #[error("invalid friendship status: {0}")]
    InvalidStatus(String),
    #[error("store error: {0}")]
    Store(String),
}

/// The friendship capability of a user-like entity. `actor` is always the
/// entity the operation is performed as.
///
/// Policy refusals and no-op transitions are reported through the return
/// value (`None`, `false`, `0`), never as errors.
#[async_trait::async_trait]
pub trait FriendshipService: Send + Sync {
    // region transitions

    /// Sends a pending request. `None` when [`Self::can_befriend`] refuses.
    async fn befriend(
        &self,
        actor: &EntityRef,
        target: &EntityRef,
    ) -> Result<Option<FriendshipRecord>, FriendshipError>;

    /// Deletes every row between the two, whatever its status.
    async fn unfriend(&self, actor: &EntityRef, target: &EntityRef)
    -> Result<bool, FriendshipError>;

    async fn accept_friend_request(
        &self,
        actor: &EntityRef,
        sender: &EntityRef,
    ) -> Result<u64, FriendshipError>;

    async fn deny_friend_request(
        &self,
        actor: &EntityRef,
        sender: &EntityRef,
    ) -> Result<u64, FriendshipError>;

    async fn block_friend(
        &self,
        actor: &EntityRef,
        target: &EntityRef,
    ) -> Result<FriendshipRecord, FriendshipError>;

    async fn unblock_friend(
        &self,
        actor: &EntityRef,
        target: &EntityRef,
    ) -> Result<u64, FriendshipError>;

    /// Files `friend` under `group_slug` in the actor's view. `true` only
    /// when a new tag was written.
    async fn group_friend(
        &self,
        actor: &EntityRef,
        friend: &EntityRef,
        group_slug: &str,
    ) -> Result<bool, FriendshipError>;

    /// Removes `friend` from one group, or from every group when the slug is
    /// absent or unknown.
    async fn ungroup_friend(
        &self,
        actor: &EntityRef,
        friend: &EntityRef,
        group_slug: Option<&str>,
    ) -> Result<u64, FriendshipError>;

    // endregion

    // region pair queries

    async fn is_friend_with(
        &self,
        actor: &EntityRef,
        other: &EntityRef,
    ) -> Result<bool, FriendshipError>;

    async fn has_friend_request_from(
        &self,
        actor: &EntityRef,
        sender: &EntityRef,
    ) -> Result<bool, FriendshipError>;

    async fn has_sent_friend_request_to(
        &self,
        actor: &EntityRef,
        recipient: &EntityRef,
    ) -> Result<bool, FriendshipError>;

    async fn has_blocked(&self, actor: &EntityRef, other: &EntityRef)
    -> Result<bool, FriendshipError>;

    async fn is_blocked_by(
        &self,
        actor: &EntityRef,
        other: &EntityRef,
    ) -> Result<bool, FriendshipError> {
        self.has_blocked(other, actor).await
    }

    /// Whether a new request may be sent. Unblocks the target first when the
    /// actor had blocked it.
    async fn can_befriend(
        &self,
        actor: &EntityRef,
        target: &EntityRef,
    ) -> Result<bool, FriendshipError>;

    async fn get_friendship(
        &self,
        actor: &EntityRef,
        other: &EntityRef,
    ) -> Result<Option<FriendshipRecord>, FriendshipError>;

    // endregion

    // region friendship listings

    /// Rows where the actor is either side. `status` is a status name or
    /// code; `None` means any status.
    async fn friendships_by_status(
        &self,
        actor: &EntityRef,
        status: Option<&str>,
        group_slug: Option<&str>,
    ) -> Result<Vec<FriendshipRecord>, FriendshipError>;

    async fn get_all_friendships(
        &self,
        actor: &EntityRef,
        group_slug: Option<&str>,
    ) -> Result<Vec<FriendshipRecord>, FriendshipError> {
        self.friendships_by_status(actor, None, group_slug).await
    }

    async fn get_pending_friendships(
        &self,
        actor: &EntityRef,
        group_slug: Option<&str>,
    ) -> Result<Vec<FriendshipRecord>, FriendshipError> {
        self.friendships_by_status(actor, Some(FriendshipStatus::Pending.as_str()), group_slug)
            .await
    }

    async fn get_accepted_friendships(
        &self,
        actor: &EntityRef,
        group_slug: Option<&str>,
    ) -> Result<Vec<FriendshipRecord>, FriendshipError> {
        self.friendships_by_status(actor, Some(FriendshipStatus::Accepted.as_str()), group_slug)
            .await
    }

    async fn get_denied_friendships(
        &self,
        actor: &EntityRef,
    ) -> Result<Vec<FriendshipRecord>, FriendshipError> {
        self.friendships_by_status(actor, Some(FriendshipStatus::Denied.as_str()), None)
            .await
    }

    async fn get_blocked_friendships(
        &self,
        actor: &EntityRef,
    ) -> Result<Vec<FriendshipRecord>, FriendshipError> {
        self.friendships_by_status(actor, Some(FriendshipStatus::Blocked.as_str()), None)
            .await
    }

    /// Rows the actor sent with the given status, paginated.
    async fn sent_friendships_by_status(
        &self,
        actor: &EntityRef,
        status: &str,
        page: PageRequest,
    ) -> Result<Paginated<FriendshipRecord>, FriendshipError>;

    async fn pending_friends(
        &self,
        actor: &EntityRef,
        page: PageRequest,
    ) -> Result<Paginated<FriendshipRecord>, FriendshipError> {
        self.sent_friendships_by_status(actor, FriendshipStatus::Pending.as_str(), page)
            .await
    }

    async fn accepted_friends(
        &self,
        actor: &EntityRef,
        page: PageRequest,
    ) -> Result<Paginated<FriendshipRecord>, FriendshipError> {
        self.sent_friendships_by_status(actor, FriendshipStatus::Accepted.as_str(), page)
            .await
    }

    async fn denied_friends(
        &self,
        actor: &EntityRef,
        page: PageRequest,
    ) -> Result<Paginated<FriendshipRecord>, FriendshipError> {
        self.sent_friendships_by_status(actor, FriendshipStatus::Denied.as_str(), page)
            .await
    }

    async fn blocked_friends(
        &self,
        actor: &EntityRef,
        page: PageRequest,
    ) -> Result<Paginated<FriendshipRecord>, FriendshipError> {
        self.sent_friendships_by_status(actor, FriendshipStatus::Blocked.as_str(), page)
            .await
    }

    /// Pending rows addressed to the actor.
    async fn get_friend_requests(
        &self,
        actor: &EntityRef,
        page: PageRequest,
    ) -> Result<Paginated<FriendshipRecord>, FriendshipError>;

    async fn get_friend_requests_count(&self, actor: &EntityRef) -> Result<u64, FriendshipError>;

    // endregion

    // region derived friend sets

    async fn get_friends(
        &self,
        actor: &EntityRef,
        page: PageRequest,
        group_slug: Option<&str>,
    ) -> Result<Paginated<EntityRef>, FriendshipError>;

    async fn get_friends_count(
        &self,
        actor: &EntityRef,
        group_slug: Option<&str>,
    ) -> Result<u64, FriendshipError>;

    async fn get_mutual_friends(
        &self,
        actor: &EntityRef,
        other: &EntityRef,
        page: PageRequest,
    ) -> Result<Paginated<EntityRef>, FriendshipError>;

    async fn get_mutual_friends_count(
        &self,
        actor: &EntityRef,
        other: &EntityRef,
    ) -> Result<u64, FriendshipError>;

    async fn get_friends_of_friends(
        &self,
        actor: &EntityRef,
        page: PageRequest,
        group_slug: Option<&str>,
    ) -> Result<Paginated<EntityRef>, FriendshipError>;

    // endregion
}
