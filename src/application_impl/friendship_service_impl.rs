use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// When cancel/accept/deny/unblock events fire.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Fire after every call, even when no row changed.
    #[default]
    Always,
    /// Fire only when at least one row changed.
    OnChange,
}

pub struct RealFriendshipService {
    friendship_repo: Arc<dyn FriendshipRepo>,
    group_tag_repo: Arc<dyn GroupTagRepo>,
    tx_manager: Arc<dyn TxManager>,
    notifier: Arc<dyn FriendshipNotifier>,
    groups: GroupRegistry,
    notify_policy: NotifyPolicy,
}

impl RealFriendshipService {
    pub fn new(
        friendship_repo: Arc<dyn FriendshipRepo>,
        group_tag_repo: Arc<dyn GroupTagRepo>,
        tx_manager: Arc<dyn TxManager>,
        notifier: Arc<dyn FriendshipNotifier>,
        groups: GroupRegistry,
        notify_policy: NotifyPolicy,
    ) -> Self {
        Self {
            friendship_repo,
            group_tag_repo,
            tx_manager,
            notifier,
            groups,
            notify_policy,
        }
    }

    async fn begin(&self) -> Result<Box<dyn StorageTx<'_> + '_>, FriendshipError> {
        self.tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(format!("begin transaction: {e}")))
    }

    async fn commit(tx: Box<dyn StorageTx<'_> + '_>) -> Result<(), FriendshipError> {
        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(format!("commit transaction: {e}")))
    }

    fn emit(&self, kind: FriendshipEventKind, actor: &EntityRef, target: &EntityRef, changed: u64) {
        if changed == 0 && self.notify_policy == NotifyPolicy::OnChange {
            tracing::debug!(?kind, %actor, %target, "nothing changed, event suppressed");
            return;
        }
        self.notifier
            .notify(FriendshipEvent::new(kind, actor, target));
    }

    // region single read helpers

    async fn find(&self, query: &FriendshipQuery) -> Result<Vec<FriendshipRecord>, FriendshipError> {
        let mut tx = self.begin().await?;
        let rows = self.friendship_repo.find_in_tx(&mut *tx, query).await?;
        Self::commit(tx).await?;
        Ok(rows)
    }

    async fn first(
        &self,
        query: &FriendshipQuery,
    ) -> Result<Option<FriendshipRecord>, FriendshipError> {
        let mut tx = self.begin().await?;
        let row = self.friendship_repo.first_in_tx(&mut *tx, query).await?;
        Self::commit(tx).await?;
        Ok(row)
    }

    async fn exists(&self, query: &FriendshipQuery) -> Result<bool, FriendshipError> {
        let mut tx = self.begin().await?;
        let exists = self.friendship_repo.exists_in_tx(&mut *tx, query).await?;
        Self::commit(tx).await?;
        Ok(exists)
    }

    async fn count(&self, query: &FriendshipQuery) -> Result<u64, FriendshipError> {
        let mut tx = self.begin().await?;
        let count = self.friendship_repo.count_in_tx(&mut *tx, query).await?;
        Self::commit(tx).await?;
        Ok(count)
    }

    // endregion

    // region in-tx building blocks

    async fn has_blocked_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        actor: &EntityRef,
        other: &EntityRef,
    ) -> Result<bool, FriendshipError> {
        let query = FriendshipQuery::new()
            .where_sender(actor)
            .where_recipient(other)
            .where_status(FriendshipStatus::Blocked);
        self.friendship_repo.exists_in_tx(tx, &query).await
    }

    async fn unblock_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        actor: &EntityRef,
        target: &EntityRef,
    ) -> Result<u64, FriendshipError> {
        let query = FriendshipQuery::between(actor, target)
            .where_sender(actor)
            .where_status(FriendshipStatus::Blocked);
        self.friendship_repo.delete_in_tx(tx, &query).await
    }

    /// Returns whether a request may be sent, and how many Blocked rows were
    /// lifted on the way.
    async fn can_befriend_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        actor: &EntityRef,
        target: &EntityRef,
    ) -> Result<(bool, Option<u64>), FriendshipError> {
        if self.has_blocked_in_tx(tx, actor, target).await? {
            let unblocked = self.unblock_in_tx(tx, actor, target).await?;
            return Ok((true, Some(unblocked)));
        }

        // Denied rows are history; any other row between the two is live.
        let existing = self
            .friendship_repo
            .find_in_tx(tx, &FriendshipQuery::between(actor, target))
            .await?;
        let allowed = existing
            .iter()
            .all(|friendship| friendship.status == FriendshipStatus::Denied);
        Ok((allowed, None))
    }

    /// The other party of every accepted friendship of `actor`, optionally
    /// limited to the actor's group.
    async fn friend_set_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        actor: &EntityRef,
        group_id: Option<GroupId>,
    ) -> Result<BTreeSet<EntityRef>, FriendshipError> {
        let query = FriendshipQuery::involving(actor)
            .where_status(FriendshipStatus::Accepted)
            .where_group(actor, group_id);
        let rows = self.friendship_repo.find_in_tx(tx, &query).await?;

        Ok(rows
            .iter()
            .map(|row| row.other_side(actor))
            .filter(|other| *other != actor)
            .cloned()
            .collect())
    }

    async fn friend_set(
        &self,
        actor: &EntityRef,
        group_id: Option<GroupId>,
    ) -> Result<BTreeSet<EntityRef>, FriendshipError> {
        let mut tx = self.begin().await?;
        let friends = self.friend_set_in_tx(&mut *tx, actor, group_id).await?;
        Self::commit(tx).await?;
        Ok(friends)
    }

    async fn mutual_friend_set(
        &self,
        actor: &EntityRef,
        other: &EntityRef,
    ) -> Result<BTreeSet<EntityRef>, FriendshipError> {
        let mut tx = self.begin().await?;
        let mine = self.friend_set_in_tx(&mut *tx, actor, None).await?;
        let theirs = self.friend_set_in_tx(&mut *tx, other, None).await?;
        Self::commit(tx).await?;

        Ok(mine
            .intersection(&theirs)
            .filter(|e| *e != actor && *e != other)
            .cloned()
            .collect())
    }

    /// Changes the status of the pending request `sender` sent to `actor`.
    async fn answer_request(
        &self,
        actor: &EntityRef,
        sender: &EntityRef,
        status: FriendshipStatus,
    ) -> Result<u64, FriendshipError> {
        let query = FriendshipQuery::between(actor, sender)
            .where_recipient(actor)
            .where_status(FriendshipStatus::Pending);

        let mut tx = self.begin().await?;
        let updated = self
            .friendship_repo
            .update_status_in_tx(&mut *tx, &query, status)
            .await?;
        Self::commit(tx).await?;

        tracing::debug!(%actor, %sender, %status, updated, "friend request answered");
        Ok(updated)
    }

    fn parse_status(status: &str) -> Result<FriendshipStatus, FriendshipError> {
        status.parse::<FriendshipStatus>()
    }

    // endregion
}

#[async_trait::async_trait]
impl FriendshipService for RealFriendshipService {
    async fn befriend(
        &self,
        actor: &EntityRef,
        target: &EntityRef,
    ) -> Result<Option<FriendshipRecord>, FriendshipError> {
        let mut tx = self.begin().await?;

        let (allowed, unblocked) = self.can_befriend_in_tx(&mut *tx, actor, target).await?;
        if !allowed {
            Self::commit(tx).await?;
            tracing::debug!(%actor, %target, "friend request refused");
            return Ok(None);
        }

        let friendship = self
            .friendship_repo
            .insert_in_tx(&mut *tx, actor, target, FriendshipStatus::Pending)
            .await?;
        Self::commit(tx).await?;

        if let Some(unblocked) = unblocked {
            self.emit(FriendshipEventKind::Unblocked, actor, target, unblocked);
        }
        self.emit(FriendshipEventKind::Sent, actor, target, 1);
        tracing::debug!(%actor, %target, id = %friendship.id, "friend request sent");

        Ok(Some(friendship))
    }

    async fn unfriend(
        &self,
        actor: &EntityRef,
        target: &EntityRef,
    ) -> Result<bool, FriendshipError> {
        let mut tx = self.begin().await?;
        let deleted = self
            .friendship_repo
            .delete_in_tx(&mut *tx, &FriendshipQuery::between(actor, target))
            .await?;
        Self::commit(tx).await?;

        self.emit(FriendshipEventKind::Cancelled, actor, target, deleted);
        tracing::debug!(%actor, %target, deleted, "friendship cancelled");
        Ok(deleted > 0)
    }

    async fn accept_friend_request(
        &self,
        actor: &EntityRef,
        sender: &EntityRef,
    ) -> Result<u64, FriendshipError> {
        let updated = self
            .answer_request(actor, sender, FriendshipStatus::Accepted)
            .await?;
        self.emit(FriendshipEventKind::Accepted, actor, sender, updated);
        Ok(updated)
    }

    async fn deny_friend_request(
        &self,
        actor: &EntityRef,
        sender: &EntityRef,
    ) -> Result<u64, FriendshipError> {
        let updated = self
            .answer_request(actor, sender, FriendshipStatus::Denied)
            .await?;
        self.emit(FriendshipEventKind::Denied, actor, sender, updated);
        Ok(updated)
    }

    async fn block_friend(
        &self,
        actor: &EntityRef,
        target: &EntityRef,
    ) -> Result<FriendshipRecord, FriendshipError> {
        let mut tx = self.begin().await?;

        if self.has_blocked_in_tx(&mut *tx, target, actor).await? {
            // The target's Blocked row must survive, so a second row is added.
            tracing::warn!(%actor, %target, "blocking a party that already blocked the actor");
        } else {
            self.friendship_repo
                .delete_in_tx(&mut *tx, &FriendshipQuery::between(actor, target))
                .await?;
        }

        let friendship = self
            .friendship_repo
            .insert_in_tx(&mut *tx, actor, target, FriendshipStatus::Blocked)
            .await?;
        Self::commit(tx).await?;

        self.emit(FriendshipEventKind::Blocked, actor, target, 1);
        tracing::debug!(%actor, %target, id = %friendship.id, "friend blocked");
        Ok(friendship)
    }

    async fn unblock_friend(
        &self,
        actor: &EntityRef,
        target: &EntityRef,
    ) -> Result<u64, FriendshipError> {
        let mut tx = self.begin().await?;
        let deleted = self.unblock_in_tx(&mut *tx, actor, target).await?;
        Self::commit(tx).await?;

        self.emit(FriendshipEventKind::Unblocked, actor, target, deleted);
        tracing::debug!(%actor, %target, deleted, "friend unblocked");
        Ok(deleted)
    }

    async fn group_friend(
        &self,
        actor: &EntityRef,
        friend: &EntityRef,
        group_slug: &str,
    ) -> Result<bool, FriendshipError> {
        let Some(group_id) = self.groups.resolve(group_slug) else {
            tracing::debug!(group_slug, "unknown friend group");
            return Ok(false);
        };

        let mut tx = self.begin().await?;
        let query = FriendshipQuery::between(actor, friend).where_status(FriendshipStatus::Accepted);
        let Some(friendship) = self.friendship_repo.first_in_tx(&mut *tx, &query).await? else {
            Self::commit(tx).await?;
            return Ok(false);
        };

        let tag = FriendshipGroupTag {
            friendship_id: friendship.id,
            group_id,
            friend: friend.clone(),
        };
        let created = self
            .group_tag_repo
            .first_or_create_in_tx(&mut *tx, &tag)
            .await?;
        Self::commit(tx).await?;

        tracing::debug!(%actor, %friend, group_slug, created, "friend grouped");
        Ok(created)
    }

    async fn ungroup_friend(
        &self,
        actor: &EntityRef,
        friend: &EntityRef,
        group_slug: Option<&str>,
    ) -> Result<u64, FriendshipError> {
        let mut tx = self.begin().await?;
        let Some(friendship) = self
            .friendship_repo
            .first_in_tx(&mut *tx, &FriendshipQuery::between(actor, friend))
            .await?
        else {
            Self::commit(tx).await?;
            return Ok(0);
        };

        let group_id = self.groups.resolve_opt(group_slug);
        let deleted = self
            .group_tag_repo
            .delete_in_tx(&mut *tx, friendship.id, friend, group_id)
            .await?;
        Self::commit(tx).await?;

        tracing::debug!(%actor, %friend, ?group_slug, deleted, "friend ungrouped");
        Ok(deleted)
    }

    async fn is_friend_with(
        &self,
        actor: &EntityRef,
        other: &EntityRef,
    ) -> Result<bool, FriendshipError> {
        self.exists(&FriendshipQuery::between(actor, other).where_status(FriendshipStatus::Accepted))
            .await
    }

    async fn has_friend_request_from(
        &self,
        actor: &EntityRef,
        sender: &EntityRef,
    ) -> Result<bool, FriendshipError> {
        self.exists(
            &FriendshipQuery::between(actor, sender)
                .where_sender(sender)
                .where_status(FriendshipStatus::Pending),
        )
        .await
    }

    async fn has_sent_friend_request_to(
        &self,
        actor: &EntityRef,
        recipient: &EntityRef,
    ) -> Result<bool, FriendshipError> {
        self.exists(
            &FriendshipQuery::new()
                .where_sender(actor)
                .where_recipient(recipient)
                .where_status(FriendshipStatus::Pending),
        )
        .await
    }

    async fn has_blocked(
        &self,
        actor: &EntityRef,
        other: &EntityRef,
    ) -> Result<bool, FriendshipError> {
        let mut tx = self.begin().await?;
        let blocked = self.has_blocked_in_tx(&mut *tx, actor, other).await?;
        Self::commit(tx).await?;
        Ok(blocked)
    }

    async fn can_befriend(
        &self,
        actor: &EntityRef,
        target: &EntityRef,
    ) -> Result<bool, FriendshipError> {
        let mut tx = self.begin().await?;
        let (allowed, unblocked) = self.can_befriend_in_tx(&mut *tx, actor, target).await?;
        Self::commit(tx).await?;

        if let Some(unblocked) = unblocked {
            self.emit(FriendshipEventKind::Unblocked, actor, target, unblocked);
        }
        Ok(allowed)
    }

    async fn get_friendship(
        &self,
        actor: &EntityRef,
        other: &EntityRef,
    ) -> Result<Option<FriendshipRecord>, FriendshipError> {
        self.first(&FriendshipQuery::between(actor, other)).await
    }

    async fn friendships_by_status(
        &self,
        actor: &EntityRef,
        status: Option<&str>,
        group_slug: Option<&str>,
    ) -> Result<Vec<FriendshipRecord>, FriendshipError> {
        let status = status.map(Self::parse_status).transpose()?;
        let group_id = self.groups.resolve_opt(group_slug);

        self.find(
            &FriendshipQuery::involving(actor)
                .where_status_opt(status)
                .where_group(actor, group_id),
        )
        .await
    }

    async fn sent_friendships_by_status(
        &self,
        actor: &EntityRef,
        status: &str,
        page: PageRequest,
    ) -> Result<Paginated<FriendshipRecord>, FriendshipError> {
        let status = Self::parse_status(status)?;
        let rows = self
            .find(&FriendshipQuery::new().where_sender(actor).where_status(status))
            .await?;
        Ok(Paginated::resolve(rows, page))
    }

    async fn get_friend_requests(
        &self,
        actor: &EntityRef,
        page: PageRequest,
    ) -> Result<Paginated<FriendshipRecord>, FriendshipError> {
        let rows = self
            .find(
                &FriendshipQuery::new()
                    .where_recipient(actor)
                    .where_status(FriendshipStatus::Pending),
            )
            .await?;
        Ok(Paginated::resolve(rows, page))
    }

    async fn get_friend_requests_count(&self, actor: &EntityRef) -> Result<u64, FriendshipError> {
        self.count(
            &FriendshipQuery::new()
                .where_recipient(actor)
                .where_status(FriendshipStatus::Pending),
        )
        .await
    }

    async fn get_friends(
        &self,
        actor: &EntityRef,
        page: PageRequest,
        group_slug: Option<&str>,
    ) -> Result<Paginated<EntityRef>, FriendshipError> {
        let group_id = self.groups.resolve_opt(group_slug);
        let friends = self.friend_set(actor, group_id).await?;
        Ok(Paginated::resolve(friends.into_iter().collect(), page))
    }

    async fn get_friends_count(
        &self,
        actor: &EntityRef,
        group_slug: Option<&str>,
    ) -> Result<u64, FriendshipError> {
        let group_id = self.groups.resolve_opt(group_slug);
        Ok(self.friend_set(actor, group_id).await?.len() as u64)
    }

    async fn get_mutual_friends(
        &self,
        actor: &EntityRef,
        other: &EntityRef,
        page: PageRequest,
    ) -> Result<Paginated<EntityRef>, FriendshipError> {
        let mutual = self.mutual_friend_set(actor, other).await?;
        Ok(Paginated::resolve(mutual.into_iter().collect(), page))
    }

    async fn get_mutual_friends_count(
        &self,
        actor: &EntityRef,
        other: &EntityRef,
    ) -> Result<u64, FriendshipError> {
        Ok(self.mutual_friend_set(actor, other).await?.len() as u64)
    }

    async fn get_friends_of_friends(
        &self,
        actor: &EntityRef,
        page: PageRequest,
        group_slug: Option<&str>,
    ) -> Result<Paginated<EntityRef>, FriendshipError> {
        let group_id = self.groups.resolve_opt(group_slug);

        let mut tx = self.begin().await?;
        let friends = self.friend_set_in_tx(&mut *tx, actor, None).await?;
        if friends.is_empty() {
            Self::commit(tx).await?;
            return Ok(Paginated::resolve(Vec::new(), page));
        }

        let query = FriendshipQuery::involving_any(friends.iter().cloned().collect())
            .where_status(FriendshipStatus::Accepted)
            .where_group(actor, group_id);
        let rows = self.friendship_repo.find_in_tx(&mut *tx, &query).await?;
        Self::commit(tx).await?;

        let fofs: BTreeSet<EntityRef> = rows
            .into_iter()
            .flat_map(|row| [row.sender, row.recipient])
            .filter(|e| e != actor && !friends.contains(e))
            .collect();

        Ok(Paginated::resolve(fofs.into_iter().collect(), page))
    }
}
