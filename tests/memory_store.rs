use friendships::application_port::FriendshipError;
use friendships::domain_model::{EntityRef, FriendshipQuery, FriendshipStatus};
use friendships::domain_port::{FriendshipRepo, StorageTx, TxManager};
use friendships::infra_memory::{MemoryFriendshipRepo, MemoryStore, MemoryTxManager};

fn fixture() -> (MemoryStore, MemoryFriendshipRepo, MemoryTxManager) {
    let store = MemoryStore::new();
    (
        store.clone(),
        MemoryFriendshipRepo::new(store.clone()),
        MemoryTxManager::new(store),
    )
}

async fn insert_one<'a>(
    repo: &MemoryFriendshipRepo,
    tx_manager: &'a MemoryTxManager,
) -> Result<Box<dyn StorageTx<'a> + 'a>, FriendshipError> {
    let mut tx = tx_manager
        .begin()
        .await
        .map_err(|e| FriendshipError::Store(e.to_string()))?;
    repo.insert_in_tx(
        &mut *tx,
        &EntityRef::named("user", "a"),
        &EntityRef::named("user", "b"),
        FriendshipStatus::Pending,
    )
    .await?;
    Ok(tx)
}

#[tokio::test]
async fn committed_writes_are_kept() {
    let (store, repo, tx_manager) = fixture();

    let tx = insert_one(&repo, &tx_manager).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(store.lock().unwrap().friendships.len(), 1);
}

#[tokio::test]
async fn rollback_restores_the_snapshot() {
    let (store, repo, tx_manager) = fixture();

    let tx = insert_one(&repo, &tx_manager).await.unwrap();
    assert_eq!(store.lock().unwrap().friendships.len(), 1);
    tx.rollback().await.unwrap();

    let tables = store.lock().unwrap();
    assert!(tables.friendships.is_empty());
    assert_eq!(tables.last_friendship_id, 0);
}

#[tokio::test]
async fn dropping_an_open_transaction_rolls_back() {
    let (store, repo, tx_manager) = fixture();

    {
        let _tx = insert_one(&repo, &tx_manager).await.unwrap();
    }

    assert!(store.lock().unwrap().friendships.is_empty());
}

#[tokio::test]
async fn delete_cascades_to_group_tags() {
    use friendships::domain_model::{FriendshipGroupTag, GroupId};
    use friendships::domain_port::GroupTagRepo;
    use friendships::infra_memory::MemoryGroupTagRepo;

    let (store, repo, tx_manager) = fixture();
    let tags = MemoryGroupTagRepo::new(store.clone());
    let (a, b) = (EntityRef::named("user", "a"), EntityRef::named("user", "b"));

    let mut tx = tx_manager.begin().await.unwrap();
    let row = repo
        .insert_in_tx(&mut *tx, &a, &b, FriendshipStatus::Accepted)
        .await
        .unwrap();
    let tag = FriendshipGroupTag {
        friendship_id: row.id,
        group_id: GroupId(1),
        friend: b.clone(),
    };
    assert!(tags.first_or_create_in_tx(&mut *tx, &tag).await.unwrap());
    assert!(!tags.first_or_create_in_tx(&mut *tx, &tag).await.unwrap());

    let deleted = repo
        .delete_in_tx(&mut *tx, &FriendshipQuery::between(&b, &a))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(deleted, 1);
    assert!(store.lock().unwrap().tags.is_empty());
}

#[tokio::test]
async fn rollback_restores_the_whole_store() {
    let (store, repo, tx_manager) = fixture();

    let outer = tx_manager.begin().await.unwrap();
    let inner = insert_one(&repo, &tx_manager).await.unwrap();
    inner.commit().await.unwrap();
    assert_eq!(store.lock().unwrap().friendships.len(), 1);

    // single-caller store: the older snapshot wins
    outer.rollback().await.unwrap();
    assert!(store.lock().unwrap().friendships.is_empty());
}
