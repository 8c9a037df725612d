use friendships::application_impl::{NotifyPolicy, RealFriendshipService};
use friendships::application_port::FriendshipService;
use friendships::domain_model::{EntityRef, GroupRegistry, PageRequest};
use friendships::events::{ChannelNotifier, EventRelay, LogPublisher};
use friendships::infra_memory::{MemoryFriendshipRepo, MemoryGroupTagRepo, MemoryStore, MemoryTxManager};
use friendships::logger::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _logger = Logger::new_bootstrap("info,friendships=debug", LogFormat::Compact)?;

    let store = MemoryStore::new();
    let (notifier, events) = ChannelNotifier::channel();
    let cancel = CancellationToken::new();
    let relay = EventRelay::new(events, Arc::new(LogPublisher), "friendships", cancel.clone());
    let relay_handle = tokio::spawn(relay.run());

    let service = RealFriendshipService::new(
        Arc::new(MemoryFriendshipRepo::new(store.clone())),
        Arc::new(MemoryGroupTagRepo::new(store.clone())),
        Arc::new(MemoryTxManager::new(store)),
        Arc::new(notifier),
        GroupRegistry::new([("acquaintances", 0), ("close_friends", 1), ("family", 2)]),
        NotifyPolicy::OnChange,
    );

    let alice = EntityRef::named("user", "alice");
    let bob = EntityRef::named("user", "bob");
    let carol = EntityRef::named("user", "carol");
    let dave = EntityRef::named("user", "dave");

    service.befriend(&alice, &bob).await?;
    service.accept_friend_request(&bob, &alice).await?;
    service.befriend(&bob, &carol).await?;
    service.accept_friend_request(&carol, &bob).await?;
    service.befriend(&alice, &carol).await?;
    service.accept_friend_request(&carol, &alice).await?;
    service.befriend(&carol, &dave).await?;
    service.accept_friend_request(&dave, &carol).await?;

    service.group_friend(&alice, &bob, "family").await?;

    let friends = service.get_friends(&alice, PageRequest::all(), None).await?;
    info!(count = friends.len(), "alice's friends");
    let family = service.get_friends(&alice, PageRequest::all(), Some("family")).await?;
    info!(count = family.len(), "alice's family");
    let mutual = service.get_mutual_friends_count(&alice, &bob).await?;
    info!(mutual, "alice and bob share friends");
    let fof = service.get_friends_of_friends(&alice, PageRequest::per_page(10), None).await?;
    info!(fof = %serde_json::to_string(&fof)?, "alice's friends of friends");

    service.block_friend(&bob, &alice).await?;
    info!(
        refused = !service.can_befriend(&alice, &bob).await?,
        "alice tries to befriend bob again"
    );
    service.unblock_friend(&bob, &alice).await?;

    cancel.cancel();
    relay_handle.await??;
    Ok(())
}
