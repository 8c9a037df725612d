mod common;

use common::{Harness, user};
use friendships::application_impl::NotifyPolicy;
use friendships::application_port::FriendshipService;
use friendships::domain_model::{FriendshipEventKind, FriendshipStatus};

#[tokio::test]
async fn accepted_request_makes_both_sides_friends() {
    let mut h = Harness::new();
    let (alice, bob) = (user("alice"), user("bob"));

    let sent = h.service.befriend(&alice, &bob).await.unwrap().unwrap();
    assert_eq!(sent.status, FriendshipStatus::Pending);
    assert_eq!(sent.sender, alice);
    assert!(h.service.has_sent_friend_request_to(&alice, &bob).await.unwrap());
    assert!(h.service.has_friend_request_from(&bob, &alice).await.unwrap());
    assert!(!h.service.has_friend_request_from(&alice, &bob).await.unwrap());

    assert_eq!(h.service.accept_friend_request(&bob, &alice).await.unwrap(), 1);

    assert!(h.service.is_friend_with(&alice, &bob).await.unwrap());
    assert!(h.service.is_friend_with(&bob, &alice).await.unwrap());
    assert!(!h.service.has_friend_request_from(&bob, &alice).await.unwrap());
    assert_eq!(
        h.drain_events(),
        vec![FriendshipEventKind::Sent, FriendshipEventKind::Accepted]
    );
}

#[tokio::test]
async fn pending_request_cannot_be_sent_twice() {
    let h = Harness::new();
    let (alice, bob) = (user("alice"), user("bob"));

    assert!(h.service.befriend(&alice, &bob).await.unwrap().is_some());
    assert!(h.service.befriend(&alice, &bob).await.unwrap().is_none());
    // nor from the other side
    assert!(h.service.befriend(&bob, &alice).await.unwrap().is_none());
    assert_eq!(h.row_count(), 1);
}

#[tokio::test]
async fn only_the_recipient_can_answer_a_request() {
    let h = Harness::new();
    let (alice, bob) = (user("alice"), user("bob"));

    h.service.befriend(&alice, &bob).await.unwrap();

    assert_eq!(h.service.accept_friend_request(&alice, &bob).await.unwrap(), 0);
    assert_eq!(h.service.deny_friend_request(&alice, &bob).await.unwrap(), 0);
    assert!(!h.service.is_friend_with(&alice, &bob).await.unwrap());

    assert_eq!(h.service.deny_friend_request(&bob, &alice).await.unwrap(), 1);
    let friendship = h.service.get_friendship(&alice, &bob).await.unwrap().unwrap();
    assert_eq!(friendship.status, FriendshipStatus::Denied);
}

#[tokio::test]
async fn denied_request_can_be_sent_again() {
    let h = Harness::new();
    let (u1, u2) = (user("u1"), user("u2"));

    h.service.befriend(&u1, &u2).await.unwrap();
    h.service.deny_friend_request(&u2, &u1).await.unwrap();

    assert!(h.service.can_befriend(&u1, &u2).await.unwrap());
    let again = h.service.befriend(&u1, &u2).await.unwrap().unwrap();
    assert_eq!(again.status, FriendshipStatus::Pending);

    // the denied row stays next to the new pending one
    let all = h.service.get_all_friendships(&u1, None).await.unwrap();
    let statuses: Vec<_> = all.iter().map(|f| f.status).collect();
    assert_eq!(statuses, vec![FriendshipStatus::Denied, FriendshipStatus::Pending]);
    assert_eq!(h.service.get_denied_friendships(&u2).await.unwrap().len(), 1);

    // the new pending request refuses a third one from either side
    assert!(!h.service.can_befriend(&u1, &u2).await.unwrap());
    assert!(h.service.befriend(&u1, &u2).await.unwrap().is_none());
    assert!(h.service.befriend(&u2, &u1).await.unwrap().is_none());
    assert_eq!(h.row_count(), 2);
}

#[tokio::test]
async fn accepted_after_a_denial_is_a_single_friendship() {
    let h = Harness::new();
    let (u1, u2) = (user("u1"), user("u2"));

    h.service.befriend(&u1, &u2).await.unwrap();
    h.service.deny_friend_request(&u2, &u1).await.unwrap();
    h.service.befriend(&u1, &u2).await.unwrap().unwrap();
    assert_eq!(h.service.accept_friend_request(&u2, &u1).await.unwrap(), 1);

    assert!(!h.service.can_befriend(&u1, &u2).await.unwrap());
    assert!(!h.service.can_befriend(&u2, &u1).await.unwrap());
    assert!(h.service.befriend(&u1, &u2).await.unwrap().is_none());
    assert_eq!(h.row_count(), 2);

    let accepted = h.service.get_accepted_friendships(&u1, None).await.unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(h.service.get_friends_count(&u1, None).await.unwrap(), 1);
}

#[tokio::test]
async fn block_after_a_denial_refuses_new_requests() {
    let h = Harness::new();
    let (u1, u2) = (user("u1"), user("u2"));

    h.service.befriend(&u1, &u2).await.unwrap();
    h.service.deny_friend_request(&u2, &u1).await.unwrap();
    h.service.block_friend(&u2, &u1).await.unwrap();

    assert!(h.service.befriend(&u1, &u2).await.unwrap().is_none());
    assert!(h.service.is_blocked_by(&u1, &u2).await.unwrap());
}

#[tokio::test]
async fn unfriend_removes_the_friendship() {
    let mut h = Harness::new();
    let (alice, bob) = (user("alice"), user("bob"));

    h.service.befriend(&alice, &bob).await.unwrap();
    h.service.accept_friend_request(&bob, &alice).await.unwrap();
    h.drain_events();

    assert!(h.service.unfriend(&bob, &alice).await.unwrap());
    assert!(!h.service.is_friend_with(&alice, &bob).await.unwrap());
    assert!(h.service.get_friendship(&alice, &bob).await.unwrap().is_none());
    assert_eq!(h.drain_events(), vec![FriendshipEventKind::Cancelled]);
}

#[tokio::test]
async fn noop_transitions_still_notify_by_default() {
    let mut h = Harness::new();
    let (alice, bob) = (user("alice"), user("bob"));

    assert!(!h.service.unfriend(&alice, &bob).await.unwrap());
    assert_eq!(h.service.accept_friend_request(&alice, &bob).await.unwrap(), 0);
    assert_eq!(h.service.deny_friend_request(&alice, &bob).await.unwrap(), 0);
    assert_eq!(h.service.unblock_friend(&alice, &bob).await.unwrap(), 0);

    assert_eq!(
        h.drain_events(),
        vec![
            FriendshipEventKind::Cancelled,
            FriendshipEventKind::Accepted,
            FriendshipEventKind::Denied,
            FriendshipEventKind::Unblocked,
        ]
    );
}

#[tokio::test]
async fn on_change_policy_suppresses_noop_events() {
    let mut h = Harness::with_policy(NotifyPolicy::OnChange);
    let (alice, bob) = (user("alice"), user("bob"));

    h.service.unfriend(&alice, &bob).await.unwrap();
    h.service.accept_friend_request(&alice, &bob).await.unwrap();
    assert!(h.drain_events().is_empty());

    h.service.befriend(&alice, &bob).await.unwrap();
    h.service.accept_friend_request(&bob, &alice).await.unwrap();
    assert_eq!(
        h.drain_events(),
        vec![FriendshipEventKind::Sent, FriendshipEventKind::Accepted]
    );
}

#[tokio::test]
async fn blocking_replaces_an_existing_friendship() {
    let mut h = Harness::new();
    let (alice, bob) = (user("alice"), user("bob"));

    h.service.befriend(&alice, &bob).await.unwrap();
    h.service.accept_friend_request(&bob, &alice).await.unwrap();
    h.service.group_friend(&alice, &bob, "family").await.unwrap();
    h.drain_events();

    let blocked = h.service.block_friend(&alice, &bob).await.unwrap();
    assert_eq!(blocked.status, FriendshipStatus::Blocked);
    assert_eq!(blocked.sender, alice);

    assert!(!h.service.is_friend_with(&alice, &bob).await.unwrap());
    assert!(h.service.has_blocked(&alice, &bob).await.unwrap());
    assert!(h.service.is_blocked_by(&bob, &alice).await.unwrap());
    assert!(!h.service.is_blocked_by(&alice, &bob).await.unwrap());
    assert_eq!(h.row_count(), 1);
    assert_eq!(h.tag_count(), 0);
    assert_eq!(h.drain_events(), vec![FriendshipEventKind::Blocked]);
}

#[tokio::test]
async fn blocked_friendships_list_the_single_block() {
    let h = Harness::new();
    let (a, b) = (user("a"), user("b"));

    h.service.block_friend(&a, &b).await.unwrap();

    let blocked = h.service.get_blocked_friendships(&a).await.unwrap();
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0].status, FriendshipStatus::Blocked);
    assert_eq!(blocked[0].sender, a);
}

#[tokio::test]
async fn blocking_back_keeps_the_original_block() {
    let h = Harness::new();
    let (a, b) = (user("a"), user("b"));

    h.service.block_friend(&a, &b).await.unwrap();
    h.service.block_friend(&b, &a).await.unwrap();

    assert!(h.service.has_blocked(&a, &b).await.unwrap());
    assert!(h.service.has_blocked(&b, &a).await.unwrap());
    assert_eq!(h.service.get_blocked_friendships(&a).await.unwrap().len(), 2);
}

#[tokio::test]
async fn only_the_blocker_can_unblock() {
    let h = Harness::new();
    let (a, b) = (user("a"), user("b"));

    h.service.block_friend(&a, &b).await.unwrap();

    assert_eq!(h.service.unblock_friend(&b, &a).await.unwrap(), 0);
    assert!(h.service.has_blocked(&a, &b).await.unwrap());

    assert_eq!(h.service.unblock_friend(&a, &b).await.unwrap(), 1);
    assert!(!h.service.has_blocked(&a, &b).await.unwrap());
    assert_eq!(h.row_count(), 0);
}

#[tokio::test]
async fn blocked_party_cannot_accept_the_block() {
    let h = Harness::new();
    let (a, b) = (user("a"), user("b"));

    h.service.block_friend(&a, &b).await.unwrap();

    assert_eq!(h.service.accept_friend_request(&b, &a).await.unwrap(), 0);
    assert!(!h.service.is_friend_with(&a, &b).await.unwrap());
}

#[tokio::test]
async fn blocker_befriending_lifts_the_block() {
    let mut h = Harness::new();
    let (a, b) = (user("a"), user("b"));

    h.service.block_friend(&a, &b).await.unwrap();

    // the blocked side is refused
    assert!(!h.service.can_befriend(&b, &a).await.unwrap());
    assert!(h.service.befriend(&b, &a).await.unwrap().is_none());

    // the blocker's request first removes the block
    let sent = h.service.befriend(&a, &b).await.unwrap().unwrap();
    assert_eq!(sent.status, FriendshipStatus::Pending);
    assert!(!h.service.has_blocked(&a, &b).await.unwrap());
    assert_eq!(h.row_count(), 1);
    assert_eq!(
        h.drain_events(),
        vec![
            FriendshipEventKind::Blocked,
            FriendshipEventKind::Unblocked,
            FriendshipEventKind::Sent,
        ]
    );
}

#[tokio::test]
async fn can_befriend_unblocks_as_a_side_effect() {
    let h = Harness::new();
    let (a, b) = (user("a"), user("b"));

    h.service.block_friend(&a, &b).await.unwrap();

    assert!(h.service.can_befriend(&a, &b).await.unwrap());
    assert!(!h.service.has_blocked(&a, &b).await.unwrap());
    assert!(h.service.befriend(&a, &b).await.unwrap().is_some());
}

#[tokio::test]
async fn accepted_friends_cannot_befriend_again() {
    let h = Harness::new();
    let (a, b) = (user("a"), user("b"));

    h.service.befriend(&a, &b).await.unwrap();
    h.service.accept_friend_request(&b, &a).await.unwrap();

    assert!(!h.service.can_befriend(&a, &b).await.unwrap());
    assert!(!h.service.can_befriend(&b, &a).await.unwrap());
}
