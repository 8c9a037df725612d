mod common;

use common::{Harness, user, users};
use friendships::application_port::FriendshipService;
use friendships::domain_model::PageRequest;

async fn befriended(h: &Harness, a: &friendships::domain_model::EntityRef, b: &friendships::domain_model::EntityRef) {
    h.service.befriend(a, b).await.unwrap().unwrap();
    assert_eq!(h.service.accept_friend_request(b, a).await.unwrap(), 1);
}

#[tokio::test]
async fn user_can_add_a_friend_to_a_group() {
    let h = Harness::new();
    let (sender, recipient) = (user("sender"), user("recipient"));
    befriended(&h, &sender, &recipient).await;

    assert!(h.service.group_friend(&recipient, &sender, "acquaintances").await.unwrap());
    assert!(h.service.group_friend(&sender, &recipient, "family").await.unwrap());
    // only once
    assert!(!h.service.group_friend(&sender, &recipient, "family").await.unwrap());

    let family = h.service.get_friends(&sender, PageRequest::all(), Some("family")).await.unwrap();
    assert_eq!(family.items(), &[recipient.clone()]);
    let acquaintances = h
        .service
        .get_friends(&recipient, PageRequest::all(), Some("acquaintances"))
        .await
        .unwrap();
    assert_eq!(acquaintances.items(), &[sender.clone()]);
}

#[tokio::test]
async fn user_cannot_add_a_non_friend_to_a_group() {
    let h = Harness::new();
    let (sender, stranger) = (user("sender"), user("stranger"));

    assert!(!h.service.group_friend(&sender, &stranger, "family").await.unwrap());
    let family = h.service.get_friends(&sender, PageRequest::all(), Some("family")).await.unwrap();
    assert!(family.is_empty());

    // a pending request is not enough either
    h.service.befriend(&sender, &stranger).await.unwrap();
    assert!(!h.service.group_friend(&sender, &stranger, "family").await.unwrap());
}

#[tokio::test]
async fn unknown_group_is_refused() {
    let h = Harness::new();
    let (a, b) = (user("a"), user("b"));
    befriended(&h, &a, &b).await;

    assert!(!h.service.group_friend(&a, &b, "colleagues").await.unwrap());
    assert_eq!(h.tag_count(), 0);
}

#[tokio::test]
async fn user_can_remove_a_friend_from_group() {
    let h = Harness::new();
    let (sender, recipient) = (user("sender"), user("recipient"));
    befriended(&h, &sender, &recipient).await;

    h.service.group_friend(&recipient, &sender, "acquaintances").await.unwrap();
    h.service.group_friend(&recipient, &sender, "family").await.unwrap();

    assert_eq!(
        h.service
            .ungroup_friend(&recipient, &sender, Some("acquaintances"))
            .await
            .unwrap(),
        1
    );

    let count = |page: friendships::domain_model::Paginated<_>| page.len();
    assert_eq!(
        count(h.service.get_friends(&sender, PageRequest::all(), Some("acquaintances")).await.unwrap()),
        0
    );
    assert_eq!(
        count(h.service.get_friends(&recipient, PageRequest::all(), Some("acquaintances")).await.unwrap()),
        0
    );
    assert_eq!(
        count(h.service.get_friends(&recipient, PageRequest::all(), Some("family")).await.unwrap()),
        1
    );
}

#[tokio::test]
async fn user_cannot_remove_a_non_existing_friend_from_group() {
    let h = Harness::new();
    let (sender, recipient, recipient2) = (user("sender"), user("recipient"), user("recipient2"));

    h.service.befriend(&sender, &recipient).await.unwrap();

    assert_eq!(
        h.service.ungroup_friend(&recipient, &sender, Some("acquaintances")).await.unwrap(),
        0
    );
    assert_eq!(
        h.service.ungroup_friend(&recipient2, &sender, Some("acquaintances")).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn user_can_remove_a_friend_from_all_groups() {
    let h = Harness::new();
    let (sender, recipient) = (user("sender"), user("recipient"));
    befriended(&h, &sender, &recipient).await;

    h.service.group_friend(&sender, &recipient, "family").await.unwrap();
    h.service.group_friend(&sender, &recipient, "acquaintances").await.unwrap();

    assert_eq!(h.service.ungroup_friend(&sender, &recipient, None).await.unwrap(), 2);

    for group in ["family", "acquaintances"] {
        let friends = h.service.get_friends(&sender, PageRequest::all(), Some(group)).await.unwrap();
        assert!(friends.is_empty());
    }
}

#[tokio::test]
async fn unknown_slug_on_ungroup_clears_every_group() {
    let h = Harness::new();
    let (a, b) = (user("a"), user("b"));
    befriended(&h, &a, &b).await;

    h.service.group_friend(&a, &b, "family").await.unwrap();
    h.service.group_friend(&a, &b, "close_friends").await.unwrap();

    assert_eq!(h.service.ungroup_friend(&a, &b, Some("whatever")).await.unwrap(), 2);
}

#[tokio::test]
async fn group_tags_are_removed_with_the_friendship() {
    let h = Harness::new();
    let (a, b) = (user("a"), user("b"));
    befriended(&h, &a, &b).await;

    h.service.group_friend(&a, &b, "family").await.unwrap();
    h.service.group_friend(&b, &a, "acquaintances").await.unwrap();
    assert_eq!(h.tag_count(), 2);

    h.service.unfriend(&a, &b).await.unwrap();
    assert_eq!(h.tag_count(), 0);
}

#[tokio::test]
async fn it_returns_friends_of_a_group() {
    let h = Harness::new();
    let sender = user("sender");
    let recipients = users("recipient", 10);

    for (key, recipient) in recipients.iter().enumerate() {
        befriended(&h, &sender, recipient).await;
        if key % 2 == 0 {
            h.service.group_friend(&sender, recipient, "family").await.unwrap();
        }
    }

    let family = h.service.get_friends(&sender, PageRequest::all(), Some("family")).await.unwrap();
    assert_eq!(family.len(), 5);
    let all = h.service.get_friends(&sender, PageRequest::all(), None).await.unwrap();
    assert_eq!(all.len(), 10);
}

#[tokio::test]
async fn it_returns_all_user_friendships_by_group() {
    let h = Harness::new();
    let sender = user("sender");
    let recipients = users("recipient", 5);

    for (key, recipient) in recipients.iter().enumerate() {
        h.service.befriend(&sender, recipient).await.unwrap();
        if key < 4 {
            h.service.accept_friend_request(recipient, &sender).await.unwrap();
            let group = if key < 3 { "acquaintances" } else { "family" };
            h.service.group_friend(&sender, recipient, group).await.unwrap();
        } else {
            h.service.deny_friend_request(recipient, &sender).await.unwrap();
        }
    }

    let all = |slug: &'static str| {
        let service = &h.service;
        let sender = sender.clone();
        async move { service.get_all_friendships(&sender, Some(slug)).await.unwrap().len() }
    };
    assert_eq!(all("acquaintances").await, 3);
    assert_eq!(all("family").await, 1);
    assert_eq!(all("close_friends").await, 0);
    assert_eq!(all("whatever").await, 5);
}

#[tokio::test]
async fn it_returns_accepted_user_friendships_by_group() {
    let h = Harness::new();
    let sender = user("sender");
    let recipients = users("recipient", 4);

    for recipient in &recipients {
        h.service.befriend(&sender, recipient).await.unwrap();
    }
    h.service.accept_friend_request(&recipients[0], &sender).await.unwrap();
    h.service.accept_friend_request(&recipients[1], &sender).await.unwrap();
    h.service.deny_friend_request(&recipients[2], &sender).await.unwrap();

    h.service.group_friend(&sender, &recipients[0], "family").await.unwrap();
    h.service.group_friend(&sender, &recipients[1], "family").await.unwrap();

    let accepted = h.service.get_accepted_friendships(&sender, Some("family")).await.unwrap();
    assert_eq!(accepted.len(), 2);
    let pending = h.service.get_pending_friendships(&sender, None).await.unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn it_returns_accepted_user_friendships_number_by_group() {
    let h = Harness::new();
    let sender = user("sender");
    let recipients = users("recipient", 5);

    for recipient in &recipients {
        befriended(&h, &sender, recipient).await;
        h.service.group_friend(&sender, recipient, "acquaintances").await.unwrap();
    }
    let last = recipients.last().unwrap();

    assert_eq!(h.service.get_friends_count(&sender, Some("acquaintances")).await.unwrap(), 5);
    assert_eq!(h.service.get_friends_count(&sender, Some("family")).await.unwrap(), 0);
    // the tag is the sender's view, not the recipient's
    assert_eq!(h.service.get_friends_count(last, Some("acquaintances")).await.unwrap(), 0);
    assert_eq!(h.service.get_friends_count(last, Some("family")).await.unwrap(), 0);
    assert_eq!(h.service.get_friends_count(last, None).await.unwrap(), 1);
}

#[tokio::test]
async fn it_returns_user_friends_by_group_per_page() {
    let h = Harness::new();
    let sender = user("sender");
    let r = users("recipient", 6);

    for recipient in &r {
        h.service.befriend(&sender, recipient).await.unwrap();
    }
    for i in [0, 1, 3, 4] {
        h.service.accept_friend_request(&r[i], &sender).await.unwrap();
    }
    h.service.deny_friend_request(&r[2], &sender).await.unwrap();

    for i in [0, 1, 3, 4] {
        h.service.group_friend(&sender, &r[i], "acquaintances").await.unwrap();
    }
    h.service.group_friend(&sender, &r[0], "close_friends").await.unwrap();
    h.service.group_friend(&sender, &r[3], "close_friends").await.unwrap();
    h.service.group_friend(&sender, &r[4], "family").await.unwrap();

    let friends = |per_page: u32, slug: &'static str| {
        let service = &h.service;
        let sender = sender.clone();
        async move {
            service
                .get_friends(&sender, PageRequest::per_page(per_page), Some(slug))
                .await
                .unwrap()
                .len()
        }
    };

    assert_eq!(friends(2, "acquaintances").await, 2);
    assert_eq!(friends(0, "acquaintances").await, 4);
    assert_eq!(friends(10, "acquaintances").await, 4);
    assert_eq!(friends(0, "close_friends").await, 2);
    assert_eq!(friends(1, "close_friends").await, 1);
    assert_eq!(friends(0, "family").await, 1);
}
