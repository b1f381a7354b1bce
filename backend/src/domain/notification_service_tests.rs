//! Tests for notification dispatch.
use super::*;
use crate::domain::ports::{
    MockPushSender, MockPushSubscriptionRepository, PushSendError,
    PushSubscriptionPersistenceError,
};
use crate::domain::test_support::{fixture_now, principal};
use crate::domain::{ErrorCode, Role};
use rstest::rstest;
use uuid::Uuid;

fn subscription(user_id: UserId, endpoint: &str) -> PushSubscription {
    PushSubscription {
        id: Uuid::new_v4(),
        user_id,
        endpoint: endpoint.to_owned(),
        p256dh: "key".into(),
        auth: "auth".into(),
        created_at: fixture_now(),
    }
}

#[rstest]
#[tokio::test]
async fn dispatch_tallies_each_outcome() {
    let user_id = UserId::random();
    let mut subscriptions = MockPushSubscriptionRepository::new();
    subscriptions.expect_list_for_user().return_once(move |_| {
        Ok(vec![
            subscription(user_id, "https://push.example/ok"),
            subscription(user_id, "https://push.example/gone"),
            subscription(user_id, "https://push.example/down"),
        ])
    });
    subscriptions
        .expect_delete_endpoint()
        .withf(|endpoint| endpoint == "https://push.example/gone")
        .times(1)
        .return_once(|_| Ok(true));

    let mut sender = MockPushSender::new();
    sender
        .expect_send()
        .returning(|subscription, _| match subscription.endpoint.as_str() {
            "https://push.example/ok" => Ok(PushOutcome::Delivered),
            "https://push.example/gone" => Ok(PushOutcome::Gone),
            _ => Err(PushSendError::transport("timed out")),
        });

    let service = NotificationService::new(Arc::new(subscriptions), Arc::new(sender));
    let report = service
        .notify_user(user_id, Notification::new("Hi", "there"))
        .await;
    assert_eq!(
        report,
        DispatchReport {
            delivered: 1,
            removed: 1,
            failed: 1,
        }
    );
}

#[rstest]
#[tokio::test]
async fn repository_failure_yields_empty_report() {
    let mut subscriptions = MockPushSubscriptionRepository::new();
    subscriptions
        .expect_list_for_user()
        .return_once(|_| Err(PushSubscriptionPersistenceError::connection("down")));
    let mut sender = MockPushSender::new();
    sender.expect_send().never();

    let service = NotificationService::new(Arc::new(subscriptions), Arc::new(sender));
    let report = service
        .notify_user(UserId::random(), Notification::test())
        .await;
    assert_eq!(report, DispatchReport::default());
}

#[rstest]
#[case(Role::Client)]
#[case(Role::Barber)]
#[tokio::test]
async fn send_test_requires_admin(#[case] role: Role) {
    let service = NotificationService::new(
        Arc::new(MockPushSubscriptionRepository::new()),
        Arc::new(MockPushSender::new()),
    );
    let err = service
        .send_test(&principal(role), UserId::random())
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn subscribe_stores_for_caller() {
    let caller = principal(Role::Client);
    let owner = caller.user_id;
    let mut subscriptions = MockPushSubscriptionRepository::new();
    subscriptions
        .expect_upsert()
        .withf(move |user_id, draft| *user_id == owner && draft.endpoint == "https://push.example/a")
        .return_once(move |_, draft| Ok(subscription(owner, &draft.endpoint)));
    let service = NotificationService::new(Arc::new(subscriptions), Arc::new(MockPushSender::new()));

    let draft = SubscriptionDraft::try_new("https://push.example/a", "k", "a").expect("draft");
    let stored = service.subscribe(&caller, draft).await.expect("stored");
    assert_eq!(stored.user_id, owner);
}
