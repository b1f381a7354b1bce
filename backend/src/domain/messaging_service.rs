//! Direct messages between users.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::{debug, info};

use crate::domain::ports::{MessageRepository, Messaging, Notifications, UserRepository};
use crate::domain::repository_errors::{map_message_error, map_user_error};
use crate::domain::social_service::{cursor_encoding, invalid_cursor};
use crate::domain::{
    Content, Error, Message, NewMessage, Notification, Principal, TimelineKey, UnreadCount, User,
    UserId,
};

/// Messaging service implementing the [`Messaging`] driving port.
#[derive(Clone)]
pub struct MessagingService<M, U> {
    messages: Arc<M>,
    users: Arc<U>,
    notifier: Arc<dyn Notifications>,
    clock: Arc<dyn Clock>,
}

impl<M, U> MessagingService<M, U> {
    pub fn new(
        messages: Arc<M>,
        users: Arc<U>,
        notifier: Arc<dyn Notifications>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            messages,
            users,
            notifier,
            clock,
        }
    }
}

impl<M, U> MessagingService<M, U>
where
    M: MessageRepository,
    U: UserRepository,
{
    async fn counterpart(&self, caller: &Principal, other: &UserId) -> Result<User, Error> {
        if &caller.user_id == other {
            return Err(Error::invalid_request("cannot message yourself"));
        }
        self.users
            .find_by_id(other)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {other} not found")))
    }
}

#[async_trait]
impl<M, U> Messaging for MessagingService<M, U>
where
    M: MessageRepository,
    U: UserRepository,
{
    async fn send(&self, caller: &Principal, recipient_id: UserId, body: Content) -> Result<Message, Error> {
        self.counterpart(caller, &recipient_id).await?;
        let message = self
            .messages
            .create(&NewMessage {
                sender_id: caller.user_id,
                recipient_id,
                body,
            })
            .await
            .map_err(map_message_error)?;
        info!(message_id = %message.id, sender_id = %caller.user_id, %recipient_id, "message sent");

        let sender_name = match self.users.find_by_id(&caller.user_id).await {
            Ok(Some(sender)) => sender.display_name.to_string(),
            _ => "Someone".to_owned(),
        };
        self.notifier
            .notify_user(
                recipient_id,
                Notification::new_message(&sender_name, caller.user_id),
            )
            .await;
        Ok(message)
    }

    async fn conversation(
        &self,
        caller: &Principal,
        other: UserId,
        page: PageRequest,
    ) -> Result<Page<Message>, Error> {
        self.counterpart(caller, &other).await?;
        let after = page
            .decode_cursor::<TimelineKey>()
            .map_err(invalid_cursor)?;
        let rows = self
            .messages
            .conversation(&caller.user_id, &other, after, page.fetch_limit())
            .await
            .map_err(map_message_error)?;
        Page::from_overfetched(rows, &page, Message::timeline_key).map_err(cursor_encoding)
    }

    async fn mark_read(&self, caller: &Principal, other: UserId) -> Result<u64, Error> {
        let marked = self
            .messages
            .mark_read(&caller.user_id, &other, self.clock.utc())
            .await
            .map_err(map_message_error)?;
        debug!(user_id = %caller.user_id, %other, marked, "messages marked read");
        Ok(marked)
    }

    async fn unread_count(&self, caller: &Principal) -> Result<UnreadCount, Error> {
        let unread = self
            .messages
            .unread_count(&caller.user_id)
            .await
            .map_err(map_message_error)?;
        Ok(UnreadCount { unread })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockMessageRepository, MockNotifications, MockUserRepository};
    use crate::domain::test_support::{fixture_clock, fixture_now, principal, user};
    use crate::domain::{DispatchReport, ErrorCode, Role};
    use rstest::rstest;
    use uuid::Uuid;

    type Service = MessagingService<MockMessageRepository, MockUserRepository>;

    fn make(
        messages: MockMessageRepository,
        users: MockUserRepository,
        notifier: MockNotifications,
    ) -> Service {
        MessagingService::new(
            Arc::new(messages),
            Arc::new(users),
            Arc::new(notifier),
            fixture_clock(),
        )
    }

    fn stored(message: &NewMessage) -> Message {
        Message {
            id: Uuid::new_v4(),
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            body: message.body.as_str().to_owned(),
            read_at: None,
            created_at: fixture_now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn messaging_yourself_is_rejected() {
        let caller = principal(Role::Client);
        let err = make(
            MockMessageRepository::new(),
            MockUserRepository::new(),
            MockNotifications::new(),
        )
        .send(&caller, caller.user_id, Content::new("hi").expect("content"))
        .await
        .expect_err("self message");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_recipient_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        let err = make(MockMessageRepository::new(), users, MockNotifications::new())
            .send(
                &principal(Role::Client),
                UserId::random(),
                Content::new("hi").expect("content"),
            )
            .await
            .expect_err("missing recipient");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn sending_notifies_the_recipient() {
        let caller = principal(Role::Client);
        let sender = caller.user_id;
        let recipient = UserId::random();
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |id| {
            let name = if *id == sender { "Ada" } else { "Jo" };
            Ok(Some(user(*id, name, Role::Barber)))
        });
        let mut messages = MockMessageRepository::new();
        messages
            .expect_create()
            .return_once(|message| Ok(stored(message)));
        let mut notifier = MockNotifications::new();
        notifier
            .expect_notify_user()
            .withf(move |user_id, notification| {
                *user_id == recipient && notification.body == "Ada sent you a message"
            })
            .times(1)
            .return_once(|_, _| DispatchReport::default());

        let message = make(messages, users, notifier)
            .send(&caller, recipient, Content::new(" hello ").expect("content"))
            .await
            .expect("sent");
        assert_eq!(message.body, "hello");
    }

    #[rstest]
    #[tokio::test]
    async fn mark_read_targets_messages_to_the_caller() {
        let caller = principal(Role::Client);
        let me = caller.user_id;
        let other = UserId::random();
        let mut messages = MockMessageRepository::new();
        messages
            .expect_mark_read()
            .withf(move |recipient, sender, at| {
                *recipient == me && *sender == other && *at == fixture_now()
            })
            .return_once(|_, _, _| Ok(3));
        let marked = make(messages, MockUserRepository::new(), MockNotifications::new())
            .mark_read(&caller, other)
            .await
            .expect("marked");
        assert_eq!(marked, 3);
    }
}
