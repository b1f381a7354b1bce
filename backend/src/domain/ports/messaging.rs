//! Driving port for direct messages.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Content, Error, Message, Principal, UnreadCount, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Messaging: Send + Sync {
    async fn send(&self, caller: &Principal, recipient_id: UserId, body: Content) -> Result<Message, Error>;

    /// Messages between the caller and `other`, newest first.
    async fn conversation(
        &self,
        caller: &Principal,
        other: UserId,
        page: PageRequest,
    ) -> Result<Page<Message>, Error>;

    /// Mark messages from `other` to the caller as read; returns how many.
    async fn mark_read(&self, caller: &Principal, other: UserId) -> Result<u64, Error>;

    async fn unread_count(&self, caller: &Principal) -> Result<UnreadCount, Error>;
}
