//! Port for direct messages.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Message, NewMessage, TimelineKey, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by message repository adapters.
    pub enum MessagePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "message repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "message repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &NewMessage) -> Result<Message, MessagePersistenceError>;

    /// Messages exchanged between `a` and `b` in either direction, newest
    /// first, strictly after `after`.
    async fn conversation(
        &self,
        a: &UserId,
        b: &UserId,
        after: Option<TimelineKey>,
        limit: usize,
    ) -> Result<Vec<Message>, MessagePersistenceError>;

    /// Stamp `read_at` on unread messages from `sender` to `recipient`.
    async fn mark_read(
        &self,
        recipient: &UserId,
        sender: &UserId,
        at: DateTime<Utc>,
    ) -> Result<u64, MessagePersistenceError>;

    async fn unread_count(&self, recipient: &UserId) -> Result<u64, MessagePersistenceError>;
}

/// Repository used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessageRepository;

#[async_trait]
impl MessageRepository for FixtureMessageRepository {
    async fn create(&self, _message: &NewMessage) -> Result<Message, MessagePersistenceError> {
        Err(MessagePersistenceError::connection("no database configured"))
    }

    async fn conversation(
        &self,
        _a: &UserId,
        _b: &UserId,
        _after: Option<TimelineKey>,
        _limit: usize,
    ) -> Result<Vec<Message>, MessagePersistenceError> {
        Ok(Vec::new())
    }

    async fn mark_read(
        &self,
        _recipient: &UserId,
        _sender: &UserId,
        _at: DateTime<Utc>,
    ) -> Result<u64, MessagePersistenceError> {
        Ok(0)
    }

    async fn unread_count(&self, _recipient: &UserId) -> Result<u64, MessagePersistenceError> {
        Ok(0)
    }
}
