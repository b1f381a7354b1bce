//! PostgreSQL-backed `MessageRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{MessagePersistenceError, MessageRepository};
use crate::domain::{Message, NewMessage, TimelineKey, UserId};

use super::error_mapping::{count_u64, impl_persistence_error_from, rows_u64};
use super::models::MessageRow;
use super::pool::DbPool;
use super::schema::messages;

impl_persistence_error_from!(MessagePersistenceError);

/// Diesel implementation of [`MessageRepository`].
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn create(&self, message: &NewMessage) -> Result<Message, MessagePersistenceError> {
        let mut conn = self.pool.get().await?;
        let row = MessageRow {
            id: Uuid::new_v4(),
            sender_id: *message.sender_id.as_uuid(),
            recipient_id: *message.recipient_id.as_uuid(),
            body: message.body.as_str().to_owned(),
            read_at: None,
            created_at: Utc::now(),
        };
        let stored: MessageRow = diesel::insert_into(messages::table)
            .values(&row)
            .returning(MessageRow::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(stored.into())
    }

    async fn conversation(
        &self,
        a: &UserId,
        b: &UserId,
        after: Option<TimelineKey>,
        limit: usize,
    ) -> Result<Vec<Message>, MessagePersistenceError> {
        let mut conn = self.pool.get().await?;
        let (a, b) = (*a.as_uuid(), *b.as_uuid());
        let mut query = messages::table
            .filter(
                messages::sender_id
                    .eq(a)
                    .and(messages::recipient_id.eq(b))
                    .or(messages::sender_id.eq(b).and(messages::recipient_id.eq(a))),
            )
            .order((messages::created_at.desc(), messages::id.desc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(MessageRow::as_select())
            .into_boxed();
        if let Some(key) = after {
            query = query.filter(
                messages::created_at.lt(key.created_at).or(messages::created_at
                    .eq(key.created_at)
                    .and(messages::id.lt(key.id))),
            );
        }
        let rows: Vec<MessageRow> = query.load(&mut conn).await?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn mark_read(
        &self,
        recipient: &UserId,
        sender: &UserId,
        at: DateTime<Utc>,
    ) -> Result<u64, MessagePersistenceError> {
        let mut conn = self.pool.get().await?;
        let updated = diesel::update(
            messages::table
                .filter(messages::recipient_id.eq(recipient.as_uuid()))
                .filter(messages::sender_id.eq(sender.as_uuid()))
                .filter(messages::read_at.is_null()),
        )
        .set(messages::read_at.eq(at))
        .execute(&mut conn)
        .await?;
        Ok(rows_u64(updated))
    }

    async fn unread_count(&self, recipient: &UserId) -> Result<u64, MessagePersistenceError> {
        let mut conn = self.pool.get().await?;
        let count: i64 = messages::table
            .filter(messages::recipient_id.eq(recipient.as_uuid()))
            .filter(messages::read_at.is_null())
            .select(count_star())
            .first(&mut conn)
            .await?;
        Ok(count_u64(count))
    }
}
