//! PostgreSQL-backed `PushSubscriptionRepository`. Endpoints are unique, so
//! re-subscribing a browser moves the row to the new owner.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PushSubscriptionPersistenceError, PushSubscriptionRepository};
use crate::domain::{PushSubscription, SubscriptionDraft, UserId};

use super::error_mapping::impl_persistence_error_from;
use super::models::PushSubscriptionRow;
use super::pool::DbPool;
use super::schema::push_subscriptions;

impl_persistence_error_from!(PushSubscriptionPersistenceError);

/// Diesel implementation of [`PushSubscriptionRepository`].
#[derive(Clone)]
pub struct DieselPushSubscriptionRepository {
    pool: DbPool,
}

impl DieselPushSubscriptionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PushSubscriptionRepository for DieselPushSubscriptionRepository {
    async fn upsert(
        &self,
        user_id: &UserId,
        draft: &SubscriptionDraft,
    ) -> Result<PushSubscription, PushSubscriptionPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row = PushSubscriptionRow {
            id: Uuid::new_v4(),
            user_id: *user_id.as_uuid(),
            endpoint: draft.endpoint.clone(),
            p256dh: draft.p256dh.clone(),
            auth: draft.auth.clone(),
            created_at: Utc::now(),
        };
        let stored: PushSubscriptionRow = diesel::insert_into(push_subscriptions::table)
            .values(&row)
            .on_conflict(push_subscriptions::endpoint)
            .do_update()
            .set((
                push_subscriptions::user_id.eq(excluded(push_subscriptions::user_id)),
                push_subscriptions::p256dh.eq(excluded(push_subscriptions::p256dh)),
                push_subscriptions::auth.eq(excluded(push_subscriptions::auth)),
            ))
            .returning(PushSubscriptionRow::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(stored.into())
    }

    async fn delete(
        &self,
        user_id: &UserId,
        endpoint: &str,
    ) -> Result<bool, PushSubscriptionPersistenceError> {
        let mut conn = self.pool.get().await?;
        let deleted = diesel::delete(
            push_subscriptions::table
                .filter(push_subscriptions::user_id.eq(user_id.as_uuid()))
                .filter(push_subscriptions::endpoint.eq(endpoint)),
        )
        .execute(&mut conn)
        .await?;
        Ok(deleted > 0)
    }

    async fn delete_endpoint(&self, endpoint: &str) -> Result<bool, PushSubscriptionPersistenceError> {
        let mut conn = self.pool.get().await?;
        let deleted = diesel::delete(
            push_subscriptions::table.filter(push_subscriptions::endpoint.eq(endpoint)),
        )
        .execute(&mut conn)
        .await?;
        Ok(deleted > 0)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PushSubscription>, PushSubscriptionPersistenceError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<PushSubscriptionRow> = push_subscriptions::table
            .filter(push_subscriptions::user_id.eq(user_id.as_uuid()))
            .order(push_subscriptions::created_at.asc())
            .select(PushSubscriptionRow::as_select())
            .load(&mut conn)
            .await?;
        Ok(rows.into_iter().map(PushSubscription::from).collect())
    }
}
