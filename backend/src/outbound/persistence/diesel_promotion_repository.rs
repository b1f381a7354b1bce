//! PostgreSQL-backed `PromotionRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PromotionPersistenceError, PromotionRepository};
use crate::domain::{Promotion, PromotionDraft, UserId};

use super::error_mapping::{impl_persistence_error_from, rows_u64};
use super::models::PromotionRow;
use super::pool::DbPool;
use super::schema::promotions;

impl_persistence_error_from!(PromotionPersistenceError);

/// Diesel implementation of [`PromotionRepository`].
#[derive(Clone)]
pub struct DieselPromotionRepository {
    pool: DbPool,
}

impl DieselPromotionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromotionRepository for DieselPromotionRepository {
    async fn create(&self, draft: &PromotionDraft) -> Result<Promotion, PromotionPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row = PromotionRow {
            id: Uuid::new_v4(),
            barber_id: draft.barber_id.map(|id| *id.as_uuid()),
            title: draft.title.clone(),
            description: draft.description.clone(),
            discount_percent: i16::from(draft.discount_percent),
            starts_at: draft.starts_at,
            ends_at: draft.ends_at,
            active: true,
            created_at: Utc::now(),
        };
        let stored: PromotionRow = diesel::insert_into(promotions::table)
            .values(&row)
            .returning(PromotionRow::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(stored.into_domain()?)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Promotion>, PromotionPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<PromotionRow> = promotions::table
            .find(id)
            .select(PromotionRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(PromotionRow::into_domain).transpose()?)
    }

    async fn list_live(
        &self,
        barber_id: Option<UserId>,
        at: DateTime<Utc>,
    ) -> Result<Vec<Promotion>, PromotionPersistenceError> {
        let mut conn = self.pool.get().await?;
        let mut query = promotions::table
            .filter(promotions::active.eq(true))
            .filter(promotions::starts_at.le(at))
            .filter(promotions::ends_at.gt(at))
            .order((promotions::starts_at.asc(), promotions::id.asc()))
            .select(PromotionRow::as_select())
            .into_boxed();
        if let Some(barber_id) = barber_id {
            query = query.filter(
                promotions::barber_id
                    .is_null()
                    .or(promotions::barber_id.eq(*barber_id.as_uuid())),
            );
        }
        let rows: Vec<PromotionRow> = query.load(&mut conn).await?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(Into::into))
            .collect()
    }

    async fn deactivate(&self, id: Uuid) -> Result<Option<Promotion>, PromotionPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<PromotionRow> = diesel::update(promotions::table.find(id))
            .set(promotions::active.eq(false))
            .returning(PromotionRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        Ok(row.map(PromotionRow::into_domain).transpose()?)
    }

    async fn expire_ended(&self, now: DateTime<Utc>) -> Result<u64, PromotionPersistenceError> {
        let mut conn = self.pool.get().await?;
        let updated = diesel::update(
            promotions::table
                .filter(promotions::active.eq(true))
                .filter(promotions::ends_at.le(now)),
        )
        .set(promotions::active.eq(false))
        .execute(&mut conn)
        .await?;
        Ok(rows_u64(updated))
    }
}
