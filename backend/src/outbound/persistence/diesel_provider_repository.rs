//! PostgreSQL-backed `ProviderRepository`: profiles, service menus, weekly
//! availability and social link clicks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ProviderPersistenceError, ProviderRepository};
use crate::domain::{
    AvailabilityWindow, Provider, ProviderProfile, Role, ServiceDraft, ServiceOffering,
    SocialPlatform, UserId,
};

use super::error_mapping::{Violation, count_u64, impl_persistence_error_from, violation};
use super::models::{
    AvailabilityRow, NewClickRow, ProviderProfileRow, ServiceChangeset, ServiceRow, UserRow,
    parse_platform,
};
use super::pool::DbPool;
use super::schema::{availability_windows, provider_profiles, services, social_clicks, users};

impl_persistence_error_from!(ProviderPersistenceError);

const PROVIDER_ROLES: [&str; 2] = [Role::Barber.as_str(), Role::Stylist.as_str()];

/// Diesel implementation of [`ProviderRepository`].
#[derive(Clone)]
pub struct DieselProviderRepository {
    pool: DbPool,
}

impl DieselProviderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_provider(
    user: UserRow,
    profile: Option<ProviderProfileRow>,
) -> Result<Provider, ProviderPersistenceError> {
    let user = user.into_domain()?;
    Ok(Provider {
        id: user.id,
        display_name: user.display_name,
        role: user.role,
        image_url: user.image_url,
        profile: profile.map(ProviderProfile::from),
    })
}

fn duration_column(minutes: u32) -> Result<i32, ProviderPersistenceError> {
    i32::try_from(minutes).map_err(|_| ProviderPersistenceError::query("duration out of range"))
}

fn availability_rows(barber_id: Uuid, windows: &[AvailabilityWindow]) -> Vec<AvailabilityRow> {
    windows
        .iter()
        .map(|window| AvailabilityRow {
            barber_id,
            day_of_week: i16::from(window.day_of_week().index()),
            start_minute: i32::from(window.start().minutes()),
            end_minute: i32::from(window.end().minutes()),
        })
        .collect()
}

#[async_trait]
impl ProviderRepository for DieselProviderRepository {
    async fn list_providers(&self) -> Result<Vec<Provider>, ProviderPersistenceError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<(UserRow, Option<ProviderProfileRow>)> = users::table
            .left_join(provider_profiles::table)
            .filter(users::role.eq_any(PROVIDER_ROLES))
            .order((users::display_name.asc(), users::id.asc()))
            .select((UserRow::as_select(), Option::<ProviderProfileRow>::as_select()))
            .load(&mut conn)
            .await?;
        rows.into_iter()
            .map(|(user, profile)| to_provider(user, profile))
            .collect()
    }

    async fn find_provider(&self, id: &UserId) -> Result<Option<Provider>, ProviderPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<(UserRow, Option<ProviderProfileRow>)> = users::table
            .left_join(provider_profiles::table)
            .filter(users::id.eq(id.as_uuid()))
            .filter(users::role.eq_any(PROVIDER_ROLES))
            .select((UserRow::as_select(), Option::<ProviderProfileRow>::as_select()))
            .first(&mut conn)
            .await
            .optional()?;
        row.map(|(user, profile)| to_provider(user, profile))
            .transpose()
    }

    async fn upsert_profile(
        &self,
        id: &UserId,
        profile: &ProviderProfile,
    ) -> Result<ProviderProfile, ProviderPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row = ProviderProfileRow {
            user_id: *id.as_uuid(),
            bio: profile.bio.clone(),
            instagram_url: profile.instagram_url.clone(),
            tiktok_url: profile.tiktok_url.clone(),
            facebook_url: profile.facebook_url.clone(),
            website_url: profile.website_url.clone(),
        };
        let stored: ProviderProfileRow = diesel::insert_into(provider_profiles::table)
            .values(&row)
            .on_conflict(provider_profiles::user_id)
            .do_update()
            .set((&row, provider_profiles::updated_at.eq(Utc::now())))
            .returning(ProviderProfileRow::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(stored.into())
    }

    async fn list_services(
        &self,
        barber_id: &UserId,
    ) -> Result<Vec<ServiceOffering>, ProviderPersistenceError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<ServiceRow> = services::table
            .filter(services::barber_id.eq(barber_id.as_uuid()))
            .order((services::price_cents.asc(), services::name.asc()))
            .select(ServiceRow::as_select())
            .load(&mut conn)
            .await?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(Into::into))
            .collect()
    }

    async fn find_service(&self, id: Uuid) -> Result<Option<ServiceOffering>, ProviderPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<ServiceRow> = services::table
            .find(id)
            .select(ServiceRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(ServiceRow::into_domain).transpose()?)
    }

    async fn create_service(
        &self,
        barber_id: &UserId,
        draft: &ServiceDraft,
    ) -> Result<ServiceOffering, ProviderPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row = ServiceRow {
            id: Uuid::new_v4(),
            barber_id: *barber_id.as_uuid(),
            name: draft.name().to_owned(),
            description: draft.description().map(str::to_owned),
            price_cents: draft.price_cents(),
            duration_minutes: duration_column(draft.duration_minutes())?,
            created_at: Utc::now(),
        };
        let stored: ServiceRow = diesel::insert_into(services::table)
            .values(&row)
            .returning(ServiceRow::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(stored.into_domain()?)
    }

    async fn update_service(
        &self,
        id: Uuid,
        draft: &ServiceDraft,
    ) -> Result<Option<ServiceOffering>, ProviderPersistenceError> {
        let mut conn = self.pool.get().await?;
        let changes = ServiceChangeset {
            name: draft.name(),
            description: draft.description(),
            price_cents: draft.price_cents(),
            duration_minutes: duration_column(draft.duration_minutes())?,
        };
        let row: Option<ServiceRow> = diesel::update(services::table.find(id))
            .set(&changes)
            .returning(ServiceRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        Ok(row.map(ServiceRow::into_domain).transpose()?)
    }

    async fn delete_service(&self, id: Uuid) -> Result<bool, ProviderPersistenceError> {
        let mut conn = self.pool.get().await?;
        let deleted = diesel::delete(services::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(|err| match violation(&err) {
                Some(Violation::ForeignKey) => {
                    ProviderPersistenceError::in_use("service has appointments")
                }
                _ => err.into(),
            })?;
        Ok(deleted > 0)
    }

    async fn availability(
        &self,
        barber_id: &UserId,
    ) -> Result<Vec<AvailabilityWindow>, ProviderPersistenceError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<AvailabilityRow> = availability_windows::table
            .filter(availability_windows::barber_id.eq(barber_id.as_uuid()))
            .order((
                availability_windows::day_of_week.asc(),
                availability_windows::start_minute.asc(),
            ))
            .select(AvailabilityRow::as_select())
            .load(&mut conn)
            .await?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(Into::into))
            .collect()
    }

    async fn replace_availability(
        &self,
        barber_id: &UserId,
        windows: &[AvailabilityWindow],
    ) -> Result<(), ProviderPersistenceError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let barber = *barber_id.as_uuid();
        let rows = availability_rows(barber, windows);
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::delete(
                    availability_windows::table.filter(availability_windows::barber_id.eq(barber)),
                )
                .execute(conn)
                .await?;
                if !rows.is_empty() {
                    diesel::insert_into(availability_windows::table)
                        .values(&rows)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await?;
        Ok(())
    }

    async fn record_click(
        &self,
        barber_id: &UserId,
        platform: SocialPlatform,
        at: DateTime<Utc>,
    ) -> Result<(), ProviderPersistenceError> {
        let mut conn = self.pool.get().await?;
        diesel::insert_into(social_clicks::table)
            .values(&NewClickRow {
                id: Uuid::new_v4(),
                barber_id: *barber_id.as_uuid(),
                platform: platform.as_str(),
                clicked_at: at,
            })
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    async fn click_counts(
        &self,
        barber_id: &UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<(SocialPlatform, u64)>, ProviderPersistenceError> {
        let mut conn = self.pool.get().await?;
        let since = since.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let rows: Vec<(String, i64)> = social_clicks::table
            .filter(social_clicks::barber_id.eq(barber_id.as_uuid()))
            .filter(social_clicks::clicked_at.ge(since))
            .group_by(social_clicks::platform)
            .select((social_clicks::platform, count_star()))
            .load(&mut conn)
            .await?;
        rows.into_iter()
            .map(|(platform, count)| -> Result<_, ProviderPersistenceError> {
                Ok((parse_platform(&platform)?, count_u64(count)))
            })
            .collect()
    }
}
