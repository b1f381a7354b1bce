//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, NewUser, ProfileUpdate, Role, User, UserCredentials, UserId};

use super::error_mapping::{Violation, impl_persistence_error_from, violation};
use super::models::{NewUserRow, UserProfileChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

impl_persistence_error_from!(UserPersistenceError);

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row = NewUserRow {
            id: Uuid::new_v4(),
            email: user.email.as_ref(),
            display_name: user.display_name.as_ref(),
            role: user.role.as_str(),
            password_hash: &user.password_hash,
        };

        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match violation(&err) {
                Some(Violation::Unique) => UserPersistenceError::duplicate(user.email.as_ref()),
                _ => err.into(),
            })?;
        Ok(stored.into_domain()?)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(UserRow::into_domain).transpose()?)
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await?;
        let found: Option<(UserRow, String)> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select((UserRow::as_select(), users::password_hash))
            .first(&mut conn)
            .await
            .optional()?;

        match found {
            Some((row, password_hash)) => Ok(Some(UserCredentials {
                user: row.into_domain()?,
                password_hash,
            })),
            None => Ok(None),
        }
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await?;
        let mut query = users::table
            .select(UserRow::as_select())
            .order((users::created_at.asc(), users::id.asc()))
            .into_boxed();
        if let Some(role) = role {
            query = query.filter(users::role.eq(role.as_str()));
        }
        let rows: Vec<UserRow> = query.load(&mut conn).await?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(Into::into))
            .collect()
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await?;
        let changes = UserProfileChangeset {
            display_name: update.display_name.as_ref().map(AsRef::as_ref),
            phone: update.phone.as_deref(),
            image_url: update.image_url.as_deref(),
            updated_at: Utc::now(),
        };
        let row: Option<UserRow> = diesel::update(users::table.find(id.as_uuid()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        Ok(row.map(UserRow::into_domain).transpose()?)
    }

    async fn set_role(&self, id: &UserId, role: Role) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<UserRow> = diesel::update(users::table.find(id.as_uuid()))
            .set((users::role.eq(role.as_str()), users::updated_at.eq(Utc::now())))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        Ok(row.map(UserRow::into_domain).transpose()?)
    }
}
