//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, NewUser, ProfileUpdate, Role, User, UserCredentials, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Email already registered.
        Duplicate { message: String } => "user already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user together with the stored password hash.
    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError>;

    /// List users, optionally restricted to one role, oldest first.
    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, UserPersistenceError>;

    /// Apply a profile update; `None` when the user does not exist.
    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Change a user's role; `None` when the user does not exist.
    async fn set_role(&self, id: &UserId, role: Role) -> Result<Option<User>, UserPersistenceError>;
}

/// Repository used when no database is configured: reads find nothing and
/// writes report the store as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn create(&self, _user: &NewUser) -> Result<User, UserPersistenceError> {
        Err(UserPersistenceError::connection("no database configured"))
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_credentials(
        &self,
        _email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        Ok(None)
    }

    async fn list(&self, _role: Option<Role>) -> Result<Vec<User>, UserPersistenceError> {
        Ok(Vec::new())
    }

    async fn update_profile(
        &self,
        _id: &UserId,
        _update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn set_role(&self, _id: &UserId, _role: Role) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }
}
