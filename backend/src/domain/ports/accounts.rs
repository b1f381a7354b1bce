//! Driving port for account use-cases: registration, login and profile
//! management.
//!
//! Inbound adapters call this port without knowing how credentials are
//! stored or hashed, which keeps handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Principal, ProfileUpdate, Registration, Role, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Accounts: Send + Sync {
    /// Create an account. Anonymous callers may only register clients.
    async fn register(&self, caller: Option<Principal>, registration: Registration) -> Result<User, Error>;

    /// Verify credentials and return the authenticated user.
    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error>;

    async fn current_user(&self, caller: &Principal) -> Result<User, Error>;

    async fn update_profile(&self, caller: &Principal, update: ProfileUpdate) -> Result<User, Error>;

    /// ADMIN only.
    async fn list_users(&self, caller: &Principal, role: Option<Role>) -> Result<Vec<User>, Error>;

    /// ADMIN only.
    async fn change_role(&self, caller: &Principal, user_id: UserId, role: Role) -> Result<User, Error>;
}
