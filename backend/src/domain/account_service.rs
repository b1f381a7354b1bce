//! Account use-cases: registration, login, profile and role management.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::ports::{Accounts, PasswordHashError, PasswordHasher, UserRepository};
use crate::domain::repository_errors::{map_hash_error, map_user_error};
use crate::domain::{
    Error, LoginCredentials, NewUser, Principal, ProfileUpdate, Registration, Role, User, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Verified against when an email is unknown, so both login failures cost
/// one hash comparison.
const DUMMY_PASSWORD: &str = "barberbook-unknown-account";

/// Account service implementing the [`Accounts`] driving port.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    dummy_hash: Arc<OnceCell<String>>,
}

impl<U, H> AccountService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self {
            users,
            hasher,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn existing_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    /// Spend a verification on a hash made with the configured cost.
    async fn verify_dummy(&self, password: &str) {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| self.hasher.hash(DUMMY_PASSWORD))
            .await;
        let outcome = match hash {
            Ok(hash) => self.hasher.verify(password, hash).await.map(|_| ()),
            Err(err) => Err(err),
        };
        if let Err(error) = outcome {
            debug!(%error, "dummy password verification failed");
        }
    }
}

#[async_trait]
impl<U, H> Accounts for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, caller: Option<Principal>, registration: Registration) -> Result<User, Error> {
        if registration.role() != Role::Client {
            caller
                .ok_or_else(|| Error::forbidden("only an admin may register staff accounts"))?
                .require_admin()?;
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;
        let user = self
            .users
            .create(&NewUser {
                email: registration.email().clone(),
                display_name: registration.display_name().clone(),
                role: registration.role(),
                password_hash,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, role = %user.role, "account registered");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error> {
        let Some(stored) = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            self.verify_dummy(credentials.password()).await;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        match self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
        {
            Ok(true) => Ok(stored.user),
            Ok(false) => Err(Error::unauthorized(INVALID_CREDENTIALS)),
            Err(PasswordHashError::MalformedHash { message }) => {
                warn!(user_id = %stored.user.id, error = %message, "stored password hash is malformed");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
            Err(err) => Err(map_hash_error(err)),
        }
    }

    async fn current_user(&self, caller: &Principal) -> Result<User, Error> {
        self.users
            .find_by_id(&caller.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))
    }

    async fn update_profile(&self, caller: &Principal, update: ProfileUpdate) -> Result<User, Error> {
        self.users
            .update_profile(&caller.user_id, &update)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))
    }

    async fn list_users(&self, caller: &Principal, role: Option<Role>) -> Result<Vec<User>, Error> {
        caller.require_admin()?;
        self.users.list(role).await.map_err(map_user_error)
    }

    async fn change_role(&self, caller: &Principal, user_id: UserId, role: Role) -> Result<User, Error> {
        caller.require_admin()?;
        if user_id == caller.user_id && role != Role::Admin {
            return Err(Error::invalid_request("admins cannot remove their own admin role"));
        }
        self.existing_user(&user_id).await?;
        let user = self
            .users
            .set_role(&user_id, role)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;
        info!(user_id = %user.id, role = %role, changed_by = %caller.user_id, "role changed");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
