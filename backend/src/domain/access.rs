//! Role checks applied by every service operation.

use serde::{Deserialize, Serialize};

use crate::domain::{Error, Role, UserId};

/// The authenticated caller, as restored from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    pub const fn is_provider(&self) -> bool {
        self.role.is_provider()
    }

    /// Require the ADMIN role.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("admin role required"))
        }
    }

    /// Require BARBER or STYLIST.
    pub fn require_provider(&self) -> Result<(), Error> {
        if self.is_provider() {
            Ok(())
        } else {
            Err(Error::forbidden("barber or stylist role required"))
        }
    }

    /// Require BARBER, STYLIST or ADMIN.
    pub fn require_provider_or_admin(&self) -> Result<(), Error> {
        if self.is_provider() || self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("barber, stylist or admin role required"))
        }
    }

    /// Allow the owner of a resource or an admin.
    pub fn require_owner_or_admin(&self, owner: &UserId) -> Result<(), Error> {
        if self.is_admin() || &self.user_id == owner {
            Ok(())
        } else {
            Err(Error::forbidden("not permitted to modify this resource"))
        }
    }

    /// Allow any of the listed participants or an admin.
    pub fn require_participant_or_admin(&self, participants: &[UserId]) -> Result<(), Error> {
        if self.is_admin() || participants.contains(&self.user_id) {
            Ok(())
        } else {
            Err(Error::forbidden("not a participant"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn principal(role: Role) -> Principal {
        Principal::new(UserId::random(), role)
    }

    #[rstest]
    #[case(Role::Admin, true, false, true)]
    #[case(Role::Barber, false, true, true)]
    #[case(Role::Stylist, false, true, true)]
    #[case(Role::Client, false, false, false)]
    fn role_matrix(
        #[case] role: Role,
        #[case] admin: bool,
        #[case] provider: bool,
        #[case] provider_or_admin: bool,
    ) {
        let caller = principal(role);
        assert_eq!(caller.require_admin().is_ok(), admin);
        assert_eq!(caller.require_provider().is_ok(), provider);
        assert_eq!(caller.require_provider_or_admin().is_ok(), provider_or_admin);
    }

    #[rstest]
    fn owner_check_allows_owner_and_admin_only() {
        let owner = principal(Role::Barber);
        let stranger = principal(Role::Barber);
        let admin = principal(Role::Admin);

        assert!(owner.require_owner_or_admin(&owner.user_id).is_ok());
        assert!(admin.require_owner_or_admin(&owner.user_id).is_ok());
        let err = stranger
            .require_owner_or_admin(&owner.user_id)
            .expect_err("stranger is rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    fn participant_check_accepts_any_listed_user() {
        let client = principal(Role::Client);
        let barber = principal(Role::Barber);
        let other = principal(Role::Client);
        let participants = [client.user_id, barber.user_id];

        assert!(client.require_participant_or_admin(&participants).is_ok());
        assert!(barber.require_participant_or_admin(&participants).is_ok());
        assert!(other.require_participant_or_admin(&participants).is_err());
    }
}
