//! Tests for the account service.
use super::*;
use crate::domain::ports::{MockPasswordHasher, MockUserRepository, UserPersistenceError};
use crate::domain::test_support::{principal, user};
use crate::domain::{ErrorCode, UserCredentials};
use mockall::predicate::eq;
use rstest::rstest;

fn service(users: MockUserRepository, hasher: MockPasswordHasher) -> AccountService<MockUserRepository, MockPasswordHasher> {
    AccountService::new(Arc::new(users), Arc::new(hasher))
}

fn registration(role: Option<Role>) -> Registration {
    Registration::try_from_parts("ada@example.com", "correct horse", "Ada", role)
        .expect("valid registration")
}

#[rstest]
#[tokio::test]
async fn anonymous_client_registration_hashes_password() {
    let mut users = MockUserRepository::new();
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .with(eq("correct horse"))
        .times(1)
        .return_once(|_| Ok("bcrypt-hash".into()));
    users
        .expect_create()
        .withf(|new_user| new_user.password_hash == "bcrypt-hash" && new_user.role == Role::Client)
        .times(1)
        .return_once(|new_user| Ok(user(UserId::random(), new_user.display_name.as_ref(), new_user.role)));

    let created = service(users, hasher)
        .register(None, registration(None))
        .await
        .expect("registration succeeds");
    assert_eq!(created.role, Role::Client);
}

#[rstest]
#[case(None)]
#[case(Some(Role::Client))]
#[case(Some(Role::Barber))]
#[tokio::test]
async fn staff_registration_requires_admin(#[case] caller_role: Option<Role>) {
    let caller = caller_role.map(principal);
    let err = service(MockUserRepository::new(), MockPasswordHasher::new())
        .register(caller, registration(Some(Role::Barber)))
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let mut users = MockUserRepository::new();
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().return_once(|_| Ok("hash".into()));
    users
        .expect_create()
        .return_once(|_| Err(UserPersistenceError::duplicate("ada@example.com")));

    let err = service(users, hasher)
        .register(Some(principal(Role::Admin)), registration(Some(Role::Stylist)))
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(None, false)]
#[case(Some("hash"), false)]
#[case(Some("hash"), true)]
#[tokio::test]
async fn login_outcomes(#[case] stored_hash: Option<&'static str>, #[case] password_matches: bool) {
    let mut users = MockUserRepository::new();
    let mut hasher = MockPasswordHasher::new();
    let id = UserId::random();
    users.expect_find_credentials().return_once(move |_| {
        Ok(stored_hash.map(|hash| UserCredentials {
            user: user(id, "Ada", Role::Client),
            password_hash: hash.into(),
        }))
    });
    hasher
        .expect_hash()
        .times(usize::from(stored_hash.is_none()))
        .returning(|_| Ok("dummy".into()));
    hasher
        .expect_verify()
        .times(1)
        .returning(move |_, _| Ok(password_matches));

    let credentials = LoginCredentials::try_from_parts("ada@example.com", "pw").expect("creds");
    let result = service(users, hasher).login(credentials).await;
    match (stored_hash, password_matches) {
        (Some(_), true) => assert_eq!(result.expect("login succeeds").id, id),
        _ => {
            let err = result.expect_err("login fails");
            assert_eq!(err.code(), ErrorCode::Unauthorized);
            assert_eq!(err.message(), INVALID_CREDENTIALS);
        }
    }
}

#[rstest]
#[tokio::test]
async fn unknown_emails_still_pay_for_a_verification() {
    let mut users = MockUserRepository::new();
    let mut hasher = MockPasswordHasher::new();
    users.expect_find_credentials().times(2).returning(|_| Ok(None));
    hasher
        .expect_hash()
        .with(eq(DUMMY_PASSWORD))
        .times(1)
        .returning(|_| Ok("dummy-hash".into()));
    hasher
        .expect_verify()
        .withf(|password, hash| password == "pw" && hash == "dummy-hash")
        .times(2)
        .returning(|_, _| Ok(false));

    let service = service(users, hasher);
    for _ in 0..2 {
        let credentials = LoginCredentials::try_from_parts("ghost@example.com", "pw").expect("creds");
        let err = service.login(credentials).await.expect_err("unknown email");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }
}

#[rstest]
#[tokio::test]
async fn malformed_hash_is_reported_as_invalid_credentials() {
    let mut users = MockUserRepository::new();
    let mut hasher = MockPasswordHasher::new();
    users.expect_find_credentials().return_once(|_| {
        Ok(Some(UserCredentials {
            user: user(UserId::random(), "Ada", Role::Client),
            password_hash: "plain".into(),
        }))
    });
    hasher
        .expect_verify()
        .return_once(|_, _| Err(PasswordHashError::malformed_hash("bad prefix")));

    let credentials = LoginCredentials::try_from_parts("ada@example.com", "pw").expect("creds");
    let err = service(users, hasher).login(credentials).await.expect_err("fails");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn list_users_is_admin_only() {
    let err = service(MockUserRepository::new(), MockPasswordHasher::new())
        .list_users(&principal(Role::Barber), None)
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn admin_cannot_demote_themselves() {
    let admin = principal(Role::Admin);
    let err = service(MockUserRepository::new(), MockPasswordHasher::new())
        .change_role(&admin, admin.user_id, Role::Client)
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn change_role_of_missing_user_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));
    let err = service(users, MockPasswordHasher::new())
        .change_role(&principal(Role::Admin), UserId::random(), Role::Barber)
        .await
        .expect_err("not found");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn change_role_updates_existing_user() {
    let target = UserId::random();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user(target, "Jo", Role::Client))));
    users
        .expect_set_role()
        .with(eq(target), eq(Role::Barber))
        .return_once(move |_, role| Ok(Some(user(target, "Jo", role))));
    let updated = service(users, MockPasswordHasher::new())
        .change_role(&principal(Role::Admin), target, Role::Barber)
        .await
        .expect("role changed");
    assert_eq!(updated.role, Role::Barber);
}
