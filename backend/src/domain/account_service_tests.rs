//! Tests for the account service.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockAuthTokenRepository, MockUserRepository, UserCredentials};
use crate::domain::{ErrorCode, Password};

struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(now)))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        match self.0.lock() {
            Ok(guard) => *guard,
            Err(_) => panic!("clock mutex poisoned"),
        }
    }
}

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid time")
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: Email::new(email).expect("valid email"),
        password: Password::presented(password),
    }
}

fn stored_user(email: &str, password: &str) -> UserCredentials {
    UserCredentials {
        user: User::new(
            UserId::random(),
            Email::new(email).expect("valid email"),
            UserRole::Customer,
        ),
        password_hash: PasswordHash::derive(&Password::new(password).expect("valid password"))
            .expect("hash"),
    }
}

fn service(
    users: MockUserRepository,
    tokens: MockAuthTokenRepository,
    now: DateTime<Utc>,
) -> AccountService<MockUserRepository, MockAuthTokenRepository> {
    AccountService::new(
        Arc::new(users),
        Arc::new(tokens),
        FixedClock::at(now),
        vec!["Chef@Pizzeria.test".to_owned()],
    )
}

#[rstest]
#[case("ana@example.com", UserRole::Customer)]
#[case("chef@pizzeria.test", UserRole::Staff)]
#[tokio::test]
async fn register_assigns_role_from_staff_list(
    now: DateTime<Utc>,
    #[case] email: &str,
    #[case] expected: UserRole,
) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(1).return_once(|_| Ok(None));
    users
        .expect_create()
        .withf(|_, hash| hash.as_phc().starts_with("$argon2id$"))
        .times(1)
        .return_once(|_, _| Ok(()));

    let user = service(users, MockAuthTokenRepository::new(), now)
        .register(credentials(email, "secret1"))
        .await
        .expect("register succeeds");

    assert_eq!(user.role(), expected);
    assert_eq!(user.email().as_ref(), email);
}

#[rstest]
#[tokio::test]
async fn register_rejects_duplicate_email(now: DateTime<Utc>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(|_| Ok(Some(stored_user("ana@example.com", "secret1"))));
    users.expect_create().times(0);

    let error = service(users, MockAuthTokenRepository::new(), now)
        .register(credentials("ana@example.com", "secret1"))
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn register_maps_raced_unique_violation_to_conflict(now: DateTime<Utc>) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(1).return_once(|_| Ok(None));
    users
        .expect_create()
        .times(1)
        .return_once(|_, _| Err(UserPersistenceError::duplicate_email("ana@example.com")));

    let error = service(users, MockAuthTokenRepository::new(), now)
        .register(credentials("ana@example.com", "secret1"))
        .await
        .expect_err("raced");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn login_issues_and_stores_token_pair(now: DateTime<Utc>) {
    let stored = stored_user("ana@example.com", "secret1");
    let user_id = stored.user.id();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));
    let mut tokens = MockAuthTokenRepository::new();
    tokens
        .expect_store()
        .withf(move |token| token.user_id == user_id && !token.revoked)
        .times(2)
        .returning(|_| Ok(()));

    let pair = service(users, tokens, now)
        .login(credentials("ana@example.com", "secret1"))
        .await
        .expect("login succeeds");

    assert_ne!(pair.access_token, pair.refresh_token);
    assert_eq!(pair.access_expires_at, now + Duration::minutes(15));
}

#[rstest]
#[case(None)]
#[case(Some("wrong-password"))]
#[tokio::test]
async fn login_failures_share_one_message(now: DateTime<Utc>, #[case] wrong: Option<&str>) {
    let mut users = MockUserRepository::new();
    let found = wrong.map(|_| stored_user("ana@example.com", "secret1"));
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(found));
    let mut tokens = MockAuthTokenRepository::new();
    tokens.expect_store().times(0);

    let error = service(users, tokens, now)
        .login(credentials("ana@example.com", wrong.unwrap_or("secret1")))
        .await
        .expect_err("rejected");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "invalid credentials");
}

#[rstest]
#[tokio::test]
async fn refresh_rotates_a_live_token(now: DateTime<Utc>) {
    let user_id = UserId::random();
    let record = StoredToken::issue("old-refresh", user_id, TokenKind::Refresh, now);
    let digest = record.digest.clone();
    let mut tokens = MockAuthTokenRepository::new();
    tokens
        .expect_find()
        .withf(move |d| d == digest)
        .times(1)
        .return_once(move |_| Ok(Some(record)));
    tokens.expect_revoke().times(1).return_once(|_| Ok(true));
    tokens.expect_store().times(2).returning(|_| Ok(()));

    let pair = service(MockUserRepository::new(), tokens, now + Duration::days(1))
        .refresh("old-refresh".to_owned())
        .await
        .expect("refresh succeeds");

    assert_ne!(pair.refresh_token, "old-refresh");
}

#[rstest]
#[tokio::test]
async fn refresh_rejects_expired_token(now: DateTime<Utc>) {
    let record = StoredToken::issue("old", UserId::random(), TokenKind::Refresh, now);
    let mut tokens = MockAuthTokenRepository::new();
    tokens
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(record)));
    tokens.expect_revoke().times(0);

    let error = service(MockUserRepository::new(), tokens, now + Duration::days(8))
        .refresh("old".to_owned())
        .await
        .expect_err("expired");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn refresh_rejects_access_token_and_reuse(now: DateTime<Utc>) {
    let access = StoredToken::issue("acc", UserId::random(), TokenKind::Access, now);
    let mut tokens = MockAuthTokenRepository::new();
    tokens
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(access)));
    let error = service(MockUserRepository::new(), tokens, now)
        .refresh("acc".to_owned())
        .await
        .expect_err("wrong kind");
    assert_eq!(error.code(), ErrorCode::Unauthorized);

    let refresh = StoredToken::issue("ref", UserId::random(), TokenKind::Refresh, now);
    let mut tokens = MockAuthTokenRepository::new();
    tokens
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(refresh)));
    tokens.expect_revoke().times(1).return_once(|_| Ok(false));
    tokens.expect_store().times(0);
    let error = service(MockUserRepository::new(), tokens, now)
        .refresh("ref".to_owned())
        .await
        .expect_err("reused");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[case(Some("token".to_owned()), 1)]
#[case(None, 0)]
#[tokio::test]
async fn logout_revokes_presented_token(
    now: DateTime<Utc>,
    #[case] token: Option<String>,
    #[case] revocations: usize,
) {
    let mut tokens = MockAuthTokenRepository::new();
    tokens
        .expect_revoke()
        .times(revocations)
        .returning(|_| Ok(true));

    service(MockUserRepository::new(), tokens, now)
        .logout(token)
        .await
        .expect("logout succeeds");
}

#[rstest]
#[tokio::test]
async fn authenticate_resolves_role(now: DateTime<Utc>) {
    let stored = stored_user("chef@pizzeria.test", "secret1");
    let user = User::new(stored.user.id(), stored.user.email().clone(), UserRole::Staff);
    let record = StoredToken::issue("acc", user.id(), TokenKind::Access, now);
    let mut tokens = MockAuthTokenRepository::new();
    tokens
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(record)));
    let mut users = MockUserRepository::new();
    let found = user.clone();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(found)));

    let caller = service(users, tokens, now + Duration::minutes(14))
        .authenticate("acc")
        .await
        .expect("authenticated");

    assert_eq!(caller.id, user.id());
    assert!(caller.is_staff());
}

#[rstest]
#[tokio::test]
async fn authenticate_rejects_expired_access_token(now: DateTime<Utc>) {
    let record = StoredToken::issue("acc", UserId::random(), TokenKind::Access, now);
    let mut tokens = MockAuthTokenRepository::new();
    tokens
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(record)));

    let error = service(MockUserRepository::new(), tokens, now + Duration::minutes(15))
        .authenticate("acc")
        .await
        .expect_err("expired");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn token_repository_outage_is_service_unavailable(now: DateTime<Utc>) {
    let mut tokens = MockAuthTokenRepository::new();
    tokens
        .expect_find()
        .times(1)
        .return_once(|_| Err(AuthTokenRepositoryError::connection("down")));

    let error = service(MockUserRepository::new(), tokens, now)
        .authenticate("acc")
        .await
        .expect_err("outage");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
