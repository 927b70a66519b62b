//! Session-token authentication.
//!
//! Login exchanges credentials for an opaque session token that is stored
//! on the user record together with its expiry instant. Every authenticated
//! request looks the token up again, so a re-login rotates the token and an
//! expired one is refused until the user logs in anew.

use crate::core::clock::Clock;
use crate::errors::AppResult;
use crate::models::user::{Claims, StoredUser};
use crate::store::users::UserStore;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Classification of a presented token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    Valid(Claims),
    Expired,
    Invalid,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserStore,
    clock: Arc<dyn Clock>,
    ttl_minutes: i64,
}

impl AuthService {
    pub fn new(users: UserStore, clock: Arc<dyn Clock>, ttl_minutes: i64) -> Self {
        Self {
            users,
            clock,
            ttl_minutes,
        }
    }

    /// Check a username/password pair. Unknown users and wrong passwords
    /// both come back as `None`.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<StoredUser>> {
        Ok(self
            .users
            .find(username)
            .await?
            .filter(|u| u.verify_password(password)))
    }

    /// Issue a fresh session token for the user and persist it.
    pub async fn issue_token(&self, username: &str) -> AppResult<String> {
        let token = Uuid::new_v4().to_string();
        let expires_at = (self.clock.now_utc() + Duration::minutes(self.ttl_minutes))
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        self.users.set_token(username, &token, &expires_at).await?;
        Ok(token)
    }

    /// Look a presented token up and classify it. A token nobody holds and
    /// a token with an unreadable expiry are both `Invalid`.
    pub async fn verify_token(&self, token: &str) -> AppResult<TokenOutcome> {
        let Some(user) = self.users.find_by_token(token).await? else {
            return Ok(TokenOutcome::Invalid);
        };
        let Some(expires_at) = user.token_expires_at.as_deref().and_then(parse_expiry) else {
            return Ok(TokenOutcome::Invalid);
        };
        if expires_at <= self.clock.now_utc() {
            return Ok(TokenOutcome::Expired);
        }
        Ok(TokenOutcome::Valid(user.claims()))
    }
}

fn parse_expiry(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now_utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn service_at(store: &UserStore, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> AuthService {
        let now = Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap();
        AuthService::new(store.clone(), Arc::new(FixedClock(now)), 60)
    }

    #[tokio::test]
    async fn credentials_are_checked_against_the_store() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UserStore::new(tmp.path());
        let auth = service_at(&store, 2024, 5, 4, 12, 0);

        let user = auth.verify_credentials("admin", "admin123").await.unwrap();
        assert_eq!(user.unwrap().username, "admin");

        assert!(auth
            .verify_credentials("admin", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(auth
            .verify_credentials("ghost", "admin123")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn issued_tokens_verify_until_they_expire() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UserStore::new(tmp.path());
        store.load().await.unwrap();

        let token = service_at(&store, 2024, 5, 4, 12, 0)
            .issue_token("user1")
            .await
            .unwrap();

        // Half an hour in: still valid.
        let outcome = service_at(&store, 2024, 5, 4, 12, 30)
            .verify_token(&token)
            .await
            .unwrap();
        match outcome {
            TokenOutcome::Valid(claims) => {
                assert_eq!(claims.username, "user1");
                assert!(!claims.role.is_admin());
            }
            other => panic!("expected a valid token, got {other:?}"),
        }

        // Exactly at the expiry instant: gone.
        let outcome = service_at(&store, 2024, 5, 4, 13, 0)
            .verify_token(&token)
            .await
            .unwrap();
        assert_eq!(outcome, TokenOutcome::Expired);
    }

    #[tokio::test]
    async fn unknown_tokens_are_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UserStore::new(tmp.path());
        store.load().await.unwrap();

        let auth = service_at(&store, 2024, 5, 4, 12, 0);
        assert_eq!(
            auth.verify_token("no-such-token").await.unwrap(),
            TokenOutcome::Invalid
        );
    }

    #[tokio::test]
    async fn a_token_with_an_unreadable_expiry_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UserStore::new(tmp.path());
        store.load().await.unwrap();
        store.set_token("user1", "tok-x", "never").await.unwrap();

        let auth = service_at(&store, 2024, 5, 4, 12, 0);
        assert_eq!(
            auth.verify_token("tok-x").await.unwrap(),
            TokenOutcome::Invalid
        );
    }

    #[tokio::test]
    async fn a_new_login_rotates_the_token() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UserStore::new(tmp.path());
        store.load().await.unwrap();

        let auth = service_at(&store, 2024, 5, 4, 12, 0);
        let first = auth.issue_token("user1").await.unwrap();
        let second = auth.issue_token("user1").await.unwrap();
        assert_ne!(first, second);

        assert_eq!(
            auth.verify_token(&first).await.unwrap(),
            TokenOutcome::Invalid
        );
        assert!(matches!(
            auth.verify_token(&second).await.unwrap(),
            TokenOutcome::Valid(_)
        ));
    }
}
