use crate::errors::{AppError, AppResult};
use crate::models::user::{Role, StoredUser};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub type UserMap = BTreeMap<String, StoredUser>;

/// Accounts seeded when the user document does not exist yet. Meant to be
/// changed after the first login.
const DEFAULT_ACCOUNTS: [(&str, &str, Role); 3] = [
    ("admin", "admin123", Role::Admin),
    ("user1", "user123", Role::User),
    ("user2", "user123", Role::User),
];

/// Access to the user document.
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(super::USERS_FILE),
        }
    }

    /// Read the user document, seeding the default accounts on first access.
    pub async fn load(&self) -> AppResult<UserMap> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("user document missing, seeding the default accounts");
                let users = Self::default_accounts();
                if let Some(parent) = self.path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                self.save(&users).await?;
                Ok(users)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, users: &UserMap) -> AppResult<()> {
        let raw = serde_json::to_string_pretty(users)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    fn default_accounts() -> UserMap {
        DEFAULT_ACCOUNTS
            .iter()
            .map(|(name, password, role)| {
                (
                    name.to_string(),
                    StoredUser::with_password(name, password, *role),
                )
            })
            .collect()
    }

    pub async fn find(&self, username: &str) -> AppResult<Option<StoredUser>> {
        Ok(self.load().await?.get(username).cloned())
    }

    /// Find the account holding this session token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<StoredUser>> {
        Ok(self
            .load()
            .await?
            .into_values()
            .find(|u| u.token.as_deref() == Some(token)))
    }

    /// Attach a session token and its expiry instant to a user record.
    pub async fn set_token(
        &self,
        username: &str,
        token: &str,
        expires_at: &str,
    ) -> AppResult<()> {
        let mut users = self.load().await?;
        let user = users
            .get_mut(username)
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;
        user.token = Some(token.to_string());
        user.token_expires_at = Some(expires_at.to_string());
        self.save(&users).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_load_seeds_the_default_accounts() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UserStore::new(tmp.path());

        let users = store.load().await.unwrap();
        assert_eq!(users.len(), 3);
        assert!(users["admin"].role.is_admin());
        assert!(users["admin"].verify_password("admin123"));
        assert!(users["user1"].verify_password("user123"));
        assert!(!users["user1"].role.is_admin());
    }

    #[tokio::test]
    async fn seeded_document_stores_no_plaintext_passwords() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UserStore::new(tmp.path());
        store.load().await.unwrap();

        let raw = tokio::fs::read_to_string(tmp.path().join(super::super::USERS_FILE))
            .await
            .unwrap();
        assert!(!raw.contains("admin123"));
        assert!(!raw.contains("user123"));
    }

    #[tokio::test]
    async fn an_existing_document_is_not_reseeded() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UserStore::new(tmp.path());

        tokio::fs::write(tmp.path().join(super::super::USERS_FILE), "{}")
            .await
            .unwrap();
        let users = store.load().await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn tokens_survive_a_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UserStore::new(tmp.path());
        store.load().await.unwrap();

        store
            .set_token("user1", "tok-123", "2024-05-04T16:00:00Z")
            .await
            .unwrap();

        let user = store.find_by_token("tok-123").await.unwrap().unwrap();
        assert_eq!(user.username, "user1");
        assert_eq!(user.token_expires_at.as_deref(), Some("2024-05-04T16:00:00Z"));
        assert!(store.find_by_token("tok-999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_token_for_unknown_user_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UserStore::new(tmp.path());
        store.load().await.unwrap();

        let err = store
            .set_token("ghost", "tok", "2024-05-04T16:00:00Z")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UserNotFound(_)));
    }
}
