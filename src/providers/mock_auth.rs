use crate::core::config::AuthConfig;
use crate::core::error::AuthError;
use crate::core::session::{AuthProvider, OAuthProvider, Session, SessionStore, User};
use crate::core::storage::{AUTH_TOKEN_KEY, Storage, USER_KEY};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEMO_EMAIL: &str = "demo@fundwise.com";
pub const DEMO_PASSWORD: &str = "password123";

const TOKEN_PREFIX: &str = "mock-jwt-token";

/// Session store that simulates a credential-issuing backend. Only the demo
/// credentials log in; sign-up and OAuth always succeed. Tokens are
/// fabricated locally and nothing goes over the network.
pub struct MockAuthProvider {
    storage: Arc<dyn Storage>,
    config: AuthConfig,
}

impl MockAuthProvider {
    pub fn new(storage: Arc<dyn Storage>, config: AuthConfig) -> Self {
        Self { storage, config }
    }

    fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Writes token then user. There is no rollback if the second write fails.
    fn persist(&self, session: &Session) -> Result<()> {
        self.storage
            .set(AUTH_TOKEN_KEY, &session.token)
            .context("Failed to store auth token")?;
        let user = serde_json::to_string(&session.user).context("Failed to serialize user")?;
        self.storage
            .set(USER_KEY, &user)
            .context("Failed to store user")?;
        debug!(user_id = %session.user.id, "Persisted session");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MockAuthProvider {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        tokio::time::sleep(self.config.login_delay()).await;

        if email != DEMO_EMAIL || password != DEMO_PASSWORD {
            warn!(%email, "Rejected login");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            token: format!("{TOKEN_PREFIX}-{}", Self::now_millis()),
            user: User {
                id: "1".to_string(),
                email: email.to_string(),
                name: "Demo User".to_string(),
                avatar: None,
                provider: Some(AuthProvider::Email),
            },
        };
        self.persist(&session)?;
        info!(%email, "Logged in");
        Ok(session)
    }

    async fn signup(&self, email: &str, _password: &str, name: &str) -> Result<Session, AuthError> {
        tokio::time::sleep(self.config.signup_delay()).await;

        let now = Self::now_millis();
        let session = Session {
            token: format!("{TOKEN_PREFIX}-{now}"),
            user: User {
                id: now.to_string(),
                email: email.to_string(),
                name: name.to_string(),
                avatar: None,
                provider: Some(AuthProvider::Email),
            },
        };
        self.persist(&session)?;
        info!(%email, "Signed up");
        Ok(session)
    }

    async fn oauth(&self, provider: OAuthProvider) -> Result<Session, AuthError> {
        tokio::time::sleep(self.config.oauth_delay()).await;

        let now = Self::now_millis();
        let (tag, email, name, avatar) = match provider {
            OAuthProvider::Google => (
                "google",
                "user@gmail.com",
                "Google User",
                "https://lh3.googleusercontent.com/a/default-user=s96-c",
            ),
            OAuthProvider::Github => (
                "github",
                "user@github.com",
                "GitHub User",
                "https://github.com/identicons/jasonlong.png",
            ),
        };

        let session = Session {
            token: format!("{TOKEN_PREFIX}-{tag}-{now}"),
            user: User {
                id: format!("{tag}-{now}"),
                email: email.to_string(),
                name: name.to_string(),
                avatar: Some(avatar.to_string()),
                provider: Some(provider.into()),
            },
        };
        self.persist(&session)?;
        info!(%provider, "Signed in with OAuth");
        Ok(session)
    }

    fn logout(&self) -> Result<()> {
        self.storage
            .remove(AUTH_TOKEN_KEY)
            .context("Failed to clear auth token")?;
        self.storage
            .remove(USER_KEY)
            .context("Failed to clear user")?;
        info!("Logged out");
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        let raw = match self.storage.get(USER_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read user: {e:#}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                debug!("Stored user is not parsable: {}", e);
                None
            }
        }
    }

    fn token(&self) -> Option<String> {
        self.storage.get(AUTH_TOKEN_KEY).unwrap_or_else(|e| {
            warn!("Failed to read auth token: {e:#}");
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStorage;

    fn provider() -> (Arc<MemoryStorage>, MockAuthProvider) {
        let storage = Arc::new(MemoryStorage::new());
        let provider = MockAuthProvider::new(storage.clone(), AuthConfig::immediate());
        (storage, provider)
    }

    #[test]
    fn test_fresh_store_is_logged_out() {
        let (_, provider) = provider();
        assert!(!provider.is_authenticated());
        assert!(provider.current_user().is_none());
        assert!(provider.token().is_none());
    }

    #[tokio::test]
    async fn test_demo_login_succeeds() {
        let (storage, provider) = provider();

        let session = provider.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        assert!(session.token.starts_with("mock-jwt-token-"));
        assert_eq!(session.user.id, "1");
        assert_eq!(session.user.name, "Demo User");
        assert_eq!(session.user.provider, Some(AuthProvider::Email));

        assert!(provider.is_authenticated());
        assert_eq!(provider.current_user(), Some(session.user));
        assert_eq!(
            storage.get(AUTH_TOKEN_KEY).unwrap(),
            Some(session.token)
        );
    }

    #[tokio::test]
    async fn test_invalid_login_leaves_state_unchanged() {
        let (storage, provider) = provider();

        let result = provider.login(DEMO_EMAIL, "wrong").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        let result = provider.login("someone@else.com", DEMO_PASSWORD).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert!(!provider.is_authenticated());
        assert!(storage.get(USER_KEY).unwrap().is_none());

        // A failed attempt does not disturb an existing session
        let session = provider.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        let result = provider.login("intruder@x.com", "nope").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(provider.token(), Some(session.token));
        assert_eq!(provider.current_user(), Some(session.user));
    }

    #[tokio::test]
    async fn test_signup_persists_new_identity() {
        let (_, provider) = provider();

        let session = provider
            .signup("new@fundwise.com", "longenough", "New User")
            .await
            .unwrap();
        assert_eq!(session.user.email, "new@fundwise.com");
        assert_eq!(session.user.name, "New User");
        assert!(session.user.id.parse::<i64>().is_ok());
        assert!(provider.is_authenticated());
        assert_eq!(provider.current_user().unwrap().name, "New User");
    }

    #[tokio::test]
    async fn test_oauth_identities() {
        let (_, provider) = provider();

        let session = provider.oauth(OAuthProvider::Github).await.unwrap();
        assert!(session.token.starts_with("mock-jwt-token-github-"));
        assert!(session.user.id.starts_with("github-"));
        assert_eq!(session.user.email, "user@github.com");
        assert_eq!(session.user.provider, Some(AuthProvider::Github));
        assert!(session.user.avatar.is_some());

        // Re-auth overwrites the previous user
        let session = provider.oauth(OAuthProvider::Google).await.unwrap();
        assert_eq!(provider.current_user(), Some(session.user));
    }

    #[tokio::test]
    async fn test_logout_clears_and_is_idempotent() {
        let (storage, provider) = provider();

        provider.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        provider.logout().unwrap();
        assert!(!provider.is_authenticated());
        assert!(provider.current_user().is_none());
        assert!(storage.get(AUTH_TOKEN_KEY).unwrap().is_none());

        provider.logout().unwrap();
        assert!(!provider.is_authenticated());
    }

    #[test]
    fn test_unparsable_user_reads_as_none() {
        let (storage, provider) = provider();
        storage.set(USER_KEY, "{not json").unwrap();
        storage.set(AUTH_TOKEN_KEY, "garbage").unwrap();

        assert!(provider.current_user().is_none());
        // Any token counts, valid or not
        assert!(provider.is_authenticated());
    }
}
