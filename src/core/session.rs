//! Session abstractions and core types

use crate::core::error::AuthError;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// How a user authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Email,
    Google,
    Github,
}

/// Third-party identity providers offered on the sign-in and sign-up forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Github,
}

impl Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                OAuthProvider::Google => "Google",
                OAuthProvider::Github => "GitHub",
            }
        )
    }
}

impl FromStr for OAuthProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(OAuthProvider::Google),
            "github" => Ok(OAuthProvider::Github),
            _ => Err(anyhow::anyhow!("Unknown OAuth provider: {}", s)),
        }
    }
}

impl From<OAuthProvider> for AuthProvider {
    fn from(provider: OAuthProvider) -> Self {
        match provider {
            OAuthProvider::Google => AuthProvider::Google,
            OAuthProvider::Github => AuthProvider::Github,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<AuthProvider>,
}

/// An authenticated session. The token is opaque and carries no signature
/// or expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Capability set for establishing and inspecting the one session a
/// profile may hold. Implementations persist through a
/// [`Storage`](crate::core::storage::Storage).
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    async fn signup(&self, email: &str, password: &str, name: &str) -> Result<Session, AuthError>;
    async fn oauth(&self, provider: OAuthProvider) -> Result<Session, AuthError>;
    fn logout(&self) -> Result<()>;
    fn current_user(&self) -> Option<User>;
    fn token(&self) -> Option<String>;
    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}
