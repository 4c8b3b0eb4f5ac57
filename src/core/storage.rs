//! Durable key-value storage port.
//!
//! Session and bookmark state live behind this trait so they can run
//! against the on-disk store in the binary and an in-memory fake in tests.

use anyhow::Result;

/// Key holding the opaque session token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Key holding the serialized [`User`](crate::core::session::User).
pub const USER_KEY: &str = "user";
/// Key holding the serialized list of saved funds.
pub const SAVED_FUNDS_KEY: &str = "savedFunds";

/// String-keyed storage with text values. Each call is atomic for its key;
/// nothing spans multiple keys. A missing key is `Ok(None)`, never an error.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
