//! Core business logic abstractions

pub mod bookmarks;
pub mod config;
pub mod error;
pub mod fund;
pub mod log;
pub mod nav;
pub mod session;
pub mod storage;
pub mod validation;
pub mod view;

// Re-export main types for cleaner imports
pub use error::{AuthError, FetchError, ValidationError};
pub use fund::{FundDetail, FundDirectory, FundSummary};
pub use session::{OAuthProvider, SessionStore, User};
pub use storage::Storage;
