//! Error taxonomy shared by the session, directory and form layers.

use thiserror::Error;

/// Failures raised by a [`SessionStore`](crate::core::session::SessionStore).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Failed to persist session")]
    Storage(#[from] anyhow::Error),
}

/// Client-side form checks. These never reach the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 8 characters long")]
    WeakPassword,
    #[error("Please agree to our terms and conditions")]
    TermsNotAccepted,
}

impl ValidationError {
    /// Short heading used when the error is surfaced as a notification.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "Missing Information",
            ValidationError::PasswordMismatch => "Password Mismatch",
            ValidationError::WeakPassword => "Weak Password",
            ValidationError::TermsNotAccepted => "Terms Agreement Required",
        }
    }
}

/// Network, status or decode failure from the fund directory. The cause is
/// kept as the error source but callers are not expected to branch on it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to search mutual funds")]
    Search(#[source] anyhow::Error),
    #[error("Failed to fetch fund details for scheme {scheme_code}")]
    Details {
        scheme_code: String,
        #[source]
        source: anyhow::Error,
    },
}
