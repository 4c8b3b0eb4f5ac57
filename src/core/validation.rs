//! Sign-in and sign-up form checks run before any session call.

use crate::core::error::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agreed_to_terms: bool,
}

impl SignupForm {
    /// Checks run in a fixed order and stop at the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if [
            &self.name,
            &self.email,
            &self.password,
            &self.confirm_password,
        ]
        .iter()
        .any(|field| field.is_empty())
        {
            return Err(ValidationError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::WeakPassword);
        }
        if !self.agreed_to_terms {
            return Err(ValidationError::TermsNotAccepted);
        }
        Ok(())
    }
}
