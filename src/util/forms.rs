//! Login and registration form checks run before any network call.
//!
//! A failed check is shown inline; the form keeps its input and no session
//! state changes.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use crate::net::types::{LoginRequest, RegisterRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Enter a username or email.")]
    MissingUsername,
    #[error("Enter a password.")]
    MissingPassword,
    #[error("Enter an email address.")]
    MissingEmail,
    #[error("Enter a valid email address.")]
    InvalidEmail,
    #[error("The two passwords do not match.")]
    PasswordMismatch,
}

/// Raw registration form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Validate login input. The username is trimmed; the password is not.
///
/// # Errors
///
/// Returns the first missing field.
pub fn validate_login_input(username: &str, password: &str, remember: bool) -> Result<LoginRequest, FormError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(FormError::MissingUsername);
    }
    if password.is_empty() {
        return Err(FormError::MissingPassword);
    }
    Ok(LoginRequest { username: username.to_owned(), password: password.to_owned(), remember })
}

/// Validate registration input into the backend request body.
///
/// # Errors
///
/// Returns the first missing or inconsistent field.
pub fn validate_register_input(form: &RegisterForm) -> Result<RegisterRequest, FormError> {
    let username = form.username.trim();
    let email = form.email.trim();
    if username.is_empty() {
        return Err(FormError::MissingUsername);
    }
    if email.is_empty() {
        return Err(FormError::MissingEmail);
    }
    if !looks_like_email(email) {
        return Err(FormError::InvalidEmail);
    }
    if form.password.is_empty() {
        return Err(FormError::MissingPassword);
    }
    if form.password != form.confirm_password {
        return Err(FormError::PasswordMismatch);
    }
    Ok(RegisterRequest { username: username.to_owned(), email: email.to_owned(), password: form.password.clone() })
}

// Shape check only; the backend owns real validation.
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    }
}
