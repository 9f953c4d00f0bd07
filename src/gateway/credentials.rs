//! Login and signup submission

use thiserror::Error;
use tracing::info;

use crate::{
    forms::{LoginForm, SignupForm, ValidationError},
    gateway::{AuthOutcome, Backend, GatewayError},
};

/// Errors from submitting credentials.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// The form failed client-side validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend could not be reached or answered unexpectedly.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Validate a login form and, when valid, submit it.
///
/// # Errors
///
/// Returns [`CredentialsError::Validation`] without contacting the backend when the form is
/// invalid, or [`CredentialsError::Gateway`] when the request fails. Refused credentials are an
/// `Ok` outcome with `success: false`.
pub async fn submit_login(
    backend: &dyn Backend,
    form: &LoginForm,
) -> Result<AuthOutcome, CredentialsError> {
    form.validate()?;

    let outcome = backend.login(form).await?;

    info!(success = outcome.success, "login submitted");

    Ok(outcome)
}

/// Validate a signup form and, when valid, submit it.
///
/// # Errors
///
/// Returns [`CredentialsError::Validation`] without contacting the backend when the form is
/// invalid, or [`CredentialsError::Gateway`] when the request fails.
pub async fn submit_signup(
    backend: &dyn Backend,
    form: &SignupForm,
) -> Result<AuthOutcome, CredentialsError> {
    form.validate()?;

    let outcome = backend.signup(form).await?;

    info!(success = outcome.success, "signup submitted");

    Ok(outcome)
}
