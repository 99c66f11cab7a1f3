//! Session token helpers shared across the UI.
//!
//! # Design
//! - The token is an opaque bearer string; empty values count as signed out.
//! - Header encoding stays with transport clients; this module only shapes values.

use crate::core::guard::is_allow_listed;

/// Landing page after login when no usable `redirect` was supplied.
pub const DEFAULT_LANDING_PATH: &str = "/";

/// Normalise a stored token, treating blank strings as absent.
#[must_use]
pub fn normalize_token(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `Authorization` header value for a token.
#[must_use]
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

/// Where to send the user after a successful login.
///
/// Only same-origin absolute paths are honoured; anything else, or a target
/// that would loop back into the auth pages, lands on [`DEFAULT_LANDING_PATH`].
#[must_use]
pub fn post_login_destination(redirect: Option<&str>) -> String {
    redirect
        .map(str::trim)
        .filter(|target| target.starts_with('/') && !target.starts_with("//"))
        .filter(|target| !is_allow_listed(target))
        .map_or_else(|| DEFAULT_LANDING_PATH.to_string(), ToString::to_string)
}

/// Split a destination into its path and decoded query pairs.
///
/// Pairs that are not valid percent-encoded UTF-8 are kept verbatim.
#[must_use]
pub fn split_destination(destination: &str) -> (&str, Vec<(String, String)>) {
    let Some((path, query)) = destination.split_once('?') else {
        return (destination, Vec::new());
    };
    let pairs = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect();
    (path, pairs)
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or_else(|_| spaced.clone(), |value| value.into_owned())
}

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Reasons a first-run credential form is rejected before submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialInputError {
    /// New password is shorter than [`MIN_PASSWORD_LEN`].
    PasswordTooShort,
    /// Confirmation does not match.
    ConfirmationMismatch,
}

/// Validate the first-run password form.
///
/// # Errors
/// Returns [`CredentialInputError`] describing the first failing rule.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), CredentialInputError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialInputError::PasswordTooShort);
    }
    if password != confirm {
        return Err(CredentialInputError::ConfirmationMismatch);
    }
    Ok(())
}
