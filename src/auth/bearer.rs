//! Bearer credential parsing (RFC 6750 header form).
//!
//! ```text
//! Authorization: Bearer <token>
//! ```

use uuid::Uuid;

use crate::auth::token::TokenService;
use crate::error::AppError;

/// The caller identity resolved from a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

/// Extracts the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively and must be followed by exactly one space and
/// exactly one non-empty token.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

/// Resolves the caller from a raw `Authorization` header value.
pub fn authenticate(header: Option<&str>, tokens: &TokenService) -> Result<Identity, AppError> {
    let token = header
        .and_then(parse_bearer)
        .ok_or_else(unauthenticated)?;
    let claims = tokens.decode(token).ok_or_else(unauthenticated)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| unauthenticated())?;

    Ok(Identity {
        user_id,
        email: claims.email,
    })
}

fn unauthenticated() -> AppError {
    AppError::Unauthorized("Not authenticated".into())
}
