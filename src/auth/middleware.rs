//! Request authentication

use crate::auth::models::User;
use crate::auth::tokens::{Token, TokenIssuer};
use crate::auth::users::UserStore;
use crate::error::{Error, Result};
use axum::http::HeaderMap;

/// Extract the bearer token from a request
pub fn extract_bearer_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    // Try the Authorization header first
    if let Some(auth_header) = headers.get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    // Fall back to the cookie
    let prefix = format!("{}=", cookie_name);
    if let Some(cookie_header) = headers.get("Cookie") {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some(token) = cookie.trim().strip_prefix(&prefix) {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

/// Resolve the request's token back to its user.
///
/// Fails with `Unauthenticated` when no token is presented or the token is
/// unknown, expired, or bound to a user that no longer exists.
pub async fn authenticate(
    users: &UserStore,
    tokens: &TokenIssuer,
    headers: &HeaderMap,
    cookie_name: &str,
) -> Result<(User, Token)> {
    let value = extract_bearer_token(headers, cookie_name).ok_or(Error::Unauthenticated)?;
    let token = tokens.resolve(&value).await.ok_or(Error::Unauthenticated)?;
    let user = users.get(&token.user_id).await.ok_or(Error::Unauthenticated)?;
    Ok((user, token))
}
