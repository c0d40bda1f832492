//! Bearer token authentication.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use super::error::ApiError;

/// Decides whether a bearer token may call the API.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> bool;
}

/// Accepts a fixed set of tokens. An empty set accepts nothing.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: Vec<String>,
}

impl StaticTokenVerifier {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenVerifier for StaticTokenVerifier {
    /// Compares against every configured token without returning early.
    fn verify(&self, token: &str) -> bool {
        self.tokens
            .iter()
            .fold(false, |found, known| found | constant_time_eq(known, token))
    }
}

/// Byte comparison whose running time depends only on the lengths.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let diff = (0..a.len().max(b.len())).fold(0u8, |acc, i| {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        acc | (x ^ y)
    });
    a.len() == b.len() && diff == 0
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("missing Authorization header"))?
        .to_str()
        .map_err(|_| ApiError::unauthorized("invalid Authorization header"))?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("expected a bearer token"))?;
    Ok(token)
}

/// Check the request's bearer token against `verifier`.
pub fn authenticate(headers: &HeaderMap, verifier: &dyn TokenVerifier) -> Result<(), ApiError> {
    let token = bearer_token(headers)?;
    if verifier.verify(token) {
        Ok(())
    } else {
        Err(ApiError::unauthorized("invalid token"))
    }
}
