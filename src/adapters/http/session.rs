//! Locates the session token a client presented.
//!
//! Sources in order: `Authorization: Bearer <token>`, the `token` cookie, then a
//! `token` field in a JSON body. The first source that is present decides.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use axum_extra::extract::cookie::CookieJar;

pub const SESSION_COOKIE: &str = "token";

const BEARER_PREFIX: &str = "Bearer ";

/// Outcome of looking at the header and cookie sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Token(String),
    /// A bearer header was present but empty after trimming.
    Absent,
    /// Neither header nor cookie applied; the body decides.
    CheckBody,
}

/// `Some` when the header carries the exact `Bearer ` scheme, even if the
/// remainder is empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(|rest| rest.trim().to_string())
}

pub fn cookie_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

pub fn body_token(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("token")?
        .as_str()
        .map(str::to_string)
        .filter(|t| !t.is_empty())
}

pub fn from_headers(headers: &HeaderMap, jar: &CookieJar) -> Candidate {
    if let Some(token) = bearer_token(headers) {
        return if token.is_empty() {
            Candidate::Absent
        } else {
            Candidate::Token(token)
        };
    }
    match cookie_token(jar) {
        Some(token) => Candidate::Token(token),
        None => Candidate::CheckBody,
    }
}

/// Full lookup over all three sources.
pub fn locate(headers: &HeaderMap, jar: &CookieJar, body: &[u8]) -> Option<String> {
    match from_headers(headers, jar) {
        Candidate::Token(token) => Some(token),
        Candidate::Absent => None,
        Candidate::CheckBody => body_token(body),
    }
}
