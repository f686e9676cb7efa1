//! Opaque user identity supplied by the external identity provider.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header carrying the authenticated user's identifier.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Stable identifier of the user who owns an assessment record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Accepts any non-blank identifier; surrounding whitespace is dropped.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Black-box view of "who is signed in".
pub trait IdentityProvider {
    fn current_user_id(&self) -> Option<UserId>;
}

/// Reads the user id forwarded by the upstream auth proxy.
pub struct RequestIdentity<'a> {
    headers: &'a HeaderMap,
}

impl<'a> RequestIdentity<'a> {
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self { headers }
    }
}

impl IdentityProvider for RequestIdentity<'_> {
    fn current_user_id(&self) -> Option<UserId> {
        self.headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(UserId::parse)
    }
}
