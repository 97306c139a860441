//! Session tokens and the process-wide session table.
//!
//! A session token is a v4 UUID carried in the `uuid` cookie. Logging in
//! binds the caller's current token to a snapshot of their [`User`]; the
//! binding lives until the process exits.

use crate::error::AppError;
use blog_core::User;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "uuid";

/// Opaque session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// Issue a new random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a cookie value. Returns `None` unless it is a well-formed UUID.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Mapping from session token to the user who logged in with it.
///
/// Cheap to clone; clones share the same table. Readers see either the old
/// or the new record while a login overwrites it. There is no eviction.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    records: Arc<RwLock<HashMap<SessionToken, User>>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `token` to `user`, replacing any previous binding.
    pub fn put(&self, token: SessionToken, user: User) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token, user);
    }

    /// Look up the user bound to `token`.
    #[must_use]
    pub fn get(&self, token: &SessionToken) -> Option<User> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    /// Number of bound tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no token is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Who is calling, as resolved by the session middleware.
///
/// Inserted into request extensions for every request and extracted by
/// handlers (see [`crate::extractors`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    token: SessionToken,
    fresh: bool,
    user: Option<User>,
}

impl RequestIdentity {
    /// Identity for a token.
    #[must_use]
    pub const fn new(token: SessionToken, fresh: bool, user: Option<User>) -> Self {
        Self { token, fresh, user }
    }

    /// Session token in effect for this request.
    #[must_use]
    pub const fn token(&self) -> SessionToken {
        self.token
    }

    /// Whether the token was issued by this request.
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Logged-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Require a logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an unauthorized [`AppError`] for anonymous sessions.
    pub fn require_user(&self) -> Result<&User, AppError> {
        self.user
            .as_ref()
            .ok_or_else(|| AppError::unauthorized("user is not logged in"))
    }

    /// Require a logged-in user with administrative privilege.
    ///
    /// # Errors
    ///
    /// Returns an unauthorized [`AppError`] for anonymous sessions and a
    /// forbidden one for ordinary users.
    pub fn require_admin(&self) -> Result<&User, AppError> {
        let user = self.require_user()?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(AppError::forbidden("not enough privilege"))
        }
    }
}
