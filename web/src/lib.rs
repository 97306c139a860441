//! HTTP front end of the blog.
//!
//! Serves posts, comments and accounts over a small JSON API. Every response
//! is HTTP 200 with an `{err, data}` [`Envelope`]; mutating routes take a
//! JSON object whose `action` field selects the operation.
//!
//! # Request Flow
//!
//! ```text
//! TraceLayer → SecurityHeadersLayer → SessionLayer → handler → BlogStore
//! ```
//!
//! 1. **Session**: the `uuid` cookie is resolved into a [`RequestIdentity`],
//!    issuing a new token when it is missing or malformed
//! 2. **Extract** query parameters or the action body
//! 3. **Authorize** against the identity's privilege
//! 4. **Call** the [`blog_core::BlogStore`]
//! 5. **Wrap** the outcome in an envelope
//!
//! # Example
//!
//! ```ignore
//! use blog_web::{AppState, HttpOptions, build_router};
//! use blog_postgres::PostgresBlogStore;
//!
//! let store = PostgresBlogStore::connect(&config.postgres).await?;
//! let app = build_router(AppState::new(store), options);
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actions;
pub mod config;
pub mod envelope;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod session;
pub mod state;

// Re-export key types for convenience
pub use config::Config;
pub use envelope::{Data, Envelope};
pub use error::{AppError, ErrorKind};
pub use middleware::{SecurityHeadersLayer, SessionLayer};
pub use router::{HttpOptions, build_router};
pub use session::{RequestIdentity, SESSION_COOKIE, SessionStore, SessionToken};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
