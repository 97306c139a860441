//! Error types for web handlers.
//!
//! Every failure is reported through the response envelope with HTTP 200;
//! [`ErrorKind`] only drives logging and metrics.

use crate::envelope::Envelope;
use axum::response::{IntoResponse, Response};
use blog_core::{PaginationError, StoreError};
use std::fmt;

/// Broad category of a handler failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing input, wrong method, unknown action
    Validation,
    /// Nothing matched the request
    NotFound,
    /// No session user
    Unauthorized,
    /// Session user lacks privilege
    Forbidden,
    /// Storage backend fault
    Storage,
    /// Server misconfiguration
    Internal,
}

impl ErrorKind {
    /// Label used in logs and the `kind` metric label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Storage => "storage",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error type for web handlers.
///
/// Carries a user-facing message and, for faults, the underlying error. The
/// source is logged but never sent to the client.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState<S>>) -> WebResult<Data<i64>> {
///     let count = state.store.get_posts_count().await
///         .map_err(|e| AppError::from_store("get count of posts", e))?;
///     Ok(Data(count))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Bad or missing input.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Nothing matched.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// No session user.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Session user lacks privilege.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Storage fault during `context`. The client sees only
    /// `"<context>: storage failure"`.
    #[must_use]
    pub fn storage(context: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Storage, format!("{context}: storage failure"))
    }

    /// Server misconfiguration.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Map a storage outcome for the operation named by `context`.
    #[must_use]
    pub fn from_store(context: impl fmt::Display, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::not_found(format!("{context}: {what} not found")),
            StoreError::Conflict(what) => {
                Self::validation(format!("{context}: {what} already exists"))
            }
            err @ StoreError::Backend(_) => Self::storage(context).with_source(err.into()),
        }
    }

    /// Failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| &**e as &(dyn std::error::Error + 'static))
    }
}

impl From<PaginationError> for AppError {
    fn from(err: PaginationError) -> Self {
        Self::validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match (self.kind, &self.source) {
            (ErrorKind::Storage | ErrorKind::Internal, Some(source)) => {
                tracing::error!(
                    kind = %self.kind,
                    message = %self.message,
                    error = %source,
                    "Request failed"
                );
            }
            (ErrorKind::Storage | ErrorKind::Internal, None) => {
                tracing::error!(kind = %self.kind, message = %self.message, "Request failed");
            }
            _ => {
                tracing::debug!(kind = %self.kind, message = %self.message, "Request rejected");
            }
        }

        metrics::counter!("blog_request_errors_total", "kind" => self.kind.as_str()).increment(1);

        Envelope::<()>::err(self.message).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_error_display() {
        let err = AppError::validation("Invalid input");
        assert_eq!(err.to_string(), "[validation] Invalid input");
    }

    #[test]
    fn test_store_not_found_and_conflict() {
        let err = AppError::from_store("get post by id", StoreError::NotFound("post".into()));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "get post by id: post not found");

        let err = AppError::from_store("register user", StoreError::Conflict("user name".into()));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "register user: user name already exists");
    }

    #[test]
    fn test_backend_detail_stays_in_source() {
        let err = AppError::from_store(
            "insert post",
            StoreError::Backend("connection refused".into()),
        );
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(err.message(), "insert post: storage failure");

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("storage backend error: connection refused")
        );
    }

    #[test]
    fn test_pagination_error_is_validation() {
        let err = AppError::from(PaginationError::PageTooSmall);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "page value cannot be less than 1");
    }

    #[test]
    fn test_storage_fault_logged_once() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let err = AppError::from_store(
            "get post by id",
            StoreError::Backend("getPostByID(): connection reset".into()),
        );
        drop(err.into_response());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let errors: Vec<&str> = output.lines().filter(|l| l.contains("ERROR")).collect();
        assert_eq!(errors.len(), 1, "{output}");
        assert!(errors[0].contains("connection reset"), "{output}");
    }
}
