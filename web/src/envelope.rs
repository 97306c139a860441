//! The `{err, data}` response envelope.
//!
//! Every route answers with HTTP 200 and a JSON body of the form
//! `{"err": string|null, "data": any|null}`. Exactly one side is populated
//! and both keys are always present.

use axum::{
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Canonical response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Error message, if the request failed
    pub err: Option<String>,
    /// Payload, if the request succeeded
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Successful outcome.
    #[must_use]
    pub const fn data(data: T) -> Self {
        Self {
            err: None,
            data: Some(data),
        }
    }

    /// Failed outcome.
    #[must_use]
    pub const fn err(message: String) -> Self {
        Self {
            err: Some(message),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let body = match serde_json::to_vec(&self) {
            Ok(body) => body,
            Err(e) => {
                // Not retried; the client gets an empty body.
                tracing::error!(error = %e, "Failed to serialize response envelope");
                Vec::new()
            }
        };
        ([(CONTENT_TYPE, "application/json")], body).into_response()
    }
}

/// Success payload returned by handlers.
///
/// `Result<Data<T>, AppError>` renders both outcomes as an [`Envelope`].
#[derive(Debug, Clone)]
pub struct Data<T>(pub T);

impl<T: Serialize> IntoResponse for Data<T> {
    fn into_response(self) -> Response {
        Envelope::data(self.0).into_response()
    }
}
