//! Custom Axum extractors.
//!
//! - [`RequestIdentity`]: the caller's session, placed by the session middleware
//! - [`QueryParams`]: query-string fields with integer parsing
//! - [`ActionBody`]: a JSON object body with its `action` field split off
//!
//! All of them reject with [`AppError`], so a failed extraction is still
//! answered with an envelope.

use crate::error::AppError;
use crate::session::RequestIdentity;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{HeaderMap, header::CONTENT_TYPE, request::Parts},
};
use blog_core::Pagination;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[async_trait]
impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AppError::internal("no session context: internal error"))
    }
}

/// Decoded query string.
///
/// When a name repeats, the first value wins.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Parse a raw query string.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the string is not form-urlencoded.
    pub fn parse(query: &str) -> Result<Self, AppError> {
        serde_urlencoded::from_str(query)
            .map(Self)
            .map_err(|e| AppError::validation(format!("parse query string: {e}")))
    }

    /// First value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Integer value of `name`.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the field if it is missing or not
    /// an integer.
    pub fn int(&self, name: &str) -> Result<i32, AppError> {
        let value = self
            .get(name)
            .ok_or_else(|| AppError::validation(format!("convert {name} to int: missing value")))?;
        value
            .parse()
            .map_err(|e| AppError::validation(format!("convert {name} to int: {e}")))
    }

    /// Validated `page` / `pageSize` pair.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either is missing, not an integer or
    /// below 1.
    pub fn pagination(&self) -> Result<Pagination, AppError> {
        let page = self.int("page")?;
        let page_size = self.int("pageSize")?;
        Ok(Pagination::new(page, page_size)?)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::parse(parts.uri.query().unwrap_or_default())
    }
}

/// Whether the request declares a JSON body. Parameters such as `charset`
/// are ignored.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
}

/// JSON object body of a mutating request.
///
/// The `action` string selects the operation; the remaining fields are
/// decoded per action with [`ActionBody::decode`].
#[derive(Debug, Clone)]
pub struct ActionBody {
    action: String,
    fields: Value,
}

impl ActionBody {
    /// Split a parsed JSON body into its action and fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the body is not an object or `action`
    /// is missing or not a string.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        let Value::Object(mut fields) = value else {
            return Err(AppError::validation("request body is not a json object"));
        };
        match fields.remove("action") {
            Some(Value::String(action)) => Ok(Self {
                action,
                fields: Value::Object(fields),
            }),
            Some(_) => Err(AppError::validation("action field in json is not string")),
            None => Err(AppError::validation("missing action field in json")),
        }
    }

    /// Requested action.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Decode the remaining fields into the input struct of the action.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending field path.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_path_to_error::deserialize(&self.fields).map_err(|e| {
            AppError::validation(format!("parse {} request: {e}", self.action))
        })
    }
}

#[async_trait]
impl<S> FromRequest<S> for ActionBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(req.headers()) {
            return Err(AppError::validation("request body is not application/json"));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("read request body: {e}")))?;
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::validation(format!("parse request body as json: {e}")))?;

        Self::from_value(value)
    }
}
