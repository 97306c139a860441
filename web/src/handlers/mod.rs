//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by resource. Every
//! handler answers through the envelope, including the method and route
//! fallbacks defined here.

pub mod comment;
pub mod comments;
pub mod ping;
pub mod post;
pub mod posts;
pub mod user;

use crate::error::AppError;
use axum::http::{Method, Uri};

/// Fallback for a known route hit with an unsupported method.
///
/// Never touches storage.
pub async fn reject_method(method: Method) -> AppError {
    AppError::validation(format!("request method {method} is not supported"))
}

/// Fallback for unknown paths.
pub async fn unknown_route(uri: Uri) -> AppError {
    AppError::not_found(format!("no resource at {}", uri.path()))
}
