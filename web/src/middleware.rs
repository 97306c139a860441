//! Tower middleware for sessions and response headers.
//!
//! - [`SessionLayer`]: resolves the `uuid` cookie into a [`RequestIdentity`]
//!   and issues a new cookie when it is missing or malformed
//! - [`SecurityHeadersLayer`]: stamps the fixed security and cache headers on
//!   every response
//!
//! # Example
//!
//! ```ignore
//! use axum::{http::HeaderValue, Router};
//! use blog_web::middleware::{SecurityHeadersLayer, SessionLayer};
//!
//! let app = Router::new()
//!     .route("/ping", get(ping))
//!     .layer(SessionLayer::new(sessions, false))
//!     .layer(SecurityHeadersLayer::new(HeaderValue::from_static("https://example.com")));
//! ```

use crate::session::{RequestIdentity, SESSION_COOKIE, SessionStore, SessionToken};
use axum::{
    extract::Request,
    http::{
        HeaderMap, HeaderValue,
        header::{
            ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONNECTION, COOKIE, SET_COOKIE,
            X_CONTENT_TYPE_OPTIONS,
        },
    },
    response::Response,
};
use cookie::Cookie;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};

type BoxFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// First well-formed value of the session cookie, if any.
///
/// Only the first `uuid` cookie counts; a malformed one is treated as absent.
fn presented_token(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .and_then(|cookie| SessionToken::parse(cookie.value()))
}

fn session_cookie(token: SessionToken, secure: bool) -> Option<HeaderValue> {
    let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .build();
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Layer that attaches a [`RequestIdentity`] to every request.
#[derive(Clone, Debug)]
pub struct SessionLayer {
    sessions: SessionStore,
    secure_cookie: bool,
}

impl SessionLayer {
    /// Resolve sessions through `sessions`. `secure_cookie` adds the `Secure`
    /// attribute to issued cookies.
    #[must_use]
    pub const fn new(sessions: SessionStore, secure_cookie: bool) -> Self {
        Self {
            sessions,
            secure_cookie,
        }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionMiddleware {
            inner,
            sessions: self.sessions.clone(),
            secure_cookie: self.secure_cookie,
        }
    }
}

/// Middleware service for session resolution.
#[derive(Clone, Debug)]
pub struct SessionMiddleware<S> {
    inner: S,
    sessions: SessionStore,
    secure_cookie: bool,
}

impl<S> Service<Request> for SessionMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let identity = match presented_token(req.headers()) {
            Some(token) => RequestIdentity::new(token, false, self.sessions.get(&token)),
            None => {
                let token = SessionToken::generate();
                metrics::counter!("blog_sessions_issued_total").increment(1);
                tracing::debug!("Issued session token");
                RequestIdentity::new(token, true, None)
            }
        };

        let set_cookie = if identity.is_fresh() {
            let value = session_cookie(identity.token(), self.secure_cookie);
            if value.is_none() {
                tracing::warn!("Session cookie is not a valid header value");
            }
            value
        } else {
            None
        };

        req.extensions_mut().insert(identity);
        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.await?;
            if let Some(value) = set_cookie {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Ok(response)
        })
    }
}

/// Layer that sets the fixed response headers.
///
/// - `X-Content-Type-Options: nosniff`
/// - `Cache-Control: no-cache, no-store, must-revalidate`
/// - `Access-Control-Allow-Origin: <origin>`
/// - `Connection: close`
#[derive(Clone, Debug)]
pub struct SecurityHeadersLayer {
    allowed_origin: HeaderValue,
}

impl SecurityHeadersLayer {
    /// Allow cross-origin reads from `allowed_origin` only.
    #[must_use]
    pub const fn new(allowed_origin: HeaderValue) -> Self {
        Self { allowed_origin }
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersMiddleware {
            inner,
            allowed_origin: self.allowed_origin.clone(),
        }
    }
}

/// Middleware service for [`SecurityHeadersLayer`].
#[derive(Clone, Debug)]
pub struct SecurityHeadersMiddleware<S> {
    inner: S,
    allowed_origin: HeaderValue,
}

impl<S> Service<Request> for SecurityHeadersMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let allowed_origin = self.allowed_origin.clone();
        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.await?;
            let headers = response.headers_mut();
            headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
            headers.insert(
                CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            );
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allowed_origin);
            headers.insert(CONNECTION, HeaderValue::from_static("close"));
            Ok(response)
        })
    }
}
