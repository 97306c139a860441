//! Router configuration for the blog server.

use crate::handlers::{self, reject_method, unknown_route};
use crate::middleware::{SecurityHeadersLayer, SessionLayer};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use blog_core::BlogStore;
use http::HeaderValue;
use tower_http::trace::TraceLayer;

/// Response-level settings of the HTTP surface.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Value of `Access-Control-Allow-Origin`
    pub allowed_origin: HeaderValue,
    /// Mark issued session cookies `Secure`
    pub secure_cookie: bool,
}

/// Build the complete Axum router.
///
/// Routes:
/// - `GET /post`, `POST /post`
/// - `GET /posts`
/// - `GET /comments`
/// - `POST /comment`
/// - `POST /user`
/// - `GET /ping`
///
/// Any other method on these paths, and any other path, is answered with an
/// envelope error. Request flow, outermost first: tracing, security headers,
/// session resolution, handler.
pub fn build_router<S>(state: AppState<S>, options: HttpOptions) -> Router
where
    S: BlogStore + 'static,
{
    let session_layer = SessionLayer::new(state.sessions.clone(), options.secure_cookie);

    Router::new()
        .route(
            "/post",
            get(handlers::post::view_post::<S>)
                .post(handlers::post::change_post::<S>)
                .fallback(reject_method),
        )
        .route(
            "/posts",
            get(handlers::posts::list_posts::<S>).fallback(reject_method),
        )
        .route(
            "/comments",
            get(handlers::comments::list_comments::<S>).fallback(reject_method),
        )
        .route(
            "/comment",
            post(handlers::comment::change_comment::<S>).fallback(reject_method),
        )
        .route("/user", post(handlers::user::change_user::<S>).fallback(reject_method))
        .route("/ping", get(handlers::ping::ping).fallback(reject_method))
        .fallback(unknown_route)
        .with_state(state)
        .layer(session_layer)
        .layer(SecurityHeadersLayer::new(options.allowed_origin))
        .layer(TraceLayer::new_for_http())
}
