//! `/user`: login, registration and password changes.

use crate::actions::{Credentials, UpdatePassword, UserAction};
use crate::envelope::Data;
use crate::error::AppError;
use crate::extractors::ActionBody;
use crate::session::RequestIdentity;
use crate::state::AppState;
use crate::WebResult;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use blog_core::{BlogStore, PasswordHash};

/// `POST /user` with `action` = `login` | `register` | `update`.
///
/// - `login` returns the user and binds it to the caller's session token
/// - `register` returns the new user ID
/// - `update` returns the targeted user ID; the caller must be that user or
///   an administrator
///
/// # Errors
///
/// Fails for bad bodies, wrong credentials, taken user names and
/// unauthorized password changes.
pub async fn change_user<S: BlogStore>(
    State(state): State<AppState<S>>,
    identity: RequestIdentity,
    body: Result<ActionBody, AppError>,
) -> WebResult<Response> {
    match UserAction::from_body(&body?)? {
        UserAction::Login(Credentials {
            user_name,
            password,
        }) => {
            let user = state
                .store
                .user_login(&user_name, &PasswordHash::from_plaintext(&password))
                .await
                .map_err(|e| AppError::from_store("login user", e))?;

            state.sessions.put(identity.token(), user.clone());
            metrics::counter!("blog_logins_total").increment(1);
            tracing::info!(uid = user.uid, fresh_session = identity.is_fresh(), "User logged in");

            Ok(Data(user).into_response())
        }
        UserAction::Register(Credentials {
            user_name,
            password,
        }) => {
            let uid = state
                .store
                .insert_user(&user_name, &PasswordHash::from_plaintext(&password))
                .await
                .map_err(|e| AppError::from_store("register user", e))?;
            tracing::info!(uid, "User registered");
            Ok(Data(uid).into_response())
        }
        UserAction::Update(UpdatePassword { uid, new_password }) => {
            let caller = identity.require_user()?;
            if caller.uid != uid && !caller.is_admin() {
                return Err(AppError::forbidden("not enough privilege"));
            }

            let updated = state
                .store
                .update_user(uid, &PasswordHash::from_plaintext(&new_password))
                .await
                .map_err(|e| AppError::from_store("update user", e))?;
            if !updated {
                return Err(AppError::not_found("no matched user found"));
            }
            tracing::info!(uid, by = caller.uid, "Password changed");
            Ok(Data(uid).into_response())
        }
    }
}
