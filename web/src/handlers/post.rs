//! `/post`: view one post, or insert / update / delete as an administrator.

use crate::WebResult;
use crate::actions::{DeletePost, InsertPost, PostAction, UpdatePost};
use crate::envelope::Data;
use crate::error::AppError;
use crate::extractors::{ActionBody, QueryParams};
use crate::session::RequestIdentity;
use crate::state::AppState;
use axum::extract::State;
use blog_core::{BlogStore, Post};

/// `GET /post?id=<pid>`
///
/// # Errors
///
/// Fails validation if `id` is missing, not an integer or negative.
pub async fn view_post<S: BlogStore>(
    State(state): State<AppState<S>>,
    query: QueryParams,
) -> WebResult<Data<Post>> {
    let id = query.int("id")?;
    if id < 0 {
        return Err(AppError::validation("id value cannot be less than 0"));
    }

    let post = state
        .store
        .get_post_by_id(id)
        .await
        .map_err(|e| AppError::from_store("get post by id", e))?;
    Ok(Data(post))
}

/// `POST /post` with `action` = `insert` | `delete` | `update`.
///
/// Returns the ID of the inserted or targeted post. The privilege check runs
/// before the body is inspected.
///
/// # Errors
///
/// Fails for anonymous or ordinary users, bad bodies and unmatched posts.
pub async fn change_post<S: BlogStore>(
    State(state): State<AppState<S>>,
    identity: RequestIdentity,
    body: Result<ActionBody, AppError>,
) -> WebResult<Data<i32>> {
    let user = identity.require_admin()?;
    let action = PostAction::from_body(&body?)?;

    match action {
        PostAction::Insert(InsertPost {
            title,
            content,
            tags,
        }) => {
            let pid = state
                .store
                .insert_post(&title, &content, &tags)
                .await
                .map_err(|e| AppError::from_store("insert post", e))?;
            tracing::info!(pid, uid = user.uid, "Post inserted");
            Ok(Data(pid))
        }
        PostAction::Delete(DeletePost { pid }) => {
            let deleted = state
                .store
                .delete_post(pid)
                .await
                .map_err(|e| AppError::from_store("delete post", e))?;
            if !deleted {
                return Err(AppError::not_found("no matched post found"));
            }
            tracing::info!(pid, uid = user.uid, "Post deleted");
            Ok(Data(pid))
        }
        PostAction::Update(UpdatePost {
            pid,
            new_title,
            new_content,
            new_tags,
        }) => {
            let updated = state
                .store
                .update_post(pid, &new_title, &new_content, &new_tags)
                .await
                .map_err(|e| AppError::from_store("update post", e))?;
            if !updated {
                return Err(AppError::not_found("no matched post found"));
            }
            tracing::info!(pid, uid = user.uid, "Post updated");
            Ok(Data(pid))
        }
    }
}
