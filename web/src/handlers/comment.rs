//! `/comment`: insert / update / delete as an administrator.

use crate::WebResult;
use crate::actions::{CommentAction, DeleteComment, InsertComment, UpdateComment};
use crate::envelope::Data;
use crate::error::AppError;
use crate::extractors::ActionBody;
use crate::session::RequestIdentity;
use crate::state::AppState;
use axum::extract::State;
use blog_core::BlogStore;

/// `POST /comment` with `action` = `insert` | `delete` | `update`.
///
/// Returns the ID of the inserted or targeted comment.
///
/// # Errors
///
/// Fails for anonymous or ordinary users, bad bodies, a missing post and
/// unmatched comments.
pub async fn change_comment<S: BlogStore>(
    State(state): State<AppState<S>>,
    identity: RequestIdentity,
    body: Result<ActionBody, AppError>,
) -> WebResult<Data<i32>> {
    let user = identity.require_admin()?;
    let action = CommentAction::from_body(&body?)?;

    match action {
        CommentAction::Insert(InsertComment {
            pid,
            content,
            email,
        }) => {
            let cid = state
                .store
                .insert_comment(pid, &content, &email)
                .await
                .map_err(|e| AppError::from_store("insert comment", e))?;
            tracing::info!(cid, pid, uid = user.uid, "Comment inserted");
            Ok(Data(cid))
        }
        CommentAction::Delete(DeleteComment { comment_id }) => {
            let deleted = state
                .store
                .delete_comment(comment_id)
                .await
                .map_err(|e| AppError::from_store("delete comment", e))?;
            if !deleted {
                return Err(AppError::not_found("no matched comment found"));
            }
            tracing::info!(cid = comment_id, uid = user.uid, "Comment deleted");
            Ok(Data(comment_id))
        }
        CommentAction::Update(UpdateComment {
            comment_id,
            new_content,
            new_email,
        }) => {
            let updated = state
                .store
                .update_comment(comment_id, &new_content, &new_email)
                .await
                .map_err(|e| AppError::from_store("update comment", e))?;
            if !updated {
                return Err(AppError::not_found("no matched comment found"));
            }
            tracing::info!(cid = comment_id, uid = user.uid, "Comment updated");
            Ok(Data(comment_id))
        }
    }
}
