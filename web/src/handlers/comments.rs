//! `/comments`: paged comments of one post.

use crate::WebResult;
use crate::envelope::Data;
use crate::error::AppError;
use crate::extractors::QueryParams;
use crate::state::AppState;
use axum::extract::State;
use blog_core::{BlogStore, CommentsPage};

/// `GET /comments?pid=<pid>&page=<n>&pageSize=<n>`
///
/// # Errors
///
/// Fails validation for a bad `pid`, bad pagination or an out-of-range page.
pub async fn list_comments<S: BlogStore>(
    State(state): State<AppState<S>>,
    query: QueryParams,
) -> WebResult<Data<CommentsPage>> {
    let pid = query.int("pid")?;
    if pid < 1 {
        return Err(AppError::validation("pid cannot be less than 1"));
    }
    let pagination = query.pagination()?;

    let count = state
        .store
        .get_comments_count(pid)
        .await
        .map_err(|e| AppError::from_store("get count of comments", e))?;

    let max_page = pagination.max_page_for(count)?;
    if count == 0 {
        return Ok(Data(CommentsPage::default()));
    }

    let comments = state
        .store
        .get_comments_by_page(pid, pagination.page_size(), pagination.page())
        .await
        .map_err(|e| AppError::from_store("get comments", e))?;

    Ok(Data(CommentsPage { comments, max_page }))
}
