//! `/posts`: paged listing, optionally filtered by full-text search.

use crate::WebResult;
use crate::envelope::Data;
use crate::error::AppError;
use crate::extractors::QueryParams;
use crate::state::AppState;
use axum::extract::State;
use blog_core::{BlogStore, PostsPage};

/// `GET /posts?page=<n>&pageSize=<n>[&keyword=<text>]`
///
/// The count is fetched first; a page past the end is rejected without
/// listing. An empty keyword lists everything.
///
/// # Errors
///
/// Fails validation for bad pagination or an out-of-range page.
pub async fn list_posts<S: BlogStore>(
    State(state): State<AppState<S>>,
    query: QueryParams,
) -> WebResult<Data<PostsPage>> {
    let pagination = query.pagination()?;
    let keyword = query.get("keyword").filter(|keyword| !keyword.is_empty());

    let count = match keyword {
        Some(keyword) => state.store.get_posts_count_by_fts(keyword).await,
        None => state.store.get_posts_count().await,
    }
    .map_err(|e| AppError::from_store("get count of posts", e))?;

    let max_page = pagination.max_page_for(count)?;
    if count == 0 {
        return Ok(Data(PostsPage::default()));
    }

    let (page_size, page) = (pagination.page_size(), pagination.page());
    let posts = match keyword {
        Some(keyword) => state.store.get_posts_by_fts(keyword, page_size, page).await,
        None => state.store.get_posts(page_size, page).await,
    }
    .map_err(|e| AppError::from_store("get posts", e))?;

    Ok(Data(PostsPage { posts, max_page }))
}
