//! Data-access contract.
//!
//! The HTTP layer talks to storage only through [`BlogStore`]. Implementations
//! manage their own concurrency (a connection pool, a lock) and can be called
//! from any number of request tasks at once.
//!
//! # Implementations
//!
//! - `PostgresBlogStore` (in `blog-postgres`): stored-procedure backend
//! - `MockBlogStore` (in `blog-testing`): in-memory double with a call log
//!
//! # Outcomes
//!
//! Every method returns the success value, [`StoreError::NotFound`] /
//! [`StoreError::Conflict`] for ordinary negative outcomes, or
//! [`StoreError::Backend`] for faults. Delete and update report
//! "no row matched" as `Ok(false)`.
//!
//! [`StoreError::NotFound`]: crate::StoreError::NotFound
//! [`StoreError::Conflict`]: crate::StoreError::Conflict
//! [`StoreError::Backend`]: crate::StoreError::Backend

use crate::error::Result;
use crate::model::{Comment, Post, User};
use crate::password::PasswordHash;
use std::future::Future;

/// Storage operations used by the blog server.
///
/// Pages are 1-based and `page_size` is always positive; callers validate
/// both before calling.
pub trait BlogStore: Send + Sync {
    /// Get a post by ID.
    ///
    /// # Errors
    ///
    /// - Post does not exist → `StoreError::NotFound`
    /// - Query fails → `StoreError::Backend`
    fn get_post_by_id(&self, pid: i32) -> impl Future<Output = Result<Post>> + Send;

    /// Get one page of posts, newest first.
    ///
    /// An empty page is `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the query fails.
    fn get_posts(&self, page_size: i32, page: i32)
    -> impl Future<Output = Result<Vec<Post>>> + Send;

    /// Count all posts.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the query fails.
    fn get_posts_count(&self) -> impl Future<Output = Result<i64>> + Send;

    /// Get one page of posts matching a full-text search.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the query fails.
    fn get_posts_by_fts(
        &self,
        search: &str,
        page_size: i32,
        page: i32,
    ) -> impl Future<Output = Result<Vec<Post>>> + Send;

    /// Count posts matching a full-text search.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the query fails.
    fn get_posts_count_by_fts(&self, search: &str) -> impl Future<Output = Result<i64>> + Send;

    /// Check credentials and return the matching user.
    ///
    /// # Errors
    ///
    /// - Unknown user name or wrong password → `StoreError::NotFound`
    /// - Query fails → `StoreError::Backend`
    fn user_login(
        &self,
        user_name: &str,
        password: &PasswordHash,
    ) -> impl Future<Output = Result<User>> + Send;

    /// Insert a post and return its ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the insert fails.
    fn insert_post(
        &self,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> impl Future<Output = Result<i32>> + Send;

    /// Delete a post. Returns `false` if no post matched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the delete fails.
    fn delete_post(&self, pid: i32) -> impl Future<Output = Result<bool>> + Send;

    /// Replace title, content and tags of a post. Returns `false` if no post matched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the update fails.
    fn update_post(
        &self,
        pid: i32,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Count the comments of a post.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the query fails.
    fn get_comments_count(&self, pid: i32) -> impl Future<Output = Result<i64>> + Send;

    /// Get one page of the comments of a post, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the query fails.
    fn get_comments_by_page(
        &self,
        pid: i32,
        page_size: i32,
        page: i32,
    ) -> impl Future<Output = Result<Vec<Comment>>> + Send;

    /// Insert a comment and return its ID.
    ///
    /// # Errors
    ///
    /// - Post does not exist → `StoreError::NotFound`
    /// - Insert fails → `StoreError::Backend`
    fn insert_comment(
        &self,
        pid: i32,
        content: &str,
        email: &str,
    ) -> impl Future<Output = Result<i32>> + Send;

    /// Delete a comment. Returns `false` if no comment matched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the delete fails.
    fn delete_comment(&self, cid: i32) -> impl Future<Output = Result<bool>> + Send;

    /// Replace content and email of a comment. Returns `false` if no comment matched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the update fails.
    fn update_comment(
        &self,
        cid: i32,
        content: &str,
        email: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Create an ordinary user and return its ID.
    ///
    /// # Errors
    ///
    /// - User name taken → `StoreError::Conflict`
    /// - Insert fails → `StoreError::Backend`
    fn insert_user(
        &self,
        user_name: &str,
        password: &PasswordHash,
    ) -> impl Future<Output = Result<i32>> + Send;

    /// Replace a user's password. Returns `false` if no user matched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the update fails.
    fn update_user(
        &self,
        uid: i32,
        password: &PasswordHash,
    ) -> impl Future<Output = Result<bool>> + Send;
}
