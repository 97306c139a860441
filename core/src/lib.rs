//! # Blog Core
//!
//! Domain records and the data-access contract shared by every crate of the
//! blog server.
//!
//! ## Contents
//!
//! - **Records**: [`Post`], [`Comment`], [`User`] and their page wrappers
//! - **Data access**: the [`BlogStore`] trait implemented by storage backends
//! - **Pagination**: page-range arithmetic applied before any list query
//! - **Passwords**: the digest handed to storage instead of plaintext
//!
//! ## Example
//!
//! ```ignore
//! use blog_core::{BlogStore, Pagination};
//!
//! async fn first_page<S: BlogStore>(store: &S) -> blog_core::Result<Vec<blog_core::Post>> {
//!     let count = store.get_posts_count().await?;
//!     let pagination = Pagination::new(1, 10)?;
//!     let max_page = pagination.max_page_for(count)?;
//!     store.get_posts(pagination.page_size(), pagination.page()).await
//! }
//! ```

pub mod error;
pub mod model;
pub mod pagination;
pub mod password;
pub mod store;

pub use error::{Result, StoreError};
pub use model::{Comment, CommentsPage, Post, PostsPage, User};
pub use pagination::{Pagination, PaginationError, max_page};
pub use password::PasswordHash;
pub use store::BlogStore;
