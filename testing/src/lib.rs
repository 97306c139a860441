//! # Blog Testing
//!
//! Test doubles for the blog server.
//!
//! This crate provides:
//! - [`MockBlogStore`]: in-memory [`BlogStore`](blog_core::BlogStore) with a call log
//!
//! ## Example
//!
//! ```
//! use blog_testing::MockBlogStore;
//! use blog_core::BlogStore;
//!
//! # tokio_test_block_on(async {
//! let store = MockBlogStore::new();
//! let pid = store.with_post("Hello", "World", &["intro"]);
//!
//! let post = store.get_post_by_id(pid).await.unwrap();
//! assert_eq!(post.title, "Hello");
//! assert_eq!(store.calls(), vec!["get_post_by_id"]);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod mocks;

pub use mocks::MockBlogStore;
