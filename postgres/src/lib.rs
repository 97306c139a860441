//! `PostgreSQL` storage backend for the blog server.
//!
//! This crate provides [`PostgresBlogStore`], which implements the
//! `BlogStore` trait from `blog-core` on top of an `sqlx` connection pool.
//! All query logic lives in stored procedures created by the embedded
//! migration (`migrations/`):
//!
//! - Posts: `getPostByID`, `getPostsByPage`, `getPostsCount`, `getPostsByFTS`,
//!   `getPostsCountByFTS`, `insertPost`, `updatePost`, `deletePost`
//! - Comments: `getCommentsCount`, `getCommentsByPage`, `insertComment`,
//!   `updateComment`, `deleteComment`
//! - Users: `userLogin`, `insertUser`, `updateUser`
//!
//! # Example
//!
//! ```no_run
//! use blog_postgres::{PostgresBlogStore, PostgresConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PostgresConfig::from_env();
//! let store = PostgresBlogStore::connect(&config).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod store;

pub use config::{ConfigError, PostgresConfig};
pub use store::{ConnectError, PostgresBlogStore};
