//! Domain records passed between storage and the response envelope.
//!
//! The records carry no behavior. Their serde representation is the JSON wire
//! format: camelCase keys and RFC 3339 timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post ID
    pub pid: i32,
    /// Title
    pub title: String,
    /// Creation timestamp
    #[serde(rename = "cDate")]
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp, `None` if never edited
    #[serde(rename = "mDate")]
    pub modified_at: Option<DateTime<Utc>>,
    /// Body text
    pub content: String,
    /// Tags
    pub tags: Vec<String>,
}

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Post the comment belongs to
    pub pid: i32,
    /// Comment ID
    pub cid: i32,
    /// Author email
    pub email: String,
    /// Creation timestamp
    #[serde(rename = "cDate")]
    pub created_at: DateTime<Utc>,
    /// Body text
    pub content: String,
}

/// A user account as seen by the server.
///
/// Privilege `0` is the elevated (admin) level; any other value is an
/// ordinary account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID
    pub uid: i32,
    /// Login name
    pub user_name: String,
    /// Privilege level
    pub privilege: i32,
}

impl User {
    /// Privilege level granting post and comment mutations.
    pub const ADMIN_PRIVILEGE: i32 = 0;

    /// Returns `true` if this user holds the elevated privilege level.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.privilege == Self::ADMIN_PRIVILEGE
    }
}

/// One page of posts together with the page count.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsPage {
    /// Posts on this page
    pub posts: Vec<Post>,
    /// Number of pages at the requested page size
    pub max_page: i32,
}

/// One page of comments together with the page count.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsPage {
    /// Comments on this page
    pub comments: Vec<Comment>,
    /// Number of pages at the requested page size
    pub max_page: i32,
}
