//! Typed inputs of the mutating actions.
//!
//! Each resource decodes an [`ActionBody`] into one enum variant per
//! supported `action`. Field names follow the JSON wire format.

use crate::error::AppError;
use crate::extractors::ActionBody;
use serde::Deserialize;
use std::fmt;

fn unknown_action(resource: &str, action: &str) -> AppError {
    AppError::validation(format!(
        "cannot perform action {action} on {resource}: unknown action"
    ))
}

/// `insert` on `/post`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InsertPost {
    /// Title
    pub title: String,
    /// Body
    pub content: String,
    /// Tags
    pub tags: Vec<String>,
}

/// `delete` on `/post`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeletePost {
    /// Target post
    pub pid: i32,
}

/// `update` on `/post`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePost {
    /// Target post
    pub pid: i32,
    /// Replacement title
    pub new_title: String,
    /// Replacement body
    pub new_content: String,
    /// Replacement tags
    pub new_tags: Vec<String>,
}

/// Mutation of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostAction {
    /// Create a post
    Insert(InsertPost),
    /// Remove a post
    Delete(DeletePost),
    /// Replace a post
    Update(UpdatePost),
}

impl PostAction {
    /// Decode the action named in `body`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown action or a bad field.
    pub fn from_body(body: &ActionBody) -> Result<Self, AppError> {
        match body.action() {
            "insert" => body.decode().map(Self::Insert),
            "delete" => body.decode().map(Self::Delete),
            "update" => body.decode().map(Self::Update),
            other => Err(unknown_action("post", other)),
        }
    }
}

/// `insert` on `/comment`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InsertComment {
    /// Post commented on
    pub pid: i32,
    /// Body
    pub content: String,
    /// Author email
    pub email: String,
}

/// `delete` on `/comment`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteComment {
    /// Target comment
    #[serde(rename = "commentID")]
    pub comment_id: i32,
}

/// `update` on `/comment`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComment {
    /// Target comment
    #[serde(rename = "commentID")]
    pub comment_id: i32,
    /// Replacement body
    pub new_content: String,
    /// Replacement author email
    pub new_email: String,
}

/// Mutation of a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentAction {
    /// Create a comment
    Insert(InsertComment),
    /// Remove a comment
    Delete(DeleteComment),
    /// Replace a comment
    Update(UpdateComment),
}

impl CommentAction {
    /// Decode the action named in `body`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown action or a bad field.
    pub fn from_body(body: &ActionBody) -> Result<Self, AppError> {
        match body.action() {
            "insert" => body.decode().map(Self::Insert),
            "delete" => body.decode().map(Self::Delete),
            "update" => body.decode().map(Self::Update),
            other => Err(unknown_action("comment", other)),
        }
    }
}

/// `login` and `register` on `/user`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Account name
    #[serde(rename = "userName")]
    pub user_name: String,
    /// Plaintext password
    #[serde(rename = "passWord")]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"..")
            .finish()
    }
}

/// `update` on `/user`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct UpdatePassword {
    /// Target account
    pub uid: i32,
    /// New plaintext password
    #[serde(rename = "newPassWord")]
    pub new_password: String,
}

impl fmt::Debug for UpdatePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdatePassword")
            .field("uid", &self.uid)
            .field("new_password", &"..")
            .finish()
    }
}

/// Account operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Check credentials and bind the session
    Login(Credentials),
    /// Create an ordinary account
    Register(Credentials),
    /// Change a password
    Update(UpdatePassword),
}

impl UserAction {
    /// Decode the action named in `body`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown action or a bad field.
    pub fn from_body(body: &ActionBody) -> Result<Self, AppError> {
        match body.action() {
            "login" => body.decode().map(Self::Login),
            "register" => body.decode().map(Self::Register),
            "update" => body.decode().map(Self::Update),
            other => Err(unknown_action("user", other)),
        }
    }
}
