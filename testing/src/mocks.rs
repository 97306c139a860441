//! Mock blog store for testing.

use blog_core::{BlogStore, Comment, PasswordHash, Post, Result, StoreError, User};
use chrono::Utc;
use std::collections::BTreeMap;
use std::future::{Future, Ready, ready};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mock blog store.
///
/// Uses in-memory storage for testing. Every [`BlogStore`] call is recorded
/// by method name, so tests can assert that a request never reached storage.
/// Seeding helpers (`with_*`) are not recorded.
#[derive(Debug, Clone, Default)]
pub struct MockBlogStore {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    posts: BTreeMap<i32, Post>,
    comments: BTreeMap<i32, Comment>,
    users: BTreeMap<i32, (User, PasswordHash)>,
    next_pid: i32,
    next_cid: i32,
    next_uid: i32,
    calls: Vec<&'static str>,
    failure: Option<String>,
}

impl MockBlogStore {
    /// Create an empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user and return its ID. IDs start at 1.
    pub fn with_user(&self, user_name: &str, password: &str, privilege: i32) -> i32 {
        let mut state = self.lock();
        state.next_uid += 1;
        let uid = state.next_uid;
        let user = User {
            uid,
            user_name: user_name.to_string(),
            privilege,
        };
        state
            .users
            .insert(uid, (user, PasswordHash::from_plaintext(password)));
        uid
    }

    /// Seed a post and return its ID. IDs start at 1.
    pub fn with_post(&self, title: &str, content: &str, tags: &[&str]) -> i32 {
        let tags: Vec<String> = tags.iter().map(ToString::to_string).collect();
        self.lock().insert_post(title, content, &tags)
    }

    /// Seed a comment and return its ID. IDs start at 1.
    ///
    /// The post does not need to exist.
    pub fn with_comment(&self, pid: i32, content: &str, email: &str) -> i32 {
        self.lock().insert_comment(pid, content, email)
    }

    /// Change the stored privilege of a user.
    pub fn set_privilege(&self, uid: i32, privilege: i32) {
        if let Some((user, _)) = self.lock().users.get_mut(&uid) {
            user.privilege = privilege;
        }
    }

    /// Make every subsequent call fail with `StoreError::Backend(message)`.
    pub fn fail_with(&self, message: &str) {
        self.lock().failure = Some(message.to_string());
    }

    /// Names of the [`BlogStore`] methods called so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    /// Number of [`BlogStore`] calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Get a stored post without recording a call.
    #[must_use]
    pub fn post(&self, pid: i32) -> Option<Post> {
        self.lock().posts.get(&pid).cloned()
    }

    /// Get a stored comment without recording a call.
    #[must_use]
    pub fn comment(&self, cid: i32) -> Option<Comment> {
        self.lock().comments.get(&cid).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn call<T>(
        &self,
        method: &'static str,
        op: impl FnOnce(&mut MockState) -> Result<T>,
    ) -> Ready<Result<T>> {
        let mut state = self.lock();
        state.calls.push(method);
        if let Some(message) = state.failure.clone() {
            return ready(Err(StoreError::Backend(message)));
        }
        ready(op(&mut *state))
    }
}

impl MockState {
    fn insert_post(&mut self, title: &str, content: &str, tags: &[String]) -> i32 {
        self.next_pid += 1;
        let pid = self.next_pid;
        self.posts.insert(
            pid,
            Post {
                pid,
                title: title.to_string(),
                created_at: Utc::now(),
                modified_at: None,
                content: content.to_string(),
                tags: tags.to_vec(),
            },
        );
        pid
    }

    fn insert_comment(&mut self, pid: i32, content: &str, email: &str) -> i32 {
        self.next_cid += 1;
        let cid = self.next_cid;
        self.comments.insert(
            cid,
            Comment {
                pid,
                cid,
                email: email.to_string(),
                created_at: Utc::now(),
                content: content.to_string(),
            },
        );
        cid
    }

    fn matching_posts(&self, search: Option<&str>) -> Vec<Post> {
        let needle = search.map(str::to_lowercase);
        self.posts
            .values()
            .rev()
            .filter(|post| {
                needle.as_deref().is_none_or(|needle| {
                    post.title.to_lowercase().contains(needle)
                        || post.content.to_lowercase().contains(needle)
                        || post.tags.iter().any(|tag| tag.to_lowercase() == needle)
                })
            })
            .cloned()
            .collect()
    }

    fn post_comments(&self, pid: i32) -> impl Iterator<Item = &Comment> {
        self.comments.values().filter(move |comment| comment.pid == pid)
    }
}

fn page_of<T>(items: impl IntoIterator<Item = T>, page_size: i32, page: i32) -> Vec<T> {
    let page_size = usize::try_from(page_size).unwrap_or(0);
    let skip = usize::try_from(page - 1).unwrap_or(0) * page_size;
    items.into_iter().skip(skip).take(page_size).collect()
}

fn count(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

impl BlogStore for MockBlogStore {
    fn get_post_by_id(&self, pid: i32) -> impl Future<Output = Result<Post>> + Send {
        self.call("get_post_by_id", |state| {
            state
                .posts
                .get(&pid)
                .cloned()
                .ok_or_else(|| StoreError::NotFound("post".to_string()))
        })
    }

    fn get_posts(&self, page_size: i32, page: i32) -> impl Future<Output = Result<Vec<Post>>> + Send {
        self.call("get_posts", |state| {
            Ok(page_of(state.matching_posts(None), page_size, page))
        })
    }

    fn get_posts_count(&self) -> impl Future<Output = Result<i64>> + Send {
        self.call("get_posts_count", |state| Ok(count(state.posts.len())))
    }

    fn get_posts_by_fts(
        &self,
        search: &str,
        page_size: i32,
        page: i32,
    ) -> impl Future<Output = Result<Vec<Post>>> + Send {
        self.call("get_posts_by_fts", |state| {
            Ok(page_of(state.matching_posts(Some(search)), page_size, page))
        })
    }

    fn get_posts_count_by_fts(&self, search: &str) -> impl Future<Output = Result<i64>> + Send {
        self.call("get_posts_count_by_fts", |state| {
            Ok(count(state.matching_posts(Some(search)).len()))
        })
    }

    fn user_login(
        &self,
        user_name: &str,
        password: &PasswordHash,
    ) -> impl Future<Output = Result<User>> + Send {
        self.call("user_login", |state| {
            state
                .users
                .values()
                .find(|(user, hash)| user.user_name == user_name && hash == password)
                .map(|(user, _)| user.clone())
                .ok_or_else(|| StoreError::NotFound("user".to_string()))
        })
    }

    fn insert_post(
        &self,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> impl Future<Output = Result<i32>> + Send {
        self.call("insert_post", |state| Ok(state.insert_post(title, content, tags)))
    }

    fn delete_post(&self, pid: i32) -> impl Future<Output = Result<bool>> + Send {
        self.call("delete_post", |state| Ok(state.posts.remove(&pid).is_some()))
    }

    fn update_post(
        &self,
        pid: i32,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> impl Future<Output = Result<bool>> + Send {
        self.call("update_post", |state| {
            Ok(state.posts.get_mut(&pid).is_some_and(|post| {
                post.title = title.to_string();
                post.content = content.to_string();
                post.tags = tags.to_vec();
                post.modified_at = Some(Utc::now());
                true
            }))
        })
    }

    fn get_comments_count(&self, pid: i32) -> impl Future<Output = Result<i64>> + Send {
        self.call("get_comments_count", |state| {
            Ok(count(state.post_comments(pid).count()))
        })
    }

    fn get_comments_by_page(
        &self,
        pid: i32,
        page_size: i32,
        page: i32,
    ) -> impl Future<Output = Result<Vec<Comment>>> + Send {
        self.call("get_comments_by_page", |state| {
            Ok(page_of(state.post_comments(pid).cloned(), page_size, page))
        })
    }

    fn insert_comment(
        &self,
        pid: i32,
        content: &str,
        email: &str,
    ) -> impl Future<Output = Result<i32>> + Send {
        self.call("insert_comment", |state| {
            if !state.posts.contains_key(&pid) {
                return Err(StoreError::NotFound("post".to_string()));
            }
            Ok(state.insert_comment(pid, content, email))
        })
    }

    fn delete_comment(&self, cid: i32) -> impl Future<Output = Result<bool>> + Send {
        self.call("delete_comment", |state| Ok(state.comments.remove(&cid).is_some()))
    }

    fn update_comment(
        &self,
        cid: i32,
        content: &str,
        email: &str,
    ) -> impl Future<Output = Result<bool>> + Send {
        self.call("update_comment", |state| {
            Ok(state.comments.get_mut(&cid).is_some_and(|comment| {
                comment.content = content.to_string();
                comment.email = email.to_string();
                true
            }))
        })
    }

    fn insert_user(
        &self,
        user_name: &str,
        password: &PasswordHash,
    ) -> impl Future<Output = Result<i32>> + Send {
        self.call("insert_user", |state| {
            if state.users.values().any(|(user, _)| user.user_name == user_name) {
                return Err(StoreError::Conflict("user name".to_string()));
            }
            state.next_uid += 1;
            let uid = state.next_uid;
            let user = User {
                uid,
                user_name: user_name.to_string(),
                privilege: 1,
            };
            state.users.insert(uid, (user, *password));
            Ok(uid)
        })
    }

    fn update_user(
        &self,
        uid: i32,
        password: &PasswordHash,
    ) -> impl Future<Output = Result<bool>> + Send {
        self.call("update_user", |state| {
            Ok(state.users.get_mut(&uid).is_some_and(|(_, hash)| {
                *hash = *password;
                true
            }))
        })
    }
}
