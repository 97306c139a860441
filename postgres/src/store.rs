//! Stored-procedure backed [`BlogStore`].

use crate::config::{ConfigError, PostgresConfig};
use blog_core::{BlogStore, Comment, PasswordHash, Post, Result, StoreError, User};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

/// Failure to bring up the store.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Settings rejected before connecting
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Pool could not connect
    #[error("failed to connect: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded migration failed
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// `PostgreSQL` blog store.
///
/// Every operation is a single stored-procedure call on the pool.
#[derive(Clone)]
pub struct PostgresBlogStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct PostRow {
    pid: i32,
    title: String,
    c_date: DateTime<Utc>,
    m_date: Option<DateTime<Utc>>,
    content: String,
    tags: Vec<String>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            pid: row.pid,
            title: row.title,
            created_at: row.c_date,
            modified_at: row.m_date,
            content: row.content,
            tags: row.tags,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    pid: i32,
    cid: i32,
    email: String,
    c_date: DateTime<Utc>,
    content: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            pid: row.pid,
            cid: row.cid,
            email: row.email,
            created_at: row.c_date,
            content: row.content,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    uid: i32,
    user_name: String,
    privilege: i32,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            uid: row.uid,
            user_name: row.user_name,
            privilege: row.privilege,
        }
    }
}

/// Wrap a query failure as a backend fault, tagged with the procedure name.
///
/// Only counted here; the web layer logs the fault with its request context.
fn backend(procedure: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| {
        metrics::counter!("blog_store_errors_total", "procedure" => procedure).increment(1);
        StoreError::Backend(format!("{procedure}(): {e}"))
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

impl PostgresBlogStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Validate `config`, open a pool and optionally run the migration.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError`] if the settings are invalid, the database is
    /// unreachable or the migration fails.
    pub async fn connect(config: &PostgresConfig) -> std::result::Result<Self, ConnectError> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout_duration())
            .connect(&config.url)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connected to PostgreSQL"
        );

        let store = Self::from_pool(pool);
        if config.run_migrations {
            store.migrate().await?;
        }
        Ok(store)
    }

    /// Run database migrations.
    ///
    /// Creates the tables and stored procedures if they don't already exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::Migration`] if the migration fails.
    pub async fn migrate(&self) -> std::result::Result<(), ConnectError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Blog schema migrated");
        Ok(())
    }
}

impl BlogStore for PostgresBlogStore {
    async fn get_post_by_id(&self, pid: i32) -> Result<Post> {
        sqlx::query_as::<_, PostRow>("SELECT * FROM public.getPostByID($1)")
            .bind(pid)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend("getPostByID"))?
            .map(Post::from)
            .ok_or_else(|| StoreError::NotFound("post".to_string()))
    }

    async fn get_posts(&self, page_size: i32, page: i32) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>("SELECT * FROM public.getPostsByPage($1, $2)")
            .bind(page_size)
            .bind(page)
            .fetch_all(&self.pool)
            .await
            .map_err(backend("getPostsByPage"))?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn get_posts_count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT public.getPostsCount()")
            .fetch_one(&self.pool)
            .await
            .map_err(backend("getPostsCount"))
    }

    async fn get_posts_by_fts(&self, search: &str, page_size: i32, page: i32) -> Result<Vec<Post>> {
        let rows =
            sqlx::query_as::<_, PostRow>("SELECT * FROM public.getPostsByFTS($1, $2, $3)")
                .bind(search)
                .bind(page_size)
                .bind(page)
                .fetch_all(&self.pool)
                .await
                .map_err(backend("getPostsByFTS"))?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn get_posts_count_by_fts(&self, search: &str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT public.getPostsCountByFTS($1)")
            .bind(search)
            .fetch_one(&self.pool)
            .await
            .map_err(backend("getPostsCountByFTS"))
    }

    async fn user_login(&self, user_name: &str, password: &PasswordHash) -> Result<User> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM public.userLogin($1, $2)")
            .bind(user_name)
            .bind(password.as_bytes().as_slice())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend("userLogin"))?
            .map(User::from)
            .ok_or_else(|| StoreError::NotFound("user".to_string()))
    }

    async fn insert_post(&self, title: &str, content: &str, tags: &[String]) -> Result<i32> {
        sqlx::query_scalar::<_, i32>("SELECT public.insertPost($1, $2, $3)")
            .bind(title)
            .bind(content)
            .bind(tags)
            .fetch_one(&self.pool)
            .await
            .map_err(backend("insertPost"))
    }

    async fn delete_post(&self, pid: i32) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT public.deletePost($1)")
            .bind(pid)
            .fetch_one(&self.pool)
            .await
            .map_err(backend("deletePost"))
    }

    async fn update_post(
        &self,
        pid: i32,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT public.updatePost($1, $2, $3, $4)")
            .bind(pid)
            .bind(title)
            .bind(content)
            .bind(tags)
            .fetch_one(&self.pool)
            .await
            .map_err(backend("updatePost"))
    }

    async fn get_comments_count(&self, pid: i32) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT public.getCommentsCount($1)")
            .bind(pid)
            .fetch_one(&self.pool)
            .await
            .map_err(backend("getCommentsCount"))
    }

    async fn get_comments_by_page(
        &self,
        pid: i32,
        page_size: i32,
        page: i32,
    ) -> Result<Vec<Comment>> {
        let rows =
            sqlx::query_as::<_, CommentRow>("SELECT * FROM public.getCommentsByPage($1, $2, $3)")
                .bind(pid)
                .bind(page_size)
                .bind(page)
                .fetch_all(&self.pool)
                .await
                .map_err(backend("getCommentsByPage"))?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn insert_comment(&self, pid: i32, content: &str, email: &str) -> Result<i32> {
        sqlx::query_scalar::<_, i32>("SELECT public.insertComment($1, $2, $3)")
            .bind(pid)
            .bind(content)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    StoreError::NotFound("post".to_string())
                } else {
                    backend("insertComment")(e)
                }
            })
    }

    async fn delete_comment(&self, cid: i32) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT public.deleteComment($1)")
            .bind(cid)
            .fetch_one(&self.pool)
            .await
            .map_err(backend("deleteComment"))
    }

    async fn update_comment(&self, cid: i32, content: &str, email: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT public.updateComment($1, $2, $3)")
            .bind(cid)
            .bind(content)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(backend("updateComment"))
    }

    async fn insert_user(&self, user_name: &str, password: &PasswordHash) -> Result<i32> {
        sqlx::query_scalar::<_, i32>("SELECT public.insertUser($1, $2)")
            .bind(user_name)
            .bind(password.as_bytes().as_slice())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict("user name".to_string())
                } else {
                    backend("insertUser")(e)
                }
            })
    }

    async fn update_user(&self, uid: i32, password: &PasswordHash) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT public.updateUser($1, $2)")
            .bind(uid)
            .bind(password.as_bytes().as_slice())
            .fetch_one(&self.pool)
            .await
            .map_err(backend("updateUser"))
    }
}
