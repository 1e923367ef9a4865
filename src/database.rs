use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::models::{Comment, Like, Post, User};
use crate::validation::NewUser;

/// Async database handle over a SQLx connection pool. One method per query;
/// all SQL is parameterized. Services own the domain rules, this layer owns
/// the rows.
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Database { pool })
    }

    /// Builds the handle without touching the server. Connections are opened
    /// on first use, so callers that only exercise pre-database paths (tests)
    /// never need a live PostgreSQL.
    pub fn connect_lazy(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_lazy(database_url)?;
        Ok(Database { pool })
    }

    /// Creates the schema if it does not exist. The composite primary key on
    /// likes is the source of truth for deduplication: two concurrent likes
    /// can both pass the service's pre-check, but only one insert commits.
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                wallet_address VARCHAR(42) PRIMARY KEY,
                username VARCHAR(32),
                bio TEXT,
                profile_pic_url TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS posts (
                id BIGSERIAL PRIMARY KEY,
                wallet_address VARCHAR(42) NOT NULL,
                content TEXT NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS likes (
                post_id BIGINT NOT NULL REFERENCES posts(id),
                wallet_address VARCHAR(42) NOT NULL,
                PRIMARY KEY (post_id, wallet_address)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS comments (
                id BIGSERIAL PRIMARY KEY,
                post_id BIGINT NOT NULL REFERENCES posts(id),
                wallet_address VARCHAR(42) NOT NULL,
                content TEXT NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        // Feed reads newest-first; comments are fetched per post.
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_feed ON posts(timestamp DESC, id DESC)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // --- users ---

    pub async fn find_user(&self, wallet_address: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT wallet_address, username, bio, profile_pic_url
             FROM users WHERE wallet_address = $1",
        )
        .bind(wallet_address)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert_user(&self, user: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (wallet_address, username, bio, profile_pic_url)
             VALUES ($1, $2, $3, $4)
             RETURNING wallet_address, username, bio, profile_pic_url",
        )
        .bind(&user.wallet_address)
        .bind(&user.username)
        .bind(&user.bio)
        .bind(&user.profile_pic_url)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn save_user(&self, user: &User) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET username = $2, bio = $3, profile_pic_url = $4
             WHERE wallet_address = $1
             RETURNING wallet_address, username, bio, profile_pic_url",
        )
        .bind(&user.wallet_address)
        .bind(&user.username)
        .bind(&user.bio)
        .bind(&user.profile_pic_url)
        .fetch_one(&self.pool)
        .await
    }

    // --- posts ---

    pub async fn insert_post(&self, wallet_address: &str, content: &str) -> Result<Post, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (wallet_address, content)
             VALUES ($1, $2)
             RETURNING id, wallet_address, content, timestamp",
        )
        .bind(wallet_address)
        .bind(content)
        .fetch_one(&self.pool)
        .await
    }

    /// Newest first; id breaks timestamp ties so pages are stable.
    pub async fn get_posts(&self, limit: i64, offset: i64) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            "SELECT id, wallet_address, content, timestamp
             FROM posts
             ORDER BY timestamp DESC, id DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn count_posts(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn get_post(&self, id: i64) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            "SELECT id, wallet_address, content, timestamp FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn post_exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    // --- likes ---

    pub async fn find_like(
        &self,
        post_id: i64,
        wallet_address: &str,
    ) -> Result<Option<Like>, sqlx::Error> {
        sqlx::query_as::<_, Like>(
            "SELECT post_id, wallet_address FROM likes
             WHERE post_id = $1 AND wallet_address = $2",
        )
        .bind(post_id)
        .bind(wallet_address)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert_like(
        &self,
        post_id: i64,
        wallet_address: &str,
    ) -> Result<Like, sqlx::Error> {
        sqlx::query_as::<_, Like>(
            "INSERT INTO likes (post_id, wallet_address)
             VALUES ($1, $2)
             RETURNING post_id, wallet_address",
        )
        .bind(post_id)
        .bind(wallet_address)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_likes_for_post(&self, post_id: i64) -> Result<Vec<Like>, sqlx::Error> {
        sqlx::query_as::<_, Like>(
            "SELECT post_id, wallet_address FROM likes WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
    }

    // --- comments ---

    pub async fn insert_comment(
        &self,
        post_id: i64,
        wallet_address: &str,
        content: &str,
    ) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, wallet_address, content)
             VALUES ($1, $2, $3)
             RETURNING id, post_id, wallet_address, content, timestamp",
        )
        .bind(post_id)
        .bind(wallet_address)
        .bind(content)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, wallet_address, content, timestamp
             FROM comments WHERE post_id = $1
             ORDER BY timestamp ASC, id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
    }
}
