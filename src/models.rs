// Plain row types for the four entities, plus the composite shapes the API
// returns. Persistence stays in `database.rs`; nothing here talks to the pool.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user profile, keyed by lower-cased Ethereum wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub wallet_address: String,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_pic_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub wallet_address: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// One like per (post, wallet) pair; the pair is the composite primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Like {
    pub post_id: i64,
    pub wallet_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub wallet_address: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A post together with its likes and comments, as returned by GET /posts/{id}.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
}

/// One page of the feed. `total` counts every post, not just this page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFeed {
    pub posts: Vec<Post>,
    pub total: i64,
}
