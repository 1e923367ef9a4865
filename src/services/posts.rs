use std::sync::Arc;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Comment, Like, Post, PostDetail, PostFeed};
use crate::validation::{NewComment, NewPost, PageRequest};

use super::is_unique_violation;

/// Post feed, likes, and comments. Holds no state beyond the store handle;
/// every read goes back to the database.
#[derive(Clone)]
pub struct PostService {
    db: Arc<Database>,
}

impl PostService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create_post(&self, new_post: NewPost) -> AppResult<Post> {
        let author = new_post.wallet_address.to_lowercase();
        let post = self.db.insert_post(&author, &new_post.content).await?;
        tracing::info!(post_id = post.id, author = %post.wallet_address, "post created");
        Ok(post)
    }

    /// One feed page, newest first, plus the total across all pages.
    pub async fn get_posts(&self, page: PageRequest) -> AppResult<PostFeed> {
        let posts = self.db.get_posts(page.limit, page.offset()).await?;
        let total = self.db.count_posts().await?;
        Ok(PostFeed { posts, total })
    }

    /// A post with its likes and comments; `None` when no post has this id.
    pub async fn get_post_by_id(&self, id: i64) -> AppResult<Option<PostDetail>> {
        let Some(post) = self.db.get_post(id).await? else {
            return Ok(None);
        };
        let likes = self.db.get_likes_for_post(id).await?;
        let comments = self.db.get_comments_for_post(id).await?;
        Ok(Some(PostDetail {
            post,
            likes,
            comments,
        }))
    }

    /// Records one like per (post, wallet). The lookup is a fast path only;
    /// the composite primary key decides races, and its violation maps to the
    /// same conflict as the explicit check.
    pub async fn like_post(&self, post_id: i64, wallet_address: &str) -> AppResult<Like> {
        let wallet = wallet_address.to_lowercase();

        if !self.db.post_exists(post_id).await? {
            return Err(AppError::PostNotFound);
        }

        if self.db.find_like(post_id, &wallet).await?.is_some() {
            return Err(AppError::DuplicateLike);
        }

        match self.db.insert_like(post_id, &wallet).await {
            Ok(like) => Ok(like),
            Err(err) if is_unique_violation(&err) => Err(AppError::DuplicateLike),
            Err(err) => Err(err.into()),
        }
    }

    /// Comments are unrestricted apart from requiring the post to exist.
    pub async fn create_comment(&self, post_id: i64, new_comment: NewComment) -> AppResult<Comment> {
        let wallet = new_comment.wallet_address.to_lowercase();

        if !self.db.post_exists(post_id).await? {
            return Err(AppError::PostNotFound);
        }

        let comment = self
            .db
            .insert_comment(post_id, &wallet, &new_comment.content)
            .await?;
        Ok(comment)
    }
}
