use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::forum::application::domain::entities::{PostRecord, UserId};

#[derive(Debug, Clone)]
pub struct CreatePostData {
    pub topic_id: Uuid,
    pub author: UserId,
    pub raw: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PostRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Post rejected: {0}")]
    Rejected(String),

    #[error("Post not found")]
    PostNotFound,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, data: CreatePostData) -> Result<PostRecord, PostRepositoryError>;

    async fn destroy_post(&self, post_id: Uuid) -> Result<(), PostRepositoryError>;
}
