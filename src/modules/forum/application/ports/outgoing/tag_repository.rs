use async_trait::async_trait;
use uuid::Uuid;

use crate::forum::application::domain::entities::TagRecord;

#[derive(Debug, Clone, thiserror::Error)]
pub enum TagRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid tag name: {0}")]
    InvalidName(String),

    #[error("Tag already exists")]
    TagAlreadyExists,

    #[error("Topic not found")]
    TopicNotFound,
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Returns the subset of `names` that already exist, in no particular order.
    async fn find_existing_names(&self, names: &[String])
        -> Result<Vec<String>, TagRepositoryError>;

    async fn create_tag(&self, name: &str) -> Result<TagRecord, TagRepositoryError>;

    /// Links the named tags to a topic. Names without a tag row are ignored.
    async fn attach_tags(&self, topic_id: Uuid, names: &[String])
        -> Result<(), TagRepositoryError>;

    /// Removes every tag link of a topic.
    async fn detach_tags(&self, topic_id: Uuid) -> Result<(), TagRepositoryError>;

    async fn destroy_tags(&self, names: &[String]) -> Result<(), TagRepositoryError>;
}
