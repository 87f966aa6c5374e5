use async_trait::async_trait;

use crate::forum::application::domain::entities::ForumUser;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UserQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Resolves a user through its stored email addresses.
    /// `Ok(None)` when no address matches.
    async fn find_by_email(&self, email: &str) -> Result<Option<ForumUser>, UserQueryError>;
}
