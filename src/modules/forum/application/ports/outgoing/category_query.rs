use async_trait::async_trait;

#[derive(Debug, Clone, thiserror::Error)]
pub enum CategoryQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait CategoryQuery: Send + Sync {
    async fn exists(&self, category_id: i64) -> Result<bool, CategoryQueryError>;
}
