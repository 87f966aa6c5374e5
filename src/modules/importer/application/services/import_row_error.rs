use crate::forum::application::ports::outgoing::{
    CategoryQueryError, TagRepositoryError, UserQueryError,
};

/// Unexpected failure while processing a single row. The row is abandoned,
/// the run goes on.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ImportRowError {
    #[error("category lookup failed: {0}")]
    CategoryLookup(#[from] CategoryQueryError),

    #[error("user lookup failed: {0}")]
    UserLookup(#[from] UserQueryError),

    #[error("tag lookup failed: {0}")]
    TagLookup(#[from] TagRepositoryError),
}
