mod category_query;
mod post_repository;
mod tag_repository;
mod topic_repository;
mod user_query;

pub use category_query::{CategoryQuery, CategoryQueryError};
pub use post_repository::{CreatePostData, PostRepository, PostRepositoryError};
pub use tag_repository::{TagRepository, TagRepositoryError};
pub use topic_repository::{CreateTopicData, TopicRepository, TopicRepositoryError};
pub use user_query::{UserQuery, UserQueryError};
