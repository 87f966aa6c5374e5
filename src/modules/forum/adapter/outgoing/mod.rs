mod category_query_postgres;
mod post_repository_postgres;
pub mod sea_orm_entity;
mod tag_repository_postgres;
mod topic_repository_postgres;
mod user_query_postgres;

pub use category_query_postgres::CategoryQueryPostgres;
pub use post_repository_postgres::PostRepositoryPostgres;
pub use tag_repository_postgres::TagRepositoryPostgres;
pub use topic_repository_postgres::TopicRepositoryPostgres;
pub use user_query_postgres::UserQueryPostgres;
