pub mod categories;
pub mod posts;
pub mod tags;
pub mod topic_tags;
pub mod topics;
pub mod user_emails;
pub mod users;
