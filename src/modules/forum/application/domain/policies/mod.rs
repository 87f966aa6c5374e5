mod topic_policy;

pub use topic_policy::{TopicPolicy, TopicPolicyViolation};
