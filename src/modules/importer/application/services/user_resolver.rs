use std::sync::Arc;

use tracing::debug;

use crate::forum::application::ports::outgoing::UserQuery;
use crate::importer::application::domain::entities::ResolvedUsers;

use super::ImportRowError;

/// Looks up the author of the main post and the author of the answer.
#[derive(Clone)]
pub struct UserResolver {
    users: Arc<dyn UserQuery + Send + Sync>,
}

impl UserResolver {
    pub fn new(users: Arc<dyn UserQuery + Send + Sync>) -> Self {
        Self { users }
    }

    /// `Ok(None)` unless both accounts exist.
    pub async fn resolve(
        &self,
        creator_email: &str,
        replier_email: &str,
    ) -> Result<Option<ResolvedUsers>, ImportRowError> {
        let creator = self.users.find_by_email(creator_email).await?;
        let replier = self.users.find_by_email(replier_email).await?;

        match (creator, replier) {
            (Some(creator), Some(replier)) => Ok(Some(ResolvedUsers { creator, replier })),
            (creator, replier) => {
                debug!(
                    creator_found = creator.is_some(),
                    replier_found = replier.is_some(),
                    "User lookup incomplete"
                );
                Ok(None)
            }
        }
    }
}
