use std::sync::Arc;

use eventbook_shared::{Error, Result};
use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString};

use crate::UserRepository;

/// Who may update or delete an existing event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventMutationPolicy {
    /// Any caller, with or without a token.
    Open,
    /// Any caller presenting a valid token.
    Authenticated,
    /// Only the admin who created the event.
    #[default]
    Owner,
}

#[derive(Clone)]
pub struct AccessPolicy {
    users: Arc<dyn UserRepository>,
    event_mutation: EventMutationPolicy,
}

impl AccessPolicy {
    pub fn new(users: Arc<dyn UserRepository>, event_mutation: EventMutationPolicy) -> Self {
        Self {
            users,
            event_mutation,
        }
    }

    pub fn event_mutation(&self) -> EventMutationPolicy {
        self.event_mutation
    }

    pub async fn require_admin(&self, user_id: &str) -> Result<()> {
        match self.users.find_by_id(user_id).await? {
            Some(user) if user.is_admin => Ok(()),
            Some(_) => {
                tracing::warn!(user_id, "non-admin user attempted an admin operation");
                Err(Error::Forbidden)
            }
            None => {
                tracing::warn!(user_id, "unknown user attempted an admin operation");
                Err(Error::Forbidden)
            }
        }
    }

    pub async fn authorize_event_mutation(
        &self,
        requester: Option<&str>,
        owner_id: &str,
    ) -> Result<()> {
        match self.event_mutation {
            EventMutationPolicy::Open => Ok(()),
            EventMutationPolicy::Authenticated => requester.map(|_| ()).ok_or(Error::Unauthorized),
            EventMutationPolicy::Owner => {
                let Some(user_id) = requester else {
                    return Err(Error::Unauthorized);
                };

                self.require_admin(user_id).await?;

                if user_id != owner_id {
                    tracing::warn!(user_id, owner_id, "admin attempted to mutate another admin's event");
                    return Err(Error::Forbidden);
                }

                Ok(())
            }
        }
    }
}
