use validator::Validate;

use crate::{NewUser, password};

#[derive(Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 80))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
    pub is_admin: bool,
}

impl super::Command {
    pub async fn register(&self, input: RegisterInput) -> eventbook_shared::Result<String> {
        if input.username.trim().is_empty() || input.password.is_empty() {
            eventbook_shared::invalid!("Username and password are required");
        }

        input.validate()?;

        if self
            .repository
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(eventbook_shared::Error::DuplicateUsername);
        }

        let is_admin = if input.is_admin && !self.allow_self_admin {
            tracing::warn!(
                username = %input.username,
                "self-granted admin ignored at registration"
            );
            false
        } else {
            input.is_admin
        };

        let password_hash = password::hash_password(&input.password)?;

        let user = self
            .repository
            .create(NewUser {
                username: input.username,
                image_url: input.image_url.filter(|url| !url.is_empty()),
                password_hash,
                is_admin,
            })
            .await?;

        tracing::info!(user_id = %user.id, is_admin, "user registered");

        Ok(user.id)
    }
}
