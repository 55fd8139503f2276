use eventbook_shared::Error;

use crate::{User, password};

pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl super::Command {
    /// Unknown usernames and wrong passwords fail the same way.
    pub async fn verify(&self, input: LoginInput) -> eventbook_shared::Result<User> {
        let Some(credentials) = self.repository.find_credentials(&input.username).await? else {
            password::burn_verification(&input.password);
            return Err(Error::InvalidCredentials);
        };

        if !password::verify_password(&input.password, &credentials.password)? {
            return Err(Error::InvalidCredentials);
        }

        let Some(user) = self.repository.find_by_id(&credentials.id).await? else {
            return Err(Error::InvalidCredentials);
        };

        Ok(user)
    }
}
