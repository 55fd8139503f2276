use std::sync::Arc;

use crate::UserRepository;

mod login;
mod register;

pub use login::LoginInput;
pub use register::RegisterInput;

/// Credential store: registration and password verification.
#[derive(Clone)]
pub struct Command {
    repository: Arc<dyn UserRepository>,
    allow_self_admin: bool,
}

impl Command {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            repository,
            allow_self_admin: false,
        }
    }

    /// Honor the `is_admin` flag supplied at registration.
    pub fn allow_self_admin(mut self, allow: bool) -> Self {
        self.allow_self_admin = allow;
        self
    }

    pub fn repository(&self) -> &Arc<dyn UserRepository> {
        &self.repository
    }
}
