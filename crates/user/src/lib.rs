pub mod password;
pub mod policy;
pub mod token;

mod command;
mod repository;

pub use command::*;
pub use policy::{AccessPolicy, EventMutationPolicy};
pub use repository::*;
pub use token::TokenIssuer;
