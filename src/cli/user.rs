use clap::ValueEnum;
use eventbook::Config;
use eventbook_user::{SqliteUserRepository, UserRepository};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Role {
    User,
    Admin,
}

async fn repository(config: &Config) -> anyhow::Result<SqliteUserRepository> {
    let pool = eventbook::db::create_pool(&config.database.url, 1).await?;

    Ok(SqliteUserRepository(eventbook_shared::State::single(pool)))
}

pub async fn set_role(config: Config, username: String, role: Role) -> anyhow::Result<()> {
    let users = repository(&config).await?;

    let Some(user) = users.find_by_username(&username).await? else {
        tracing::error!("user {username} not found");
        return Ok(());
    };

    users.set_admin(&user.id, role == Role::Admin).await?;

    match role {
        Role::Admin => tracing::info!("{username} now has admin access"),
        Role::User => tracing::info!("{username} is now a regular user"),
    }

    Ok(())
}

pub async fn delete(config: Config, username: String) -> anyhow::Result<()> {
    let users = repository(&config).await?;

    let Some(user) = users.find_by_username(&username).await? else {
        tracing::error!("user {username} not found");
        return Ok(());
    };

    users.delete(&user.id).await?;

    tracing::info!("{username} deleted with their events and bookings");

    Ok(())
}
