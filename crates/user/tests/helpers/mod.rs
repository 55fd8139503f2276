use std::{path::PathBuf, str::FromStr, sync::Arc};

use eventbook_shared::State;
use eventbook_user::{Command, RegisterInput, SqliteUserRepository};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    eventbook_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(State::single(pool))
}

pub fn command(state: &State) -> Command {
    Command::new(Arc::new(SqliteUserRepository(state.clone())))
}

#[allow(dead_code)]
pub async fn create_user(cmd: &Command, name: impl Into<String>) -> anyhow::Result<String> {
    Ok(cmd
        .register(RegisterInput {
            username: name.into(),
            password: "my_password".to_owned(),
            image_url: None,
            is_admin: false,
        })
        .await?)
}

#[allow(dead_code)]
pub async fn create_admin(cmd: &Command, name: impl Into<String>) -> anyhow::Result<String> {
    let id = create_user(cmd, name).await?;
    cmd.repository().set_admin(&id, true).await?;

    Ok(id)
}
