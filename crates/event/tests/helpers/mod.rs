use std::{path::PathBuf, str::FromStr};

use eventbook_event::{EventRepository, NewEvent, SqliteBookingRepository, SqliteEventRepository};
use eventbook_shared::State;
use eventbook_user::{NewUser, SqliteUserRepository, UserRepository};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub struct Repositories {
    pub state: State,
    pub users: SqliteUserRepository,
    pub events: SqliteEventRepository,
    pub bookings: SqliteBookingRepository,
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<Repositories> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    eventbook_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    let state = State::single(pool);

    Ok(Repositories {
        users: SqliteUserRepository(state.clone()),
        events: SqliteEventRepository(state.clone()),
        bookings: SqliteBookingRepository(state.clone()),
        state,
    })
}

pub async fn create_user(
    repos: &Repositories,
    username: impl Into<String>,
    is_admin: bool,
) -> anyhow::Result<String> {
    let user = repos
        .users
        .create(NewUser {
            username: username.into(),
            image_url: None,
            password_hash: "not-a-real-hash".to_owned(),
            is_admin,
        })
        .await?;

    Ok(user.id)
}

#[allow(dead_code)]
pub async fn create_event(
    repos: &Repositories,
    admin_id: &str,
    title: impl Into<String>,
    date: impl Into<String>,
) -> anyhow::Result<String> {
    let event = repos
        .events
        .create_event(
            admin_id,
            NewEvent {
                title: title.into(),
                image_url: None,
                description: "An evening of music".to_owned(),
                date: date.into(),
                location: "Paris".to_owned(),
            },
        )
        .await?;

    Ok(event.id)
}
