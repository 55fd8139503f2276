use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use eventbook_event::{
    BookingRepository, EventRepository, SqliteBookingRepository, SqliteEventRepository,
};
use eventbook_user::{AccessPolicy, SqliteUserRepository, TokenIssuer, UserRepository};
use sqlx::SqlitePool;

use crate::config::Config;

pub mod account;
pub mod admin;
pub mod bookings;
pub mod events;
pub mod health;
pub mod login;
pub mod users;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub credentials: eventbook_user::Command,
    pub tokens: TokenIssuer,
    pub policy: AccessPolicy,
    pub users: Arc<dyn UserRepository>,
    pub events: Arc<dyn EventRepository>,
    pub bookings: Arc<dyn BookingRepository>,
}

impl AppState {
    pub fn new(config: Config, state: eventbook_shared::State) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository(state.clone()));
        let events: Arc<dyn EventRepository> = Arc::new(SqliteEventRepository(state.clone()));
        let bookings: Arc<dyn BookingRepository> =
            Arc::new(SqliteBookingRepository(state.clone()));

        let credentials = eventbook_user::Command::new(users.clone())
            .allow_self_admin(config.policy.allow_self_admin);
        let tokens = TokenIssuer::new(
            &config.jwt.secret,
            config.jwt.issuer.to_owned(),
            config.jwt.audience.to_owned(),
            config.jwt.lifetime_secs(),
        );
        let policy = AccessPolicy::new(users.clone(), config.policy.event_mutation);

        Self {
            config,
            pool: state.read_db,
            credentials,
            tokens,
            policy,
            users,
            events,
            bookings,
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/users", post(users::register))
        .route("/login", post(login::login))
        .route("/events", get(events::list))
        .route("/events/{id}", axum::routing::put(events::update).delete(events::delete))
        .route("/admin/add_event", post(admin::add_event))
        .route("/admin/events", get(admin::list_events))
        .route("/my-account", get(account::show).delete(account::delete))
        .route("/bookings", post(bookings::create))
        .route(
            "/bookings/{event_id}",
            get(bookings::show).delete(bookings::cancel),
        )
        .with_state(app_state)
}
