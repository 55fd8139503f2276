mod booking;
mod event;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "eventbook",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        event::CreateTable,
        event::CreateIdx1,
        event::CreateIdx2,
        booking::CreateTable,
        booking::CreateUk1
    ]
);
