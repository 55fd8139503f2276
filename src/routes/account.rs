use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eventbook_shared::Error;
use serde::Serialize;
use serde_json::{Value, json};

use crate::{
    auth::AuthUser,
    error::AppError,
    routes::{
        AppState,
        events::{EventResponse, to_responses},
    },
};

#[derive(Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub image_url: Option<String>,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub booked_events: Vec<EventResponse>,
}

/// GET /my-account
///
/// A token outliving its account answers 404 with a `msg` body.
pub async fn show(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<AccountResponse>, Response> {
    let (user, events) = eventbook_event::get_user_with_bookings(
        state.users.as_ref(),
        state.bookings.as_ref(),
        &user.user_id,
    )
    .await
    .map_err(|e| match e {
        Error::NotFound(_) => {
            (StatusCode::NOT_FOUND, Json(json!({ "msg": e.to_string() }))).into_response()
        }
        e => AppError(e).into_response(),
    })?;

    Ok(Json(AccountResponse {
        id: user.id,
        username: user.username,
        image_url: user.image_url,
        is_admin: user.is_admin,
        booked_events: to_responses(events),
    }))
}

/// DELETE /my-account
#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    state.users.delete(&user.user_id).await?;

    Ok(Json(json!({ "msg": "Account deleted" })))
}
