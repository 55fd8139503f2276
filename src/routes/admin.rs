use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use eventbook_event::NewEvent;
use eventbook_shared::Error;
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthUser,
    error::AppError,
    routes::{
        AppState,
        events::{EventResponse, to_responses},
    },
};

#[derive(Deserialize)]
pub struct AddEventBody {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct AddEventResponse {
    pub msg: &'static str,
    pub event: EventResponse,
}

/// POST /admin/add_event
///
/// The body is decoded after the admin check so non-admins always get 403.
#[tracing::instrument(skip(state, body), fields(user_id = %user.user_id))]
pub async fn add_event(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> Result<(StatusCode, Json<AddEventResponse>), AppError> {
    state.policy.require_admin(&user.user_id).await?;

    let body: AddEventBody =
        serde_json::from_slice(&body).map_err(|e| Error::Validation(e.to_string()))?;

    let event = state
        .events
        .create_event(
            &user.user_id,
            NewEvent {
                title: body.title.unwrap_or_default(),
                image_url: body.image_url,
                description: body.description.unwrap_or_default(),
                date: body.date.unwrap_or_default(),
                location: body.location.unwrap_or_default(),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddEventResponse {
            msg: "Event created successfully",
            event: event.into(),
        }),
    ))
}

/// GET /admin/events
#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_events(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    state.policy.require_admin(&user.user_id).await?;

    let events = state.events.list_events_by_admin(&user.user_id).await?;

    Ok(Json(to_responses(events)))
}
