use axum::{
    Json,
    extract::{Path, State},
};
use eventbook_event::{Event, EventPatch};
use eventbook_shared::Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

use crate::{
    auth::AuthUser,
    error::{AppError, JsonBody},
    routes::AppState,
};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub description: String,
    pub date: String,
    pub location: String,
    pub admin_id: String,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            date: eventbook_shared::format_timestamp(&event.date),
            id: event.id,
            title: event.title,
            image_url: event.image_url,
            description: event.description,
            location: event.location,
            admin_id: event.admin_id,
        }
    }
}

pub fn to_responses(events: Vec<Event>) -> Vec<EventResponse> {
    events.into_iter().map(EventResponse::from).collect()
}

#[derive(Deserialize, Default)]
pub struct UpdateEventBody {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub image_url: Option<Option<String>>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
}

/// Wraps any present value, `null` included, so an absent key stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// GET /events
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<EventResponse>>, AppError> {
    let events = state.events.list_events().await?;

    Ok(Json(to_responses(events)))
}

/// PUT /events/{id}
#[tracing::instrument(skip(state, requester, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    requester: Option<AuthUser>,
    JsonBody(body): JsonBody<UpdateEventBody>,
) -> Result<Json<EventResponse>, AppError> {
    let Some(event) = state.events.find_event(&id).await? else {
        return Err(Error::NotFound("Event").into());
    };

    state
        .policy
        .authorize_event_mutation(requester.as_ref().map(|u| u.user_id.as_str()), &event.admin_id)
        .await?;

    let event = state
        .events
        .update_event(
            &id,
            EventPatch {
                title: body.title,
                image_url: body.image_url,
                description: body.description,
                date: body.date,
                location: body.location,
            },
        )
        .await?;

    Ok(Json(event.into()))
}

/// DELETE /events/{id}
#[tracing::instrument(skip(state, requester))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    requester: Option<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let Some(event) = state.events.find_event(&id).await? else {
        return Err(Error::NotFound("Event").into());
    };

    state
        .policy
        .authorize_event_mutation(requester.as_ref().map(|u| u.user_id.as_str()), &event.admin_id)
        .await?;

    state.events.delete_event(&id).await?;

    Ok(Json(json!({ "msg": "Event deleted successfully" })))
}
