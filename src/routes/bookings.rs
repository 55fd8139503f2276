use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use eventbook_event::Booking;
use eventbook_shared::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    auth::AuthUser,
    error::{AppError, JsonBody},
    routes::AppState,
};

#[derive(Deserialize)]
pub struct BookingBody {
    pub event_id: Option<String>,
    pub number_of_tickets: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub number_of_tickets: i64,
    pub created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            created_at: eventbook_shared::format_timestamp(&eventbook_shared::from_unix(
                booking.created_at,
            )),
            id: booking.id,
            user_id: booking.user_id,
            event_id: booking.event_id,
            number_of_tickets: booking.number_of_tickets,
        }
    }
}

/// POST /bookings
#[tracing::instrument(skip(state, body), fields(user_id = %user.user_id))]
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(body): JsonBody<BookingBody>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let Some(event_id) = body.event_id else {
        return Err(Error::Validation("Missing required fields".to_owned()).into());
    };
    let number_of_tickets = body.number_of_tickets.unwrap_or(1);

    let booking = state
        .bookings
        .create_booking(&user.user_id, &event_id, number_of_tickets)
        .await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// GET /bookings/{event_id}
pub async fn show(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    user: AuthUser,
) -> Result<Json<BookingResponse>, AppError> {
    let Some(booking) = state.bookings.find_booking(&user.user_id, &event_id).await? else {
        return Err(Error::NotFound("Booking").into());
    };

    Ok(Json(booking.into()))
}

/// DELETE /bookings/{event_id}
#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn cancel(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    state
        .bookings
        .delete_booking(&user.user_id, &event_id)
        .await?;

    Ok(Json(json!({ "msg": "Booking cancelled" })))
}
