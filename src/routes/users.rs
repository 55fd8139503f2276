use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use eventbook_user::RegisterInput;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, JsonBody},
    routes::AppState,
};

#[derive(Deserialize)]
pub struct RegisterBody {
    pub username: Option<String>,
    pub password: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "isAdmin")]
    pub is_admin: Option<bool>,
}

/// POST /users
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterBody>,
) -> Result<impl IntoResponse, AppError> {
    state
        .credentials
        .register(RegisterInput {
            username: body.username.unwrap_or_default(),
            password: body.password.unwrap_or_default(),
            image_url: body.image_url,
            is_admin: body.is_admin.unwrap_or_default(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}
