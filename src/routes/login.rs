use axum::{Json, extract::State};
use eventbook_shared::Error;
use eventbook_user::LoginInput;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, JsonBody},
    routes::AppState,
};

#[derive(Deserialize)]
pub struct LoginBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginUser {
    pub id: String,
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub image_url: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: LoginUser,
}

/// POST /login
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<LoginResponse>, AppError> {
    let (Some(username), Some(password)) = (body.username, body.password) else {
        return Err(Error::InvalidCredentials.into());
    };

    let user = state
        .credentials
        .verify(LoginInput { username, password })
        .await
        .inspect_err(|e| {
            if e.is_auth_failure() {
                tracing::info!("login rejected");
            }
        })?;

    let access_token = state.tokens.issue(&user.id)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        access_token,
        user: LoginUser {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
            image_url: user.image_url,
        },
    }))
}
