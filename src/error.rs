use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eventbook_shared::Error;
use serde_json::json;

/// Domain error rendered as a JSON response.
#[derive(Debug)]
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::Validation(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();

        match self.0 {
            Error::Validate(_)
            | Error::Validation(_)
            | Error::InvalidDate
            | Error::DuplicateUsername => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Error::InvalidCredentials
            | Error::InvalidToken
            | Error::ExpiredToken
            | Error::Unauthorized => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "msg": message }))).into_response()
            }
            Error::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "msg": "Admin privileges required" })),
            )
                .into_response(),
            Error::NotFound(_) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            Error::Server(_) | Error::Unknown(_) => {
                tracing::error!(error = ?self.0, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response()
            }
        }
    }
}

/// `Json` extractor whose rejections use the API error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
