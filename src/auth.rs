use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use eventbook_shared::Error;

use crate::{error::AppError, routes::AppState};

/// Caller identified by a valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header =
            <TypedHeader<Authorization<Bearer>> as FromRequestParts<AppState>>::from_request_parts(
                parts, state,
            )
            .await;

        let TypedHeader(Authorization(bearer)) = header.map_err(|rejection| {
            if rejection.is_missing() {
                Error::Unauthorized
            } else {
                tracing::warn!(%rejection, "malformed authorization header");
                Error::InvalidToken
            }
        })?;

        let user_id = state.tokens.resolve(bearer.token()).inspect_err(|e| {
            tracing::warn!(error = %e, "bearer token rejected");
        })?;

        Ok(Self { user_id })
    }
}

/// Absent header yields `None`. A present but bad token is still rejected.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(None);
        }

        <Self as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}
