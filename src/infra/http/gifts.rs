//! `/api/gifts`

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::application::error::AppError;
use crate::application::gifts::GiftError;
use crate::domain::gifts::NewGift;

use super::AppState;
use super::error::{ApiError, messages};
use super::extract::JsonBody;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_gifts).post(create_gift))
        .route("/{id}", get(get_gift))
}

pub(super) fn gift_error_to_api(err: GiftError) -> ApiError {
    match err {
        GiftError::Validation(err) => ApiError::invalid_request(err.to_string()),
        GiftError::Duplicate { .. } => ApiError::json(StatusCode::CONFLICT, messages::GIFT_EXISTS),
        GiftError::Repo(err) => ApiError::Unhandled(AppError::Repo(err)),
    }
}

async fn list_gifts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let gifts = state.gifts.list().await.map_err(gift_error_to_api)?;
    Ok(Json(gifts))
}

async fn get_gift(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    match state.gifts.find(&id).await.map_err(gift_error_to_api)? {
        Some(gift) => Ok(Json(gift)),
        None => Err(ApiError::text(StatusCode::NOT_FOUND, messages::GIFT_NOT_FOUND)),
    }
}

async fn create_gift(
    State(state): State<AppState>,
    JsonBody(gift): JsonBody<NewGift>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.gifts.create(gift).await.map_err(gift_error_to_api)?;
    Ok((StatusCode::CREATED, Json(created)))
}
