//! `/api/search`

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::application::search::SearchParams;

use super::AppState;
use super::error::ApiError;
use super::gifts::gift_error_to_api;

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/", get(search_gifts))
}

async fn search_gifts(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let gifts = state
        .gifts
        .search(&params)
        .await
        .map_err(gift_error_to_api)?;
    Ok(Json(gifts))
}
