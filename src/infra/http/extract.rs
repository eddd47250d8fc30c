use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::application::error::AppError;

use super::error::ApiError;

/// `Json<T>` whose rejection is rendered as the catch-all 500 envelope,
/// carrying the parser's message in `error`.
///
/// Payload types default their fields so an absent field reaches handler
/// validation instead of failing here.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Unhandled(AppError::unexpected(
                rejection.body_text(),
            ))),
        }
    }
}
