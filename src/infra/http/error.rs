use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::{AppError, ErrorReport};
use crate::application::repos::RepoError;

pub mod messages {
    pub const INVALID_REQUEST: &str = "Invalid request";
    pub const EMAIL_TAKEN: &str = "Email id already exists";
    pub const USER_NOT_FOUND: &str = "User not found";
    // Wire text kept verbatim for existing clients.
    pub const WRONG_PASSWORD: &str = "Wrong pasword";
    pub const EMAIL_HEADER_MISSING: &str = "Email not found in the request headers";
    pub const GIFT_NOT_FOUND: &str = "Gift not found";
    pub const GIFT_EXISTS: &str = "Gift already exists";
}

#[derive(Debug, Serialize)]
pub struct ClientErrorBody {
    pub error: &'static str,
}

/// Error returned by route handlers.
///
/// Client errors are answered directly; anything else is handed to
/// [`AppError`] and rendered as the catch-all 500 envelope.
#[derive(Debug)]
pub enum ApiError {
    /// `{"error": message}` with a 4xx status.
    Json {
        status: StatusCode,
        message: &'static str,
        detail: Option<String>,
    },
    /// Plain-text 4xx body.
    Text {
        status: StatusCode,
        message: &'static str,
    },
    Unhandled(AppError),
}

impl ApiError {
    pub fn json(status: StatusCode, message: &'static str) -> Self {
        Self::Json {
            status,
            message,
            detail: None,
        }
    }

    pub fn text(status: StatusCode, message: &'static str) -> Self {
        Self::Text { status, message }
    }

    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::Json {
            status: StatusCode::BAD_REQUEST,
            message: messages::INVALID_REQUEST,
            detail: Some(detail.into()),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self::Unhandled(error)
    }
}

impl From<RepoError> for ApiError {
    fn from(error: RepoError) -> Self {
        Self::Unhandled(AppError::Repo(error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Json {
                status,
                message,
                detail,
            } => {
                let mut response =
                    (status, Json(ClientErrorBody { error: message })).into_response();
                ErrorReport::from_message(
                    "infra::http::error::ApiError",
                    status,
                    detail.unwrap_or_else(|| message.to_string()),
                )
                .attach(&mut response);
                response
            }
            ApiError::Text { status, message } => {
                let mut response = (status, message).into_response();
                ErrorReport::from_message("infra::http::error::ApiError", status, message)
                    .attach(&mut response);
                response
            }
            ApiError::Unhandled(error) => error.into_response(),
        }
    }
}
