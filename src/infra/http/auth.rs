//! `/api/auth`

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::application::auth::{AuthError, LoginCommand, RegisterCommand};
use crate::application::error::AppError;

use super::AppState;
use super::error::{ApiError, messages};
use super::extract::JsonBody;

const EMAIL_HEADER: &str = "email";

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/update", put(update))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub authtoken: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub authtoken: String,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub authtoken: String,
}

fn auth_error_to_api(err: AuthError) -> ApiError {
    match err {
        AuthError::InvalidRequest => {
            ApiError::json(StatusCode::BAD_REQUEST, messages::INVALID_REQUEST)
        }
        AuthError::EmailTaken => ApiError::json(StatusCode::BAD_REQUEST, messages::EMAIL_TAKEN),
        AuthError::UserNotFound => ApiError::json(StatusCode::NOT_FOUND, messages::USER_NOT_FOUND),
        AuthError::WrongPassword => {
            ApiError::json(StatusCode::NOT_FOUND, messages::WRONG_PASSWORD)
        }
        AuthError::MissingEmail => {
            ApiError::json(StatusCode::BAD_REQUEST, messages::EMAIL_HEADER_MISSING)
        }
        AuthError::Repo(err) => ApiError::Unhandled(AppError::Repo(err)),
        other @ (AuthError::Password(_) | AuthError::Token(_)) => {
            ApiError::Unhandled(AppError::unexpected(other.to_string()))
        }
    }
}

async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let registered = state
        .auth
        .register(RegisterCommand {
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
        })
        .await
        .map_err(auth_error_to_api)?;

    Ok(Json(RegisterResponse {
        authtoken: registered.token,
        email: registered.email,
    }))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let logged_in = state
        .auth
        .login(LoginCommand {
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(auth_error_to_api)?;

    Ok(Json(LoginResponse {
        authtoken: logged_in.token,
        user_name: logged_in.user_name,
        user_email: logged_in.user_email,
    }))
}

async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<UpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = headers
        .get(EMAIL_HEADER)
        .and_then(|value| value.to_str().ok());

    let authtoken = state
        .auth
        .update_name(email, &body.name)
        .await
        .map_err(auth_error_to_api)?;

    Ok(Json(UpdateResponse { authtoken }))
}
