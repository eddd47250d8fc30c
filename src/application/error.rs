use std::error::Error as StdError;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{application::repos::RepoError, infra::error::InfraError};

const INTERNAL_MESSAGE: &str = "Internal Server Error";
const FALLBACK_DETAIL: &str = "Something went wrong";

/// Diagnostic attached to error responses and consumed by the response logger.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// Body of every unhandled-error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: &'static str,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn internal(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let error = if detail.trim().is_empty() {
            FALLBACK_DETAIL.to_string()
        } else {
            detail
        };
        Self {
            success: false,
            message: INTERNAL_MESSAGE,
            error,
        }
    }
}

/// Failures nothing upstream knows how to classify. Always rendered as 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::internal(self.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let report = ErrorReport::from_error("application::error::AppError", status, &self);
        let mut response = (status, Json(self.envelope())).into_response();
        report.attach(&mut response);
        response
    }
}
