//! HTTP surface: router assembly, middleware stack and route groups.

mod auth;
pub mod error;
pub mod extract;
mod gifts;
pub mod middleware;
mod search;

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::application::auth::AuthService;
use crate::application::gifts::GiftService;
use crate::application::repos::{GiftsRepo, UsersRepo};
use crate::application::tokens::TokenSigner;

const ROOT_BODY: &str = "Inside the server";

#[derive(Clone)]
pub struct AppState {
    pub gifts: Arc<GiftService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        gifts_repo: Arc<dyn GiftsRepo>,
        users_repo: Arc<dyn UsersRepo>,
        tokens: TokenSigner,
    ) -> Self {
        Self {
            gifts: Arc::new(GiftService::new(gifts_repo)),
            auth: Arc::new(AuthService::new(users_repo, tokens)),
        }
    }
}

/// Full application router: routes plus the shared middleware stack.
pub fn build_router(state: AppState) -> Router {
    middleware::apply(routes(state))
}

/// Route table without middleware.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api/gifts", gifts::router())
        .nest("/api/auth", auth::router())
        .nest("/api/search", search::router())
        .with_state(state)
}

async fn root() -> &'static str {
    ROOT_BODY
}
