use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::application::passwords::{self, PasswordError};
use crate::application::repos::{CreateUserParams, RepoError, UsersRepo};
use crate::application::tokens::{TokenError, TokenSigner};
use crate::domain::users::is_plausible_email;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid request")]
    InvalidRequest,
    #[error("email already registered")]
    EmailTaken,
    #[error("user not found")]
    UserNotFound,
    #[error("wrong password")]
    WrongPassword,
    #[error("email header missing")]
    MissingEmail,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Registered {
    pub token: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoggedIn {
    pub token: String,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepo>,
    tokens: TokenSigner,
}

impl AuthService {
    pub fn new(users: Arc<dyn UsersRepo>, tokens: TokenSigner) -> Self {
        Self { users, tokens }
    }

    pub async fn register(&self, cmd: RegisterCommand) -> Result<Registered, AuthError> {
        let email = cmd.email.trim().to_string();
        if !is_plausible_email(&email) || cmd.password.is_empty() {
            return Err(AuthError::InvalidRequest);
        }

        if self.users.find_user_by_email(&email).await?.is_some() {
            warn!(target = "giftlink::auth", "email id already exists");
            return Err(AuthError::EmailTaken);
        }

        let password_hash = passwords::hash_password(&cmd.password)?;
        let user = self
            .users
            .create_user(CreateUserParams {
                email,
                first_name: cmd.first_name,
                last_name: cmd.last_name,
                password_hash,
            })
            .await
            .map_err(|err| match err {
                RepoError::Duplicate { .. } => AuthError::EmailTaken,
                other => AuthError::Repo(other),
            })?;

        let token = self.tokens.issue(user.id)?;
        info!(target = "giftlink::auth", user_id = %user.id, "user registered successfully");

        Ok(Registered {
            token,
            email: user.email,
        })
    }

    pub async fn login(&self, cmd: LoginCommand) -> Result<LoggedIn, AuthError> {
        let user = self
            .users
            .find_user_by_email(cmd.email.trim())
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !passwords::verify_password(&cmd.password, &user.password_hash)? {
            warn!(target = "giftlink::auth", user_id = %user.id, "passwords do not match");
            return Err(AuthError::WrongPassword);
        }

        let token = self.tokens.issue(user.id)?;
        info!(target = "giftlink::auth", user_id = %user.id, "user logged in successfully");

        Ok(LoggedIn {
            token,
            user_name: user.first_name,
            user_email: user.email,
        })
    }

    /// Rename the user identified by `email`, returning a fresh token.
    pub async fn update_name(&self, email: Option<&str>, name: &str) -> Result<String, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidRequest);
        }

        let email = email
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingEmail)?;

        let user = self
            .users
            .update_first_name(email, name, OffsetDateTime::now_utc())
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let token = self.tokens.issue(user.id)?;
        info!(target = "giftlink::auth", user_id = %user.id, "user updated successfully");
        Ok(token)
    }
}
