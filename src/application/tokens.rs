//! Signed session tokens handed out by the auth routes.
//!
//! Tokens use the compact JWT layout (`header.payload.signature`, base64url
//! without padding) signed with HMAC-SHA256, so standard JWT tooling can
//! decode them.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token payload could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("signing key rejected")]
    Key,
}

#[derive(Serialize)]
struct TokenSubject {
    id: String,
}

#[derive(Serialize)]
struct TokenClaims {
    user: TokenSubject,
    /// Issued-at, unix seconds.
    iat: i64,
}

#[derive(Clone)]
pub struct TokenSigner {
    key: Arc<[u8]>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: Arc::from(secret.as_bytes()),
        }
    }

    /// Signer with a random per-process key; tokens do not survive a restart.
    pub fn ephemeral() -> Self {
        let secret = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        Self::new(&secret)
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue_at(user_id, OffsetDateTime::now_utc())
    }

    pub fn issue_at(&self, user_id: Uuid, issued_at: OffsetDateTime) -> Result<String, TokenError> {
        let claims = TokenClaims {
            user: TokenSubject {
                id: user_id.to_string(),
            },
            iat: issued_at.unix_timestamp(),
        };

        let header = URL_SAFE_NO_PAD.encode(HEADER_JSON);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signing_input = format!("{header}.{payload}");

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.key).map_err(|_| TokenError::Key)
    }
}
