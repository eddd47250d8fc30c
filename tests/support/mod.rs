#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

use giftlink::application::repos::{
    CreateUserParams, GiftQueryFilter, GiftsRepo, RepoError, UsersRepo,
};
use giftlink::application::tokens::TokenSigner;
use giftlink::domain::gifts::GiftRecord;
use giftlink::domain::users::UserRecord;
use giftlink::infra::http::{AppState, build_router};

pub const TEST_SECRET: &str = "integration-secret";

#[derive(Default)]
pub struct MemoryGifts {
    gifts: Mutex<BTreeMap<String, GiftRecord>>,
}

impl MemoryGifts {
    pub fn with(gifts: impl IntoIterator<Item = GiftRecord>) -> Self {
        Self {
            gifts: Mutex::new(
                gifts
                    .into_iter()
                    .map(|gift| (gift.id.clone(), gift))
                    .collect(),
            ),
        }
    }

    pub async fn len(&self) -> usize {
        self.gifts.lock().await.len()
    }
}

fn gift_matches(gift: &GiftRecord, filter: &GiftQueryFilter) -> bool {
    if let Some(name) = filter.name.as_deref()
        && !gift.name.to_lowercase().contains(&name.to_lowercase())
    {
        return false;
    }
    if let Some(category) = filter.category.as_deref()
        && gift.category != category
    {
        return false;
    }
    if let Some(condition) = filter.condition.as_deref()
        && gift.condition != condition
    {
        return false;
    }
    if let Some(max) = filter.max_age_years
        && gift.age_years > max
    {
        return false;
    }
    true
}

#[async_trait]
impl GiftsRepo for MemoryGifts {
    async fn list_gifts(&self) -> Result<Vec<GiftRecord>, RepoError> {
        Ok(self.gifts.lock().await.values().cloned().collect())
    }

    async fn find_gift(&self, id: &str) -> Result<Option<GiftRecord>, RepoError> {
        Ok(self.gifts.lock().await.get(id).cloned())
    }

    async fn search_gifts(&self, filter: &GiftQueryFilter) -> Result<Vec<GiftRecord>, RepoError> {
        Ok(self
            .gifts
            .lock()
            .await
            .values()
            .filter(|gift| gift_matches(gift, filter))
            .cloned()
            .collect())
    }

    async fn create_gift(&self, gift: GiftRecord) -> Result<GiftRecord, RepoError> {
        let mut gifts = self.gifts.lock().await;
        if gifts.contains_key(&gift.id) {
            return Err(RepoError::Duplicate {
                constraint: "gifts_pkey".to_string(),
            });
        }
        gifts.insert(gift.id.clone(), gift.clone());
        Ok(gift)
    }

    async fn count_gifts(&self) -> Result<u64, RepoError> {
        Ok(self.gifts.lock().await.len() as u64)
    }

    async fn insert_gifts(&self, batch: &[GiftRecord]) -> Result<u64, RepoError> {
        let mut gifts = self.gifts.lock().await;
        if batch.iter().any(|gift| gifts.contains_key(&gift.id)) {
            return Err(RepoError::Duplicate {
                constraint: "gifts_pkey".to_string(),
            });
        }
        for gift in batch {
            gifts.insert(gift.id.clone(), gift.clone());
        }
        Ok(batch.len() as u64)
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<BTreeMap<String, UserRecord>>,
}

impl MemoryUsers {
    pub async fn get(&self, email: &str) -> Option<UserRecord> {
        self.users.lock().await.get(email).cloned()
    }
}

#[async_trait]
impl UsersRepo for MemoryUsers {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.users.lock().await.get(email).cloned())
    }

    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let mut users = self.users.lock().await;
        if users.contains_key(&params.email) {
            return Err(RepoError::Duplicate {
                constraint: "users_email_key".to_string(),
            });
        }
        let now = OffsetDateTime::now_utc();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: params.email,
            first_name: params.first_name,
            last_name: params.last_name,
            password_hash: params.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.email.clone(), record.clone());
        Ok(record)
    }

    async fn update_first_name(
        &self,
        email: &str,
        first_name: &str,
        updated_at: OffsetDateTime,
    ) -> Result<Option<UserRecord>, RepoError> {
        let mut users = self.users.lock().await;
        Ok(users.get_mut(email).map(|user| {
            user.first_name = first_name.to_string();
            user.updated_at = updated_at;
            user.clone()
        }))
    }
}

/// Every call fails as an unreachable database would.
pub struct UnavailableStore;

#[async_trait]
impl GiftsRepo for UnavailableStore {
    async fn list_gifts(&self) -> Result<Vec<GiftRecord>, RepoError> {
        Err(RepoError::from_persistence("connection refused"))
    }

    async fn find_gift(&self, _id: &str) -> Result<Option<GiftRecord>, RepoError> {
        Err(RepoError::from_persistence("connection refused"))
    }

    async fn search_gifts(&self, _filter: &GiftQueryFilter) -> Result<Vec<GiftRecord>, RepoError> {
        Err(RepoError::Timeout)
    }

    async fn create_gift(&self, _gift: GiftRecord) -> Result<GiftRecord, RepoError> {
        Err(RepoError::from_persistence("connection refused"))
    }

    async fn count_gifts(&self) -> Result<u64, RepoError> {
        Err(RepoError::from_persistence("connection refused"))
    }

    async fn insert_gifts(&self, _gifts: &[GiftRecord]) -> Result<u64, RepoError> {
        Err(RepoError::from_persistence("connection refused"))
    }
}

#[async_trait]
impl UsersRepo for UnavailableStore {
    async fn find_user_by_email(&self, _email: &str) -> Result<Option<UserRecord>, RepoError> {
        Err(RepoError::from_persistence("connection refused"))
    }

    async fn create_user(&self, _params: CreateUserParams) -> Result<UserRecord, RepoError> {
        Err(RepoError::from_persistence("connection refused"))
    }

    async fn update_first_name(
        &self,
        _email: &str,
        _first_name: &str,
        _updated_at: OffsetDateTime,
    ) -> Result<Option<UserRecord>, RepoError> {
        Err(RepoError::from_persistence("connection refused"))
    }
}

pub struct TestApp {
    pub router: Router,
    pub gifts: Arc<MemoryGifts>,
    pub users: Arc<MemoryUsers>,
}

pub fn app_with(gifts: Vec<GiftRecord>) -> TestApp {
    let gifts = Arc::new(MemoryGifts::with(gifts));
    let users = Arc::new(MemoryUsers::default());
    let router = build_router(AppState::new(
        gifts.clone(),
        users.clone(),
        TokenSigner::new(TEST_SECRET),
    ));
    TestApp {
        router,
        gifts,
        users,
    }
}

pub fn unavailable_app() -> Router {
    let store = Arc::new(UnavailableStore);
    build_router(AppState::new(
        store.clone(),
        store,
        TokenSigner::new(TEST_SECRET),
    ))
}

pub fn gift(id: &str, name: &str, category: &str, condition: &str, age_years: f64) -> GiftRecord {
    GiftRecord {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        condition: condition.to_string(),
        posted_by: "user1".to_string(),
        zipcode: "10001".to_string(),
        date_added: 1_700_000_000,
        age_days: (age_years * 365.0) as i32,
        age_years,
        description: format!("A {name}"),
        image: format!("/images/{id}.jpg"),
    }
}

pub fn sample_gifts() -> Vec<GiftRecord> {
    vec![
        gift("1", "Oak Chair", "Living", "New", 0.5),
        gift("2", "Desk Lamp", "Office", "Like New", 2.0),
        gift("3", "Armchair", "Living", "Older", 6.0),
    ]
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("utf-8 body")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}

/// User id carried in an issued token's payload segment.
pub fn token_user_id(token: &str) -> String {
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3, "compact token has three segments");
    let payload = URL_SAFE_NO_PAD.decode(segments[1]).expect("base64url payload");
    let claims: serde_json::Value = serde_json::from_slice(&payload).expect("json payload");
    claims["user"]["id"]
        .as_str()
        .expect("user id claim")
        .to_string()
}
