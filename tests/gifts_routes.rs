mod support;

use axum::http::StatusCode;
use serde_json::{Value, json};

use support::*;

fn ids(body: &Value) -> Vec<String> {
    let mut ids: Vec<String> = body
        .as_array()
        .expect("array body")
        .iter()
        .map(|gift| gift["id"].as_str().expect("id").to_string())
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn list_returns_every_gift() {
    let app = app_with(sample_gifts());

    let response = send(&app.router, get("/api/gifts")).await;
    assert_status(&response, StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(ids(&body), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn list_of_empty_collection_is_empty_array() {
    let app = app_with(Vec::new());

    let response = send(&app.router, get("/api/gifts")).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn fetch_single_gift_by_id() {
    let app = app_with(sample_gifts());

    let response = send(&app.router, get("/api/gifts/2")).await;
    assert_status(&response, StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "2");
    assert_eq!(body["name"], "Desk Lamp");
    assert_eq!(body["category"], "Office");
    assert_eq!(body["condition"], "Like New");
    assert_eq!(body["age_years"], 2.0);
    assert_eq!(body["image"], "/images/2.jpg");
}

#[tokio::test]
async fn missing_gift_is_plain_text_404() {
    let app = app_with(sample_gifts());

    let response = send(&app.router, get("/api/gifts/999")).await;
    assert_status(&response, StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Gift not found");
}

#[tokio::test]
async fn create_gift_assigns_id_and_timestamp() {
    let app = app_with(Vec::new());

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/api/gifts",
            &json!({
                "name": "  Bookshelf ",
                "category": "Living",
                "condition": "New",
                "age_years": 1.5,
                "age_days": 540,
            }),
        ),
    )
    .await;
    assert_status(&response, StatusCode::CREATED);
    let body = body_json(response).await;

    assert_eq!(body["name"], "Bookshelf");
    let id = body["id"].as_str().expect("generated id");
    assert!(!id.is_empty());
    assert!(body["date_added"].as_i64().expect("timestamp") > 0);
    assert_eq!(app.gifts.len().await, 1);

    let response = send(&app.router, get(&format!("/api/gifts/{id}"))).await;
    assert_status(&response, StatusCode::OK);
}

#[tokio::test]
async fn create_gift_rejects_duplicate_id() {
    let app = app_with(sample_gifts());

    let response = send(
        &app.router,
        json_request("POST", "/api/gifts", &json!({"id": "1", "name": "Copy"})),
    )
    .await;
    assert_status(&response, StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Gift already exists"})
    );
}

#[tokio::test]
async fn create_gift_requires_name() {
    let app = app_with(Vec::new());

    let response = send(
        &app.router,
        json_request("POST", "/api/gifts", &json!({"category": "Living"})),
    )
    .await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Invalid request"})
    );
    assert_eq!(app.gifts.len().await, 0);
}

#[tokio::test]
async fn malformed_json_is_internal_error_envelope() {
    let app = app_with(Vec::new());

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/gifts")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .expect("request builds");
    let response = send(&app.router, request).await;

    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Internal Server Error");
    let detail = body["error"].as_str().expect("error detail");
    assert!(detail.contains("JSON"), "unexpected detail: {detail}");
    assert_eq!(app.gifts.len().await, 0);
}

#[tokio::test]
async fn search_with_huge_age_matches_everything() {
    let app = app_with(sample_gifts());

    let response = send(&app.router, get("/api/search?age_years=99999999999999999999")).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(ids(&body_json(response).await), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn search_without_parameters_returns_everything() {
    let app = app_with(sample_gifts());

    let response = send(&app.router, get("/api/search")).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(ids(&body_json(response).await), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn search_by_name_is_case_insensitive_substring() {
    let app = app_with(sample_gifts());

    let response = send(&app.router, get("/api/search?name=CHAIR")).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(ids(&body_json(response).await), vec!["1", "3"]);
}

#[tokio::test]
async fn search_combines_filters() {
    let app = app_with(sample_gifts());

    let response = send(
        &app.router,
        get("/api/search?category=Living&condition=New"),
    )
    .await;
    assert_eq!(ids(&body_json(response).await), vec!["1"]);

    let response = send(&app.router, get("/api/search?category=Living&age_years=3")).await;
    assert_eq!(ids(&body_json(response).await), vec!["1"]);
}

#[tokio::test]
async fn search_age_uses_leading_integer() {
    let app = app_with(sample_gifts());

    let response = send(&app.router, get("/api/search?age_years=2.9")).await;
    assert_eq!(ids(&body_json(response).await), vec!["1", "2"]);
}

#[tokio::test]
async fn search_ignores_blank_parameters() {
    let app = app_with(sample_gifts());

    let response = send(
        &app.router,
        get("/api/search?name=%20%20&category=&condition=&age_years="),
    )
    .await;
    assert_eq!(ids(&body_json(response).await), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn search_with_unparseable_age_matches_nothing() {
    let app = app_with(sample_gifts());

    let response = send(&app.router, get("/api/search?age_years=old")).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}
