use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use blog_backend::config::AppConfig;
use blog_backend::entities::{post_tags, prelude::*};
use blog_backend::infrastructure::database;
use blog_backend::{AppState, bind_listener, create_app};
use http_body_util::BodyExt;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{Value, json};
use tower::ServiceExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

async fn setup_app_with(config: AppConfig) -> (Router, DatabaseConnection) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("blog_backend=debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();

    let db = database::setup_database(&config).await.unwrap();
    let state = AppState::new(db.clone(), config);
    (create_app(state), db)
}

async fn setup_app() -> (Router, DatabaseConnection) {
    setup_app_with(AppConfig::development()).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn tag_ids(post: &Value) -> Vec<i64> {
    post["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_author_lifecycle() {
    let (app, _db) = setup_app().await;

    let (status, body) = send(&app, "GET", "/api/v1/authors/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, author) = send(
        &app,
        "POST",
        "/api/v1/authors/",
        Some(json!({"name": "John Doe", "email": "Lw2Bc@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(author["id"], 1);

    let (status, body) = send(&app, "GET", "/api/v1/authors", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], 1);
    assert_eq!(list[0]["name"], "John Doe");
    assert_eq!(list[0]["email"], "Lw2Bc@example.com");

    let (status, updated) = send(
        &app,
        "PUT",
        "/api/v1/authors/1",
        Some(json!({"name": "Jane Doe", "email": "Jane@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Jane Doe");
    assert_eq!(updated["email"], "Jane@example.com");

    let (status, body) = send(&app, "DELETE", "/api/v1/authors/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Author with id 1 was deleted"));

    let (status, _) = send(&app, "GET", "/api/v1/authors/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_then_fetch_every_kind() {
    let (app, _db) = setup_app().await;

    let cases = [
        ("authors", json!({"name": "Ada", "email": "ada@example.com"})),
        ("categories", json!({"name": "Tech"})),
        ("tags", json!({"name": "rust"})),
        (
            "posts",
            json!({"title": "Hello", "content": "World", "tags": []}),
        ),
    ];

    for (kind, payload) in cases {
        let (status, created) =
            send(&app, "POST", &format!("/api/v1/{}", kind), Some(payload.clone())).await;
        assert_eq!(status, StatusCode::OK, "creating {}", kind);

        let id = created["id"].as_i64().unwrap();
        let (status, fetched) = send(&app, "GET", &format!("/api/v1/{}/{}", kind, id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        for (field, value) in payload.as_object().unwrap() {
            assert_eq!(&fetched[field], value, "{}.{}", kind, field);
        }
    }
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let (app, _db) = setup_app().await;

    for kind in ["authors", "categories", "tags", "posts"] {
        let uri = format!("/api/v1/{}/42", kind);

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {}", uri);
        assert!(body["error"].as_str().unwrap().contains("not found"));

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {}", uri);
    }

    let (status, body) = send(&app, "GET", "/api/v1/authors/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Author with id 1 not found"}));

    // The target is resolved before the payload is checked
    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/authors/999",
        Some(json!({"name": "John", "email": "not-an-email"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Author with id 999 not found"}));

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/categories/42",
        Some(json!({"name": "Nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_with_category_and_unknown_category() {
    let (app, _db) = setup_app().await;

    let (status, category) = send(
        &app,
        "POST",
        "/api/v1/categories/",
        Some(json!({"name": "Tech"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(category["id"], 1);

    let (status, post) = send(
        &app,
        "POST",
        "/api/v1/posts/",
        Some(json!({"title": "T", "content": "C", "category_id": 1, "tags": []})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["category_id"], 1);
    assert_eq!(post["author_id"], Value::Null);
    assert_eq!(post["tags"], json!([]));

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/posts/",
        Some(json!({"title": "T2", "content": "C2", "category_id": 999, "tags": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Post creation failed"));

    let (_, posts) = send(&app, "GET", "/api/v1/posts", None).await;
    assert_eq!(posts.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_post_writes_persist_nothing() {
    let (app, db) = setup_app().await;

    send(&app, "POST", "/api/v1/tags", Some(json!({"name": "a"}))).await;

    let bad_payloads = [
        json!({"title": "T", "content": "C", "author_id": 7, "tags": [1]}),
        json!({"title": "T", "content": "C", "category_id": 7, "tags": [1]}),
        json!({"title": "T", "content": "C", "tags": [1, 99]}),
    ];

    for payload in bad_payloads {
        let (status, _) = send(&app, "POST", "/api/v1/posts", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    assert_eq!(Posts::find().count(&db).await.unwrap(), 0);
    assert_eq!(PostTags::find().count(&db).await.unwrap(), 0);
    assert_eq!(Tags::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_post_update_replaces_tag_set() {
    let (app, _db) = setup_app().await;

    for name in ["one", "two", "three"] {
        send(&app, "POST", "/api/v1/tags", Some(json!({"name": name}))).await;
    }

    let (status, post) = send(
        &app,
        "POST",
        "/api/v1/posts",
        Some(json!({"title": "P", "content": "body", "tags": [1, 2]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tag_ids(&post), vec![1, 2]);

    let (status, post) = send(
        &app,
        "PUT",
        "/api/v1/posts/1",
        Some(json!({"title": "P2", "content": "body2", "tags": [2, 3]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["title"], "P2");
    assert_eq!(tag_ids(&post), vec![2, 3]);

    let (_, fetched) = send(&app, "GET", "/api/v1/posts/1", None).await;
    assert_eq!(tag_ids(&fetched), vec![2, 3]);
}

#[tokio::test]
async fn test_rejected_post_update_leaves_post_unchanged() {
    let (app, _db) = setup_app().await;

    send(&app, "POST", "/api/v1/tags", Some(json!({"name": "keep"}))).await;
    send(
        &app,
        "POST",
        "/api/v1/posts",
        Some(json!({"title": "Original", "content": "C", "tags": [1]})),
    )
    .await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/posts/1",
        Some(json!({"title": "Changed", "content": "C", "tags": [1, 5]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Post update failed"));

    let (_, post) = send(&app, "GET", "/api/v1/posts/1", None).await;
    assert_eq!(post["title"], "Original");
    assert_eq!(tag_ids(&post), vec![1]);
}

#[tokio::test]
async fn test_deleting_author_or_category_keeps_posts() {
    let (app, _db) = setup_app().await;

    send(
        &app,
        "POST",
        "/api/v1/authors",
        Some(json!({"name": "John Doe", "email": "john@example.com"})),
    )
    .await;
    send(&app, "POST", "/api/v1/categories", Some(json!({"name": "Tech"}))).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/posts",
        Some(json!({"title": "T", "content": "C", "author_id": 1, "category_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "DELETE", "/api/v1/authors/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Author with id 1 was deleted"));

    let (status, post) = send(&app, "GET", "/api/v1/posts/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["author_id"], Value::Null);
    assert_eq!(post["category_id"], 1);

    let (status, body) = send(&app, "DELETE", "/api/v1/categories/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Category with id 1 was deleted"));

    let (_, post) = send(&app, "GET", "/api/v1/posts/1", None).await;
    assert_eq!(post["category_id"], Value::Null);
}

#[tokio::test]
async fn test_deleting_post_removes_associations_only() {
    let (app, db) = setup_app().await;

    send(&app, "POST", "/api/v1/tags", Some(json!({"name": "a"}))).await;
    send(&app, "POST", "/api/v1/tags", Some(json!({"name": "b"}))).await;
    send(
        &app,
        "POST",
        "/api/v1/posts",
        Some(json!({"title": "T", "content": "C", "tags": [1, 2]})),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/v1/posts",
        Some(json!({"title": "T2", "content": "C2", "tags": [2]})),
    )
    .await;
    assert_eq!(PostTags::find().count(&db).await.unwrap(), 3);

    let (status, body) = send(&app, "DELETE", "/api/v1/posts/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Post with id 1 was deleted"));

    let remaining = PostTags::find()
        .filter(post_tags::Column::PostId.eq(1))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    assert_eq!(PostTags::find().count(&db).await.unwrap(), 1);

    let (_, tags) = send(&app, "GET", "/api/v1/tags", None).await;
    assert_eq!(tags.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_deleting_tag_detaches_it_from_posts() {
    let (app, _db) = setup_app().await;

    send(&app, "POST", "/api/v1/tags", Some(json!({"name": "a"}))).await;
    send(&app, "POST", "/api/v1/tags", Some(json!({"name": "b"}))).await;
    send(
        &app,
        "POST",
        "/api/v1/posts",
        Some(json!({"title": "T", "content": "C", "tags": [1, 2]})),
    )
    .await;

    let (status, body) = send(&app, "DELETE", "/api/v1/tags/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Tag with id 1 was deleted"));

    let (status, post) = send(&app, "GET", "/api/v1/posts/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tag_ids(&post), vec![2]);
}

#[tokio::test]
async fn test_invalid_payloads_are_unprocessable() {
    let (app, db) = setup_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/authors",
        Some(json!({"name": "John", "email": "not-an-email"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("email"));

    let (status, _) = send(&app, "POST", "/api/v1/tags", Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Missing required field, rejected by the JSON extractor
    let (status, _) = send(&app, "POST", "/api/v1/posts", Some(json!({"title": "T"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(Authors::find().count(&db).await.unwrap(), 0);
    assert_eq!(Tags::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_rate_limit_rejects_excess_requests() {
    let config = AppConfig {
        rate_limit_enabled: true,
        rate_limit_times: 2,
        rate_limit_seconds: 60,
        ..AppConfig::development()
    };
    let (app, _db) = setup_app_with(config).await;

    for _ in 0..2 {
        let (status, _) = send(&app, "GET", "/api/v1/authors", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/authors")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));

    // Another client has its own window
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/authors")
                .header("x-forwarded-for", "203.0.113.9")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Health is outside the limited surface
    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_docs_and_request_id() {
    let (app, _db) = setup_app().await;

    let (status, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["database"], "connected");
    assert_eq!(
        health["records"],
        json!({"authors": 0, "categories": 0, "tags": 0, "posts": 0})
    );

    send(&app, "POST", "/api/v1/tags", Some(json!({"name": "rust"}))).await;
    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["records"]["tags"], 1);

    let (status, doc) = send(&app, "GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/posts/{id}"].is_object());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/tags")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/tags")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_listener_binds_host_names() {
    let config = AppConfig {
        host: "localhost".to_string(),
        port: 0,
        ..AppConfig::development()
    };

    let listener = bind_listener(&config).await.unwrap();
    assert!(listener.local_addr().unwrap().ip().is_loopback());
}
