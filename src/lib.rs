pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod models;
pub mod services;

use crate::api::handlers::{authors, categories, health, posts, tags};
use crate::config::AppConfig;
use crate::services::rate_limiter::RateLimiter;
use axum::{
    Router,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Blog App"),
    paths(
        health::health_check,
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        tags::list_tags,
        tags::get_tag,
        tags::create_tag,
        tags::update_tag,
        tags::delete_tag,
        posts::list_posts,
        posts::get_post,
        posts::create_post,
        posts::update_post,
        posts::delete_post,
    ),
    components(
        schemas(
            health::HealthResponse,
            health::RecordCounts,
            models::AuthorRequest,
            models::AuthorResponse,
            models::CategoryRequest,
            models::CategoryResponse,
            models::TagRequest,
            models::TagResponse,
            models::PostRequest,
            models::PostResponse,
        )
    ),
    tags(
        (name = "authors", description = "Author endpoints"),
        (name = "categories", description = "Category endpoints"),
        (name = "tags", description = "Tag endpoints"),
        (name = "posts", description = "Post endpoints"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Process-wide handles, built once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    /// `None` when rate limiting is disabled
    pub rate_limiter: Option<RateLimiter>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let rate_limiter = config
            .rate_limit_enabled
            .then(|| RateLimiter::new(config.rate_limit_times, config.rate_limit_seconds));

        Self {
            db,
            config,
            rate_limiter,
        }
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Binds the API listener. `host` may be a name such as "localhost" or an
/// IPv4/IPv6 literal.
pub async fn bind_listener(config: &AppConfig) -> std::io::Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await
}

pub fn create_app(state: AppState) -> Router {
    let v1 = Router::new()
        .route(
            "/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/authors/",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/tags", get(tags::list_tags).post(tags::create_tag))
        .route("/tags/", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/tags/:id",
            get(tags::get_tag)
                .put(tags::update_tag)
                .delete(tags::delete_tag),
        )
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/:id",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .layer(from_fn_with_state(
            state.clone(),
            api::middleware::rate_limit::rate_limit_middleware,
        ));

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .nest("/api/v1", v1)
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(cors_layer(&state.config))
        .with_state(state)
}
