use crate::AppState;
use crate::api::error::AppError;
use crate::models::{PostRequest, PostResponse};
use crate::services::posts::PostService;
use axum::{
    Json,
    extract::{Path, State},
};

#[utoipa::path(
    get,
    path = "/api/v1/posts",
    responses(
        (status = 200, description = "List all posts", body = [PostResponse])
    ),
    tag = "posts"
)]
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    Ok(Json(PostService::list(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(
        ("id" = i32, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = PostResponse),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PostResponse>, AppError> {
    Ok(Json(PostService::get(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post created", body = PostResponse),
        (status = 400, description = "Write rejected"),
        (status = 422, description = "Validation failed")
    ),
    tag = "posts"
)]
/// Creates a post after every author, category and tag reference resolves.
pub async fn create_post(
    State(state): State<AppState>,
    Json(req): Json<PostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    Ok(Json(PostService::create(&state.db, req).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    params(
        ("id" = i32, Path, description = "Post id")
    ),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post replaced", body = PostResponse),
        (status = 400, description = "Write rejected"),
        (status = 404, description = "Post not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "posts"
)]
/// Replaces all fields of a post, including its whole tag set.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<PostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    Ok(Json(PostService::update(&state.db, id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(
        ("id" = i32, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted", body = String),
        (status = 400, description = "Deletion failed"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<String>, AppError> {
    Ok(Json(PostService::delete(&state.db, id).await?))
}
