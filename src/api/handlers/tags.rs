use crate::AppState;
use crate::api::error::AppError;
use crate::models::{TagRequest, TagResponse};
use crate::services::tags::TagService;
use axum::{
    Json,
    extract::{Path, State},
};

#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses(
        (status = 200, description = "List all tags", body = [TagResponse])
    ),
    tag = "tags"
)]
pub async fn list_tags(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    Ok(Json(TagService::list(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags/{id}",
    params(
        ("id" = i32, Path, description = "Tag id")
    ),
    responses(
        (status = 200, description = "Tag found", body = TagResponse),
        (status = 404, description = "Tag not found")
    ),
    tag = "tags"
)]
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TagResponse>, AppError> {
    Ok(Json(TagService::get(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/tags",
    request_body = TagRequest,
    responses(
        (status = 200, description = "Tag created", body = TagResponse),
        (status = 400, description = "Write rejected"),
        (status = 422, description = "Validation failed")
    ),
    tag = "tags"
)]
pub async fn create_tag(
    State(state): State<AppState>,
    Json(req): Json<TagRequest>,
) -> Result<Json<TagResponse>, AppError> {
    Ok(Json(TagService::create(&state.db, req).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/tags/{id}",
    params(
        ("id" = i32, Path, description = "Tag id")
    ),
    request_body = TagRequest,
    responses(
        (status = 200, description = "Tag replaced", body = TagResponse),
        (status = 400, description = "Write rejected"),
        (status = 404, description = "Tag not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "tags"
)]
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<TagRequest>,
) -> Result<Json<TagResponse>, AppError> {
    Ok(Json(TagService::update(&state.db, id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tags/{id}",
    params(
        ("id" = i32, Path, description = "Tag id")
    ),
    responses(
        (status = 200, description = "Tag deleted", body = String),
        (status = 400, description = "Deletion failed"),
        (status = 404, description = "Tag not found")
    ),
    tag = "tags"
)]
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<String>, AppError> {
    Ok(Json(TagService::delete(&state.db, id).await?))
}
