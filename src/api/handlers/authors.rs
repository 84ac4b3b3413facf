use crate::AppState;
use crate::api::error::AppError;
use crate::models::{AuthorRequest, AuthorResponse};
use crate::services::authors::AuthorService;
use axum::{
    Json,
    extract::{Path, State},
};

#[utoipa::path(
    get,
    path = "/api/v1/authors",
    responses(
        (status = 200, description = "List all authors", body = [AuthorResponse])
    ),
    tag = "authors"
)]
pub async fn list_authors(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuthorResponse>>, AppError> {
    Ok(Json(AuthorService::list(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/authors/{id}",
    params(
        ("id" = i32, Path, description = "Author id")
    ),
    responses(
        (status = 200, description = "Author found", body = AuthorResponse),
        (status = 404, description = "Author not found")
    ),
    tag = "authors"
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AuthorResponse>, AppError> {
    Ok(Json(AuthorService::get(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/authors",
    request_body = AuthorRequest,
    responses(
        (status = 200, description = "Author created", body = AuthorResponse),
        (status = 400, description = "Write rejected"),
        (status = 422, description = "Validation failed")
    ),
    tag = "authors"
)]
pub async fn create_author(
    State(state): State<AppState>,
    Json(req): Json<AuthorRequest>,
) -> Result<Json<AuthorResponse>, AppError> {
    Ok(Json(AuthorService::create(&state.db, req).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/authors/{id}",
    params(
        ("id" = i32, Path, description = "Author id")
    ),
    request_body = AuthorRequest,
    responses(
        (status = 200, description = "Author replaced", body = AuthorResponse),
        (status = 400, description = "Write rejected"),
        (status = 404, description = "Author not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "authors"
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<AuthorRequest>,
) -> Result<Json<AuthorResponse>, AppError> {
    Ok(Json(AuthorService::update(&state.db, id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/authors/{id}",
    params(
        ("id" = i32, Path, description = "Author id")
    ),
    responses(
        (status = 200, description = "Author deleted", body = String),
        (status = 400, description = "Deletion failed"),
        (status = 404, description = "Author not found")
    ),
    tag = "authors"
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<String>, AppError> {
    Ok(Json(AuthorService::delete(&state.db, id).await?))
}
