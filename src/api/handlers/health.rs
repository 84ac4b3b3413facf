use crate::AppState;
use crate::entities::prelude::*;
use axum::{Json, extract::State, response::IntoResponse};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct RecordCounts {
    pub authors: u64,
    pub categories: u64,
    pub tags: u64,
    pub posts: u64,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok", or "degraded" when the database cannot be reached
    pub status: String,
    pub database: String,
    pub version: String,
    /// Omitted when the database cannot be reached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<RecordCounts>,
}

async fn count_records(db: &DatabaseConnection) -> Result<RecordCounts, DbErr> {
    Ok(RecordCounts {
        authors: Authors::find().count(db).await?,
        categories: Categories::find().count(db).await?,
        tags: Tags::find().count(db).await?,
        posts: Posts::find().count(db).await?,
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service status with blog row counts", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let records = match state.db.ping().await {
        Ok(()) => count_records(&state.db)
            .await
            .map_err(|e| tracing::warn!("Health check could not count records: {}", e))
            .ok(),
        Err(e) => {
            tracing::warn!("Health check ping failed: {}", e);
            None
        }
    };

    let (status, database) = match records {
        Some(_) => ("ok", "connected"),
        None => ("degraded", "disconnected"),
    };

    Json(HealthResponse {
        status: status.to_string(),
        database: database.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        records,
    })
}
