use crate::api::error::AppError;
use crate::services::crud::{ModelOf, Resource};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

/// Fetches the row with `id` or fails with `NotFound`.
pub async fn find_or_not_found<R, C>(conn: &C, id: i32) -> Result<ModelOf<R>, AppError>
where
    R: Resource,
    C: ConnectionTrait,
{
    R::Entity::find()
        .filter(R::id_column().eq(id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} with id {} not found", R::KIND, id)))
}

/// Resolves an optional reference; `None` stays absent.
pub async fn find_optional<R, C>(conn: &C, id: Option<i32>) -> Result<Option<ModelOf<R>>, AppError>
where
    R: Resource,
    C: ConnectionTrait,
{
    match id {
        Some(id) => find_or_not_found::<R, C>(conn, id).await.map(Some),
        None => Ok(None),
    }
}
