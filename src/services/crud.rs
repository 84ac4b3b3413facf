use crate::api::error::AppError;
use crate::services::resolver;
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::marker::PhantomData;
use tracing::info;
use validator::Validate;

pub type ModelOf<R> = <<R as Resource>::Entity as EntityTrait>::Model;

/// Kind-specific hooks plugged into [`CrudService`].
///
/// Every hook receives the transaction of the current operation, so a failed
/// hook leaves the store untouched once the transaction is dropped.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Entity: EntityTrait;
    /// Create/replace payload
    type Input: Validate + Send + Sync + 'static;
    type Output: Serialize + Send + 'static;
    /// Related rows resolved before a write
    type References: Send + 'static;

    /// Display name used in messages, e.g. "Author"
    const KIND: &'static str;

    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    fn validate(input: &Self::Input) -> Result<(), AppError> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))
    }

    /// Resolves every foreign reference carried by `input`. A missing row is
    /// reported as `NotFound` and relabelled by the service as a rejected write.
    async fn resolve_references(
        txn: &DatabaseTransaction,
        input: &Self::Input,
    ) -> Result<Self::References, AppError>;

    async fn insert(
        txn: &DatabaseTransaction,
        input: Self::Input,
        references: Self::References,
    ) -> Result<ModelOf<Self>, DbErr>;

    async fn replace(
        txn: &DatabaseTransaction,
        current: ModelOf<Self>,
        input: Self::Input,
        references: Self::References,
    ) -> Result<ModelOf<Self>, DbErr>;

    /// Detaches dependent rows before the row with `id` is deleted.
    async fn release(_txn: &DatabaseTransaction, _id: i32) -> Result<(), DbErr> {
        Ok(())
    }

    async fn render(
        txn: &DatabaseTransaction,
        models: Vec<ModelOf<Self>>,
    ) -> Result<Vec<Self::Output>, DbErr>;
}

/// Create/read/update/delete over any [`Resource`].
pub struct CrudService<R>(PhantomData<R>);

impl<R: Resource> CrudService<R> {
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<R::Output>, AppError> {
        let txn = db.begin().await?;
        let models = R::Entity::find()
            .order_by_asc(R::id_column())
            .all(&txn)
            .await?;
        let output = R::render(&txn, models).await?;
        txn.commit().await?;
        Ok(output)
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<R::Output, AppError> {
        let txn = db.begin().await?;
        let model = resolver::find_or_not_found::<R, _>(&txn, id).await?;
        let output = Self::render_one(&txn, model).await?;
        txn.commit().await?;
        Ok(output)
    }

    pub async fn create(db: &DatabaseConnection, input: R::Input) -> Result<R::Output, AppError> {
        R::validate(&input)?;
        let context = format!("{} creation failed", R::KIND);

        let txn = db.begin().await?;
        let references = R::resolve_references(&txn, &input)
            .await
            .map_err(|e| e.into_rejected(&context))?;
        let model = R::insert(&txn, input, references)
            .await
            .map_err(|e| AppError::from_write(&context, e))?;
        let output = Self::render_one(&txn, model).await?;
        txn.commit()
            .await
            .map_err(|e| AppError::from_write(&context, e))?;

        info!("📝 {} created", R::KIND);
        Ok(output)
    }

    /// Full replacement of every mutable field of the row with `id`. The target
    /// is resolved before the payload is validated.
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        input: R::Input,
    ) -> Result<R::Output, AppError> {
        let context = format!("{} update failed", R::KIND);

        let txn = db.begin().await?;
        let current = resolver::find_or_not_found::<R, _>(&txn, id).await?;
        R::validate(&input)?;
        let references = R::resolve_references(&txn, &input)
            .await
            .map_err(|e| e.into_rejected(&context))?;
        let model = R::replace(&txn, current, input, references)
            .await
            .map_err(|e| AppError::from_write(&context, e))?;
        let output = Self::render_one(&txn, model).await?;
        txn.commit()
            .await
            .map_err(|e| AppError::from_write(&context, e))?;

        info!("✏️  {} {} updated", R::KIND, id);
        Ok(output)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<String, AppError> {
        let context = format!("{} deletion failed", R::KIND);

        let txn = db.begin().await?;
        resolver::find_or_not_found::<R, _>(&txn, id).await?;
        R::release(&txn, id)
            .await
            .map_err(|e| AppError::from_write(&context, e))?;
        R::Entity::delete_many()
            .filter(R::id_column().eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::from_write(&context, e))?;
        txn.commit()
            .await
            .map_err(|e| AppError::from_write(&context, e))?;

        info!("🗑️  {} {} deleted", R::KIND, id);
        Ok(format!("{} with id {} was deleted", R::KIND, id))
    }

    async fn render_one(txn: &DatabaseTransaction, model: ModelOf<R>) -> Result<R::Output, AppError> {
        R::render(txn, vec![model])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal(format!("{} could not be rendered", R::KIND)))
    }
}
