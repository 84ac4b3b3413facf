use crate::api::error::AppError;
use crate::entities::{post_tags, prelude::*, tags};
use crate::models::{TagRequest, TagResponse};
use crate::services::crud::{CrudService, Resource};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};

pub struct TagResource;

pub type TagService = CrudService<TagResource>;

#[async_trait]
impl Resource for TagResource {
    type Entity = Tags;
    type Input = TagRequest;
    type Output = TagResponse;
    type References = ();

    const KIND: &'static str = "Tag";

    fn id_column() -> tags::Column {
        tags::Column::Id
    }

    async fn resolve_references(
        _txn: &DatabaseTransaction,
        _input: &TagRequest,
    ) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert(
        txn: &DatabaseTransaction,
        input: TagRequest,
        _references: (),
    ) -> Result<tags::Model, DbErr> {
        tags::ActiveModel {
            name: Set(input.name),
            ..Default::default()
        }
        .insert(txn)
        .await
    }

    async fn replace(
        txn: &DatabaseTransaction,
        current: tags::Model,
        input: TagRequest,
        _references: (),
    ) -> Result<tags::Model, DbErr> {
        let mut active_model = current.into_active_model();
        active_model.name = Set(input.name);
        active_model.update(txn).await
    }

    /// Drops the tag from every post; the posts themselves stay.
    async fn release(txn: &DatabaseTransaction, id: i32) -> Result<(), DbErr> {
        PostTags::delete_many()
            .filter(post_tags::Column::TagId.eq(id))
            .exec(txn)
            .await?;
        Ok(())
    }

    async fn render(
        _txn: &DatabaseTransaction,
        models: Vec<tags::Model>,
    ) -> Result<Vec<TagResponse>, DbErr> {
        Ok(models.into_iter().map(TagResponse::from).collect())
    }
}
