use crate::api::error::AppError;
use crate::entities::{categories, posts, prelude::*};
use crate::models::{CategoryRequest, CategoryResponse};
use crate::services::crud::{CrudService, Resource};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};

pub struct CategoryResource;

pub type CategoryService = CrudService<CategoryResource>;

#[async_trait]
impl Resource for CategoryResource {
    type Entity = Categories;
    type Input = CategoryRequest;
    type Output = CategoryResponse;
    type References = ();

    const KIND: &'static str = "Category";

    fn id_column() -> categories::Column {
        categories::Column::Id
    }

    async fn resolve_references(
        _txn: &DatabaseTransaction,
        _input: &CategoryRequest,
    ) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert(
        txn: &DatabaseTransaction,
        input: CategoryRequest,
        _references: (),
    ) -> Result<categories::Model, DbErr> {
        categories::ActiveModel {
            name: Set(input.name),
            ..Default::default()
        }
        .insert(txn)
        .await
    }

    async fn replace(
        txn: &DatabaseTransaction,
        current: categories::Model,
        input: CategoryRequest,
        _references: (),
    ) -> Result<categories::Model, DbErr> {
        let mut active_model = current.into_active_model();
        active_model.name = Set(input.name);
        active_model.update(txn).await
    }

    async fn release(txn: &DatabaseTransaction, id: i32) -> Result<(), DbErr> {
        Posts::update_many()
            .col_expr(posts::Column::CategoryId, Expr::value(Option::<i32>::None))
            .filter(posts::Column::CategoryId.eq(id))
            .exec(txn)
            .await?;
        Ok(())
    }

    async fn render(
        _txn: &DatabaseTransaction,
        models: Vec<categories::Model>,
    ) -> Result<Vec<CategoryResponse>, DbErr> {
        Ok(models.into_iter().map(CategoryResponse::from).collect())
    }
}
