use crate::api::error::AppError;
use crate::entities::{authors, posts, prelude::*};
use crate::models::{AuthorRequest, AuthorResponse};
use crate::services::crud::{CrudService, Resource};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};

pub struct AuthorResource;

pub type AuthorService = CrudService<AuthorResource>;

#[async_trait]
impl Resource for AuthorResource {
    type Entity = Authors;
    type Input = AuthorRequest;
    type Output = AuthorResponse;
    type References = ();

    const KIND: &'static str = "Author";

    fn id_column() -> authors::Column {
        authors::Column::Id
    }

    async fn resolve_references(
        _txn: &DatabaseTransaction,
        _input: &AuthorRequest,
    ) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert(
        txn: &DatabaseTransaction,
        input: AuthorRequest,
        _references: (),
    ) -> Result<authors::Model, DbErr> {
        authors::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            ..Default::default()
        }
        .insert(txn)
        .await
    }

    async fn replace(
        txn: &DatabaseTransaction,
        current: authors::Model,
        input: AuthorRequest,
        _references: (),
    ) -> Result<authors::Model, DbErr> {
        let mut active_model = current.into_active_model();
        active_model.name = Set(input.name);
        active_model.email = Set(input.email);
        active_model.update(txn).await
    }

    /// Posts outlive their author; the reference is cleared instead.
    async fn release(txn: &DatabaseTransaction, id: i32) -> Result<(), DbErr> {
        Posts::update_many()
            .col_expr(posts::Column::AuthorId, Expr::value(Option::<i32>::None))
            .filter(posts::Column::AuthorId.eq(id))
            .exec(txn)
            .await?;
        Ok(())
    }

    async fn render(
        _txn: &DatabaseTransaction,
        models: Vec<authors::Model>,
    ) -> Result<Vec<AuthorResponse>, DbErr> {
        Ok(models.into_iter().map(AuthorResponse::from).collect())
    }
}
