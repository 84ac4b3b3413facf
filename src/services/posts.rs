use crate::api::error::AppError;
use crate::entities::{post_tags, posts, prelude::*, tags};
use crate::models::{PostRequest, PostResponse};
use crate::services::authors::AuthorResource;
use crate::services::categories::CategoryResource;
use crate::services::crud::{CrudService, Resource};
use crate::services::resolver;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel,
    LoaderTrait, QueryFilter, Set,
};

pub struct PostResource;

pub type PostService = CrudService<PostResource>;

/// Tags a post will carry after a write, in request order.
pub struct PostReferences {
    pub tags: Vec<tags::Model>,
}

impl PostResource {
    /// Resolves all requested tag ids in one query. Duplicates collapse to a
    /// single association.
    async fn resolve_tags(
        txn: &DatabaseTransaction,
        tag_ids: &[i32],
    ) -> Result<Vec<tags::Model>, AppError> {
        let mut wanted: Vec<i32> = Vec::with_capacity(tag_ids.len());
        for id in tag_ids {
            if !wanted.contains(id) {
                wanted.push(*id);
            }
        }

        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let found = Tags::find()
            .filter(tags::Column::Id.is_in(wanted.clone()))
            .all(txn)
            .await?;

        wanted
            .into_iter()
            .map(|id| {
                found
                    .iter()
                    .find(|tag| tag.id == id)
                    .cloned()
                    .ok_or_else(|| AppError::NotFound(format!("Tag with id {} not found", id)))
            })
            .collect()
    }

    async fn attach_tags(
        txn: &DatabaseTransaction,
        post_id: i32,
        tags: &[tags::Model],
    ) -> Result<(), DbErr> {
        if tags.is_empty() {
            return Ok(());
        }

        let rows = tags.iter().map(|tag| post_tags::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(tag.id),
            ..Default::default()
        });
        PostTags::insert_many(rows).exec(txn).await?;
        Ok(())
    }

    async fn detach_tags(txn: &DatabaseTransaction, post_id: i32) -> Result<(), DbErr> {
        PostTags::delete_many()
            .filter(post_tags::Column::PostId.eq(post_id))
            .exec(txn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Resource for PostResource {
    type Entity = Posts;
    type Input = PostRequest;
    type Output = PostResponse;
    type References = PostReferences;

    const KIND: &'static str = "Post";

    fn id_column() -> posts::Column {
        posts::Column::Id
    }

    async fn resolve_references(
        txn: &DatabaseTransaction,
        input: &PostRequest,
    ) -> Result<PostReferences, AppError> {
        resolver::find_optional::<AuthorResource, _>(txn, input.author_id).await?;
        resolver::find_optional::<CategoryResource, _>(txn, input.category_id).await?;
        let tags = Self::resolve_tags(txn, &input.tags).await?;
        Ok(PostReferences { tags })
    }

    async fn insert(
        txn: &DatabaseTransaction,
        input: PostRequest,
        references: PostReferences,
    ) -> Result<posts::Model, DbErr> {
        let post = posts::ActiveModel {
            title: Set(input.title),
            content: Set(input.content),
            author_id: Set(input.author_id),
            category_id: Set(input.category_id),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        Self::attach_tags(txn, post.id, &references.tags).await?;
        Ok(post)
    }

    async fn replace(
        txn: &DatabaseTransaction,
        current: posts::Model,
        input: PostRequest,
        references: PostReferences,
    ) -> Result<posts::Model, DbErr> {
        let mut active_model = current.into_active_model();
        active_model.title = Set(input.title);
        active_model.content = Set(input.content);
        active_model.author_id = Set(input.author_id);
        active_model.category_id = Set(input.category_id);
        let post = active_model.update(txn).await?;

        // Full replace of the tag set
        Self::detach_tags(txn, post.id).await?;
        Self::attach_tags(txn, post.id, &references.tags).await?;
        Ok(post)
    }

    async fn release(txn: &DatabaseTransaction, id: i32) -> Result<(), DbErr> {
        Self::detach_tags(txn, id).await
    }

    async fn render(
        txn: &DatabaseTransaction,
        models: Vec<posts::Model>,
    ) -> Result<Vec<PostResponse>, DbErr> {
        let tags = models.load_many_to_many(Tags, PostTags, txn).await?;

        Ok(models
            .into_iter()
            .zip(tags)
            .map(|(post, mut tags)| {
                tags.sort_by_key(|tag| tag.id);
                PostResponse::new(post, tags)
            })
            .collect())
    }
}
