//! # Generic CRUD operations
//!
//! [`Crud`] runs the default operations against the table described by a
//! [`Resource`]. Every operation takes a [`Mix`] that supplies the body type,
//! extra predicates and transaction hooks, plus the raw request body.
//!
//! Writes run inside one transaction per call. The transaction either commits
//! (statement and all hooks succeeded) or is rolled back, and nothing of the
//! call persists.

use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, TransactionTrait,
};
use std::marker::PhantomData;

use crate::errors::ApiError;
use crate::mix::{Mix, Subject};
use crate::models::{DeleteBody, Extends, FindManyBody, FindOneBody, FindPageBody, UpdateBody};
use crate::pagination::Page;
use crate::traits::{MergeIntoActiveModel, Resource};

/// Default CRUD operations for one resource.
pub struct Crud<R> {
    db: DatabaseConnection,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Crud<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Crud<R> {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _resource: PhantomData,
        }
    }

    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// First record matching the effective predicate.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an invalid body, `NotFound` when nothing matches,
    /// database errors otherwise.
    pub async fn find_one<B>(&self, mix: Mix<R, B>, payload: &[u8]) -> Result<R::Model, ApiError>
    where
        B: Extends<FindOneBody>,
    {
        let body = mix.bind(payload)?;
        let base = Extends::<FindOneBody>::base(&body);
        let condition = mix.condition(base.conditions.to_condition::<R>()?, &body);

        R::Entity::find()
            .filter(condition)
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::not_found(R::RESOURCE_NAME_SINGULAR))
    }

    /// Every record matching the effective predicate, sorted by `order`.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an invalid body or sort key, database errors otherwise.
    pub async fn find_many<B>(
        &self,
        mix: Mix<R, B>,
        payload: &[u8],
    ) -> Result<Vec<R::Model>, ApiError>
    where
        B: Extends<FindManyBody>,
    {
        let body = mix.bind(payload)?;
        let base = Extends::<FindManyBody>::base(&body);
        let condition = mix.condition(base.conditions.to_condition::<R>()?, &body);
        let query = base.order.apply::<R>(R::Entity::find().filter(condition))?;

        Ok(query.all(&self.db).await?)
    }

    /// One page of matching records plus the total number of matches.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an invalid body, sort key or page, database errors
    /// otherwise.
    pub async fn find_page<B>(
        &self,
        mix: Mix<R, B>,
        payload: &[u8],
    ) -> Result<Page<R::Model>, ApiError>
    where
        B: Extends<FindPageBody>,
    {
        let body = mix.bind(payload)?;
        let base = Extends::<FindPageBody>::base(&body);
        let (offset, limit) = base.page.offset_limit(R::MAX_PAGE_SIZE)?;
        let condition = mix.condition(base.conditions.to_condition::<R>()?, &body);

        let query = R::Entity::find().filter(condition);
        let total = query.clone().count(&self.db).await?;
        let lists = base
            .order
            .apply::<R>(query)?
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(Page { lists, total })
    }

    /// Insert one record, then run the hooks with `Subject::Created`.
    ///
    /// Query transforms do not apply to inserts.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an invalid body, `Conflict` on a unique violation, the
    /// first hook error, database errors otherwise.
    pub async fn create<B>(&self, mix: Mix<R, B>, payload: &[u8]) -> Result<R::Model, ApiError>
    where
        B: Extends<R::CreateModel>,
    {
        let body = mix.bind(payload)?;
        if mix.has_queries() {
            tracing::debug!(
                resource = R::RESOURCE_NAME_SINGULAR,
                "query transforms are ignored by create"
            );
        }
        let active_model: R::ActiveModel = Extends::<R::CreateModel>::into_base(body).into();

        let txn = self.db.begin().await?;
        let model = active_model.insert(&txn).await?;
        let outcome = mix.run_hooks(&txn, Subject::Created(&model)).await;
        finish::<R>(txn, outcome, "create").await?;

        Ok(model)
    }

    /// Apply `updates` to every record matching the effective predicate, then
    /// run the hooks with `Subject::Updated`. Returns the number of rows
    /// changed.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an invalid body, an unscoped predicate or an empty
    /// update, the first hook error, database errors otherwise.
    pub async fn update<B>(&self, mix: Mix<R, B>, payload: &[u8]) -> Result<u64, ApiError>
    where
        B: Extends<UpdateBody<R::UpdateModel>>,
    {
        let body = mix.bind(payload)?;
        let base = Extends::<UpdateBody<R::UpdateModel>>::base(&body);
        let condition = mix.condition(base.conditions.to_condition::<R>()?, &body);
        let condition = ensure_scoped(condition)?;

        let UpdateBody { updates, .. } = Extends::<UpdateBody<R::UpdateModel>>::into_base(body);
        let changes =
            updates.merge_into_activemodel(<R::ActiveModel as ActiveModelTrait>::default())?;
        if !changes.is_changed() {
            return Err(ApiError::bad_request("no fields to update"));
        }

        let txn = self.db.begin().await?;
        let result = R::Entity::update_many()
            .set(changes.clone())
            .filter(condition)
            .exec(&txn)
            .await?;
        let outcome = mix.run_hooks(&txn, Subject::Updated(&changes)).await;
        finish::<R>(txn, outcome, "update").await?;

        tracing::debug!(
            resource = R::RESOURCE_NAME_PLURAL,
            rows = result.rows_affected,
            "update committed"
        );
        Ok(result.rows_affected)
    }

    /// Delete every record matching the effective predicate, then run the
    /// hooks with `Subject::Deleted`. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an invalid body or an unscoped predicate, the first
    /// hook error, database errors otherwise.
    pub async fn delete<B>(&self, mix: Mix<R, B>, payload: &[u8]) -> Result<u64, ApiError>
    where
        B: Extends<DeleteBody>,
    {
        let body = mix.bind(payload)?;
        let base = Extends::<DeleteBody>::base(&body);
        let condition = mix.condition(base.conditions.to_condition::<R>()?, &body);
        let condition = ensure_scoped(condition)?;

        let txn = self.db.begin().await?;
        let result = R::Entity::delete_many()
            .filter(condition.clone())
            .exec(&txn)
            .await?;
        let outcome = mix.run_hooks(&txn, Subject::Deleted(&condition)).await;
        finish::<R>(txn, outcome, "delete").await?;

        tracing::debug!(
            resource = R::RESOURCE_NAME_PLURAL,
            rows = result.rows_affected,
            "delete committed"
        );
        Ok(result.rows_affected)
    }
}

/// Writes without any predicate would touch the whole table. Checked on the
/// folded condition, so a transform that adds nothing does not count.
fn ensure_scoped(condition: Condition) -> Result<Condition, ApiError> {
    if condition.is_empty() {
        Err(ApiError::bad_request("missing where conditions"))
    } else {
        Ok(condition)
    }
}

/// Commit when every hook succeeded, otherwise roll back and return the hook's
/// error unchanged.
async fn finish<R: Resource>(
    txn: DatabaseTransaction,
    outcome: Result<(), ApiError>,
    operation: &'static str,
) -> Result<(), ApiError> {
    match outcome {
        Ok(()) => Ok(txn.commit().await?),
        Err(err) => {
            tracing::warn!(
                resource = R::RESOURCE_NAME_SINGULAR,
                operation,
                reason = %err,
                "transaction hook aborted, rolling back"
            );
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(
                    resource = R::RESOURCE_NAME_SINGULAR,
                    operation,
                    error = ?rollback_err,
                    "rollback failed"
                );
            }
            Err(err)
        }
    }
}
