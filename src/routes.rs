//! # Controllers and routing
//!
//! A [`Controller`] exposes the six generic endpoints. Every method has a
//! default that runs the plain [`Crud`] operation. A consumer overrides
//! only the endpoints it wants to customize and builds a [`Mix`] inside them:
//!
//! ```rust,ignore
//! struct UserMixController {
//!     crud: Crud<user::Entity>,
//! }
//!
//! #[async_trait]
//! impl Controller for UserMixController {
//!     type Resource = user::Entity;
//!
//!     fn crud(&self) -> &Crud<user::Entity> {
//!         &self.crud
//!     }
//!
//!     async fn create(&self, payload: Bytes) -> Result<Reply, ApiError> {
//!         let mix = Mix::<user::Entity, UserCreate>::new().tx_next(|_txn, _subject| {
//!             Box::pin(async move { Err(ApiError::rollback("an abnormal rollback occurred")) })
//!         });
//!         Reply::data(&self.crud.create(mix, &payload).await?)
//!     }
//! }
//!
//! let app = Router::new().nest("/user-mix", router(UserMixController { crud }));
//! ```

use async_trait::async_trait;
use axum::{
    Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    routing::post,
};
use std::sync::Arc;

use crate::crud::Crud;
use crate::envelope::Reply;
use crate::errors::ApiError;
use crate::mix::Mix;
use crate::models::{DeleteBody, FindManyBody, FindOneBody, FindPageBody, UpdateBody};
use crate::traits::Resource;

pub const FIND_ONE_PATH: &str = "/r/find/one";
pub const FIND_MANY_PATH: &str = "/r/find/many";
pub const FIND_PAGE_PATH: &str = "/r/find/page";
pub const CREATE_PATH: &str = "/w/create";
pub const UPDATE_PATH: &str = "/w/update";
pub const DELETE_PATH: &str = "/w/delete";

#[async_trait]
pub trait Controller: Send + Sync + 'static {
    type Resource: Resource;

    fn crud(&self) -> &Crud<Self::Resource>;

    async fn find_one(&self, payload: Bytes) -> Result<Reply, ApiError> {
        let mix = Mix::<Self::Resource, FindOneBody>::new();
        let record = self.crud().find_one(mix, &payload).await?;
        Reply::data(&record)
    }

    async fn find_many(&self, payload: Bytes) -> Result<Reply, ApiError> {
        let mix = Mix::<Self::Resource, FindManyBody>::new();
        let records = self.crud().find_many(mix, &payload).await?;
        Reply::data(&records)
    }

    async fn find_page(&self, payload: Bytes) -> Result<Reply, ApiError> {
        let mix = Mix::<Self::Resource, FindPageBody>::new();
        let page = self.crud().find_page(mix, &payload).await?;
        Reply::data(&page)
    }

    async fn create(&self, payload: Bytes) -> Result<Reply, ApiError> {
        let mix = Mix::<Self::Resource, <Self::Resource as Resource>::CreateModel>::new();
        let record = self.crud().create(mix, &payload).await?;
        Reply::data(&record)
    }

    async fn update(&self, payload: Bytes) -> Result<Reply, ApiError> {
        let mix =
            Mix::<Self::Resource, UpdateBody<<Self::Resource as Resource>::UpdateModel>>::new();
        self.crud().update(mix, &payload).await?;
        Ok(Reply::ok())
    }

    async fn delete(&self, payload: Bytes) -> Result<Reply, ApiError> {
        let mix = Mix::<Self::Resource, DeleteBody>::new();
        self.crud().delete(mix, &payload).await?;
        Ok(Reply::ok())
    }
}

/// The plain controller: every endpoint runs its default.
impl<R: Resource> Controller for Crud<R> {
    type Resource = R;

    fn crud(&self) -> &Crud<R> {
        self
    }
}

/// Mount `controller`'s endpoints. Nest the result under the resource path.
pub fn router<C: Controller>(controller: C) -> Router {
    Router::new()
        .route(FIND_ONE_PATH, post(find_one_handler::<C>))
        .route(FIND_MANY_PATH, post(find_many_handler::<C>))
        .route(FIND_PAGE_PATH, post(find_page_handler::<C>))
        .route(CREATE_PATH, post(create_handler::<C>))
        .route(UPDATE_PATH, post(update_handler::<C>))
        .route(DELETE_PATH, post(delete_handler::<C>))
        .with_state(Arc::new(controller))
}

/// Body extraction failures (e.g. over the body size limit) keep their status
/// but are rendered in the failure envelope.
fn read_payload(payload: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    payload.map_err(|rejection| ApiError::custom(rejection.status(), rejection.body_text()))
}

async fn find_one_handler<C: Controller>(
    State(controller): State<Arc<C>>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Reply, ApiError> {
    controller.find_one(read_payload(payload)?).await
}

async fn find_many_handler<C: Controller>(
    State(controller): State<Arc<C>>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Reply, ApiError> {
    controller.find_many(read_payload(payload)?).await
}

async fn find_page_handler<C: Controller>(
    State(controller): State<Arc<C>>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Reply, ApiError> {
    controller.find_page(read_payload(payload)?).await
}

async fn create_handler<C: Controller>(
    State(controller): State<Arc<C>>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Reply, ApiError> {
    controller.create(read_payload(payload)?).await
}

async fn update_handler<C: Controller>(
    State(controller): State<Arc<C>>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Reply, ApiError> {
    controller.update(read_payload(payload)?).await
}

async fn delete_handler<C: Controller>(
    State(controller): State<Arc<C>>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Reply, ApiError> {
    controller.delete(read_payload(payload)?).await
}
