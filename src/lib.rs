//! Generic JSON CRUD controllers for `SeaORM` entities.
//!
//! Implement [`Resource`] for an entity, then mount [`router`] with either a
//! plain [`Crud`] or a [`Controller`] whose overridden methods build a [`Mix`]
//! to extend the body, narrow the query or hook into the write transaction.

pub mod crud;
pub mod envelope;
pub mod errors;
pub mod filter;
pub mod mix;
pub mod models;
pub mod openapi;
pub mod pagination;
pub mod routes;
pub mod sort;
pub mod traits;

#[cfg(test)]
mod testing;

pub use crud::Crud;
pub use envelope::Reply;
pub use errors::ApiError;
pub use filter::{Conditions, Filter, Operator};
pub use mix::{Mix, Subject, TxFuture};
pub use models::{
    DeleteBody, Extended, Extends, FindManyBody, FindOneBody, FindPageBody, UpdateBody,
};
pub use pagination::{Page, Pagination};
pub use routes::{Controller, router};
pub use sort::{Direction, Orders};
pub use traits::{MergeIntoActiveModel, Resource};
