//! # Mix
//!
//! A `Mix` customizes one call of a generic CRUD operation. It is built inside a
//! controller method, handed to the matching [`Crud`](crate::Crud) operation by
//! value and dropped with the request.
//!
//! - **Body**: the type parameter `B`. The operation decodes the request into
//!   `B`, which must implement [`Extends`](crate::models::Extends) for the
//!   operation's base body.
//! - **Query**: [`Mix::query`] transforms run in registration order after the
//!   base `where` filters. Each one receives the predicate built so far and
//!   the decoded body.
//! - **Transaction hooks**: [`Mix::tx_next`] hooks run inside the write
//!   transaction, after the default statement. The first `Err` rolls the
//!   transaction back and becomes the response.
//!
//! ```rust,ignore
//! async fn update(&self, payload: Bytes) -> Result<Reply, ApiError> {
//!     let mix = Mix::<user::Entity, Extended<UpdateBody<UserUpdate>, ByName>>::new()
//!         .query(|condition, body| condition.add(user::Column::Name.eq(body.ext.name.as_str())))
//!         .tx_next(|txn, subject| Box::pin(async move {
//!             audit::record(txn, &subject).await?;
//!             Ok(())
//!         }));
//!     self.crud().update(mix, &payload).await?;
//!     Ok(Reply::ok())
//! }
//! ```

use sea_orm::{Condition, DatabaseTransaction};
use serde::de::DeserializeOwned;
use std::{fmt, future::Future, marker::PhantomData, pin::Pin};

use crate::errors::ApiError;
use crate::traits::Resource;

/// Future returned by a transaction hook.
pub type TxFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ApiError>> + Send + 'a>>;

type QueryFn<B> = Box<dyn Fn(Condition, &B) -> Condition + Send + Sync>;

type TxHook<R> =
    Box<dyn for<'a> Fn(&'a DatabaseTransaction, Subject<'a, R>) -> TxFuture<'a> + Send + Sync>;

/// What a write operation did, as seen by its transaction hooks.
pub enum Subject<'a, R: Resource> {
    /// The inserted record.
    Created(&'a R::Model),
    /// The partial record applied to every matched row.
    Updated(&'a R::ActiveModel),
    /// The predicate the rows were deleted by.
    Deleted(&'a Condition),
}

impl<R: Resource> Clone for Subject<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Resource> Copy for Subject<'_, R> {}

impl<R: Resource> fmt::Debug for Subject<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(model) => f.debug_tuple("Created").field(model).finish(),
            Self::Updated(changes) => f.debug_tuple("Updated").field(changes).finish(),
            Self::Deleted(condition) => f.debug_tuple("Deleted").field(condition).finish(),
        }
    }
}

/// Request-scoped overrides for one generic CRUD operation.
pub struct Mix<R: Resource, B> {
    queries: Vec<QueryFn<B>>,
    hooks: Vec<TxHook<R>>,
    _body: PhantomData<fn() -> B>,
}

impl<R: Resource, B> Default for Mix<R, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource, B> Mix<R, B> {
    /// A mix decoding the request into `B`, with no query transforms or hooks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queries: Vec::new(),
            hooks: Vec::new(),
            _body: PhantomData,
        }
    }

    /// Narrow the predicate. Transforms compose in registration order.
    #[must_use]
    pub fn query<F>(mut self, transform: F) -> Self
    where
        F: Fn(Condition, &B) -> Condition + Send + Sync + 'static,
    {
        self.queries.push(Box::new(transform));
        self
    }

    /// Run `hook` inside the write transaction after the default statement.
    ///
    /// Returning `Err` rolls the transaction back. The error is returned
    /// unchanged and no later hook runs.
    #[must_use]
    pub fn tx_next<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(&'a DatabaseTransaction, Subject<'a, R>) -> TxFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Whether any query transform is registered.
    #[must_use]
    pub fn has_queries(&self) -> bool {
        !self.queries.is_empty()
    }

    /// Whether any transaction hook is registered.
    #[must_use]
    pub fn has_hooks(&self) -> bool {
        !self.hooks.is_empty()
    }

    /// Decode the request body. An empty body reads as `{}`.
    pub(crate) fn bind(&self, payload: &[u8]) -> Result<B, ApiError>
    where
        B: DeserializeOwned,
    {
        let payload: &[u8] = if payload.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            payload
        };
        serde_json::from_slice(payload)
            .map_err(|err| ApiError::bad_request(format!("invalid request body: {err}")))
    }

    /// Fold every query transform over `base`.
    #[must_use]
    pub fn condition(&self, base: Condition, body: &B) -> Condition {
        self.queries
            .iter()
            .fold(base, |condition, transform| transform(condition, body))
    }

    /// Run the hooks in order, stopping at the first error.
    pub(crate) async fn run_hooks(
        &self,
        txn: &DatabaseTransaction,
        subject: Subject<'_, R>,
    ) -> Result<(), ApiError> {
        for hook in &self.hooks {
            hook(txn, subject).await?;
        }
        Ok(())
    }
}
