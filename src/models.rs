//! Request bodies of the generic endpoints and the [`Extends`] capability
//! that lets a handler swap in its own body type.
//!
//! A custom body embeds the base body and adds its own fields:
//!
//! ```rust,ignore
//! #[derive(Deserialize)]
//! struct ByName {
//!     name: String,
//! }
//!
//! // {"name":"Marcia","where":[["age",">",30]]}
//! type Body = Extended<FindOneBody, ByName>;
//! ```

use serde::{Deserialize, de::DeserializeOwned};

use crate::filter::Conditions;
use crate::pagination::Pagination;
use crate::sort::Orders;

/// `r/find/one`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindOneBody {
    #[serde(default, rename = "where")]
    pub conditions: Conditions,
}

/// `r/find/many`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindManyBody {
    #[serde(default, rename = "where")]
    pub conditions: Conditions,
    #[serde(default)]
    pub order: Orders,
}

/// `r/find/page`
#[derive(Debug, Clone, Deserialize)]
pub struct FindPageBody {
    #[serde(default, rename = "where")]
    pub conditions: Conditions,
    #[serde(default)]
    pub order: Orders,
    pub page: Pagination,
}

/// `w/update`: `updates` holds the partial record applied to every match.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBody<U> {
    #[serde(default, rename = "where")]
    pub conditions: Conditions,
    pub updates: U,
}

/// `w/delete`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteBody {
    #[serde(default, rename = "where")]
    pub conditions: Conditions,
}

/// A request body usable wherever `Base` is expected.
///
/// Every body type extends itself, and [`Extended`] extends its `Base`.
/// Operations only read the base fields. Extension fields are there for the
/// handler's own query transforms and hooks.
pub trait Extends<Base>: DeserializeOwned + Send + Sync {
    fn base(&self) -> &Base;

    fn into_base(self) -> Base;
}

impl<T> Extends<T> for T
where
    T: DeserializeOwned + Send + Sync,
{
    fn base(&self) -> &T {
        self
    }

    fn into_base(self) -> T {
        self
    }
}

/// `Base` plus caller-supplied fields, decoded from one flat JSON object.
#[derive(Debug, Clone, Deserialize)]
pub struct Extended<Base, Ext> {
    #[serde(flatten)]
    pub base: Base,
    #[serde(flatten)]
    pub ext: Ext,
}

impl<Base, Ext> Extends<Base> for Extended<Base, Ext>
where
    Base: DeserializeOwned + Send + Sync,
    Ext: DeserializeOwned + Send + Sync,
{
    fn base(&self) -> &Base {
        &self.base
    }

    fn into_base(self) -> Base {
        self.base
    }
}
