use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, FromQueryResult,
    IdenStatic, IntoActiveModel, Iterable,
};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

pub trait MergeIntoActiveModel<ActiveModelType> {
    /// Merge this update model into an existing active model
    ///
    /// Fields left out of the update must stay `NotSet` so that only the
    /// provided columns end up in the `UPDATE` statement.
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if the merge operation fails due to data conversion issues.
    fn merge_into_activemodel(self, existing: ActiveModelType) -> Result<ActiveModelType, DbErr>;
}

/// A table exposed through the generic CRUD controller.
///
/// Implemented once per entity. The associated types tie the `SeaORM` entity to
/// the request shapes accepted by `w/create` and `w/update`.
///
/// ```rust,ignore
/// impl Resource for user::Entity {
///     type Entity = user::Entity;
///     type Model = user::Model;
///     type ActiveModel = user::ActiveModel;
///     type Column = user::Column;
///     type CreateModel = UserCreate;
///     type UpdateModel = UserUpdate;
///
///     const ID_COLUMN: user::Column = user::Column::Id;
///     const RESOURCE_NAME_SINGULAR: &'static str = "user";
///     const RESOURCE_NAME_PLURAL: &'static str = "users";
/// }
/// ```
pub trait Resource: Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model, Column = Self::Column> + Sync;
    type Model: IntoActiveModel<Self::ActiveModel>
        + FromQueryResult
        + Serialize
        + Clone
        + Debug
        + Send
        + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + Clone
        + Debug
        + Send
        + Sync;
    type Column: ColumnTrait + Copy + Send + Sync;
    type CreateModel: DeserializeOwned + Into<Self::ActiveModel> + Send + Sync;
    type UpdateModel: DeserializeOwned + MergeIntoActiveModel<Self::ActiveModel> + Send + Sync;

    const ID_COLUMN: Self::Column;
    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;
    const RESOURCE_DESCRIPTION: &'static str = "";

    /// Upper bound for `page.size` on `r/find/page`.
    const MAX_PAGE_SIZE: u64 = 1000;

    #[must_use]
    fn default_index_column() -> Self::Column {
        Self::ID_COLUMN
    }

    /// Columns accepted as the field of a `where` triple, matched by column
    /// name.
    ///
    /// Defaults to every column of the entity.
    #[must_use]
    fn filterable_columns() -> Vec<Self::Column> {
        Self::Column::iter().collect()
    }

    /// Columns accepted as keys of `order`.
    ///
    /// Defaults to every column of the entity.
    #[must_use]
    fn sortable_columns() -> Vec<Self::Column> {
        Self::Column::iter().collect()
    }
}

/// Find column by name
pub(crate) fn find_column<C>(column_name: &str, columns: &[C]) -> Option<C>
where
    C: ColumnTrait + Copy,
{
    columns
        .iter()
        .copied()
        .find(|column| column.as_str() == column_name)
}
