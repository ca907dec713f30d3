//! In-crate fixture resource for unit tests.

pub mod widget {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    use crate::traits::{MergeIntoActiveModel, Resource};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "widgets")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub size: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    #[derive(Deserialize)]
    pub struct WidgetCreate {
        pub name: String,
        pub size: i32,
    }

    impl From<WidgetCreate> for ActiveModel {
        fn from(create: WidgetCreate) -> Self {
            Self {
                name: sea_orm::ActiveValue::Set(create.name),
                size: sea_orm::ActiveValue::Set(create.size),
                ..Default::default()
            }
        }
    }

    #[derive(Deserialize)]
    pub struct WidgetPatch {
        pub size: Option<i32>,
    }

    impl MergeIntoActiveModel<ActiveModel> for WidgetPatch {
        fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
            if let Some(size) = self.size {
                existing.size = sea_orm::ActiveValue::Set(size);
            }
            Ok(existing)
        }
    }

    impl Resource for Entity {
        type Entity = Entity;
        type Model = Model;
        type ActiveModel = ActiveModel;
        type Column = Column;
        type CreateModel = WidgetCreate;
        type UpdateModel = WidgetPatch;

        const ID_COLUMN: Column = Column::Id;
        const RESOURCE_NAME_SINGULAR: &'static str = "widget";
        const RESOURCE_NAME_PLURAL: &'static str = "widgets";

        fn sortable_columns() -> Vec<Column> {
            vec![Column::Id, Column::Name]
        }
    }
}
