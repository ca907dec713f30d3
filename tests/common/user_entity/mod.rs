use crudmix::{MergeIntoActiveModel, Resource};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    #[serde(rename = "path")]
    pub email: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub department: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Deserialize)]
pub struct UserCreate {
    #[serde(rename = "path")]
    pub email: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub department: String,
}

impl From<UserCreate> for ActiveModel {
    fn from(create: UserCreate) -> Self {
        Self {
            id: ActiveValue::NotSet,
            email: ActiveValue::Set(create.email),
            name: ActiveValue::Set(create.name),
            age: ActiveValue::Set(create.age),
            gender: ActiveValue::Set(create.gender),
            department: ActiveValue::Set(create.department),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(rename = "path")]
    pub email: Option<String>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub department: Option<String>,
}

impl MergeIntoActiveModel<ActiveModel> for UserUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(email) = self.email {
            existing.email = ActiveValue::Set(email);
        }
        if let Some(name) = self.name {
            existing.name = ActiveValue::Set(name);
        }
        if let Some(age) = self.age {
            existing.age = ActiveValue::Set(age);
        }
        if let Some(gender) = self.gender {
            existing.gender = ActiveValue::Set(gender);
        }
        if let Some(department) = self.department {
            existing.department = ActiveValue::Set(department);
        }
        Ok(existing)
    }
}

impl Resource for Entity {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Column = Column;
    type CreateModel = UserCreate;
    type UpdateModel = UserUpdate;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "user";
    const RESOURCE_NAME_PLURAL: &'static str = "users";
    const RESOURCE_DESCRIPTION: &'static str = "Staff directory used by the integration tests";
    const MAX_PAGE_SIZE: u64 = 5;

    fn filterable_columns() -> Vec<Column> {
        vec![
            Column::Id,
            Column::Name,
            Column::Age,
            Column::Gender,
            Column::Department,
        ]
    }
}
