#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use crudmix::{Crud, router};
use sea_orm::{ActiveValue, Database, DatabaseConnection, DbErr, EntityTrait};
use sea_orm_migration::prelude::*;
use tower::ServiceExt;

pub mod user_entity;

use user_entity as user;

/// `(id, name, age, gender, department)`; the email is `<name>@VX.com`.
pub const USERS: [(i32, &str, i32, &str, &str); 10] = [
    (1, "Kain", 25, "Male", "IT"),
    (2, "Stuart", 27, "Male", "Sale"),
    (3, "Joanna", 31, "Female", "Support"),
    (4, "Kenneth", 42, "Male", "IT"),
    (5, "Vivianne", 36, "Male", "Sale"),
    (6, "Max", 28, "Female", "Designer"),
    (7, "Ilse", 24, "Female", "IT"),
    (8, "Marcia", 37, "Female", "Support"),
    (9, "Orson", 45, "Male", "Designer"),
    (10, "Tamsin", 29, "Female", "Sale"),
];

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("crudmix=debug")
        .with_test_writer()
        .try_init();

    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;
    seed_users(&db).await?;

    Ok(db)
}

async fn seed_users(db: &DatabaseConnection) -> Result<(), DbErr> {
    let users = USERS
        .iter()
        .map(|&(id, name, age, gender, department)| user::ActiveModel {
            id: ActiveValue::Set(id),
            email: ActiveValue::Set(format!("{name}@VX.com")),
            name: ActiveValue::Set(name.to_string()),
            age: ActiveValue::Set(age),
            gender: ActiveValue::Set(gender.to_string()),
            department: ActiveValue::Set(department.to_string()),
        });
    user::Entity::insert_many(users).exec(db).await?;
    Ok(())
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    Router::new().nest("/user", router(Crud::<user::Entity>::new(db)))
}

/// POST `body` to `uri` and return the status with the body as text.
pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub fn user_json(id: i32) -> String {
    let &(id, name, age, gender, department) = USERS.iter().find(|user| user.0 == id).unwrap();
    format!(
        r#"{{"id":{id},"path":"{name}@VX.com","name":"{name}","age":{age},"gender":"{gender}","department":"{department}"}}"#
    )
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateUserTable)]
    }
}

pub struct CreateUserTable;

#[async_trait::async_trait]
impl MigrationName for CreateUserTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_user_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateUserTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Users::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Users::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
            .col(ColumnDef::new(Users::Name).string().not_null())
            .col(ColumnDef::new(Users::Age).integer().not_null())
            .col(ColumnDef::new(Users::Gender).string().not_null())
            .col(ColumnDef::new(Users::Department).string().not_null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    Age,
    Gender,
    Department,
}
