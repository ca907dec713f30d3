use utoipa::openapi::{
    OpenApi, OpenApiBuilder,
    info::InfoBuilder,
    path::{HttpMethod, OperationBuilder, PathItem, PathsBuilder},
    response::ResponseBuilder,
};

use crate::routes::{
    CREATE_PATH, DELETE_PATH, FIND_MANY_PATH, FIND_ONE_PATH, FIND_PAGE_PATH, UPDATE_PATH,
};
use crate::traits::Resource;

struct Endpoint {
    path: &'static str,
    operation: &'static str,
    summary: String,
    success: &'static str,
}

fn endpoints<R: Resource>() -> [Endpoint; 6] {
    let one = R::RESOURCE_NAME_SINGULAR;
    let many = R::RESOURCE_NAME_PLURAL;
    [
        Endpoint {
            path: FIND_ONE_PATH,
            operation: "find_one",
            summary: format!("Find one {one}"),
            success: r#"{"data":{...},"error":0}"#,
        },
        Endpoint {
            path: FIND_MANY_PATH,
            operation: "find_many",
            summary: format!("Find many {many}"),
            success: r#"{"data":[...],"error":0}"#,
        },
        Endpoint {
            path: FIND_PAGE_PATH,
            operation: "find_page",
            summary: format!("Find a page of {many}"),
            success: r#"{"data":{"lists":[...],"total":N},"error":0}"#,
        },
        Endpoint {
            path: CREATE_PATH,
            operation: "create",
            summary: format!("Create one {one}"),
            success: r#"{"data":{...},"error":0}"#,
        },
        Endpoint {
            path: UPDATE_PATH,
            operation: "update",
            summary: format!("Update matching {many}"),
            success: r#"{"error":0,"msg":"ok"}"#,
        },
        Endpoint {
            path: DELETE_PATH,
            operation: "delete",
            summary: format!("Delete matching {many}"),
            success: r#"{"error":0,"msg":"ok"}"#,
        },
    ]
}

/// OpenAPI description of `R`'s endpoints mounted under `prefix`
/// (e.g. `"/users"`).
#[must_use]
pub fn document<R: Resource>(prefix: &str) -> OpenApi {
    let prefix = prefix.trim_end_matches('/');
    let mut paths = PathsBuilder::new();

    for endpoint in endpoints::<R>() {
        let description = if R::RESOURCE_DESCRIPTION.is_empty() {
            endpoint.summary.clone()
        } else {
            format!("{}\n\n{}", endpoint.summary, R::RESOURCE_DESCRIPTION)
        };
        let operation = OperationBuilder::new()
            .operation_id(Some(format!(
                "{}_{}",
                endpoint.operation,
                R::RESOURCE_NAME_SINGULAR
            )))
            .summary(Some(endpoint.summary))
            .description(Some(description))
            .tag(R::RESOURCE_NAME_PLURAL)
            .response(
                "200",
                ResponseBuilder::new().description(endpoint.success).build(),
            )
            .response(
                "400",
                ResponseBuilder::new()
                    .description(r#"{"error":1,"msg":"..."} for invalid input or a rejected write"#)
                    .build(),
            )
            .response(
                "500",
                ResponseBuilder::new()
                    .description(r#"{"error":1,"msg":"A database error occurred"}"#)
                    .build(),
            );

        paths = paths.path(
            format!("{prefix}{}", endpoint.path),
            PathItem::new(HttpMethod::Post, operation.build()),
        );
    }

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title(format!("{} API", R::RESOURCE_NAME_PLURAL))
                .version(env!("CARGO_PKG_VERSION"))
                .build(),
        )
        .paths(paths.build())
        .build()
}
