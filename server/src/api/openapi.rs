//! OpenAPI specification and Swagger UI
//!
//! Health and shared schemas come from the derive. Resource endpoints are
//! generic over the entity, so their paths are assembled from the entity
//! declarations when the document is built.

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use serde::Serialize;
use utoipa::OpenApi;
use utoipa::openapi::path::{HttpMethod, OperationBuilder, Parameter, ParameterBuilder, ParameterIn};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::schema::{
    ArrayBuilder, KnownFormat, ObjectBuilder, Schema, SchemaFormat, Type,
};
use utoipa::openapi::{ContentBuilder, PathItem, Ref, RefOr, Required, ResponseBuilder};
use utoipa::ToSchema;

use crate::api::routes::health;
use crate::api::routes::resources::dto::{
    CountryDto, DepartmentDto, EmployeeDto, JobDto, LocationDto, RegionDto, TaskDto,
};
use crate::api::types::PaginationMeta;
use crate::domain::criteria::ENTITIES;
use crate::domain::model::EntityMeta;

/// Error body returned by every failing endpoint
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// `bad_request`, `not_found`, `service_unavailable` or `internal_error`
    pub error: String,
    /// Stable machine-readable code (e.g. `INVALID_FILTER_FIELD`)
    pub code: String,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRDesk API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Human-resources records with criteria filtering and full-text search"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "regions", description = "Regions"),
        (name = "countries", description = "Countries"),
        (name = "locations", description = "Locations"),
        (name = "departments", description = "Departments"),
        (name = "tasks", description = "Tasks"),
        (name = "employees", description = "Employees"),
        (name = "jobs", description = "Jobs")
    ),
    paths(health::health),
    components(schemas(
        health::HealthResponse,
        PaginationMeta,
        ErrorResponse,
        RegionDto,
        CountryDto,
        LocationDto,
        DepartmentDto,
        TaskDto,
        EmployeeDto,
        JobDto,
    ))
)]
pub struct ApiDoc;

/// Full document: derived parts plus one path set per entity
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    for meta in ENTITIES.iter() {
        for (path, item) in resource_paths(meta) {
            doc.paths.paths.insert(path, item);
        }
    }
    doc
}

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], Json(api_doc()))
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

fn dto_name(meta: &EntityMeta) -> String {
    format!("{}Dto", meta.name)
}

fn dto_ref(meta: &EntityMeta) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(dto_name(meta)))
}

fn integer(format: KnownFormat) -> RefOr<Schema> {
    RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .schema_type(Type::Integer)
            .format(Some(SchemaFormat::KnownFormat(format)))
            .build(),
    ))
}

fn string() -> RefOr<Schema> {
    RefOr::T(Schema::Object(ObjectBuilder::new().schema_type(Type::String).build()))
}

fn array_of(item: RefOr<Schema>) -> RefOr<Schema> {
    RefOr::T(Schema::Array(ArrayBuilder::new().items(item).build()))
}

fn page_of(meta: &EntityMeta) -> RefOr<Schema> {
    RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .property("data", array_of(dto_ref(meta)))
            .property("meta", RefOr::Ref(Ref::from_schema_name("PaginationMeta")))
            .required("data")
            .required("meta")
            .build(),
    ))
}

fn json_body(schema: RefOr<Schema>) -> utoipa::openapi::Content {
    ContentBuilder::new().schema(Some(schema)).build()
}

fn query_param(name: &str, schema: RefOr<Schema>, description: &str) -> Parameter {
    ParameterBuilder::new()
        .name(name)
        .parameter_in(ParameterIn::Query)
        .required(Required::False)
        .description(Some(description))
        .schema(Some(schema))
        .build()
}

fn id_param() -> Parameter {
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(integer(KnownFormat::Int64)))
        .build()
}

fn paging_params(builder: OperationBuilder) -> OperationBuilder {
    builder
        .parameter(query_param("page", integer(KnownFormat::Int32), "1-based page number"))
        .parameter(query_param("size", integer(KnownFormat::Int32), "Page size"))
        .parameter(query_param(
            "sort",
            string(),
            "Repeatable `field,asc|desc`; ties are broken by id",
        ))
}

fn filter_param(builder: OperationBuilder, meta: &EntityMeta) -> OperationBuilder {
    let names: Vec<&str> = meta.filter_names().map(|(name, _)| name).collect();
    builder.description(Some(format!(
        "Filters are `field.operator=value` query parameters over: {}",
        names.join(", ")
    )))
}

fn operation(meta: &EntityMeta, id: &str, summary: String) -> OperationBuilder {
    OperationBuilder::new()
        .tag(meta.resource)
        .operation_id(Some(format!("{}_{}", id, meta.table)))
        .summary(Some(summary))
        .response(
            "400",
            ResponseBuilder::new()
                .description("Invalid request")
                .content(
                    "application/json",
                    json_body(RefOr::Ref(Ref::from_schema_name("ErrorResponse"))),
                )
                .build(),
        )
}

fn ok(builder: OperationBuilder, status: &str, description: &str, schema: Option<RefOr<Schema>>) -> OperationBuilder {
    let response = ResponseBuilder::new().description(description);
    let response = match schema {
        Some(schema) => response.content("application/json", json_body(schema)),
        None => response,
    };
    builder.response(status, response.build())
}

fn not_found(builder: OperationBuilder) -> OperationBuilder {
    builder.response(
        "404",
        ResponseBuilder::new()
            .description("No such record")
            .content(
                "application/json",
                json_body(RefOr::Ref(Ref::from_schema_name("ErrorResponse"))),
            )
            .build(),
    )
}

fn with_body(builder: OperationBuilder, meta: &EntityMeta) -> OperationBuilder {
    builder.request_body(Some(
        RequestBodyBuilder::new()
            .content("application/json", json_body(dto_ref(meta)))
            .required(Some(Required::True))
            .build(),
    ))
}

fn resource_paths(meta: &EntityMeta) -> Vec<(String, PathItem)> {
    let base = format!("/api/v1/{}", meta.resource);
    let name = meta.name;

    let list = ok(
        filter_param(operation(meta, "list", format!("List {} records", name)), meta),
        "200",
        "Matching records ordered by id",
        Some(array_of(dto_ref(meta))),
    );
    let create = ok(
        with_body(operation(meta, "create", format!("Create a {}", name)), meta),
        "201",
        "Created",
        Some(dto_ref(meta)),
    );
    let update = not_found(ok(
        with_body(operation(meta, "update", format!("Update a {}", name)), meta),
        "200",
        "Updated",
        Some(dto_ref(meta)),
    ));
    let page = ok(
        paging_params(filter_param(
            operation(meta, "page", format!("Page through {} records", name)),
            meta,
        )),
        "200",
        "One page of matching records",
        Some(page_of(meta)),
    );
    let count = ok(
        filter_param(operation(meta, "count", format!("Count {} records", name)), meta),
        "200",
        "Number of matching records",
        Some(integer(KnownFormat::Int64)),
    );
    let get_one = not_found(ok(
        operation(meta, "get", format!("Get a {} by id", name)).parameter(id_param()),
        "200",
        "The record",
        Some(dto_ref(meta)),
    ));
    let delete = not_found(ok(
        operation(meta, "delete", format!("Delete a {} by id", name)).parameter(id_param()),
        "204",
        "Deleted",
        None,
    ));
    let search = ok(
        paging_params(operation(meta, "search", format!("Search {} records", name)))
            .parameter(query_param(
                "query",
                string(),
                "Free text; supports `field:term`, `prefix*`, quoted phrases, AND/OR/NOT",
            ))
            .response(
                "503",
                ResponseBuilder::new().description("Search is disabled").build(),
            ),
        "200",
        "Ranked page of matches",
        Some(page_of(meta)),
    );

    let mut collection = PathItem::new(HttpMethod::Get, list.build());
    collection.post = Some(create.build());
    collection.put = Some(update.build());

    let mut single = PathItem::new(HttpMethod::Get, get_one.build());
    single.delete = Some(delete.build());

    vec![
        (base.clone(), collection),
        (
            format!("{}/page", base),
            PathItem::new(HttpMethod::Get, page.build()),
        ),
        (
            format!("{}/count", base),
            PathItem::new(HttpMethod::Get, count.build()),
        ),
        (format!("{}/{{id}}", base), single),
        (
            format!("/api/v1/_search/{}", meta.resource),
            PathItem::new(HttpMethod::Get, search.build()),
        ),
    ]
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>HRDesk API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true
            });
        };
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_resource_is_documented() {
        let doc = api_doc();
        for meta in ENTITIES.iter() {
            let base = format!("/api/v1/{}", meta.resource);
            let item = doc.paths.paths.get(&base).unwrap();
            assert!(item.get.is_some() && item.post.is_some() && item.put.is_some());
            assert!(doc.paths.paths.contains_key(&format!("{}/{{id}}", base)));
            assert!(
                doc.paths
                    .paths
                    .contains_key(&format!("/api/v1/_search/{}", meta.resource))
            );
        }
        assert!(doc.paths.paths.contains_key("/api/v1/health"));
    }

    #[test]
    fn test_dto_schemas_registered() {
        let doc = api_doc();
        let schemas = &doc.components.unwrap().schemas;
        for meta in ENTITIES.iter() {
            assert!(schemas.contains_key(&dto_name(meta)), "{}", meta.name);
        }
        assert!(schemas.contains_key("PaginationMeta"));
    }
}
