//! OpenAPI document. Record schemas come from `ToSchema` derives; paths and request bodies are
//! generated from the entity model so they cannot drift from the routes.

use crate::error::ErrorBody;
use crate::model::{Appointment, ColumnDef, ColumnType, EntityDef, Role, Sale, Timestamps, User, Vehicle, MODEL};
use crate::response::MessageBody;
use utoipa::openapi::path::{Operation, OperationBuilder, Parameter, ParameterBuilder, ParameterIn, PathItemBuilder};
use utoipa::openapi::request_body::{RequestBody, RequestBodyBuilder};
use utoipa::openapi::schema::{Array, KnownFormat, ObjectBuilder, Ref, Schema, SchemaFormat, Type};
use utoipa::openapi::{
    ContentBuilder, HttpMethod, OpenApi as OpenApiDoc, PathsBuilder, RefOr, Required, Response, ResponseBuilder,
};
use utoipa::OpenApi;

/// Where the generated document is served.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Car dealership API",
        version = "1.0.0",
        description = "Manage the sale of cars: users, roles, vehicles, sales and test-drive appointments"
    ),
    components(schemas(Role, User, Vehicle, Sale, Appointment, Timestamps, ErrorBody, MessageBody))
)]
pub struct ApiDoc;

/// Full document: derived components plus one collection and one item path per entity.
pub fn api_doc(base: &str) -> OpenApiDoc {
    let mut paths = PathsBuilder::new();
    for entity in MODEL {
        paths = paths
            .path(format!("{}/{}", base, entity.path), collection_path(entity))
            .path(format!("{}/{}/{{id}}", base, entity.path), item_path(entity));
    }
    let mut doc = ApiDoc::openapi();
    doc.paths = paths.build();
    doc
}

fn schema_ref(name: &str) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(name))
}

fn column_schema(column: &ColumnDef) -> RefOr<Schema> {
    let schema = ObjectBuilder::new().description(Some(column.description));
    let schema = match column.ty {
        ColumnType::Integer => schema
            .schema_type(Type::Integer)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::Int32))),
        ColumnType::Text => schema.schema_type(Type::String),
        ColumnType::Timestamp => schema
            .schema_type(Type::String)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::DateTime))),
    };
    schema.build().into()
}

/// Request body. Every column is required on create; none on update.
fn input_body(entity: &EntityDef, all_required: bool) -> RequestBody {
    let mut schema = ObjectBuilder::new().schema_type(Type::Object);
    for c in entity.columns {
        schema = schema.property(c.name, column_schema(c));
        if all_required {
            schema = schema.required(c.name);
        }
    }
    RequestBodyBuilder::new()
        .required(Some(Required::True))
        .content("application/json", ContentBuilder::new().schema(Some(schema.build())).build())
        .build()
}

fn json_response(description: &str, schema: RefOr<Schema>) -> Response {
    ResponseBuilder::new()
        .description(description)
        .content("application/json", ContentBuilder::new().schema(Some(schema)).build())
        .build()
}

fn error_response(description: &str) -> Response {
    json_response(description, schema_ref("ErrorBody"))
}

fn id_parameter(entity: &EntityDef) -> Parameter {
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .description(Some(format!("{} of the {}", entity.pk, entity.label)))
        .schema(Some(
            ObjectBuilder::new()
                .schema_type(Type::Integer)
                .format(Some(SchemaFormat::KnownFormat(KnownFormat::Int32)))
                .minimum(Some(1)),
        ))
        .build()
}

fn query_parameter(name: &str, schema: RefOr<Schema>) -> Parameter {
    ParameterBuilder::new()
        .name(name)
        .parameter_in(ParameterIn::Query)
        .required(Required::False)
        .schema(Some(schema))
        .build()
}

fn collection_path(entity: &EntityDef) -> utoipa::openapi::PathItem {
    let mut list = OperationBuilder::new()
        .tag(entity.tag)
        .summary(Some(format!("List active {}s", entity.label)));
    for c in entity.columns {
        list = list.parameter(query_parameter(c.name, column_schema(c)));
    }
    for name in ["limit", "offset"] {
        let paging = ObjectBuilder::new().schema_type(Type::Integer).minimum(Some(0));
        list = list.parameter(query_parameter(name, paging.build().into()));
    }
    let list = list
        .response(
            "200",
            json_response(
                &format!("All active {}s", entity.label),
                Schema::Array(Array::new(schema_ref(entity.schema_name))).into(),
            ),
        )
        .response("400", error_response("Malformed filter"))
        .response("500", error_response("Store failure"))
        .build();

    let create = OperationBuilder::new()
        .tag(entity.tag)
        .summary(Some(format!("Create a {}", entity.label)))
        .request_body(Some(input_body(entity, true)))
        .response(
            "201",
            json_response(&format!("{} created", entity.label), schema_ref(entity.schema_name)),
        )
        .response("400", error_response("Missing or invalid fields, or duplicate"))
        .response("404", error_response("Referenced record not found"))
        .response("500", error_response("Store failure"))
        .build();

    PathItemBuilder::new()
        .operation(HttpMethod::Get, list)
        .operation(HttpMethod::Post, create)
        .build()
}

fn update_operation(entity: &EntityDef) -> Operation {
    OperationBuilder::new()
        .tag(entity.tag)
        .summary(Some(format!("Update a {}", entity.label)))
        .parameter(id_parameter(entity))
        .request_body(Some(input_body(entity, false)))
        .response("200", json_response(&format!("The {}", entity.label), schema_ref(entity.schema_name)))
        .response("400", error_response("Invalid id or fields"))
        .response("404", error_response("Not found"))
        .response("500", error_response("Store failure"))
        .build()
}

fn item_path(entity: &EntityDef) -> utoipa::openapi::PathItem {
    let read = OperationBuilder::new()
        .tag(entity.tag)
        .summary(Some(format!("Get a {} by id", entity.label)))
        .parameter(id_parameter(entity))
        .response("200", json_response(&format!("The {}", entity.label), schema_ref(entity.schema_name)))
        .response("400", error_response("Invalid id"))
        .response("404", error_response("Not found"))
        .response("500", error_response("Store failure"))
        .build();

    let delete = OperationBuilder::new()
        .tag(entity.tag)
        .summary(Some(format!("Delete a {} and its dependents", entity.label)))
        .parameter(id_parameter(entity))
        .response("200", json_response("Deleted", schema_ref("MessageBody")))
        .response("400", error_response("Invalid id"))
        .response("404", error_response("Not found"))
        .response("500", error_response("Store failure"))
        .build();

    PathItemBuilder::new()
        .operation(HttpMethod::Get, read)
        .operation(HttpMethod::Put, update_operation(entity))
        .operation(HttpMethod::Patch, update_operation(entity))
        .operation(HttpMethod::Delete, delete)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc_json() -> Value {
        serde_json::to_value(api_doc("/api")).unwrap()
    }

    #[test]
    fn every_entity_has_both_paths() {
        let doc = api_doc("/api");
        assert_eq!(doc.paths.paths.len(), MODEL.len() * 2);
        for p in ["/api/roles", "/api/usuarios/{id}", "/api/vehiculos", "/api/ventas/{id}", "/api/citas"] {
            assert!(doc.paths.paths.contains_key(p), "{p}");
        }
        let item = &doc.paths.paths["/api/citas/{id}"];
        assert!(item.patch.is_some());
        assert!(item.post.is_none());
    }

    #[test]
    fn create_body_requires_every_column() {
        let doc = doc_json();
        let schema = &doc["paths"]["/api/roles"]["post"]["requestBody"]["content"]["application/json"]["schema"];
        assert_eq!(schema["required"], json!(["nombre_rol", "descripcion"]));
        assert_eq!(schema["properties"]["nombre_rol"]["type"], "string");
        let update = &doc["paths"]["/api/roles/{id}"]["put"]["requestBody"]["content"]["application/json"]["schema"];
        assert!(update.get("required").is_none());
    }

    #[test]
    fn list_takes_column_filters_and_paging() {
        let doc = doc_json();
        let params = doc["paths"]["/api/ventas"]["get"]["parameters"].as_array().unwrap();
        let names: Vec<&str> = params.iter().filter_map(|p| p["name"].as_str()).collect();
        assert_eq!(
            names,
            vec!["fecha", "precio_final", "usuario_id", "vehiculo_id", "estado_venta", "limit", "offset"]
        );
        assert_eq!(params[0]["schema"]["format"], "date-time");
        let items = &doc["paths"]["/api/ventas"]["get"]["responses"]["200"]["content"]["application/json"]["schema"];
        assert_eq!(items["items"]["$ref"], "#/components/schemas/Sale");
    }

    #[test]
    fn components_include_records() {
        let doc = doc_json();
        let schemas = doc["components"]["schemas"].as_object().unwrap();
        for name in ["Role", "User", "Vehicle", "Sale", "Appointment", "ErrorBody"] {
            assert!(schemas.contains_key(name), "{name}");
        }
        assert_eq!(doc["info"]["title"], "Car dealership API");
    }
}
