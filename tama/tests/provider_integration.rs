//! Provider configuration and resource lifecycles through the registration table

#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

use mockito::{Matcher, Server};
use serde_json::json;
use serial_test::serial;
use tama::TamaProvider;
use tfplug::data_source::ReadDataSourceRequest;
use tfplug::provider::{ConfigureProviderRequest, ProviderData};
use tfplug::resource::{
    CreateResourceRequest, DeleteResourceRequest, ImportResourceStateRequest,
    ReadResourceRequest, UpdateResourceRequest,
};
use tfplug::{AttributePath, Context, DynamicValue, Provider};

async fn configured(url: &str) -> (TamaProvider, ProviderData) {
    std::env::remove_var("TAMA_BASE_URL");
    std::env::remove_var("TAMA_API_KEY");
    std::env::remove_var("TAMA_TIMEOUT");

    let mut config = DynamicValue::object();
    config
        .set_string(&AttributePath::new("base_url"), url.to_string())
        .unwrap();
    config
        .set_string(&AttributePath::new("api_key"), "test-key".into())
        .unwrap();
    config
        .set_number(&AttributePath::new("timeout"), 5.0)
        .unwrap();

    let provider = TamaProvider::new();
    let response = provider
        .configure(
            Context::new(),
            ConfigureProviderRequest {
                terraform_version: "1.9.0".to_string(),
                config,
            },
        )
        .await;
    assert!(
        !tfplug::types::has_errors(&response.diagnostics),
        "{:?}",
        response.diagnostics
    );
    let data = response.provider_data.unwrap();
    (provider, data)
}

fn space_plan(name: &str) -> DynamicValue {
    let mut plan = DynamicValue::object();
    plan.mark_unknown(&AttributePath::new("id")).unwrap();
    plan.set_string(&AttributePath::new("name"), name.to_string())
        .unwrap();
    plan.set_string(&AttributePath::new("type"), "root".into())
        .unwrap();
    plan.mark_unknown(&AttributePath::new("slug")).unwrap();
    plan.mark_unknown(&AttributePath::new("provision_state"))
        .unwrap();
    plan
}

fn space_body(name: &str, slug: &str) -> String {
    json!({
        "data": {
            "id": "space-1",
            "name": name,
            "type": "root",
            "slug": slug,
            "provision_state": "active"
        }
    })
    .to_string()
}

#[tokio::test]
#[serial]
async fn space_lifecycle() {
    let mut server = Server::new_async().await;
    let (provider, data) = configured(&server.url()).await;
    let space = provider.create_resource("tama_space", Some(&data)).unwrap();

    let create_mock = server
        .mock("POST", "/provision/spaces")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::Json(json!({"space": {"name": "core", "type": "root"}})))
        .with_status(201)
        .with_body(space_body("core", "core"))
        .expect(1)
        .create_async()
        .await;

    let plan = space_plan("core");
    let created = space
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "tama_space".to_string(),
                planned_state: plan.clone(),
                config: plan,
            },
        )
        .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let state = created.new_state;
    assert_eq!(state.get_string(&AttributePath::new("id")).unwrap(), "space-1");
    assert_eq!(state.get_string(&AttributePath::new("slug")).unwrap(), "core");
    create_mock.assert_async().await;

    let update_mock = server
        .mock("PATCH", "/provision/spaces/space-1")
        .match_body(Matcher::PartialJson(json!({"space": {"name": "renamed"}})))
        .with_status(200)
        .with_body(space_body("renamed", "renamed"))
        .expect(1)
        .create_async()
        .await;

    let mut planned = state.clone();
    planned
        .set_string(&AttributePath::new("name"), "renamed".into())
        .unwrap();
    planned.mark_unknown(&AttributePath::new("slug")).unwrap();
    let updated = space
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "tama_space".to_string(),
                prior_state: state,
                config: planned.clone(),
                planned_state: planned,
            },
        )
        .await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    assert_eq!(
        updated.new_state.get_string(&AttributePath::new("slug")).unwrap(),
        "renamed"
    );
    update_mock.assert_async().await;

    let read_mock = server
        .mock("GET", "/provision/spaces/space-1")
        .with_status(404)
        .with_body(r#"{"error":"not found"}"#)
        .expect(1)
        .create_async()
        .await;
    let read = space
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "tama_space".to_string(),
                current_state: updated.new_state.clone(),
            },
        )
        .await;
    assert!(read.diagnostics.is_empty());
    assert!(read.new_state.is_none());
    read_mock.assert_async().await;

    let delete_mock = server
        .mock("DELETE", "/provision/spaces/space-1")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;
    let deleted = space
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "tama_space".to_string(),
                prior_state: updated.new_state,
            },
        )
        .await;
    assert!(deleted.diagnostics.is_empty());
    delete_mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn failed_create_keeps_planned_state() {
    let mut server = Server::new_async().await;
    let (provider, data) = configured(&server.url()).await;
    let chain = provider.create_resource("tama_chain", Some(&data)).unwrap();

    let _create_mock = server
        .mock("POST", "/provision/spaces/space-1/chains")
        .with_status(422)
        .with_body(r#"{"errors":{"name":["has already been taken"]}}"#)
        .create_async()
        .await;

    let mut plan = DynamicValue::object();
    plan.set_string(&AttributePath::new("space_id"), "space-1".into())
        .unwrap();
    plan.set_string(&AttributePath::new("name"), "ingest".into())
        .unwrap();
    plan.mark_unknown(&AttributePath::new("id")).unwrap();

    let response = chain
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "tama_chain".to_string(),
                planned_state: plan.clone(),
                config: plan.clone(),
            },
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert_eq!(response.diagnostics[0].summary, "Client Error");
    assert!(response.diagnostics[0]
        .detail
        .starts_with("Unable to create chain, got error:"));
    assert!(response.diagnostics[0].detail.contains("has already been taken"));
    assert_eq!(response.new_state, plan);
}

#[tokio::test]
#[serial]
async fn sensitive_secret_is_kept_from_plan() {
    let mut server = Server::new_async().await;
    let (provider, data) = configured(&server.url()).await;
    let listener = provider
        .create_resource("tama_listener", Some(&data))
        .unwrap();

    let _create_mock = server
        .mock("POST", "/provision/spaces/space-1/listeners")
        .match_body(Matcher::PartialJson(
            json!({"listener": {"secret": "s3cret"}}),
        ))
        .with_status(201)
        .with_body(
            json!({
                "data": {
                    "id": "listener-1",
                    "space_id": "space-1",
                    "endpoint": "https://hooks.example.com/tama",
                    "provision_state": "active"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut plan = DynamicValue::object();
    plan.set_string(&AttributePath::new("space_id"), "space-1".into())
        .unwrap();
    plan.set_string(
        &AttributePath::new("endpoint"),
        "https://hooks.example.com/tama".into(),
    )
    .unwrap();
    plan.set_string(&AttributePath::new("secret"), "s3cret".into())
        .unwrap();

    let response = listener
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "tama_listener".to_string(),
                planned_state: plan.clone(),
                config: plan,
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(
        response.new_state.get_string(&AttributePath::new("secret")).unwrap(),
        "s3cret"
    );
    assert_eq!(
        response.new_state.get_string(&AttributePath::new("id")).unwrap(),
        "listener-1"
    );
}

#[tokio::test]
#[serial]
async fn class_data_source_reads_canonical_schema() {
    let mut server = Server::new_async().await;
    let (provider, data) = configured(&server.url()).await;
    let class = provider
        .create_data_source("tama_class", Some(&data))
        .unwrap();

    let _read_mock = server
        .mock("GET", "/provision/classes/class-1")
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "id": "class-1",
                    "space_id": "space-1",
                    "name": "entity",
                    "description": "An entity",
                    "schema": {"type": "object", "title": "entity", "description": "An entity"},
                    "provision_state": "active"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut config = DynamicValue::object();
    config
        .set_string(&AttributePath::new("id"), "class-1".into())
        .unwrap();
    let response = class
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: "tama_class".to_string(),
                config,
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(
        response
            .state
            .get_string(&AttributePath::new("schema_json"))
            .unwrap(),
        r#"{"description":"An entity","title":"entity","type":"object"}"#
    );
    assert_eq!(
        response.state.get_string(&AttributePath::new("name")).unwrap(),
        "entity"
    );
}

#[tokio::test]
#[serial]
async fn data_source_errors_name_the_entity() {
    let mut server = Server::new_async().await;
    let (provider, data) = configured(&server.url()).await;
    let prompt = provider
        .create_data_source("tama_prompt", Some(&data))
        .unwrap();

    let _read_mock = server
        .mock("GET", "/provision/prompts/prompt-404")
        .with_status(404)
        .create_async()
        .await;

    let mut config = DynamicValue::object();
    config
        .set_string(&AttributePath::new("id"), "prompt-404".into())
        .unwrap();
    let response = prompt
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: "tama_prompt".to_string(),
                config,
            },
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert!(response.diagnostics[0]
        .detail
        .starts_with("Unable to read prompt, got error:"));
}

#[tokio::test]
#[serial]
async fn import_copies_the_id() {
    let server = Server::new_async().await;
    let (provider, data) = configured(&server.url()).await;
    let node = provider.create_resource("tama_node", Some(&data)).unwrap();

    let response = node
        .import_state(
            Context::new(),
            ImportResourceStateRequest {
                type_name: "tama_node".to_string(),
                id: "node-7".to_string(),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    assert_eq!(response.imported_resources.len(), 1);
    assert_eq!(
        response.imported_resources[0]
            .state
            .get_string(&AttributePath::new("id"))
            .unwrap(),
        "node-7"
    );
}
