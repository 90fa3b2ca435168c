//! Thought resources against a mock Tama API

#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tama::api::Client;
use tama::resources::{DelegatedThoughtResource, ModularThoughtResource};
use tfplug::resource::{
    CreateResourceRequest, PlanResourceChangeRequest, ReadResourceRequest, Resource,
    UpdateResourceRequest,
};
use tfplug::{AttributePath, Context, Dynamic, DynamicValue};

fn client(server: &ServerGuard) -> Arc<Client> {
    Arc::new(Client::new(&server.url(), "test-key", Duration::from_secs(5)).unwrap())
}

fn parameters_path() -> AttributePath {
    AttributePath::new("module").index(0).attribute("parameters")
}

fn target_path() -> AttributePath {
    AttributePath::new("delegation")
        .index(0)
        .attribute("target_thought_id")
}

fn modular_plan(parameters: &str) -> DynamicValue {
    let mut plan = DynamicValue::object();
    plan.set_string(&AttributePath::new("chain_id"), "chain-1".into())
        .unwrap();
    plan.set_string(&AttributePath::new("relation"), "description".into())
        .unwrap();
    plan.set_null(&AttributePath::new("output_class_id"))
        .unwrap();
    plan.mark_unknown(&AttributePath::new("id")).unwrap();
    plan.mark_unknown(&AttributePath::new("index")).unwrap();
    plan.mark_unknown(&AttributePath::new("provision_state"))
        .unwrap();
    plan.set_string(
        &AttributePath::new("module").index(0).attribute("reference"),
        "tama/agentic/generate".into(),
    )
    .unwrap();
    plan.set_string(&parameters_path(), parameters.into())
        .unwrap();
    plan
}

fn delegated_plan(target: &str) -> DynamicValue {
    let mut plan = DynamicValue::object();
    plan.set_string(&AttributePath::new("chain_id"), "chain-1".into())
        .unwrap();
    plan.set_string(&AttributePath::new("relation"), "routing".into())
        .unwrap();
    plan.mark_unknown(&AttributePath::new("id")).unwrap();
    plan.mark_unknown(&AttributePath::new("index")).unwrap();
    plan.set_string(&target_path(), target.into()).unwrap();
    plan
}

fn thought_body(id: &str, parameters: serde_json::Value) -> String {
    json!({
        "data": {
            "id": id,
            "chain_id": "chain-1",
            "relation": "description",
            "index": 0,
            "provision_state": "active",
            "module": {
                "reference": "tama/agentic/generate",
                "parameters": parameters
            }
        }
    })
    .to_string()
}

fn create(planned_state: DynamicValue, type_name: &str) -> CreateResourceRequest {
    CreateResourceRequest {
        type_name: type_name.to_string(),
        config: planned_state.clone(),
        planned_state,
    }
}

#[tokio::test]
async fn float_threshold_survives_create() {
    let mut server = Server::new_async().await;
    let declared = r#"{"relation": "description", "threshold": 0.9}"#;

    let create_mock = server
        .mock("POST", "/provision/chains/chain-1/thoughts")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "thought": {
                "relation": "description",
                "module": {
                    "reference": "tama/agentic/generate",
                    "parameters": {"relation": "description", "threshold": 0.9}
                }
            }
        })))
        .with_status(201)
        .with_body(thought_body(
            "thought-1",
            json!({"relation": "description", "threshold": "0.9"}),
        ))
        .expect(1)
        .create_async()
        .await;

    let resource = ModularThoughtResource::new(client(&server));
    let response = resource
        .create(Context::new(), create(modular_plan(declared), "tama_modular_thought"))
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(
        response.new_state.get_string(&parameters_path()).unwrap(),
        declared
    );
    assert_eq!(
        response.new_state.get_string(&AttributePath::new("id")).unwrap(),
        "thought-1"
    );
    assert_eq!(
        response
            .new_state
            .get_number(&AttributePath::new("index"))
            .unwrap(),
        0.0
    );
    create_mock.assert_async().await;
}

#[tokio::test]
async fn server_value_wins_when_it_really_differs() {
    let mut server = Server::new_async().await;

    let _create_mock = server
        .mock("POST", "/provision/chains/chain-1/thoughts")
        .with_status(201)
        .with_body(thought_body("thought-2", json!({"count": "2"})))
        .create_async()
        .await;

    let resource = ModularThoughtResource::new(client(&server));
    let response = resource
        .create(
            Context::new(),
            create(modular_plan(r#"{"count": 1}"#), "tama_modular_thought"),
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(
        response.new_state.get_string(&parameters_path()).unwrap(),
        r#"{"count":"2"}"#
    );
}

#[tokio::test]
async fn invalid_parameters_never_reach_the_api() {
    let mut server = Server::new_async().await;

    let create_mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let resource = ModularThoughtResource::new(client(&server));
    let plan = modular_plan(r#"{"invalid": json}"#);
    let response = resource
        .create(Context::new(), create(plan.clone(), "tama_modular_thought"))
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert_eq!(response.diagnostics[0].summary, "Invalid Parameters");
    assert_eq!(response.diagnostics[0].attribute, Some(parameters_path()));
    assert_eq!(response.new_state, plan);
    create_mock.assert_async().await;
}

#[tokio::test]
async fn invalid_parameters_fail_validation() {
    let server = Server::new_async().await;
    let resource = ModularThoughtResource::new(client(&server));

    let response = resource
        .validate(
            Context::new(),
            tfplug::resource::ValidateResourceConfigRequest {
                type_name: "tama_modular_thought".to_string(),
                config: modular_plan("[1, 2]"),
            },
        )
        .await;

    assert!(response
        .diagnostics
        .iter()
        .any(|d| d.summary == "Invalid Parameters"));
}

#[tokio::test]
async fn reformatted_parameters_plan_no_change() {
    let server = Server::new_async().await;
    let resource = ModularThoughtResource::new(client(&server));

    let mut prior = modular_plan(r#"{"threshold":0.9,"relation":"description"}"#);
    prior
        .set_string(&AttributePath::new("id"), "thought-1".into())
        .unwrap();
    prior
        .set_number(&AttributePath::new("index"), 0.0)
        .unwrap();
    prior
        .set_string(&AttributePath::new("provision_state"), "active".into())
        .unwrap();

    let mut config = modular_plan("{\n  \"relation\": \"description\",\n  \"threshold\": 0.9\n}");
    config.set_null(&AttributePath::new("id")).unwrap();
    config.set_null(&AttributePath::new("index")).unwrap();
    config
        .set_null(&AttributePath::new("provision_state"))
        .unwrap();

    let response = resource
        .plan(
            Context::new(),
            PlanResourceChangeRequest {
                type_name: "tama_modular_thought".to_string(),
                prior_state: prior.clone(),
                config,
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert!(response.requires_replace.is_empty());
    assert_eq!(response.planned_state, prior);
}

#[tokio::test]
async fn refresh_keeps_declared_spelling() {
    let mut server = Server::new_async().await;

    let _read_mock = server
        .mock("GET", "/provision/thoughts/thought-1")
        .with_status(200)
        .with_body(thought_body("thought-1", json!({"threshold": "0.9"})))
        .create_async()
        .await;

    let mut state = modular_plan(r#"{"threshold": 0.9}"#);
    state
        .set_string(&AttributePath::new("id"), "thought-1".into())
        .unwrap();

    let resource = ModularThoughtResource::new(client(&server));
    let response = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "tama_modular_thought".to_string(),
                current_state: state,
            },
        )
        .await;

    let new_state = response.new_state.unwrap();
    assert_eq!(
        new_state.get_string(&parameters_path()).unwrap(),
        r#"{"threshold": 0.9}"#
    );
}

#[tokio::test]
async fn deleted_thought_leaves_state() {
    let mut server = Server::new_async().await;

    let _read_mock = server
        .mock("GET", "/provision/thoughts/thought-gone")
        .with_status(404)
        .with_body(r#"{"error":"not found"}"#)
        .create_async()
        .await;

    let mut state = modular_plan("{}");
    state
        .set_string(&AttributePath::new("id"), "thought-gone".into())
        .unwrap();

    let resource = ModularThoughtResource::new(client(&server));
    let response = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "tama_modular_thought".to_string(),
                current_state: state,
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    assert!(response.new_state.is_none());
}

#[tokio::test]
async fn delegating_to_a_delegated_thought_is_rejected() {
    let mut server = Server::new_async().await;

    let _target_mock = server
        .mock("GET", "/provision/thoughts/thought-delegated")
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "id": "thought-delegated",
                    "chain_id": "chain-0",
                    "relation": "description",
                    "delegation": {"target_thought_id": "thought-1"}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let create_mock = server
        .mock("POST", "/provision/chains/chain-1/thoughts")
        .expect(0)
        .create_async()
        .await;

    let resource = DelegatedThoughtResource::new(client(&server));
    let response = resource
        .create(
            Context::new(),
            create(delegated_plan("thought-delegated"), "tama_delegated_thought"),
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    let diag = &response.diagnostics[0];
    assert_eq!(diag.summary, "Invalid Delegation Target");
    assert!(diag
        .detail
        .contains("must reference a modular thought resource"));
    assert_eq!(diag.attribute, Some(target_path()));
    create_mock.assert_async().await;
}

#[tokio::test]
async fn delegating_to_a_modular_thought_creates() {
    let mut server = Server::new_async().await;

    let _target_mock = server
        .mock("GET", "/provision/thoughts/thought-1")
        .with_status(200)
        .with_body(thought_body("thought-1", json!({})))
        .create_async()
        .await;
    let create_mock = server
        .mock("POST", "/provision/chains/chain-1/thoughts")
        .match_body(Matcher::Json(json!({
            "thought": {
                "relation": "routing",
                "delegation": {"target_thought_id": "thought-1"}
            }
        })))
        .with_status(201)
        .with_body(
            json!({
                "data": {
                    "id": "thought-9",
                    "chain_id": "chain-1",
                    "relation": "routing",
                    "index": 1,
                    "delegation": {"target_thought_id": "thought-1"},
                    "provision_state": "active"
                }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let resource = DelegatedThoughtResource::new(client(&server));
    let response = resource
        .create(
            Context::new(),
            create(delegated_plan("thought-1"), "tama_delegated_thought"),
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(
        response.new_state.get_string(&AttributePath::new("id")).unwrap(),
        "thought-9"
    );
    assert_eq!(
        response.new_state.get_string(&target_path()).unwrap(),
        "thought-1"
    );
    create_mock.assert_async().await;
}

#[tokio::test]
async fn update_checks_the_new_target() {
    let mut server = Server::new_async().await;

    let _target_mock = server
        .mock("GET", "/provision/thoughts/thought-delegated")
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "id": "thought-delegated",
                    "chain_id": "chain-0",
                    "relation": "description",
                    "delegation": {"target_thought_id": "thought-1"}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let update_mock = server
        .mock("PATCH", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut prior = delegated_plan("thought-1");
    prior
        .set_string(&AttributePath::new("id"), "thought-9".into())
        .unwrap();
    let mut planned = prior.clone();
    planned
        .set_string(&target_path(), "thought-delegated".into())
        .unwrap();

    let resource = DelegatedThoughtResource::new(client(&server));
    let response = resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "tama_delegated_thought".to_string(),
                config: planned.clone(),
                prior_state: prior.clone(),
                planned_state: planned,
            },
        )
        .await;

    assert_eq!(response.diagnostics[0].summary, "Invalid Delegation Target");
    assert_eq!(response.new_state, prior);
    assert!(matches!(
        response.new_state.get(&target_path()).unwrap(),
        Dynamic::String(s) if s == "thought-1"
    ));
    update_mock.assert_async().await;
}
