//! Drives a small in-memory provider through configure, plan and apply

#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tfplug::data_source::{
    DataSource, DataSourceSchemaRequest, DataSourceSchemaResponse, ReadDataSourceRequest,
    ReadDataSourceResponse, ValidateDataSourceConfigRequest,
};
use tfplug::defaults::StaticDefault;
use tfplug::plan_modifier::{RequiresReplace, UseStateForUnknown};
use tfplug::provider::{
    downcast_provider_data, ConfigureProviderRequest, ConfigureProviderResponse,
    DataSourceFactory, ProviderData, ResourceFactory,
};
use tfplug::resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest,
    DeleteResourceResponse, ImportResourceStateRequest, PlanResourceChangeRequest,
    ReadResourceRequest, ReadResourceResponse, ResourceSchemaRequest, ResourceSchemaResponse,
    UpdateResourceRequest, UpdateResourceResponse, ValidateResourceConfigRequest,
};
use tfplug::validator::StringOneOf;
use tfplug::{
    AttributeBuilder, AttributePath, Context, Diagnostic, DynamicValue, Provider, Resource,
    Schema, SchemaBuilder, TfplugError,
};

#[derive(Clone, Default)]
struct Store {
    notes: Arc<Mutex<HashMap<String, (String, String)>>>,
    next_id: Arc<AtomicU64>,
}

struct NotesProvider;

#[async_trait]
impl Provider for NotesProvider {
    fn type_name(&self) -> &str {
        "notes"
    }

    async fn schema(&self, _ctx: Context) -> Schema {
        SchemaBuilder::new()
            .attribute(AttributeBuilder::string("prefix").optional().build())
            .build()
    }

    async fn configure(
        &self,
        _ctx: Context,
        _request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        ConfigureProviderResponse {
            diagnostics: Vec::new(),
            provider_data: Some(Arc::new(Store::default())),
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut factories: HashMap<String, ResourceFactory> = HashMap::new();
        factories.insert(
            "notes_note".to_string(),
            Box::new(|data: &ProviderData| {
                let store = downcast_provider_data::<Store>(data)?;
                Ok(Box::new(NoteResource { store }) as Box<dyn Resource>)
            }),
        );
        factories
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut factories: HashMap<String, DataSourceFactory> = HashMap::new();
        factories.insert(
            "notes_note".to_string(),
            Box::new(|data: &ProviderData| {
                let store = downcast_provider_data::<Store>(data)?;
                Ok(Box::new(NoteDataSource { store }) as Box<dyn DataSource>)
            }),
        );
        factories
    }

    fn resource_schemas(&self) -> HashMap<String, Schema> {
        HashMap::from([("notes_note".to_string(), note_schema())])
    }

    fn data_source_schemas(&self) -> HashMap<String, Schema> {
        HashMap::from([("notes_note".to_string(), note_data_schema())])
    }
}

fn note_schema() -> Schema {
    SchemaBuilder::new()
        .attribute(
            AttributeBuilder::string("id")
                .computed()
                .plan_modifier(UseStateForUnknown)
                .build(),
        )
        .attribute(AttributeBuilder::string("text").required().build())
        .attribute(
            AttributeBuilder::string("kind")
                .optional()
                .default(StaticDefault::string("plain"))
                .validator(StringOneOf::new(["plain", "todo"]))
                .plan_modifier(RequiresReplace)
                .build(),
        )
        .build()
}

fn note_data_schema() -> Schema {
    SchemaBuilder::new()
        .attribute(AttributeBuilder::string("id").required().build())
        .attribute(AttributeBuilder::string("text").computed().build())
        .build()
}

struct NoteResource {
    store: Store,
}

impl NoteResource {
    fn state(id: &str, text: &str, kind: &str) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_string(&AttributePath::new("id"), id.to_string()).unwrap();
        state.set_string(&AttributePath::new("text"), text.to_string()).unwrap();
        state.set_string(&AttributePath::new("kind"), kind.to_string()).unwrap();
        state
    }
}

#[async_trait]
impl Resource for NoteResource {
    fn type_name(&self) -> &str {
        "notes_note"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(note_schema())
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let text = request.planned_state.get_string(&AttributePath::new("text")).unwrap();
        let kind = request.planned_state.get_string(&AttributePath::new("kind")).unwrap();
        let id = format!("note-{}", self.store.next_id.fetch_add(1, Ordering::SeqCst));

        self.store
            .notes
            .lock()
            .unwrap()
            .insert(id.clone(), (text.clone(), kind.clone()));

        CreateResourceResponse {
            new_state: Self::state(&id, &text, &kind),
            diagnostics: Vec::new(),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let id = request.current_state.get_string(&AttributePath::new("id")).unwrap();
        let note = self.store.notes.lock().unwrap().get(&id).cloned();

        ReadResourceResponse {
            new_state: note.map(|(text, kind)| Self::state(&id, &text, &kind)),
            diagnostics: Vec::new(),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let id = request.prior_state.get_string(&AttributePath::new("id")).unwrap();
        let text = request.planned_state.get_string(&AttributePath::new("text")).unwrap();
        let kind = request.planned_state.get_string(&AttributePath::new("kind")).unwrap();

        self.store
            .notes
            .lock()
            .unwrap()
            .insert(id.clone(), (text.clone(), kind.clone()));

        UpdateResourceResponse {
            new_state: Self::state(&id, &text, &kind),
            diagnostics: Vec::new(),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let id = request.prior_state.get_string(&AttributePath::new("id")).unwrap();
        self.store.notes.lock().unwrap().remove(&id);
        DeleteResourceResponse {
            diagnostics: Vec::new(),
        }
    }
}

struct NoteDataSource {
    store: Store,
}

#[async_trait]
impl DataSource for NoteDataSource {
    fn type_name(&self) -> &str {
        "notes_note"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        DataSourceSchemaResponse::new(note_data_schema())
    }

    async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let id = request.config.get_string(&AttributePath::new("id")).unwrap();
        let mut state = request.config.clone();
        let mut diagnostics = Vec::new();

        match self.store.notes.lock().unwrap().get(&id) {
            Some((text, _)) => {
                state.set_string(&AttributePath::new("text"), text.clone()).unwrap();
            }
            None => diagnostics.push(Diagnostic::error("Not Found", format!("no note {}", id))),
        }

        ReadDataSourceResponse { state, diagnostics }
    }
}

fn config(pairs: &[(&str, &str)]) -> DynamicValue {
    let mut value = DynamicValue::object();
    for (k, v) in pairs {
        value.set_string(&AttributePath::new(k), v.to_string()).unwrap();
    }
    value
}

async fn configured() -> ProviderData {
    let response = NotesProvider
        .configure(
            Context::new(),
            ConfigureProviderRequest {
                terraform_version: "1.9.0".to_string(),
                config: DynamicValue::object(),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());
    response.provider_data.unwrap()
}

#[test]
fn factories_require_provider_data() {
    let err = NotesProvider.create_resource("notes_note", None).err().unwrap();
    assert!(matches!(err, TfplugError::ProviderNotConfigured));
    assert_eq!(err.to_string(), "Provider not configured");
}

#[tokio::test]
async fn factories_reject_unknown_names() {
    let data = configured().await;

    let err = NotesProvider.create_resource("notes_missing", Some(&data)).err().unwrap();
    assert_eq!(err.to_string(), "Unknown resource: notes_missing");

    let err = NotesProvider.create_data_source("notes_missing", Some(&data)).err().unwrap();
    assert_eq!(err.to_string(), "Unknown data source: notes_missing");
}

#[tokio::test]
async fn factories_reject_foreign_provider_data() {
    let data: ProviderData = Arc::new("not a store".to_string());
    let err = NotesProvider.create_resource("notes_note", Some(&data)).err().unwrap();
    assert!(matches!(err, TfplugError::ProviderNotConfigured));
}

#[test]
fn schemas_are_available_before_configure() {
    let schemas = NotesProvider.resource_schemas();
    assert!(schemas["notes_note"].attribute("text").unwrap().required);
    assert!(NotesProvider.data_source_schemas().contains_key("notes_note"));
}

#[tokio::test]
async fn provider_validate_accepts_optional_attributes() {
    let cfg = config(&[("prefix", "x")]);
    assert!(NotesProvider.validate(Context::new(), &cfg).await.is_empty());
    assert!(NotesProvider
        .validate(Context::new(), &DynamicValue::object())
        .await
        .is_empty());
}

#[tokio::test]
async fn resource_validate_reports_schema_errors() {
    let data = configured().await;
    let resource = NotesProvider.create_resource("notes_note", Some(&data)).unwrap();

    let response = resource
        .validate(
            Context::new(),
            ValidateResourceConfigRequest {
                type_name: "notes_note".to_string(),
                config: config(&[("kind", "poem")]),
            },
        )
        .await;

    let summaries: Vec<_> = response.diagnostics.iter().map(|d| d.summary.as_str()).collect();
    assert_eq!(summaries.len(), 2);
    assert!(summaries.contains(&"Missing required argument"));
    assert!(summaries.contains(&"Invalid Attribute Value Match"));
}

#[tokio::test]
async fn full_lifecycle_through_default_plan() {
    let data = configured().await;
    let resource = NotesProvider.create_resource("notes_note", Some(&data)).unwrap();
    let ctx = Context::new();

    // create
    let cfg = config(&[("text", "hello")]);
    let plan = resource
        .plan(
            ctx.clone(),
            PlanResourceChangeRequest {
                type_name: "notes_note".to_string(),
                prior_state: DynamicValue::null(),
                config: cfg.clone(),
            },
        )
        .await;
    assert!(plan.diagnostics.is_empty());
    assert!(plan.requires_replace.is_empty());
    assert_eq!(
        plan.planned_state.get_string(&AttributePath::new("kind")).unwrap(),
        "plain"
    );
    assert!(plan.planned_state.get(&AttributePath::new("id")).unwrap().is_unknown());

    let created = resource
        .create(
            ctx.clone(),
            CreateResourceRequest {
                type_name: "notes_note".to_string(),
                planned_state: plan.planned_state,
                config: cfg.clone(),
            },
        )
        .await;
    assert!(created.diagnostics.is_empty());
    let state = created.new_state;
    let id = state.get_string(&AttributePath::new("id")).unwrap();

    // no-op plan keeps state
    let plan = resource
        .plan(
            ctx.clone(),
            PlanResourceChangeRequest {
                type_name: "notes_note".to_string(),
                prior_state: state.clone(),
                config: cfg,
            },
        )
        .await;
    assert_eq!(plan.planned_state, state);

    // in-place update keeps the id
    let cfg = config(&[("text", "hello again")]);
    let plan = resource
        .plan(
            ctx.clone(),
            PlanResourceChangeRequest {
                type_name: "notes_note".to_string(),
                prior_state: state.clone(),
                config: cfg.clone(),
            },
        )
        .await;
    assert!(plan.requires_replace.is_empty());
    assert_eq!(plan.planned_state.get_string(&AttributePath::new("id")).unwrap(), id);

    let updated = resource
        .update(
            ctx.clone(),
            UpdateResourceRequest {
                type_name: "notes_note".to_string(),
                prior_state: state.clone(),
                planned_state: plan.planned_state,
                config: cfg,
            },
        )
        .await;
    let state = updated.new_state;
    assert_eq!(
        state.get_string(&AttributePath::new("text")).unwrap(),
        "hello again"
    );

    // changing kind forces replacement
    let plan = resource
        .plan(
            ctx.clone(),
            PlanResourceChangeRequest {
                type_name: "notes_note".to_string(),
                prior_state: state.clone(),
                config: config(&[("text", "hello again"), ("kind", "todo")]),
            },
        )
        .await;
    assert_eq!(plan.requires_replace, vec![AttributePath::new("kind")]);

    // data source sees the note
    let data_source = NotesProvider.create_data_source("notes_note", Some(&data)).unwrap();
    let read = data_source
        .read(
            ctx.clone(),
            ReadDataSourceRequest {
                type_name: "notes_note".to_string(),
                config: config(&[("id", id.as_str())]),
            },
        )
        .await;
    assert!(read.diagnostics.is_empty());
    assert_eq!(
        read.state.get_string(&AttributePath::new("text")).unwrap(),
        "hello again"
    );

    // delete, then read drops it from state
    let deleted = resource
        .delete(
            ctx.clone(),
            DeleteResourceRequest {
                type_name: "notes_note".to_string(),
                prior_state: state.clone(),
            },
        )
        .await;
    assert!(deleted.diagnostics.is_empty());

    let read = resource
        .read(
            ctx,
            ReadResourceRequest {
                type_name: "notes_note".to_string(),
                current_state: state,
            },
        )
        .await;
    assert!(read.new_state.is_none());
}

#[tokio::test]
async fn import_is_unsupported_by_default() {
    let data = configured().await;
    let resource = NotesProvider.create_resource("notes_note", Some(&data)).unwrap();

    let response = resource
        .import_state(
            Context::new(),
            ImportResourceStateRequest {
                type_name: "notes_note".to_string(),
                id: "note-0".to_string(),
            },
        )
        .await;

    assert!(response.imported_resources.is_empty());
    assert_eq!(response.diagnostics[0].summary, "Resource Import Not Implemented");
}

#[tokio::test]
async fn data_source_validate_uses_schema() {
    let data = configured().await;
    let data_source = NotesProvider.create_data_source("notes_note", Some(&data)).unwrap();

    let response = data_source
        .validate(
            Context::new(),
            ValidateDataSourceConfigRequest {
                type_name: "notes_note".to_string(),
                config: config(&[("text", "x")]),
            },
        )
        .await;

    let summaries: Vec<_> = response.diagnostics.iter().map(|d| d.summary.as_str()).collect();
    assert!(summaries.contains(&"Missing required argument"));
    assert!(summaries.contains(&"Invalid Configuration for Read-Only Attribute"));
}

#[tokio::test]
async fn resources_from_one_provider_data_share_the_store() {
    let data = configured().await;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let resource = NotesProvider.create_resource("notes_note", Some(&data)).unwrap();
            tokio::spawn(async move {
                let text = format!("note {}", i);
                let cfg = config(&[("text", text.as_str())]);
                let plan = resource
                    .plan(
                        Context::new(),
                        PlanResourceChangeRequest {
                            type_name: "notes_note".to_string(),
                            prior_state: DynamicValue::null(),
                            config: cfg.clone(),
                        },
                    )
                    .await;
                resource
                    .create(
                        Context::new(),
                        CreateResourceRequest {
                            type_name: "notes_note".to_string(),
                            planned_state: plan.planned_state,
                            config: cfg,
                        },
                    )
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().diagnostics.is_empty());
    }

    let store = downcast_provider_data::<Store>(&data).unwrap();
    let notes = store.notes.lock().unwrap();
    assert_eq!(notes.len(), 8);
    assert!(notes.values().all(|(_, kind)| kind == "plain"));
}
