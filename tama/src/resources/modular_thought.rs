//! tama_modular_thought resource
//!
//! A thought that runs a module. `module[0].parameters` is a JSON object
//! string that is reconciled against what Tama echoes back: server values
//! win, but a stringified number or float the user wrote is kept as typed.

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    index_attribute, optional_attr, optional_index, parameters_to_send, parameters_to_store,
    parent_attribute, provision_state_attribute, read_response, required_attr, required_string,
    set_optional_number, set_optional_string, set_string, state_error, update_response,
};
use crate::api::perception::{Thought, ThoughtModule, ThoughtRequest};
use crate::api::Client;
use crate::json_params::{JsonObjectValidator, SemanticJsonEquality};
use async_trait::async_trait;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceSchemaRequest, ResourceSchemaResponse,
    UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::schema::{AttributeBuilder, NestedBlockBuilder, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

pub const TYPE_NAME: &str = "tama_modular_thought";

pub struct ModularThoughtResource {
    client: Arc<Client>,
}

fn reference_path() -> AttributePath {
    AttributePath::new("module").index(0).attribute("reference")
}

pub(crate) fn parameters_path() -> AttributePath {
    AttributePath::new("module").index(0).attribute("parameters")
}

impl ModularThoughtResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a Tama thought that runs a module")
            .attribute(id_attribute("thought"))
            .attribute(parent_attribute("chain_id", "The chain this thought belongs to"))
            .attribute(
                AttributeBuilder::string("relation")
                    .description("The relation this thought produces")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("output_class_id")
                    .description("The class the thought output is stored as")
                    .optional()
                    .build(),
            )
            .attribute(index_attribute())
            .attribute(provision_state_attribute())
            .block(
                NestedBlockBuilder::exactly_one("module")
                    .description("The module this thought runs")
                    .attribute(
                        AttributeBuilder::string("reference")
                            .description("Module reference, for example tama/agentic/generate")
                            .required()
                            .build(),
                    )
                    .attribute(
                        AttributeBuilder::string("parameters")
                            .description("Module parameters as a JSON object string")
                            .optional()
                            .computed()
                            .validator(JsonObjectValidator)
                            .plan_modifier(SemanticJsonEquality)
                            .build(),
                    )
                    .build(),
            )
            .build()
    }

    fn request_from(plan: &DynamicValue) -> Result<ThoughtRequest, Diagnostic> {
        // parse parameters first, a bad object must never reach the API
        let parameters = parameters_to_send(plan, &parameters_path())?;
        let reference = required_string(plan, &reference_path())?;

        Ok(ThoughtRequest {
            relation: required_attr(plan, "relation")?,
            output_class_id: optional_attr(plan, "output_class_id"),
            index: optional_index(plan, "index")?,
            module: Some(ThoughtModule {
                reference,
                parameters,
            }),
            delegation: None,
        })
    }

    fn state_from(
        base: &DynamicValue,
        declared: Option<String>,
        thought: &Thought,
    ) -> Result<DynamicValue, Diagnostic> {
        let server = thought.module.as_ref().and_then(|m| m.parameters.as_ref());
        let parameters = parameters_to_store(declared, server, &parameters_path())?;

        let mut state = base.clone();
        write_state(&mut state, thought, parameters).map_err(state_error)?;
        Ok(state)
    }

    async fn create_thought(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let chain_id = required_attr(plan, "chain_id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let thought = self
            .client
            .perception()
            .thoughts()
            .create(Some(&chain_id), &request)
            .await
            .map_err(|e| client_error("create", "thought", e))?;
        tracing::debug!("created modular thought {}", thought.id);

        Self::state_from(plan, plan.get_optional_string(&parameters_path()), &thought)
    }

    async fn read_thought(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().thoughts().get(&id).await;
        let Some(thought) = found(result, "thought", &id)? else {
            return Ok(None);
        };
        if !thought.is_modular() {
            tracing::warn!("thought {} is no longer modular", id);
        }

        let declared = current.get_optional_string(&parameters_path());
        Self::state_from(current, declared, &thought).map(Some)
    }

    async fn update_thought(
        &self,
        ctx: &Context,
        prior: &DynamicValue,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let id = required_attr(prior, "id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let thought = self
            .client
            .perception()
            .thoughts()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "thought", e))?;

        Self::state_from(plan, plan.get_optional_string(&parameters_path()), &thought)
    }

    async fn delete_thought(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().thoughts().delete(&id).await;
        deleted(result, "thought", &id)
    }
}

pub(crate) fn write_state(
    state: &mut DynamicValue,
    thought: &Thought,
    parameters: Option<String>,
) -> tfplug::Result<()> {
    set_string(state, "id", &thought.id)?;
    set_string(state, "chain_id", &thought.chain_id)?;
    set_string(state, "relation", &thought.relation)?;
    set_optional_string(
        state,
        &AttributePath::new("output_class_id"),
        thought.output_class_id.clone(),
    )?;
    set_optional_number(
        state,
        &AttributePath::new("index"),
        thought.index.map(|i| i as f64),
    )?;
    if let Some(module) = &thought.module {
        state.set_string(&reference_path(), module.reference.clone())?;
    }
    set_optional_string(state, &parameters_path(), parameters)?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        thought.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for ModularThoughtResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_thought(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_thought(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_thought(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_thought(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
