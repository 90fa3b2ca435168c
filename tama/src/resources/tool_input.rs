//! tama_thought_tool_input resource

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    parent_attribute, provision_state_attribute, read_response, required_attr, set_optional_string,
    set_string, state_error, update_response,
};
use crate::api::perception::{ToolInput, ToolInputRequest};
use crate::api::Client;
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
use tfplug::schema::{AttributeBuilder, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};
use tfplug::validator::StringOneOf;

pub const TYPE_NAME: &str = "tama_thought_tool_input";

pub struct ThoughtToolInputResource {
    client: Arc<Client>,
}

impl ThoughtToolInputResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages an input of a thought tool")
            .attribute(id_attribute("thought tool input"))
            .attribute(parent_attribute("thought_tool_id", "The tool this input feeds"))
            .attribute(
                AttributeBuilder::string("type")
                    .description("Where the value is placed: path, query, header or body")
                    .required()
                    .validator(StringOneOf::new(["path", "query", "header", "body"]))
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("name")
                    .description("The name of the argument")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("class_corpus_id")
                    .description("The corpus used to render the value")
                    .required()
                    .build(),
            )
            .attribute(provision_state_attribute())
            .build()
    }

    fn request_from(plan: &DynamicValue) -> Result<ToolInputRequest, Diagnostic> {
        Ok(ToolInputRequest {
            input_type: required_attr(plan, "type")?,
            name: required_attr(plan, "name")?,
            class_corpus_id: required_attr(plan, "class_corpus_id")?,
        })
    }

    async fn create_input(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let thought_tool_id = required_attr(plan, "thought_tool_id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let created = self
            .client
            .perception()
            .tool_inputs()
            .create(Some(&thought_tool_id), &request)
            .await
            .map_err(|e| client_error("create", "thought tool input", e))?;
        tracing::debug!("created thought tool input {}", created.id);

        let mut state = plan.clone();
        write_state(&mut state, &created).map_err(state_error)?;
        Ok(state)
    }

    async fn read_input(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().tool_inputs().get(&id).await;
        let Some(input) = found(result, "thought tool input", &id)? else {
            return Ok(None);
        };

        let mut state = current.clone();
        write_state(&mut state, &input).map_err(state_error)?;
        Ok(Some(state))
    }

    async fn update_input(
        &self,
        ctx: &Context,
        prior: &DynamicValue,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let id = required_attr(prior, "id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let updated = self
            .client
            .perception()
            .tool_inputs()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "thought tool input", e))?;

        let mut state = plan.clone();
        write_state(&mut state, &updated).map_err(state_error)?;
        Ok(state)
    }

    async fn delete_input(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().tool_inputs().delete(&id).await;
        deleted(result, "thought tool input", &id)
    }
}

pub(crate) fn write_state(state: &mut DynamicValue, input: &ToolInput) -> tfplug::Result<()> {
    set_string(state, "id", &input.id)?;
    set_string(state, "thought_tool_id", &input.thought_tool_id)?;
    set_string(state, "type", &input.input_type)?;
    set_string(state, "name", &input.name)?;
    set_string(state, "class_corpus_id", &input.class_corpus_id)?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        input.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for ThoughtToolInputResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_input(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_input(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_input(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_input(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
