//! tama_thought_tool resource

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    parent_attribute, provision_state_attribute, read_response, required_attr, set_optional_string,
    set_string, state_error, update_response,
};
use crate::api::perception::{ThoughtTool, ThoughtToolRequest};
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

pub const TYPE_NAME: &str = "tama_thought_tool";

pub struct ThoughtToolResource {
    client: Arc<Client>,
}

impl ThoughtToolResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Makes an action available to a thought as a tool")
            .attribute(id_attribute("thought tool"))
            .attribute(parent_attribute("thought_id", "The thought that may use the tool"))
            .attribute(
                AttributeBuilder::string("action_id")
                    .description("The action the tool calls")
                    .required()
                    .build(),
            )
            .attribute(provision_state_attribute())
            .build()
    }

    fn request_from(plan: &DynamicValue) -> Result<ThoughtToolRequest, Diagnostic> {
        Ok(ThoughtToolRequest {
            action_id: required_attr(plan, "action_id")?,
        })
    }

    async fn create_tool(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let thought_id = required_attr(plan, "thought_id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let created = self
            .client
            .perception()
            .tools()
            .create(Some(&thought_id), &request)
            .await
            .map_err(|e| client_error("create", "thought tool", e))?;
        tracing::debug!("created thought tool {}", created.id);

        let mut state = plan.clone();
        write_state(&mut state, &created).map_err(state_error)?;
        Ok(state)
    }

    async fn read_tool(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().tools().get(&id).await;
        let Some(tool) = found(result, "thought tool", &id)? else {
            return Ok(None);
        };

        let mut state = current.clone();
        write_state(&mut state, &tool).map_err(state_error)?;
        Ok(Some(state))
    }

    async fn update_tool(
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
            .tools()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "thought tool", e))?;

        let mut state = plan.clone();
        write_state(&mut state, &updated).map_err(state_error)?;
        Ok(state)
    }

    async fn delete_tool(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().tools().delete(&id).await;
        deleted(result, "thought tool", &id)
    }
}

pub(crate) fn write_state(state: &mut DynamicValue, tool: &ThoughtTool) -> tfplug::Result<()> {
    set_string(state, "id", &tool.id)?;
    set_string(state, "thought_id", &tool.thought_id)?;
    set_string(state, "action_id", &tool.action_id)?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        tool.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for ThoughtToolResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_tool(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_tool(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_tool(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_tool(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
