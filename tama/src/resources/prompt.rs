//! tama_prompt resource

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    parent_attribute, provision_state_attribute, read_response, required_attr, set_optional_string,
    set_string, state_error, update_response,
};
use crate::api::memory::{Prompt, PromptRequest};
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
use tfplug::validator::{StringLength, StringOneOf};

pub const TYPE_NAME: &str = "tama_prompt";

pub struct PromptResource {
    client: Arc<Client>,
}

impl PromptResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a Tama prompt")
            .attribute(id_attribute("prompt"))
            .attribute(parent_attribute("space_id", "The space this prompt belongs to"))
            .attribute(
                AttributeBuilder::string("title")
                    .description("The title of the prompt")
                    .required()
                    .validator(StringLength {
                        min: Some(1),
                        max: None,
                    })
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("content")
                    .description("The prompt text")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("role")
                    .description("The role the prompt is sent as: system or user")
                    .required()
                    .validator(StringOneOf::new(["system", "user"]))
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("slug")
                    .description("URL friendly name derived by Tama")
                    .computed()
                    .build(),
            )
            .attribute(provision_state_attribute())
            .build()
    }

    fn request_from(plan: &DynamicValue) -> Result<PromptRequest, Diagnostic> {
        Ok(PromptRequest {
            title: required_attr(plan, "title")?,
            content: required_attr(plan, "content")?,
            role: required_attr(plan, "role")?,
        })
    }

    async fn create_prompt(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let space_id = required_attr(plan, "space_id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let created = self
            .client
            .memory()
            .prompts()
            .create(Some(&space_id), &request)
            .await
            .map_err(|e| client_error("create", "prompt", e))?;
        tracing::debug!("created prompt {}", created.id);

        let mut state = plan.clone();
        write_state(&mut state, &created).map_err(state_error)?;
        Ok(state)
    }

    async fn read_prompt(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.memory().prompts().get(&id).await;
        let Some(prompt) = found(result, "prompt", &id)? else {
            return Ok(None);
        };

        let mut state = current.clone();
        write_state(&mut state, &prompt).map_err(state_error)?;
        Ok(Some(state))
    }

    async fn update_prompt(
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
            .memory()
            .prompts()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "prompt", e))?;

        let mut state = plan.clone();
        write_state(&mut state, &updated).map_err(state_error)?;
        Ok(state)
    }

    async fn delete_prompt(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.memory().prompts().delete(&id).await;
        deleted(result, "prompt", &id)
    }
}

pub(crate) fn write_state(state: &mut DynamicValue, prompt: &Prompt) -> tfplug::Result<()> {
    set_string(state, "id", &prompt.id)?;
    set_string(state, "space_id", &prompt.space_id)?;
    set_string(state, "title", &prompt.title)?;
    set_string(state, "content", &prompt.content)?;
    set_string(state, "role", &prompt.role)?;
    set_optional_string(state, &AttributePath::new("slug"), prompt.slug.clone())?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        prompt.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for PromptResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_prompt(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_prompt(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_prompt(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_prompt(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
