//! tama_thought_path_directive resource

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    parent_attribute, provision_state_attribute, read_response, required_attr, set_optional_string,
    set_string, state_error, update_response,
};
use crate::api::perception::{Directive, DirectiveRequest};
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

pub const TYPE_NAME: &str = "tama_thought_path_directive";

pub struct ThoughtPathDirectiveResource {
    client: Arc<Client>,
}

impl ThoughtPathDirectiveResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a directive on a thought path")
            .attribute(id_attribute("thought path directive"))
            .attribute(parent_attribute(
                "thought_path_id",
                "The thought path this directive belongs to",
            ))
            .attribute(
                AttributeBuilder::string("prompt_id")
                    .description("The prompt applied when following the path")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("target_thought_id")
                    .description("The thought the path hands over to")
                    .required()
                    .build(),
            )
            .attribute(provision_state_attribute())
            .build()
    }

    fn request_from(plan: &DynamicValue) -> Result<DirectiveRequest, Diagnostic> {
        Ok(DirectiveRequest {
            prompt_id: required_attr(plan, "prompt_id")?,
            target_thought_id: required_attr(plan, "target_thought_id")?,
        })
    }

    async fn create_directive(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let thought_path_id = required_attr(plan, "thought_path_id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let created = self
            .client
            .perception()
            .directives()
            .create(Some(&thought_path_id), &request)
            .await
            .map_err(|e| client_error("create", "thought path directive", e))?;
        tracing::debug!("created thought path directive {}", created.id);

        let mut state = plan.clone();
        write_state(&mut state, &created).map_err(state_error)?;
        Ok(state)
    }

    async fn read_directive(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().directives().get(&id).await;
        let Some(directive) = found(result, "thought path directive", &id)? else {
            return Ok(None);
        };

        let mut state = current.clone();
        write_state(&mut state, &directive).map_err(state_error)?;
        Ok(Some(state))
    }

    async fn update_directive(
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
            .directives()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "thought path directive", e))?;

        let mut state = plan.clone();
        write_state(&mut state, &updated).map_err(state_error)?;
        Ok(state)
    }

    async fn delete_directive(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().directives().delete(&id).await;
        deleted(result, "thought path directive", &id)
    }
}

pub(crate) fn write_state(state: &mut DynamicValue, directive: &Directive) -> tfplug::Result<()> {
    set_string(state, "id", &directive.id)?;
    set_string(state, "thought_path_id", &directive.thought_path_id)?;
    set_string(state, "prompt_id", &directive.prompt_id)?;
    set_string(state, "target_thought_id", &directive.target_thought_id)?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        directive.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for ThoughtPathDirectiveResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_directive(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_directive(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_directive(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_directive(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
