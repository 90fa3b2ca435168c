//! tama_space resource

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    optional_attr, provision_state_attribute, read_response, required_attr, set_optional_string,
    set_string, state_error, update_response,
};
use crate::api::neural::{Space, SpaceRequest};
use crate::api::Client;
use async_trait::async_trait;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
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

pub const TYPE_NAME: &str = "tama_space";

pub struct SpaceResource {
    client: Arc<Client>,
}

impl SpaceResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a Tama space")
            .attribute(id_attribute("space"))
            .attribute(
                AttributeBuilder::string("name")
                    .description("The name of the space")
                    .required()
                    .validator(StringLength {
                        min: Some(1),
                        max: None,
                    })
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("type")
                    .description("The type of space: root or component")
                    .optional()
                    .default(StaticDefault::string("root"))
                    .validator(StringOneOf::new(["root", "component"]))
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

    fn request_from(plan: &DynamicValue) -> Result<SpaceRequest, Diagnostic> {
        Ok(SpaceRequest {
            name: required_attr(plan, "name")?,
            space_type: optional_attr(plan, "type"),
        })
    }

    async fn create_space(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let space = self
            .client
            .neural()
            .spaces()
            .create(None, &request)
            .await
            .map_err(|e| client_error("create", "space", e))?;
        tracing::debug!("created space {}", space.id);

        let mut state = plan.clone();
        write_state(&mut state, &space).map_err(state_error)?;
        Ok(state)
    }

    async fn read_space(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let Some(space) = found(self.client.neural().spaces().get(&id).await, "space", &id)? else {
            return Ok(None);
        };

        let mut state = current.clone();
        write_state(&mut state, &space).map_err(state_error)?;
        Ok(Some(state))
    }

    async fn update_space(
        &self,
        ctx: &Context,
        prior: &DynamicValue,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let id = required_attr(prior, "id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let space = self
            .client
            .neural()
            .spaces()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "space", e))?;

        let mut state = plan.clone();
        write_state(&mut state, &space).map_err(state_error)?;
        Ok(state)
    }

    async fn delete_space(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        deleted(self.client.neural().spaces().delete(&id).await, "space", &id)
    }
}

pub(crate) fn write_state(state: &mut DynamicValue, space: &Space) -> tfplug::Result<()> {
    set_string(state, "id", &space.id)?;
    set_string(state, "name", &space.name)?;
    set_string(state, "type", &space.space_type)?;
    set_optional_string(state, &AttributePath::new("slug"), space.slug.clone())?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        space.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for SpaceResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_space(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_space(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_space(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_space(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
