//! tama_space_bridge resource

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    parent_attribute, provision_state_attribute, read_response, required_attr, set_optional_string,
    set_string, state_error, update_response,
};
use crate::api::neural::{Bridge, BridgeRequest};
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
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

pub const TYPE_NAME: &str = "tama_space_bridge";

pub struct SpaceBridgeResource {
    client: Arc<Client>,
}

impl SpaceBridgeResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Bridges two Tama spaces")
            .attribute(id_attribute("space bridge"))
            .attribute(parent_attribute("space_id", "The space that gains access"))
            .attribute(parent_attribute(
                "target_space_id",
                "The space whose components become available",
            ))
            .attribute(provision_state_attribute())
            .build()
    }

    fn request_from(plan: &DynamicValue) -> Result<BridgeRequest, Diagnostic> {
        Ok(BridgeRequest {
            target_space_id: required_attr(plan, "target_space_id")?,
        })
    }

    async fn create_bridge(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let space_id = required_attr(plan, "space_id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let created = self
            .client
            .neural()
            .bridges()
            .create(Some(&space_id), &request)
            .await
            .map_err(|e| client_error("create", "space bridge", e))?;
        tracing::debug!("created space bridge {}", created.id);

        let mut state = plan.clone();
        write_state(&mut state, &created).map_err(state_error)?;
        Ok(state)
    }

    async fn read_bridge(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.neural().bridges().get(&id).await;
        let Some(bridge) = found(result, "space bridge", &id)? else {
            return Ok(None);
        };

        let mut state = current.clone();
        write_state(&mut state, &bridge).map_err(state_error)?;
        Ok(Some(state))
    }

    /// Both ids force replacement, so there is never anything to send
    async fn update_bridge(
        &self,
        ctx: &Context,
        prior: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        match self.read_bridge(ctx, prior).await? {
            Some(state) => Ok(state),
            None => Err(client_error(
                "update",
                "space bridge",
                "the bridge no longer exists",
            )),
        }
    }

    async fn delete_bridge(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.neural().bridges().delete(&id).await;
        deleted(result, "space bridge", &id)
    }
}

pub(crate) fn write_state(state: &mut DynamicValue, bridge: &Bridge) -> tfplug::Result<()> {
    set_string(state, "id", &bridge.id)?;
    set_string(state, "space_id", &bridge.space_id)?;
    set_string(state, "target_space_id", &bridge.target_space_id)?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        bridge.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for SpaceBridgeResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_bridge(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_bridge(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self.update_bridge(&ctx, &request.prior_state).await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_bridge(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
