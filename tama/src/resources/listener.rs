//! tama_listener resource
//!
//! The secret is write-only: Tama never returns it, so state keeps the
//! configured value.

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    parent_attribute, provision_state_attribute, read_response, required_attr, set_optional_string,
    set_string, state_error, update_response,
};
use crate::api::neural::{Listener, ListenerRequest};
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

pub const TYPE_NAME: &str = "tama_listener";

pub struct ListenerResource {
    client: Arc<Client>,
}

impl ListenerResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a Tama listener, a webhook receiving chain output")
            .attribute(id_attribute("listener"))
            .attribute(parent_attribute("space_id", "The space this listener belongs to"))
            .attribute(
                AttributeBuilder::string("endpoint")
                    .description("The URL Tama delivers to")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("secret")
                    .description("Shared secret used to sign deliveries")
                    .required()
                    .sensitive()
                    .build(),
            )
            .attribute(provision_state_attribute())
            .build()
    }

    fn request_from(plan: &DynamicValue) -> Result<ListenerRequest, Diagnostic> {
        Ok(ListenerRequest {
            endpoint: required_attr(plan, "endpoint")?,
            secret: required_attr(plan, "secret")?,
        })
    }

    async fn create_listener(
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
            .listeners()
            .create(Some(&space_id), &request)
            .await
            .map_err(|e| client_error("create", "listener", e))?;
        tracing::debug!("created listener {}", created.id);

        let mut state = plan.clone();
        write_state(&mut state, &created).map_err(state_error)?;
        Ok(state)
    }

    async fn read_listener(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.neural().listeners().get(&id).await;
        let Some(listener) = found(result, "listener", &id)? else {
            return Ok(None);
        };

        let mut state = current.clone();
        write_state(&mut state, &listener).map_err(state_error)?;
        Ok(Some(state))
    }

    async fn update_listener(
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
            .neural()
            .listeners()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "listener", e))?;

        let mut state = plan.clone();
        write_state(&mut state, &updated).map_err(state_error)?;
        Ok(state)
    }

    async fn delete_listener(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.neural().listeners().delete(&id).await;
        deleted(result, "listener", &id)
    }
}

pub(crate) fn write_state(state: &mut DynamicValue, listener: &Listener) -> tfplug::Result<()> {
    set_string(state, "id", &listener.id)?;
    set_string(state, "space_id", &listener.space_id)?;
    set_string(state, "endpoint", &listener.endpoint)?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        listener.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for ListenerResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_listener(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_listener(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_listener(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_listener(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
