//! tama_listener_filter resource

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    parent_attribute, provision_state_attribute, read_response, required_attr, set_optional_string,
    set_string, state_error, update_response,
};
use crate::api::neural::{Filter, FilterRequest};
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

pub const TYPE_NAME: &str = "tama_listener_filter";

pub struct ListenerFilterResource {
    client: Arc<Client>,
}

impl ListenerFilterResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Restricts a listener to the output of one chain")
            .attribute(id_attribute("listener filter"))
            .attribute(parent_attribute("listener_id", "The listener this filter belongs to"))
            .attribute(
                AttributeBuilder::string("chain_id")
                    .description("The chain whose output the listener receives")
                    .required()
                    .build(),
            )
            .attribute(provision_state_attribute())
            .build()
    }

    fn request_from(plan: &DynamicValue) -> Result<FilterRequest, Diagnostic> {
        Ok(FilterRequest {
            chain_id: required_attr(plan, "chain_id")?,
        })
    }

    async fn create_filter(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let listener_id = required_attr(plan, "listener_id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let created = self
            .client
            .neural()
            .filters()
            .create(Some(&listener_id), &request)
            .await
            .map_err(|e| client_error("create", "listener filter", e))?;
        tracing::debug!("created listener filter {}", created.id);

        let mut state = plan.clone();
        write_state(&mut state, &created).map_err(state_error)?;
        Ok(state)
    }

    async fn read_filter(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.neural().filters().get(&id).await;
        let Some(filter) = found(result, "listener filter", &id)? else {
            return Ok(None);
        };

        let mut state = current.clone();
        write_state(&mut state, &filter).map_err(state_error)?;
        Ok(Some(state))
    }

    async fn update_filter(
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
            .filters()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "listener filter", e))?;

        let mut state = plan.clone();
        write_state(&mut state, &updated).map_err(state_error)?;
        Ok(state)
    }

    async fn delete_filter(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.neural().filters().delete(&id).await;
        deleted(result, "listener filter", &id)
    }
}

pub(crate) fn write_state(state: &mut DynamicValue, filter: &Filter) -> tfplug::Result<()> {
    set_string(state, "id", &filter.id)?;
    set_string(state, "listener_id", &filter.listener_id)?;
    set_string(state, "chain_id", &filter.chain_id)?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        filter.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for ListenerFilterResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_filter(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_filter(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_filter(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_filter(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
