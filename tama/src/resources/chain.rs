//! tama_chain resource

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    parent_attribute, provision_state_attribute, read_response, required_attr, set_optional_string,
    set_string, state_error, update_response,
};
use crate::api::perception::{Chain, ChainRequest};
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
use tfplug::validator::StringLength;

pub const TYPE_NAME: &str = "tama_chain";

pub struct ChainResource {
    client: Arc<Client>,
}

impl ChainResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a Tama chain, an ordered sequence of thoughts")
            .attribute(id_attribute("chain"))
            .attribute(parent_attribute("space_id", "The space this chain belongs to"))
            .attribute(
                AttributeBuilder::string("name")
                    .description("The name of the chain")
                    .required()
                    .validator(StringLength {
                        min: Some(1),
                        max: None,
                    })
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

    fn request_from(plan: &DynamicValue) -> Result<ChainRequest, Diagnostic> {
        Ok(ChainRequest {
            name: required_attr(plan, "name")?,
        })
    }

    async fn create_chain(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let space_id = required_attr(plan, "space_id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let created = self
            .client
            .perception()
            .chains()
            .create(Some(&space_id), &request)
            .await
            .map_err(|e| client_error("create", "chain", e))?;
        tracing::debug!("created chain {}", created.id);

        let mut state = plan.clone();
        write_state(&mut state, &created).map_err(state_error)?;
        Ok(state)
    }

    async fn read_chain(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().chains().get(&id).await;
        let Some(chain) = found(result, "chain", &id)? else {
            return Ok(None);
        };

        let mut state = current.clone();
        write_state(&mut state, &chain).map_err(state_error)?;
        Ok(Some(state))
    }

    async fn update_chain(
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
            .chains()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "chain", e))?;

        let mut state = plan.clone();
        write_state(&mut state, &updated).map_err(state_error)?;
        Ok(state)
    }

    async fn delete_chain(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().chains().delete(&id).await;
        deleted(result, "chain", &id)
    }
}

pub(crate) fn write_state(state: &mut DynamicValue, chain: &Chain) -> tfplug::Result<()> {
    set_string(state, "id", &chain.id)?;
    set_string(state, "space_id", &chain.space_id)?;
    set_string(state, "name", &chain.name)?;
    set_optional_string(state, &AttributePath::new("slug"), chain.slug.clone())?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        chain.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for ChainResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_chain(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_chain(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_chain(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_chain(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
