//! tama_source resource
//!
//! A source is a model endpoint plus credentials. The API key is never
//! returned, so state keeps the configured value.

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    parent_attribute, provision_state_attribute, read_response, required_attr, set_optional_string,
    set_string, state_error, update_response,
};
use crate::api::sensory::{Source, SourceCredential, SourceRequest};
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

pub const TYPE_NAME: &str = "tama_source";

pub struct SourceResource {
    client: Arc<Client>,
}

impl SourceResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a Tama model source")
            .attribute(id_attribute("source"))
            .attribute(parent_attribute("space_id", "The space this source belongs to"))
            .attribute(
                AttributeBuilder::string("name")
                    .description("The name of the source")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("type")
                    .description("The kind of source, currently only model")
                    .required()
                    .validator(StringOneOf::new(["model"]))
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("endpoint")
                    .description("Base URL of the model API")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("api_key")
                    .description("API key for the model endpoint")
                    .required()
                    .sensitive()
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

    fn request_from(plan: &DynamicValue) -> Result<SourceRequest, Diagnostic> {
        Ok(SourceRequest {
            name: required_attr(plan, "name")?,
            source_type: required_attr(plan, "type")?,
            endpoint: required_attr(plan, "endpoint")?,
            credential: SourceCredential {
                api_key: required_attr(plan, "api_key")?,
            },
        })
    }

    async fn create_source(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let space_id = required_attr(plan, "space_id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let created = self
            .client
            .sensory()
            .sources()
            .create(Some(&space_id), &request)
            .await
            .map_err(|e| client_error("create", "source", e))?;
        tracing::debug!("created source {}", created.id);

        let mut state = plan.clone();
        write_state(&mut state, &created).map_err(state_error)?;
        Ok(state)
    }

    async fn read_source(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.sensory().sources().get(&id).await;
        let Some(source) = found(result, "source", &id)? else {
            return Ok(None);
        };

        let mut state = current.clone();
        write_state(&mut state, &source).map_err(state_error)?;
        Ok(Some(state))
    }

    async fn update_source(
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
            .sensory()
            .sources()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "source", e))?;

        let mut state = plan.clone();
        write_state(&mut state, &updated).map_err(state_error)?;
        Ok(state)
    }

    async fn delete_source(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.sensory().sources().delete(&id).await;
        deleted(result, "source", &id)
    }
}

pub(crate) fn write_state(state: &mut DynamicValue, source: &Source) -> tfplug::Result<()> {
    set_string(state, "id", &source.id)?;
    set_string(state, "space_id", &source.space_id)?;
    set_string(state, "name", &source.name)?;
    set_string(state, "type", &source.source_type)?;
    set_string(state, "endpoint", &source.endpoint)?;
    set_optional_string(state, &AttributePath::new("slug"), source.slug.clone())?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        source.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for SourceResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_source(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_source(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_source(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_source(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
