//! tama_thought_path resource

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    parameters_to_send, parameters_to_store, parent_attribute, provision_state_attribute,
    read_response, required_attr, set_optional_string, set_string, state_error, update_response,
};
use crate::api::perception::{ThoughtPath, ThoughtPathRequest};
use crate::api::Client;
use crate::json_params::{JsonObjectValidator, SemanticJsonEquality};
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

pub const TYPE_NAME: &str = "tama_thought_path";

pub struct ThoughtPathResource {
    client: Arc<Client>,
}

fn parameters_path() -> AttributePath {
    AttributePath::new("parameters")
}

impl ThoughtPathResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a path from a thought to a target class")
            .attribute(id_attribute("thought path"))
            .attribute(parent_attribute("thought_id", "The thought this path leaves from"))
            .attribute(
                AttributeBuilder::string("target_class_id")
                    .description("The class the path leads to")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("parameters")
                    .description("Path parameters as a JSON object string")
                    .optional()
                    .computed()
                    .validator(JsonObjectValidator)
                    .plan_modifier(SemanticJsonEquality)
                    .build(),
            )
            .attribute(provision_state_attribute())
            .build()
    }

    fn request_from(plan: &DynamicValue) -> Result<ThoughtPathRequest, Diagnostic> {
        let parameters = parameters_to_send(plan, &parameters_path())?;
        Ok(ThoughtPathRequest {
            target_class_id: required_attr(plan, "target_class_id")?,
            parameters,
        })
    }

    fn state_from(
        base: &DynamicValue,
        declared: Option<String>,
        path: &ThoughtPath,
    ) -> Result<DynamicValue, Diagnostic> {
        let parameters =
            parameters_to_store(declared, path.parameters.as_ref(), &parameters_path())?;

        let mut state = base.clone();
        write_state(&mut state, path, parameters).map_err(state_error)?;
        Ok(state)
    }

    async fn create_path(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let thought_id = required_attr(plan, "thought_id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let path = self
            .client
            .perception()
            .paths()
            .create(Some(&thought_id), &request)
            .await
            .map_err(|e| client_error("create", "thought path", e))?;
        tracing::debug!("created thought path {}", path.id);

        Self::state_from(plan, plan.get_optional_string(&parameters_path()), &path)
    }

    async fn read_path(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().paths().get(&id).await;
        let Some(path) = found(result, "thought path", &id)? else {
            return Ok(None);
        };

        let declared = current.get_optional_string(&parameters_path());
        Self::state_from(current, declared, &path).map(Some)
    }

    async fn update_path(
        &self,
        ctx: &Context,
        prior: &DynamicValue,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let id = required_attr(prior, "id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let path = self
            .client
            .perception()
            .paths()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "thought path", e))?;

        Self::state_from(plan, plan.get_optional_string(&parameters_path()), &path)
    }

    async fn delete_path(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().paths().delete(&id).await;
        deleted(result, "thought path", &id)
    }
}

pub(crate) fn write_state(
    state: &mut DynamicValue,
    path: &ThoughtPath,
    parameters: Option<String>,
) -> tfplug::Result<()> {
    set_string(state, "id", &path.id)?;
    set_string(state, "thought_id", &path.thought_id)?;
    set_string(state, "target_class_id", &path.target_class_id)?;
    set_optional_string(state, &parameters_path(), parameters)?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        path.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for ThoughtPathResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_path(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_path(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_path(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_path(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
