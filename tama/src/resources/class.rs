//! tama_class resource
//!
//! A class is defined by a JSON schema. `schema_json` goes through the same
//! normalization as thought parameters, so formatting differences and
//! stringified numbers in the echoed schema do not produce diffs. Name and
//! description are taken from the schema by Tama.

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    parameters_to_send, parameters_to_store, parent_attribute, provision_state_attribute,
    read_response, required_attr, set_optional_string, set_string, state_error, update_response,
};
use crate::api::neural::{Class, ClassRequest};
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

pub const TYPE_NAME: &str = "tama_class";

pub struct ClassResource {
    client: Arc<Client>,
}

fn schema_json_path() -> AttributePath {
    AttributePath::new("schema_json")
}

impl ClassResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a Tama class, the JSON schema entities are stored under")
            .attribute(id_attribute("class"))
            .attribute(parent_attribute("space_id", "The space this class belongs to"))
            .attribute(
                AttributeBuilder::string("schema_json")
                    .description("The class schema as a JSON object string")
                    .required()
                    .validator(JsonObjectValidator)
                    .plan_modifier(SemanticJsonEquality)
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("name")
                    .description("The class name, taken from the schema title")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("description")
                    .description("The class description, taken from the schema")
                    .computed()
                    .build(),
            )
            .attribute(provision_state_attribute())
            .build()
    }

    fn request_from(plan: &DynamicValue) -> Result<ClassRequest, Diagnostic> {
        let path = schema_json_path();
        let schema = parameters_to_send(plan, &path)?.ok_or_else(|| {
            Diagnostic::error("Missing Attribute", "schema_json must not be empty")
                .with_attribute(path.clone())
        })?;
        Ok(ClassRequest { schema })
    }

    /// `declared` is the schema string the user wrote, from plan or state
    fn state_from(
        base: &DynamicValue,
        declared: Option<String>,
        class: &Class,
    ) -> Result<DynamicValue, Diagnostic> {
        let schema_json = parameters_to_store(declared, class.schema.as_ref(), &schema_json_path())?;

        let mut state = base.clone();
        write_state(&mut state, class, schema_json).map_err(state_error)?;
        Ok(state)
    }

    async fn create_class(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let space_id = required_attr(plan, "space_id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let class = self
            .client
            .neural()
            .classes()
            .create(Some(&space_id), &request)
            .await
            .map_err(|e| client_error("create", "class", e))?;
        tracing::debug!("created class {}", class.id);

        Self::state_from(plan, plan.get_optional_string(&schema_json_path()), &class)
    }

    async fn read_class(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.neural().classes().get(&id).await;
        let Some(class) = found(result, "class", &id)? else {
            return Ok(None);
        };

        let declared = current.get_optional_string(&schema_json_path());
        Self::state_from(current, declared, &class).map(Some)
    }

    async fn update_class(
        &self,
        ctx: &Context,
        prior: &DynamicValue,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let id = required_attr(prior, "id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;

        let class = self
            .client
            .neural()
            .classes()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "class", e))?;

        Self::state_from(plan, plan.get_optional_string(&schema_json_path()), &class)
    }

    async fn delete_class(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.neural().classes().delete(&id).await;
        deleted(result, "class", &id)
    }
}

pub(crate) fn write_state(
    state: &mut DynamicValue,
    class: &Class,
    schema_json: Option<String>,
) -> tfplug::Result<()> {
    set_string(state, "id", &class.id)?;
    set_string(state, "space_id", &class.space_id)?;
    set_optional_string(state, &schema_json_path(), schema_json)?;
    set_optional_string(state, &AttributePath::new("name"), class.name.clone())?;
    set_optional_string(
        state,
        &AttributePath::new("description"),
        class.description.clone(),
    )?;
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        class.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for ClassResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_class(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_class(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_class(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_class(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
