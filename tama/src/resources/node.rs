//! tama_node resource

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    optional_attr, parent_attribute, provision_state_attribute, read_response, required_attr,
    set_optional_string, set_string, state_error, update_response,
};
use crate::api::neural::{Node, NodeRequest};
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
use tfplug::validator::StringOneOf;

pub const TYPE_NAME: &str = "tama_node";

pub struct NodeResource {
    client: Arc<Client>,
}

impl NodeResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a Tama node, which connects a class to the chain that processes it")
            .attribute(id_attribute("node"))
            .attribute(parent_attribute("space_id", "The space this node belongs to"))
            .attribute(
                AttributeBuilder::string("class_id")
                    .description("The class whose entities trigger the chain")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("chain_id")
                    .description("The chain to run")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("type")
                    .description("How the node fires: reactive or scheduled")
                    .required()
                    .validator(StringOneOf::new(["reactive", "scheduled"]))
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("on")
                    .description("When the node fires: processing or explicit")
                    .optional()
                    .default(StaticDefault::string("processing"))
                    .validator(StringOneOf::new(["processing", "explicit"]))
                    .build(),
            )
            .attribute(provision_state_attribute())
            .build()
    }

    fn request_from(plan: &DynamicValue) -> Result<NodeRequest, Diagnostic> {
        Ok(NodeRequest {
            node_type: required_attr(plan, "type")?,
            on: optional_attr(plan, "on").unwrap_or_else(|| "processing".to_string()),
            class_id: required_attr(plan, "class_id")?,
            chain_id: required_attr(plan, "chain_id")?,
        })
    }

    async fn create_node(
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
            .nodes()
            .create(Some(&space_id), &request)
            .await
            .map_err(|e| client_error("create", "node", e))?;
        tracing::debug!("created node {}", created.id);

        let mut state = plan.clone();
        write_state(&mut state, &created).map_err(state_error)?;
        Ok(state)
    }

    async fn read_node(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.neural().nodes().get(&id).await;
        let Some(node) = found(result, "node", &id)? else {
            return Ok(None);
        };

        let mut state = current.clone();
        write_state(&mut state, &node).map_err(state_error)?;
        Ok(Some(state))
    }

    async fn update_node(
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
            .nodes()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "node", e))?;

        let mut state = plan.clone();
        write_state(&mut state, &updated).map_err(state_error)?;
        Ok(state)
    }

    async fn delete_node(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.neural().nodes().delete(&id).await;
        deleted(result, "node", &id)
    }
}

pub(crate) fn write_state(state: &mut DynamicValue, node: &Node) -> tfplug::Result<()> {
    set_string(state, "id", &node.id)?;
    set_string(state, "space_id", &node.space_id)?;
    set_string(state, "class_id", &node.class_id)?;
    set_string(state, "chain_id", &node.chain_id)?;
    set_string(state, "type", &node.node_type)?;
    if let Some(on) = &node.on {
        set_string(state, "on", on)?;
    }
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        node.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for NodeResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_node(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_node(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_node(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_node(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
