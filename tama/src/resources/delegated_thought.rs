//! tama_delegated_thought resource
//!
//! A delegated thought forwards to a modular thought. The target is checked
//! before every create and update: pointing at another delegated thought is
//! rejected without sending anything to Tama.

use super::{
    client_error, create_response, delete_response, deleted, ensure_active, found, id_attribute,
    index_attribute, optional_index, parent_attribute, provision_state_attribute, read_response,
    required_attr, required_string, set_optional_number, set_optional_string, set_string,
    state_error, update_response,
};
use crate::api::perception::{Thought, ThoughtDelegation, ThoughtRequest};
use crate::api::Client;
use crate::delegation::{ensure_modular_target, target_path};
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
use tfplug::schema::{AttributeBuilder, NestedBlockBuilder, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

pub const TYPE_NAME: &str = "tama_delegated_thought";

pub struct DelegatedThoughtResource {
    client: Arc<Client>,
}

impl DelegatedThoughtResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a Tama thought that delegates to a modular thought")
            .attribute(id_attribute("thought"))
            .attribute(parent_attribute("chain_id", "The chain this thought belongs to"))
            .attribute(
                AttributeBuilder::string("relation")
                    .description("The relation this thought produces")
                    .required()
                    .build(),
            )
            .attribute(index_attribute())
            .attribute(provision_state_attribute())
            .block(
                NestedBlockBuilder::exactly_one("delegation")
                    .description("The modular thought this thought delegates to")
                    .attribute(
                        AttributeBuilder::string("target_thought_id")
                            .description(
                                "Id of a modular thought; delegated thoughts are not valid targets",
                            )
                            .required()
                            .build(),
                    )
                    .build(),
            )
            .build()
    }

    fn request_from(plan: &DynamicValue) -> Result<ThoughtRequest, Diagnostic> {
        Ok(ThoughtRequest {
            relation: required_attr(plan, "relation")?,
            output_class_id: None,
            index: optional_index(plan, "index")?,
            module: None,
            delegation: Some(ThoughtDelegation {
                target_thought_id: required_string(plan, &target_path())?,
            }),
        })
    }

    async fn check_target(&self, request: &ThoughtRequest) -> Result<(), Diagnostic> {
        let Some(delegation) = &request.delegation else {
            return Ok(());
        };
        let target = ensure_modular_target(self.client.as_ref(), &delegation.target_thought_id)
            .await
            .map_err(|e| e.to_diagnostic())?;
        tracing::debug!("delegation target {} is modular", target.id);
        Ok(())
    }

    async fn create_thought(
        &self,
        ctx: &Context,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let chain_id = required_attr(plan, "chain_id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;
        self.check_target(&request).await?;

        let thought = self
            .client
            .perception()
            .thoughts()
            .create(Some(&chain_id), &request)
            .await
            .map_err(|e| client_error("create", "thought", e))?;
        tracing::debug!("created delegated thought {}", thought.id);

        let mut state = plan.clone();
        write_state(&mut state, &thought).map_err(state_error)?;
        Ok(state)
    }

    async fn read_thought(
        &self,
        ctx: &Context,
        current: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = required_attr(current, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().thoughts().get(&id).await;
        let Some(thought) = found(result, "thought", &id)? else {
            return Ok(None);
        };

        let mut state = current.clone();
        write_state(&mut state, &thought).map_err(state_error)?;
        Ok(Some(state))
    }

    async fn update_thought(
        &self,
        ctx: &Context,
        prior: &DynamicValue,
        plan: &DynamicValue,
    ) -> Result<DynamicValue, Diagnostic> {
        let id = required_attr(prior, "id")?;
        let request = Self::request_from(plan)?;
        ensure_active(ctx)?;
        self.check_target(&request).await?;

        let thought = self
            .client
            .perception()
            .thoughts()
            .update(&id, &request)
            .await
            .map_err(|e| client_error("update", "thought", e))?;

        let mut state = plan.clone();
        write_state(&mut state, &thought).map_err(state_error)?;
        Ok(state)
    }

    async fn delete_thought(&self, ctx: &Context, prior: &DynamicValue) -> Result<(), Diagnostic> {
        let id = required_attr(prior, "id")?;
        ensure_active(ctx)?;

        let result = self.client.perception().thoughts().delete(&id).await;
        deleted(result, "thought", &id)
    }
}

pub(crate) fn write_state(state: &mut DynamicValue, thought: &Thought) -> tfplug::Result<()> {
    set_string(state, "id", &thought.id)?;
    set_string(state, "chain_id", &thought.chain_id)?;
    set_string(state, "relation", &thought.relation)?;
    set_optional_number(
        state,
        &AttributePath::new("index"),
        thought.index.map(|i| i as f64),
    )?;
    if let Some(delegation) = &thought.delegation {
        state.set_string(&target_path(), delegation.target_thought_id.clone())?;
    }
    set_optional_string(
        state,
        &AttributePath::new("provision_state"),
        thought.provision_state.clone(),
    )
}

#[async_trait]
impl Resource for DelegatedThoughtResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse::new(Self::schema_static())
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_thought(&ctx, &request.planned_state).await;
        create_response(result, request.planned_state)
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_thought(&ctx, &request.current_state).await;
        read_response(result, request.current_state)
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_thought(&ctx, &request.prior_state, &request.planned_state)
            .await;
        update_response(result, request.prior_state)
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        delete_response(self.delete_thought(&ctx, &request.prior_state).await)
    }

    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        import_state_passthrough_id(AttributePath::new("id"), &request)
    }
}
