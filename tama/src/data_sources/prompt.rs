//! tama_prompt data source

use super::{computed_string, lookup_id_attribute, read_error, read_response, state_error};
use crate::api::Client;
use crate::resources::prompt::write_state;
use crate::resources::required_attr;
use async_trait::async_trait;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::data_source::{
    DataSource, DataSourceSchemaRequest, DataSourceSchemaResponse, ReadDataSourceRequest,
    ReadDataSourceResponse,
};
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

pub const TYPE_NAME: &str = "tama_prompt";

pub struct PromptDataSource {
    client: Arc<Client>,
}

impl PromptDataSource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Looks up a Tama prompt by id")
            .attribute(lookup_id_attribute("prompt"))
            .attribute(computed_string("space_id", "The space the prompt belongs to"))
            .attribute(computed_string("title", "The prompt title"))
            .attribute(computed_string("content", "The prompt text"))
            .attribute(computed_string("role", "The role the prompt speaks as"))
            .attribute(computed_string("slug", "URL friendly name derived by Tama"))
            .attribute(computed_string(
                "provision_state",
                "The provisioning state reported by Tama",
            ))
            .build()
    }

    async fn read_prompt(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let id = required_attr(config, "id")?;
        let prompt = self
            .client
            .memory()
            .prompts()
            .get(&id)
            .await
            .map_err(|e| read_error("prompt", e))?;

        let mut state = config.clone();
        write_state(&mut state, &prompt).map_err(state_error)?;
        Ok(state)
    }
}

#[async_trait]
impl DataSource for PromptDataSource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        DataSourceSchemaResponse::new(Self::schema_static())
    }

    async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        read_response(self.read_prompt(&request.config).await)
    }
}
