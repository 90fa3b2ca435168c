//! tama_chain data source

use super::{computed_string, lookup_id_attribute, read_error, read_response, state_error};
use crate::api::Client;
use crate::resources::chain::write_state;
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

pub const TYPE_NAME: &str = "tama_chain";

pub struct ChainDataSource {
    client: Arc<Client>,
}

impl ChainDataSource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Looks up a Tama chain by id")
            .attribute(lookup_id_attribute("chain"))
            .attribute(computed_string("space_id", "The space the chain belongs to"))
            .attribute(computed_string("name", "The name of the chain"))
            .attribute(computed_string("slug", "URL friendly name derived by Tama"))
            .attribute(computed_string(
                "provision_state",
                "The provisioning state reported by Tama",
            ))
            .build()
    }

    async fn read_chain(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let id = required_attr(config, "id")?;
        let chain = self
            .client
            .perception()
            .chains()
            .get(&id)
            .await
            .map_err(|e| read_error("chain", e))?;

        let mut state = config.clone();
        write_state(&mut state, &chain).map_err(state_error)?;
        Ok(state)
    }
}

#[async_trait]
impl DataSource for ChainDataSource {
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
        read_response(self.read_chain(&request.config).await)
    }
}
