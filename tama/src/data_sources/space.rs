//! tama_space data source

use super::{computed_string, lookup_id_attribute, read_error, read_response, state_error};
use crate::api::Client;
use crate::resources::required_attr;
use crate::resources::space::write_state;
use async_trait::async_trait;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::data_source::{
    DataSource, DataSourceSchemaRequest, DataSourceSchemaResponse, ReadDataSourceRequest,
    ReadDataSourceResponse,
};
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

pub const TYPE_NAME: &str = "tama_space";

pub struct SpaceDataSource {
    client: Arc<Client>,
}

impl SpaceDataSource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Looks up a Tama space by id")
            .attribute(lookup_id_attribute("space"))
            .attribute(computed_string("name", "The name of the space"))
            .attribute(computed_string("type", "The type of space"))
            .attribute(computed_string("slug", "URL friendly name derived by Tama"))
            .attribute(computed_string(
                "provision_state",
                "The provisioning state reported by Tama",
            ))
            .build()
    }

    async fn read_space(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let id = required_attr(config, "id")?;
        let space = self
            .client
            .neural()
            .spaces()
            .get(&id)
            .await
            .map_err(|e| read_error("space", e))?;

        let mut state = config.clone();
        write_state(&mut state, &space).map_err(state_error)?;
        Ok(state)
    }
}

#[async_trait]
impl DataSource for SpaceDataSource {
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
        tracing::debug!("reading {} data source", TYPE_NAME);
        read_response(self.read_space(&request.config).await)
    }
}
