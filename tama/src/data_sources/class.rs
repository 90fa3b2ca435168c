//! tama_class data source
//!
//! `schema_json` is the canonical form of the schema Tama holds: keys sorted,
//! no whitespace.

use super::{computed_string, lookup_id_attribute, read_error, read_response, state_error};
use crate::api::Client;
use crate::json_params;
use crate::resources::class::write_state;
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

pub const TYPE_NAME: &str = "tama_class";

pub struct ClassDataSource {
    client: Arc<Client>,
}

impl ClassDataSource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Looks up a Tama class by id")
            .attribute(lookup_id_attribute("class"))
            .attribute(computed_string("space_id", "The space the class belongs to"))
            .attribute(computed_string("schema_json", "The class schema as a JSON string"))
            .attribute(computed_string("name", "The class name"))
            .attribute(computed_string("description", "The class description"))
            .attribute(computed_string(
                "provision_state",
                "The provisioning state reported by Tama",
            ))
            .build()
    }

    async fn read_class(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let id = required_attr(config, "id")?;
        let class = self
            .client
            .neural()
            .classes()
            .get(&id)
            .await
            .map_err(|e| read_error("class", e))?;

        let schema_json = class.schema.as_ref().map(json_params::to_canonical_string);
        let mut state = config.clone();
        write_state(&mut state, &class, schema_json).map_err(state_error)?;
        Ok(state)
    }
}

#[async_trait]
impl DataSource for ClassDataSource {
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
        read_response(self.read_class(&request.config).await)
    }
}
