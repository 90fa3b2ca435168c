//! Terraform provider for the Tama platform
//!
//! Resources and data sources map one to one onto Tama REST entities. The
//! provider block resolves to a [`api::Client`] wrapped in
//! [`TamaProviderData`], which every factory downcasts to build its handler.

pub mod api;
pub mod config;
pub mod data_sources;
pub mod delegation;
pub mod json_params;
pub mod provider_data;
pub mod resources;

pub use provider_data::TamaProviderData;

use api::Client;
use async_trait::async_trait;
use config::{ConfigError, ProviderConfig};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tfplug::context::Context;
use tfplug::data_source::DataSource;
use tfplug::logging::LogLevel;
use tfplug::provider::{
    downcast_provider_data, ConfigureProviderRequest, ConfigureProviderResponse,
    DataSourceFactory, Provider, ProviderData, ResourceFactory,
};
use tfplug::resource::Resource;
use tfplug::schema::{AttributeBuilder, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic};

#[derive(Default)]
pub struct TamaProvider;

impl TamaProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Interact with the Tama platform")
            .attribute(
                AttributeBuilder::string("base_url")
                    .description("Tama API base URL. May also be set with TAMA_BASE_URL")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("api_key")
                    .description("Tama API key. May also be set with TAMA_API_KEY")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::number("timeout")
                    .description("HTTP timeout in seconds, 30 when unset. May also be set with TAMA_TIMEOUT")
                    .optional()
                    .build(),
            )
            .build()
    }
}

fn config_diagnostic(err: &ConfigError) -> Diagnostic {
    let diag = Diagnostic::error(err.to_string(), "");
    match err {
        ConfigError::MissingBaseUrl | ConfigError::InvalidBaseUrl(_) => {
            diag.with_attribute(AttributePath::new("base_url"))
        }
        ConfigError::MissingApiKey => diag.with_attribute(AttributePath::new("api_key")),
        ConfigError::InvalidTimeout(_) => diag.with_attribute(AttributePath::new("timeout")),
    }
}

fn resource<R, F>(build: F) -> ResourceFactory
where
    R: Resource + 'static,
    F: Fn(Arc<Client>) -> R + Send + Sync + 'static,
{
    Box::new(move |data: &ProviderData| {
        let data: TamaProviderData = downcast_provider_data(data)?;
        Ok(Box::new(build(data.client)) as Box<dyn Resource>)
    })
}

fn data_source<D, F>(build: F) -> DataSourceFactory
where
    D: DataSource + 'static,
    F: Fn(Arc<Client>) -> D + Send + Sync + 'static,
{
    Box::new(move |data: &ProviderData| {
        let data: TamaProviderData = downcast_provider_data(data)?;
        Ok(Box::new(build(data.client)) as Box<dyn DataSource>)
    })
}

#[async_trait]
impl Provider for TamaProvider {
    fn type_name(&self) -> &str {
        "tama"
    }

    async fn schema(&self, _ctx: Context) -> Schema {
        Self::schema_static()
    }

    async fn configure(
        &self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let mut diagnostics = vec![];

        if let Err(e) = tfplug::logging::init(LogLevel::from_env()) {
            diagnostics.push(Diagnostic::warning("Logging Disabled", e.to_string()));
        }
        tracing::info!(
            "configuring tama provider for terraform {}",
            request.terraform_version
        );

        let config = match ProviderConfig::resolve(&request.config) {
            Ok(config) => config,
            Err(errors) => {
                diagnostics.extend(errors.iter().map(config_diagnostic));
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                };
            }
        };

        match Client::new(&config.base_url, &config.api_key, config.timeout) {
            Ok(client) => {
                tracing::debug!("tama client ready for {}", client.base_url());
                let data: ProviderData = Arc::new(TamaProviderData::new(client));
                ConfigureProviderResponse {
                    diagnostics,
                    provider_data: Some(data),
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to create API client",
                    e.to_string(),
                ));
                ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        use resources::*;

        let mut factories = HashMap::new();
        factories.insert(space::TYPE_NAME.to_string(), resource(SpaceResource::new));
        factories.insert(bridge::TYPE_NAME.to_string(), resource(SpaceBridgeResource::new));
        factories.insert(class::TYPE_NAME.to_string(), resource(ClassResource::new));
        factories.insert(prompt::TYPE_NAME.to_string(), resource(PromptResource::new));
        factories.insert(chain::TYPE_NAME.to_string(), resource(ChainResource::new));
        factories.insert(source::TYPE_NAME.to_string(), resource(SourceResource::new));
        factories.insert(
            modular_thought::TYPE_NAME.to_string(),
            resource(ModularThoughtResource::new),
        );
        factories.insert(
            delegated_thought::TYPE_NAME.to_string(),
            resource(DelegatedThoughtResource::new),
        );
        factories.insert(
            thought_path::TYPE_NAME.to_string(),
            resource(ThoughtPathResource::new),
        );
        factories.insert(
            directive::TYPE_NAME.to_string(),
            resource(ThoughtPathDirectiveResource::new),
        );
        factories.insert(node::TYPE_NAME.to_string(), resource(NodeResource::new));
        factories.insert(
            thought_tool::TYPE_NAME.to_string(),
            resource(ThoughtToolResource::new),
        );
        factories.insert(
            tool_input::TYPE_NAME.to_string(),
            resource(ThoughtToolInputResource::new),
        );
        factories.insert(listener::TYPE_NAME.to_string(), resource(ListenerResource::new));
        factories.insert(
            listener_filter::TYPE_NAME.to_string(),
            resource(ListenerFilterResource::new),
        );
        factories
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        use data_sources::*;

        let mut factories = HashMap::new();
        factories.insert(space::TYPE_NAME.to_string(), data_source(SpaceDataSource::new));
        factories.insert(class::TYPE_NAME.to_string(), data_source(ClassDataSource::new));
        factories.insert(prompt::TYPE_NAME.to_string(), data_source(PromptDataSource::new));
        factories.insert(chain::TYPE_NAME.to_string(), data_source(ChainDataSource::new));
        factories
    }

    fn resource_schemas(&self) -> HashMap<String, Schema> {
        static SCHEMAS: OnceLock<HashMap<String, Schema>> = OnceLock::new();

        SCHEMAS
            .get_or_init(|| {
                use resources::*;

                let mut schemas = HashMap::new();
                schemas.insert(space::TYPE_NAME.to_string(), SpaceResource::schema_static());
                schemas.insert(
                    bridge::TYPE_NAME.to_string(),
                    SpaceBridgeResource::schema_static(),
                );
                schemas.insert(class::TYPE_NAME.to_string(), ClassResource::schema_static());
                schemas.insert(prompt::TYPE_NAME.to_string(), PromptResource::schema_static());
                schemas.insert(chain::TYPE_NAME.to_string(), ChainResource::schema_static());
                schemas.insert(source::TYPE_NAME.to_string(), SourceResource::schema_static());
                schemas.insert(
                    modular_thought::TYPE_NAME.to_string(),
                    ModularThoughtResource::schema_static(),
                );
                schemas.insert(
                    delegated_thought::TYPE_NAME.to_string(),
                    DelegatedThoughtResource::schema_static(),
                );
                schemas.insert(
                    thought_path::TYPE_NAME.to_string(),
                    ThoughtPathResource::schema_static(),
                );
                schemas.insert(
                    directive::TYPE_NAME.to_string(),
                    ThoughtPathDirectiveResource::schema_static(),
                );
                schemas.insert(node::TYPE_NAME.to_string(), NodeResource::schema_static());
                schemas.insert(
                    thought_tool::TYPE_NAME.to_string(),
                    ThoughtToolResource::schema_static(),
                );
                schemas.insert(
                    tool_input::TYPE_NAME.to_string(),
                    ThoughtToolInputResource::schema_static(),
                );
                schemas.insert(
                    listener::TYPE_NAME.to_string(),
                    ListenerResource::schema_static(),
                );
                schemas.insert(
                    listener_filter::TYPE_NAME.to_string(),
                    ListenerFilterResource::schema_static(),
                );
                schemas
            })
            .clone()
    }

    fn data_source_schemas(&self) -> HashMap<String, Schema> {
        static SCHEMAS: OnceLock<HashMap<String, Schema>> = OnceLock::new();

        SCHEMAS
            .get_or_init(|| {
                use data_sources::*;

                let mut schemas = HashMap::new();
                schemas.insert(space::TYPE_NAME.to_string(), SpaceDataSource::schema_static());
                schemas.insert(class::TYPE_NAME.to_string(), ClassDataSource::schema_static());
                schemas.insert(
                    prompt::TYPE_NAME.to_string(),
                    PromptDataSource::schema_static(),
                );
                schemas.insert(chain::TYPE_NAME.to_string(), ChainDataSource::schema_static());
                schemas
            })
            .clone()
    }
}
