//! Provider trait and registration types
//!
//! `configure` turns the provider block into opaque provider data. Terraform
//! then asks for resources and data sources by type name, and each factory
//! builds its handler from that data. Nothing is stored on the provider
//! between calls.

use crate::context::Context;
use crate::data_source::DataSource;
use crate::error::{Result, TfplugError};
use crate::plan::validate_config;
use crate::resource::Resource;
use crate::schema::Schema;
use crate::types::{Diagnostic, DynamicValue};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Whatever `configure` produced, typically an API client wrapper
pub type ProviderData = Arc<dyn Any + Send + Sync>;

pub type ResourceFactory = Box<dyn Fn(&ProviderData) -> Result<Box<dyn Resource>> + Send + Sync>;

pub type DataSourceFactory =
    Box<dyn Fn(&ProviderData) -> Result<Box<dyn DataSource>> + Send + Sync>;

#[async_trait]
pub trait Provider: Send + Sync {
    /// Prefix shared by all resource type names (e.g. "tama")
    fn type_name(&self) -> &str;

    async fn schema(&self, ctx: Context) -> Schema;

    async fn validate(&self, ctx: Context, config: &DynamicValue) -> Vec<Diagnostic> {
        let schema = self.schema(ctx).await;
        validate_config(&schema, config)
    }

    /// Resolve the provider block. Errors are reported as diagnostics and
    /// leave `provider_data` empty.
    async fn configure(
        &self,
        ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse;

    fn resources(&self) -> HashMap<String, ResourceFactory>;

    fn data_sources(&self) -> HashMap<String, DataSourceFactory>;

    /// Schemas must be available before the provider is configured
    fn resource_schemas(&self) -> HashMap<String, Schema>;

    fn data_source_schemas(&self) -> HashMap<String, Schema>;

    fn create_resource(
        &self,
        name: &str,
        provider_data: Option<&ProviderData>,
    ) -> Result<Box<dyn Resource>> {
        let data = provider_data.ok_or(TfplugError::ProviderNotConfigured)?;
        let factories = self.resources();
        let factory = factories
            .get(name)
            .ok_or_else(|| TfplugError::ResourceNotFound(name.to_string()))?;
        factory(data)
    }

    fn create_data_source(
        &self,
        name: &str,
        provider_data: Option<&ProviderData>,
    ) -> Result<Box<dyn DataSource>> {
        let data = provider_data.ok_or(TfplugError::ProviderNotConfigured)?;
        let factories = self.data_sources();
        let factory = factories
            .get(name)
            .ok_or_else(|| TfplugError::DataSourceNotFound(name.to_string()))?;
        factory(data)
    }
}

pub struct ConfigureProviderRequest {
    pub terraform_version: String,
    pub config: DynamicValue,
}

pub struct ConfigureProviderResponse {
    pub diagnostics: Vec<Diagnostic>,
    pub provider_data: Option<ProviderData>,
}

/// Recover the concrete provider data a factory was handed
///
/// Fails with `ProviderNotConfigured` when the data is of another type.
pub fn downcast_provider_data<T>(data: &ProviderData) -> Result<T>
where
    T: Clone + Send + Sync + 'static,
{
    data.downcast_ref::<T>()
        .cloned()
        .ok_or(TfplugError::ProviderNotConfigured)
}
