//! Data source implementations
//!
//! Each data source looks an entity up by `id` and fills in every other
//! attribute from the API. A missing entity is an error here, unlike the
//! resource read path.

pub mod chain;
pub mod class;
pub mod prompt;
pub mod space;

pub use chain::ChainDataSource;
pub use class::ClassDataSource;
pub use prompt::PromptDataSource;
pub use space::SpaceDataSource;

use crate::resources::client_error;
pub(crate) use crate::resources::state_error;
use std::fmt::Display;
use tfplug::data_source::ReadDataSourceResponse;
use tfplug::schema::{Attribute, AttributeBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

pub(crate) fn lookup_id_attribute(entity: &str) -> Attribute {
    AttributeBuilder::string("id")
        .description(&format!("The identifier of the {} to look up", entity))
        .required()
        .build()
}

pub(crate) fn computed_string(name: &str, description: &str) -> Attribute {
    AttributeBuilder::string(name)
        .description(description)
        .computed()
        .build()
}

pub(crate) fn read_error(entity: &str, err: impl Display) -> Diagnostic {
    client_error("read", entity, err)
}

pub(crate) fn read_response(result: Result<DynamicValue, Diagnostic>) -> ReadDataSourceResponse {
    match result {
        Ok(state) => ReadDataSourceResponse {
            state,
            diagnostics: vec![],
        },
        Err(diag) => ReadDataSourceResponse {
            state: DynamicValue::null(),
            diagnostics: vec![diag],
        },
    }
}
