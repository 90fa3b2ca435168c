//! tfplug - Terraform Plugin Framework for Rust
//!
//! A framework for building Terraform providers in Rust. It models
//! Terraform values, schemas and the resource lifecycle; a protocol layer
//! (or a test) drives the traits directly.

// Core modules
pub mod context;
pub mod error;
pub mod logging;
pub mod schema;
pub mod types;

// Provider API modules
pub mod data_source;
pub mod provider;
pub mod resource;

// Helper modules
pub mod defaults;
pub mod import;
pub mod plan;
pub mod plan_modifier;
pub mod validator;

// Re-exports for convenience
pub use context::Context;
pub use data_source::DataSource;
pub use error::{Result, TfplugError};
pub use import::import_state_passthrough_id;
pub use logging::LogLevel;
pub use provider::{Provider, ProviderData};
pub use resource::Resource;
pub use schema::{AttributeBuilder, AttributeType, NestedBlockBuilder, Schema, SchemaBuilder};
pub use types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
