//! Default value providers for attributes
//!
//! Defaults are evaluated during planning when an optional attribute is null
//! in configuration. They run before plan modifiers.
//!
//! ```no_run
//! use tfplug::schema::AttributeBuilder;
//! use tfplug::defaults::StaticDefault;
//!
//! let space_type = AttributeBuilder::string("type")
//!     .optional()
//!     .default(StaticDefault::string("root"))
//!     .build();
//! ```

use crate::types::{AttributePath, Dynamic};

/// Provides the value of an optional attribute left unset in configuration
pub trait Default: Send + Sync {
    fn description(&self) -> String;

    fn default_value(&self, path: &AttributePath) -> Dynamic;
}

/// StaticDefault provides a fixed default value
pub struct StaticDefault {
    value: Dynamic,
}

impl StaticDefault {
    pub fn new(value: Dynamic) -> Self {
        Self { value }
    }

    pub fn string(value: &str) -> Self {
        Self::new(Dynamic::String(value.to_string()))
    }

    pub fn number(value: f64) -> Self {
        Self::new(Dynamic::Number(value))
    }

    pub fn bool(value: bool) -> Self {
        Self::new(Dynamic::Bool(value))
    }
}

impl Default for StaticDefault {
    fn description(&self) -> String {
        format!("static default value: {:?}", self.value)
    }

    fn default_value(&self, _path: &AttributePath) -> Dynamic {
        self.value.clone()
    }
}
