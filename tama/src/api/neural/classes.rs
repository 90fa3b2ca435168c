//! Class API types
//!
//! A class is a JSON schema. The server derives `name` and `description`
//! from the schema's `title` and `description`.

use crate::api::common::TamaApiResource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub id: String,
    pub space_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: Option<Map<String, Value>>,
    #[serde(default)]
    pub provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassRequest {
    pub schema: Map<String, Value>,
}

impl TamaApiResource for Class {
    type CreateRequest = ClassRequest;
    type UpdateRequest = ClassRequest;

    fn envelope() -> &'static str {
        "class"
    }

    fn collection() -> &'static str {
        "classes"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("spaces")
    }
}
