use crate::api::common::TamaApiResource;
use serde::{Deserialize, Serialize};

/// Binds a chain to a class inside a space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub space_id: String,
    pub class_id: String,
    pub chain_id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub on: Option<String>,
    #[serde(default)]
    pub provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NodeRequest {
    #[serde(rename = "type")]
    pub node_type: String,
    pub on: String,
    pub class_id: String,
    pub chain_id: String,
}

impl TamaApiResource for Node {
    type CreateRequest = NodeRequest;
    type UpdateRequest = NodeRequest;

    fn envelope() -> &'static str {
        "node"
    }

    fn collection() -> &'static str {
        "nodes"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("spaces")
    }
}
