//! Space and space bridge API types

use crate::api::common::TamaApiResource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub space_type: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub provision_state: Option<String>,
}

/// Request body for creating and updating spaces
#[derive(Debug, Serialize)]
pub struct SpaceRequest {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub space_type: Option<String>,
}

impl TamaApiResource for Space {
    type CreateRequest = SpaceRequest;
    type UpdateRequest = SpaceRequest;

    fn envelope() -> &'static str {
        "space"
    }

    fn collection() -> &'static str {
        "spaces"
    }
}

/// Link letting one space use another's components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bridge {
    pub id: String,
    pub space_id: String,
    pub target_space_id: String,
    #[serde(default)]
    pub provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BridgeRequest {
    pub target_space_id: String,
}

impl TamaApiResource for Bridge {
    type CreateRequest = BridgeRequest;
    type UpdateRequest = BridgeRequest;

    fn envelope() -> &'static str {
        "bridge"
    }

    fn collection() -> &'static str {
        "bridges"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("spaces")
    }
}
