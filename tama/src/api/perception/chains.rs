use crate::api::common::TamaApiResource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    pub id: String,
    pub space_id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChainRequest {
    pub name: String,
}

impl TamaApiResource for Chain {
    type CreateRequest = ChainRequest;
    type UpdateRequest = ChainRequest;

    fn envelope() -> &'static str {
        "chain"
    }

    fn collection() -> &'static str {
        "chains"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("spaces")
    }
}
