use crate::api::common::TamaApiResource;
use serde::{Deserialize, Serialize};

/// A model provider endpoint. Its API key is never echoed back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub space_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub endpoint: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SourceCredential {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct SourceRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub endpoint: String,
    pub credential: SourceCredential,
}

impl TamaApiResource for Source {
    type CreateRequest = SourceRequest;
    type UpdateRequest = SourceRequest;

    fn envelope() -> &'static str {
        "source"
    }

    fn collection() -> &'static str {
        "sources"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("spaces")
    }
}
