use crate::api::common::TamaApiResource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub space_id: String,
    pub title: String,
    pub content: String,
    pub role: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PromptRequest {
    pub title: String,
    pub content: String,
    pub role: String,
}

impl TamaApiResource for Prompt {
    type CreateRequest = PromptRequest;
    type UpdateRequest = PromptRequest;

    fn envelope() -> &'static str {
        "prompt"
    }

    fn collection() -> &'static str {
        "prompts"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("spaces")
    }
}
