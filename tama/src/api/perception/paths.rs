//! Thought path and directive API types

use crate::api::common::TamaApiResource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Routes a thought's output towards a class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtPath {
    pub id: String,
    pub thought_id: String,
    pub target_class_id: String,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ThoughtPathRequest {
    pub target_class_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

impl TamaApiResource for ThoughtPath {
    type CreateRequest = ThoughtPathRequest;
    type UpdateRequest = ThoughtPathRequest;

    fn envelope() -> &'static str {
        "path"
    }

    fn collection() -> &'static str {
        "paths"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("thoughts")
    }
}

/// Prompt applied when a path hands over to a target thought
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directive {
    pub id: String,
    pub thought_path_id: String,
    pub prompt_id: String,
    pub target_thought_id: String,
    #[serde(default)]
    pub provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DirectiveRequest {
    pub prompt_id: String,
    pub target_thought_id: String,
}

impl TamaApiResource for Directive {
    type CreateRequest = DirectiveRequest;
    type UpdateRequest = DirectiveRequest;

    fn envelope() -> &'static str {
        "directive"
    }

    fn collection() -> &'static str {
        "directives"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("paths")
    }
}
