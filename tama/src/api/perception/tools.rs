//! Thought tool and tool input API types

use crate::api::common::TamaApiResource;
use serde::{Deserialize, Serialize};

/// Makes an action available to a thought
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtTool {
    pub id: String,
    pub thought_id: String,
    pub action_id: String,
    #[serde(default)]
    pub provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ThoughtToolRequest {
    pub action_id: String,
}

impl TamaApiResource for ThoughtTool {
    type CreateRequest = ThoughtToolRequest;
    type UpdateRequest = ThoughtToolRequest;

    fn envelope() -> &'static str {
        "tool"
    }

    fn collection() -> &'static str {
        "tools"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("thoughts")
    }
}

/// Where a tool argument comes from (path, query, header or body)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    pub id: String,
    pub thought_tool_id: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub name: String,
    pub class_corpus_id: String,
    #[serde(default)]
    pub provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToolInputRequest {
    #[serde(rename = "type")]
    pub input_type: String,
    pub name: String,
    pub class_corpus_id: String,
}

impl TamaApiResource for ToolInput {
    type CreateRequest = ToolInputRequest;
    type UpdateRequest = ToolInputRequest;

    fn envelope() -> &'static str {
        "input"
    }

    fn collection() -> &'static str {
        "inputs"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("tools")
    }
}
