//! Thought API types
//!
//! Modular and delegated thoughts share one entity. A modular thought runs a
//! module; a delegated thought points at a modular thought elsewhere and
//! carries no module of its own.

use crate::api::common::TamaApiResource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thought {
    pub id: String,
    pub chain_id: String,
    pub relation: String,
    #[serde(default)]
    pub output_class_id: Option<String>,
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub module: Option<ThoughtModule>,
    #[serde(default)]
    pub delegation: Option<ThoughtDelegation>,
    #[serde(default)]
    pub provision_state: Option<String>,
}

impl Thought {
    pub fn is_modular(&self) -> bool {
        self.module.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtModule {
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtDelegation {
    pub target_thought_id: String,
}

#[derive(Debug, Serialize)]
pub struct ThoughtRequest {
    pub relation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<ThoughtModule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegation: Option<ThoughtDelegation>,
}

impl TamaApiResource for Thought {
    type CreateRequest = ThoughtRequest;
    type UpdateRequest = ThoughtRequest;

    fn envelope() -> &'static str {
        "thought"
    }

    fn collection() -> &'static str {
        "thoughts"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("chains")
    }
}
