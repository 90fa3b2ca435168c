//! Listener and listener filter API types

use crate::api::common::TamaApiResource;
use serde::{Deserialize, Serialize};

/// Webhook endpoint notified about activity in a space
///
/// The shared secret is write-only and never returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listener {
    pub id: String,
    pub space_id: String,
    pub endpoint: String,
    #[serde(default)]
    pub provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListenerRequest {
    pub endpoint: String,
    pub secret: String,
}

impl TamaApiResource for Listener {
    type CreateRequest = ListenerRequest;
    type UpdateRequest = ListenerRequest;

    fn envelope() -> &'static str {
        "listener"
    }

    fn collection() -> &'static str {
        "listeners"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("spaces")
    }
}

/// Restricts a listener to events from one chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    pub id: String,
    pub listener_id: String,
    pub chain_id: String,
    #[serde(default)]
    pub provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FilterRequest {
    pub chain_id: String,
}

impl TamaApiResource for Filter {
    type CreateRequest = FilterRequest;
    type UpdateRequest = FilterRequest;

    fn envelope() -> &'static str {
        "filter"
    }

    fn collection() -> &'static str {
        "filters"
    }

    fn parent_collection() -> Option<&'static str> {
        Some("listeners")
    }
}
