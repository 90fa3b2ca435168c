//! Delegated thought target check
//!
//! A delegated thought may only point at a modular thought. The target is
//! fetched once before create and update; a target without a `module` is
//! rejected before the delegated thought is sent to the API.

use crate::api::perception::Thought;
use crate::api::{ApiError, Client};
use async_trait::async_trait;
use thiserror::Error;
use tfplug::types::{AttributePath, Diagnostic};

/// Fetches thoughts by id
#[async_trait]
pub trait ThoughtLookup: Send + Sync {
    async fn thought(&self, id: &str) -> Result<Thought, ApiError>;
}

#[async_trait]
impl ThoughtLookup for Client {
    async fn thought(&self, id: &str) -> Result<Thought, ApiError> {
        self.perception().thoughts().get(id).await
    }
}

#[derive(Debug, Error)]
pub enum DelegationError {
    #[error(
        "target_thought_id must reference a modular thought resource, \
         but thought {target_id} has no module (delegated thoughts cannot be targets)"
    )]
    NotModular { target_id: String },

    #[error(transparent)]
    Lookup(#[from] ApiError),
}

impl DelegationError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DelegationError::NotModular { .. } => {
                Diagnostic::error("Invalid Delegation Target", self.to_string())
                    .with_attribute(target_path())
            }
            DelegationError::Lookup(e) => Diagnostic::error(
                "Client Error",
                format!("Unable to read target thought, got error: {}", e),
            ),
        }
    }
}

pub fn target_path() -> AttributePath {
    AttributePath::new("delegation")
        .index(0)
        .attribute("target_thought_id")
}

/// Fetch `target_id` and make sure it is a modular thought
pub async fn ensure_modular_target(
    lookup: &dyn ThoughtLookup,
    target_id: &str,
) -> Result<Thought, DelegationError> {
    let thought = lookup.thought(target_id).await?;
    if !thought.is_modular() {
        tracing::warn!("delegation target {} is not a modular thought", target_id);
        return Err(DelegationError::NotModular {
            target_id: target_id.to_string(),
        });
    }
    Ok(thought)
}
