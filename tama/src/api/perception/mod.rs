pub mod chains;
pub mod paths;
pub mod thoughts;
pub mod tools;

pub use chains::{Chain, ChainRequest};
pub use paths::{Directive, DirectiveRequest, ThoughtPath, ThoughtPathRequest};
pub use thoughts::{Thought, ThoughtDelegation, ThoughtModule, ThoughtRequest};
pub use tools::{ThoughtTool, ThoughtToolRequest, ToolInput, ToolInputRequest};

use crate::api::common::EntityApi;
use crate::api::Client;

/// Perception API: chains and the thoughts they are made of
pub struct PerceptionApi<'a> {
    client: &'a Client,
}

impl<'a> PerceptionApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn chains(&self) -> EntityApi<'a, Chain> {
        EntityApi::new(self.client)
    }

    pub fn thoughts(&self) -> EntityApi<'a, Thought> {
        EntityApi::new(self.client)
    }

    pub fn paths(&self) -> EntityApi<'a, ThoughtPath> {
        EntityApi::new(self.client)
    }

    pub fn directives(&self) -> EntityApi<'a, Directive> {
        EntityApi::new(self.client)
    }

    pub fn tools(&self) -> EntityApi<'a, ThoughtTool> {
        EntityApi::new(self.client)
    }

    pub fn tool_inputs(&self) -> EntityApi<'a, ToolInput> {
        EntityApi::new(self.client)
    }
}
