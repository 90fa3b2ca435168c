pub mod prompts;

pub use prompts::{Prompt, PromptRequest};

use crate::api::common::EntityApi;
use crate::api::Client;

/// Memory API: prompts stored in a space
pub struct MemoryApi<'a> {
    client: &'a Client,
}

impl<'a> MemoryApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn prompts(&self) -> EntityApi<'a, Prompt> {
        EntityApi::new(self.client)
    }
}
