pub mod sources;

pub use sources::{Source, SourceCredential, SourceRequest};

use crate::api::common::EntityApi;
use crate::api::Client;

/// Sensory API: external model sources
pub struct SensoryApi<'a> {
    client: &'a Client,
}

impl<'a> SensoryApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn sources(&self) -> EntityApi<'a, Source> {
        EntityApi::new(self.client)
    }
}
