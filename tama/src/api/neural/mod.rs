pub mod classes;
pub mod listeners;
pub mod nodes;
pub mod spaces;

pub use classes::{Class, ClassRequest};
pub use listeners::{Filter, FilterRequest, Listener, ListenerRequest};
pub use nodes::{Node, NodeRequest};
pub use spaces::{Bridge, BridgeRequest, Space, SpaceRequest};

use crate::api::common::EntityApi;
use crate::api::Client;

/// Neural API: the structure of a space
pub struct NeuralApi<'a> {
    client: &'a Client,
}

impl<'a> NeuralApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn spaces(&self) -> EntityApi<'a, Space> {
        EntityApi::new(self.client)
    }

    pub fn bridges(&self) -> EntityApi<'a, Bridge> {
        EntityApi::new(self.client)
    }

    pub fn classes(&self) -> EntityApi<'a, Class> {
        EntityApi::new(self.client)
    }

    pub fn nodes(&self) -> EntityApi<'a, Node> {
        EntityApi::new(self.client)
    }

    pub fn listeners(&self) -> EntityApi<'a, Listener> {
        EntityApi::new(self.client)
    }

    pub fn filters(&self) -> EntityApi<'a, Filter> {
        EntityApi::new(self.client)
    }
}
