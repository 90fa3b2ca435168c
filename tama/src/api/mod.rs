//! Tama platform REST client
//!
//! Entities are grouped the way the platform groups them: `neural`,
//! `memory`, `sensory` and `perception`. Each group hands out an
//! [`common::EntityApi`] per entity type.

pub mod client;
pub mod common;
pub mod error;
pub mod memory;
pub mod neural;
pub mod perception;
pub mod sensory;

pub use client::Client;
pub use common::{ApiResponse, EntityApi, TamaApiResource};
pub use error::ApiError;
