//! Common types and utilities for the Tama API

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::marker::PhantomData;

use super::client::Client;
use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Body of a 422 response
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub errors: BTreeMap<String, Vec<String>>,
}

/// An entity served under `/provision`
///
/// Members live at `/provision/{collection}/{id}`. New entities are posted to
/// their parent's collection, `/provision/{parent}/{parent_id}/{collection}`,
/// or to `/provision/{collection}` when they have no parent.
pub trait TamaApiResource: DeserializeOwned {
    type CreateRequest: Serialize + Sync;
    type UpdateRequest: Serialize + Sync;

    /// Key wrapping request bodies, e.g. `{"space": {...}}`
    fn envelope() -> &'static str;

    fn collection() -> &'static str;

    fn parent_collection() -> Option<&'static str> {
        None
    }

    fn resource_path(id: &str) -> String {
        format!(
            "/provision/{}/{}",
            Self::collection(),
            urlencoding::encode(id)
        )
    }

    fn create_path(parent_id: Option<&str>) -> Result<String, ApiError> {
        match (Self::parent_collection(), parent_id) {
            (None, _) => Ok(format!("/provision/{}", Self::collection())),
            (Some(parent), Some(parent_id)) => Ok(format!(
                "/provision/{}/{}/{}",
                parent,
                urlencoding::encode(parent_id),
                Self::collection()
            )),
            (Some(parent), None) => Err(ApiError::MissingParent {
                entity: Self::envelope(),
                parent,
            }),
        }
    }

    fn wrap<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::SerializeError(e.to_string()))?;
        let mut envelope = serde_json::Map::new();
        envelope.insert(Self::envelope().to_string(), value);
        Ok(serde_json::Value::Object(envelope))
    }
}

/// Typed CRUD calls for one entity type
pub struct EntityApi<'a, R> {
    client: &'a Client,
    _marker: PhantomData<fn() -> R>,
}

impl<'a, R: TamaApiResource> EntityApi<'a, R> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            _marker: PhantomData,
        }
    }

    /// GET /provision/{collection}/{id}
    pub async fn get(&self, id: &str) -> Result<R, ApiError> {
        self.client.get(&R::resource_path(id)).await
    }

    /// POST /provision/{parent}/{parent_id}/{collection}
    pub async fn create(
        &self,
        parent_id: Option<&str>,
        request: &R::CreateRequest,
    ) -> Result<R, ApiError> {
        let path = R::create_path(parent_id)?;
        self.client.post(&path, &R::wrap(request)?).await
    }

    /// PATCH /provision/{collection}/{id}
    pub async fn update(&self, id: &str, request: &R::UpdateRequest) -> Result<R, ApiError> {
        self.client
            .patch(&R::resource_path(id), &R::wrap(request)?)
            .await
    }

    /// DELETE /provision/{collection}/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&R::resource_path(id)).await
    }
}
