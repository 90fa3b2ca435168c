use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::common::{ApiErrorResponse, ApiResponse};
use super::error::ApiError;
use super::memory::MemoryApi;
use super::neural::NeuralApi;
use super::perception::PerceptionApi;
use super::sensory::SensoryApi;

/// Tama API client
///
/// Cheap to clone; clones share one connection pool. There are no retries:
/// every failure is returned to the caller as-is.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    auth_header: String,
}

impl Client {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("terraform-provider-tama/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: base_url.trim_end_matches('/').to_string(),
                auth_header: format!("Bearer {}", api_key),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Spaces, bridges, classes, nodes, listeners and filters
    pub fn neural(&self) -> NeuralApi<'_> {
        NeuralApi::new(self)
    }

    /// Prompts
    pub fn memory(&self) -> MemoryApi<'_> {
        MemoryApi::new(self)
    }

    /// Model sources
    pub fn sensory(&self) -> SensoryApi<'_> {
        SensoryApi::new(self)
    }

    /// Chains, thoughts, paths, directives, tools and tool inputs
    pub fn perception(&self) -> PerceptionApi<'_> {
        PerceptionApi::new(self)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        Self::parse_response(response, path).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Self::parse_response(response, path).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::PATCH, path, Some(body)).await?;
        Self::parse_response(response, path).await
    }

    /// DELETE ignores any response body
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send(Method::DELETE, path, None::<&()>).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::error_from_response(response, path).await)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!("{} request to: {}", method, url);

        let mut request = self
            .inner
            .http_client
            .request(method, &url)
            .header(AUTHORIZATION, &self.inner.auth_header);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        tracing::debug!("Response status: {}", response.status());
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        path: &str,
    ) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(Self::error_from_response(response, path).await);
        }

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("API response body: {}", text);

        // 204 and empty bodies only satisfy types that accept null, like ()
        let text = if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            "null".to_string()
        } else {
            text
        };

        match serde_json::from_str::<ApiResponse<T>>(&text) {
            Ok(wrapper) => Ok(wrapper.data),
            Err(_) => match serde_json::from_str::<T>(&text) {
                Ok(data) => Ok(data),
                Err(e) => {
                    tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
                    Err(ApiError::ParseError(format!(
                        "Failed to parse response: {}",
                        e
                    )))
                }
            },
        }
    }

    async fn error_from_response(response: reqwest::Response, path: &str) -> ApiError {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::warn!("API error response ({}) for {}: {}", status, path, text);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized {
                status: status.as_u16(),
            },
            StatusCode::NOT_FOUND => ApiError::NotFound {
                path: path.to_string(),
            },
            StatusCode::UNPROCESSABLE_ENTITY => {
                match serde_json::from_str::<ApiErrorResponse>(&text) {
                    Ok(body) => ApiError::Validation {
                        errors: body.errors,
                    },
                    Err(_) => ApiError::ApiError {
                        status: status.as_u16(),
                        message: text,
                    },
                }
            }
            _ => ApiError::ApiError {
                status: status.as_u16(),
                message: text,
            },
        }
    }
}
