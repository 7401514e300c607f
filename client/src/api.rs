//! Variety API client
//!
//! [`VarietyApi`] is the seam the controllers depend on; [`HttpVarietyApi`]
//! talks to the REST server with reqwest.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use shared::{NewVariety, Variety, VarietyPatch};
use thiserror::Error;

/// Default address of a locally running server
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// API client errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Variety not found")]
    NotFound,

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Operations the client needs from the variety service
#[async_trait]
pub trait VarietyApi: Send + Sync {
    async fn list_varieties(&self) -> ApiResult<Vec<Variety>>;

    async fn get_variety(&self, id: &str) -> ApiResult<Variety>;

    async fn create_variety(&self, input: &NewVariety) -> ApiResult<Variety>;

    async fn update_variety(&self, id: &str, patch: &VarietyPatch) -> ApiResult<Variety>;

    async fn delete_variety(&self, id: &str) -> ApiResult<()>;
}

/// One client can back several controllers
#[async_trait]
impl<T: VarietyApi + ?Sized> VarietyApi for Arc<T> {
    async fn list_varieties(&self) -> ApiResult<Vec<Variety>> {
        (**self).list_varieties().await
    }

    async fn get_variety(&self, id: &str) -> ApiResult<Variety> {
        (**self).get_variety(id).await
    }

    async fn create_variety(&self, input: &NewVariety) -> ApiResult<Variety> {
        (**self).create_variety(input).await
    }

    async fn update_variety(&self, id: &str, patch: &VarietyPatch) -> ApiResult<Variety> {
        (**self).update_variety(id, patch).await
    }

    async fn delete_variety(&self, id: &str) -> ApiResult<()> {
        (**self).delete_variety(id).await
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    error: Option<String>,
}

/// Map a non-success response to an [`ApiError`]
fn error_for_status(status: StatusCode, body: &str) -> ApiError {
    if status == StatusCode::NOT_FOUND {
        return ApiError::NotFound;
    }

    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message,
            error: Some(detail),
        }) => format!("{}: {}", message, detail),
        Ok(ErrorBody { message, .. }) => message,
        Err(_) if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        Err(_) => body.to_string(),
    };

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

/// reqwest-backed client for the variety REST API
#[derive(Clone)]
pub struct HttpVarietyApi {
    client: Client,
    base_url: String,
}

impl HttpVarietyApi {
    /// Create a new client against the default local server
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new client with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/varieties", self.base_url)
    }

    /// Collection URL with `id` appended as one percent-encoded path segment
    fn item_url(&self, id: &str) -> ApiResult<Url> {
        let mut url = Url::parse(&self.collection_url())
            .map_err(|e| ApiError::Transport(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport("Base URL cannot hold a path".to_string()))?
            .push(id);
        Ok(url)
    }

    async fn check(response: Result<Response, reqwest::Error>) -> ApiResult<Response> {
        let response = response.map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Variety API error: {} - {}", status, body);
            return Err(error_for_status(status, &body));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl Default for HttpVarietyApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VarietyApi for HttpVarietyApi {
    async fn list_varieties(&self) -> ApiResult<Vec<Variety>> {
        let response = Self::check(self.client.get(self.collection_url()).send().await).await?;
        Self::decode(response).await
    }

    async fn get_variety(&self, id: &str) -> ApiResult<Variety> {
        let response = Self::check(self.client.get(self.item_url(id)?).send().await).await?;
        Self::decode(response).await
    }

    async fn create_variety(&self, input: &NewVariety) -> ApiResult<Variety> {
        let response = Self::check(
            self.client
                .post(self.collection_url())
                .json(input)
                .send()
                .await,
        )
        .await?;
        Self::decode(response).await
    }

    async fn update_variety(&self, id: &str, patch: &VarietyPatch) -> ApiResult<Variety> {
        let response = Self::check(
            self.client
                .patch(self.item_url(id)?)
                .json(patch)
                .send()
                .await,
        )
        .await?;
        Self::decode(response).await
    }

    async fn delete_variety(&self, id: &str) -> ApiResult<()> {
        Self::check(self.client.delete(self.item_url(id)?).send().await).await?;
        Ok(())
    }
}
