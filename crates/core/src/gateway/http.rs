//! HTTP task gateway
//!
//! Talks to the task REST API with `reqwest` and turns error responses into
//! [`Error`] values the store and forms can display.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::repository::TaskGateway;
use crate::config::GatewayConfig;
use crate::error::Error;
use crate::task::{FieldErrors, Task, TaskRequest};
use crate::Result;

/// Error body returned by the API on 4xx/5xx
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    field_errors: Option<FieldErrors>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Gateway backed by the task REST API
#[derive(Debug, Clone)]
pub struct HttpTaskGateway {
    client: Client,
    base_url: String,
}

impl HttpTaskGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if config.no_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request; `id` names the task in not-found errors
    async fn send(
        &self,
        request: RequestBuilder,
        path: &str,
        id: Option<i64>,
    ) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(format!("Failed to reach task API: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Task API returned HTTP {} for {}", status, path);
        Err(error_from_response(status, path, id, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| Error::transport(format!("Failed to parse response from {}: {}", path, e)))
    }
}

/// Classify a non-success response.
///
/// Field errors on a 4xx make a validation error; 404 or a `NOT_FOUND` type
/// makes a not-found error; everything else is a transport error.
fn error_from_response(status: StatusCode, path: &str, id: Option<i64>, body: &str) -> Error {
    let ErrorBody {
        error,
        field_errors,
        kind,
    } = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
    let server_message = error.filter(|m| !m.trim().is_empty());

    if status.is_client_error() {
        if let Some(field_errors) = field_errors.filter(|f| !f.is_empty()) {
            return Error::Validation {
                field_errors,
                server_message,
            };
        }
    }

    if status == StatusCode::NOT_FOUND || kind.as_deref() == Some("NOT_FOUND") {
        return Error::NotFound {
            message: id.map_or_else(|| path.to_string(), |id| id.to_string()),
            server_message,
        };
    }

    Error::Transport {
        message: format!("Request failed with status code {}", status.as_u16()),
        server_message,
    }
}

#[async_trait]
impl TaskGateway for HttpTaskGateway {
    async fn list(&self) -> Result<Vec<Task>> {
        let path = "/tasks";
        debug!("GET {}", path);
        let response = self.send(self.client.get(self.url(path)), path, None).await?;
        Self::decode(response, path).await
    }

    async fn get(&self, id: i64) -> Result<Task> {
        let path = format!("/tasks/{}", id);
        debug!("GET {}", path);
        let response = self.send(self.client.get(self.url(&path)), &path, Some(id)).await?;
        Self::decode(response, &path).await
    }

    async fn create(&self, request: &TaskRequest) -> Result<Task> {
        let path = "/tasks";
        debug!("POST {}", path);
        let response = self
            .send(self.client.post(self.url(path)).json(request), path, None)
            .await?;
        Self::decode(response, path).await
    }

    async fn update(&self, id: i64, request: &TaskRequest) -> Result<Task> {
        let path = format!("/tasks/{}", id);
        debug!("PUT {}", path);
        let response = self
            .send(self.client.put(self.url(&path)).json(request), &path, Some(id))
            .await?;
        Self::decode(response, &path).await
    }

    async fn remove(&self, id: i64) -> Result<()> {
        let path = format!("/tasks/{}", id);
        debug!("DELETE {}", path);
        self.send(self.client.delete(self.url(&path)), &path, Some(id))
            .await?;
        Ok(())
    }
}
