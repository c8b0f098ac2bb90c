//! Azure Assistants Client - Implementation of AssistantService for the
//! Azure-hosted OpenAI Assistants REST API.
//!
//! Every call targets `{endpoint}/openai/...?api-version={version}` and is
//! authenticated with the static `api-key` header. The key comes from
//! injected configuration and never leaves this adapter.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AzureAssistantsConfig::new("https://my-resource.openai.azure.com", api_key)
//!     .with_api_version("2024-05-01-preview")
//!     .with_timeout(Duration::from_secs(60));
//!
//! let service = AzureAssistantsClient::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AssistantServiceConfig;
use crate::domain::foundation::{AssistantId, RunId, ThreadId};
use crate::ports::{
    AssistantService, AssistantServiceError, AssistantSummary, MessageContent, MessageRole,
    RunSnapshot, ThreadMessage,
};

/// Configuration for the Azure assistants client.
#[derive(Debug, Clone)]
pub struct AzureAssistantsConfig {
    /// API key for the `api-key` header.
    api_key: Secret<String>,
    /// Resource endpoint without trailing slash.
    pub endpoint: String,
    /// Versioned API parameter.
    pub api_version: String,
    /// Per-call timeout.
    pub timeout: Duration,
}

impl AzureAssistantsConfig {
    /// Creates a new configuration for the given endpoint and key.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_version: "2024-05-01-preview".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Builds the client configuration from application settings.
    pub fn from_settings(settings: &AssistantServiceConfig) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            endpoint: settings.base_endpoint().to_string(),
            api_version: settings.api_version.clone(),
            timeout: settings.timeout(),
        }
    }

    /// Sets the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// HTTP client for the hosted assistants API.
pub struct AzureAssistantsClient {
    config: AzureAssistantsConfig,
    client: Client,
}

impl AzureAssistantsClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: AzureAssistantsConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/openai/{}?api-version={}",
            self.config.endpoint, path, self.config.api_version
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("api-key", self.config.api_key())
            .header("Content-Type", "application/json")
    }

    /// Sends a request and maps transport failures.
    async fn send(&self, request: RequestBuilder) -> Result<Response, AssistantServiceError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            if e.is_timeout() {
                AssistantServiceError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else if e.is_connect() {
                AssistantServiceError::network(format!("Connection failed: {}", e))
            } else {
                AssistantServiceError::network(e.to_string())
            }
        })?;

        self.handle_response_status(response).await
    }

    /// Maps non-success statuses to errors.
    async fn handle_response_status(
        &self,
        response: Response,
    ) -> Result<Response, AssistantServiceError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Assistant service returned an error status");

        match status.as_u16() {
            401 | 403 => Err(AssistantServiceError::AuthenticationFailed),
            code => Err(AssistantServiceError::status(code, error_body)),
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, AssistantServiceError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| AssistantServiceError::parse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl AssistantService for AzureAssistantsClient {
    async fn create_thread(&self) -> Result<ThreadId, AssistantServiceError> {
        let thread: IdObject = self
            .send_json(self.client.post(self.url("threads")).json(&EmptyBody {}))
            .await?;

        ThreadId::new(thread.id).map_err(|e| AssistantServiceError::parse(e.to_string()))
    }

    async fn post_user_message(
        &self,
        thread_id: &ThreadId,
        content: &str,
    ) -> Result<(), AssistantServiceError> {
        let body = CreateMessageRequest {
            role: "user",
            content,
        };
        self.send(
            self.client
                .post(self.url(&format!("threads/{}/messages", thread_id)))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn start_run(
        &self,
        thread_id: &ThreadId,
        assistant_id: &AssistantId,
    ) -> Result<RunSnapshot, AssistantServiceError> {
        let body = CreateRunRequest {
            assistant_id: assistant_id.as_str(),
        };
        let run: RunObject = self
            .send_json(
                self.client
                    .post(self.url(&format!("threads/{}/runs", thread_id)))
                    .json(&body),
            )
            .await?;

        run.into_snapshot()
    }

    async fn get_run(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
    ) -> Result<RunSnapshot, AssistantServiceError> {
        let run: RunObject = self
            .send_json(
                self.client
                    .get(self.url(&format!("threads/{}/runs/{}", thread_id, run_id))),
            )
            .await?;

        run.into_snapshot()
    }

    async fn list_messages(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Vec<ThreadMessage>, AssistantServiceError> {
        let list: ListResponse<MessageObject> = self
            .send_json(
                self.client
                    .get(self.url(&format!("threads/{}/messages", thread_id))),
            )
            .await?;

        Ok(list.data.into_iter().map(MessageObject::into_message).collect())
    }

    async fn list_assistants(&self) -> Result<Vec<AssistantSummary>, AssistantServiceError> {
        let list: ListResponse<AssistantObject> = self
            .send_json(self.client.get(self.url("assistants")))
            .await?;

        // Assistants with an unusable id are skipped rather than failing the listing.
        Ok(list
            .data
            .into_iter()
            .filter_map(|assistant| {
                AssistantId::new(assistant.id)
                    .ok()
                    .map(|id| AssistantSummary {
                        id,
                        name: assistant.name,
                    })
            })
            .collect())
    }
}

// ----- Assistants API Types -----

#[derive(Debug, Serialize)]
struct EmptyBody {}

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct IdObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RunObject {
    id: String,
    status: String,
}

impl RunObject {
    fn into_snapshot(self) -> Result<RunSnapshot, AssistantServiceError> {
        let id = RunId::new(self.id).map_err(|e| AssistantServiceError::parse(e.to_string()))?;
        Ok(RunSnapshot::new(id, self.status))
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct MessageObject {
    role: MessageRole,
    #[serde(default)]
    content: Vec<ContentPart>,
}

impl MessageObject {
    fn into_message(self) -> ThreadMessage {
        ThreadMessage {
            role: self.role,
            content: self
                .content
                .into_iter()
                .map(|part| match (part.kind.as_str(), part.text) {
                    ("text", Some(text)) => MessageContent::Text(text.value),
                    (kind, _) => MessageContent::Other(kind.to_string()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    text: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct AssistantObject {
    id: String,
    name: Option<String>,
}
