pub mod session;

use anyhow::Result;
use log::{debug, info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::web::models::{Message, Role};
use session::extract_upstream_error;

const BETA_HEADER: &str = "OpenAI-Beta";
const BETA_VALUE: &str = "chatkit_beta=v1";
const CHAT_TEMPERATURE: f64 = 0.7;
const CHAT_MAX_TOKENS: u32 = 1024;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Missing OPENAI_API_KEY")]
    MissingApiKey,
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("{0}")]
    InvalidResponse(String),
}

#[derive(Debug, Serialize)]
struct CreateSessionPayload<'a> {
    workflow: WorkflowPayload<'a>,
    chatkit_configuration: ChatKitConfigurationPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct WorkflowPayload<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatKitConfigurationPayload {
    file_upload: FileUploadPayload,
}

#[derive(Debug, Serialize)]
struct FileUploadPayload {
    enabled: bool,
}

/// Session record returned by the vendor (`token`, `session_id`, `expires_at`).
/// Relayed to the browser exactly as received.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct UpstreamSession(Map<String, Value>);

impl UpstreamSession {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionPayload<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// Thin wrapper around the vendor HTTP API
pub struct ChatKitClient {
    api_base: String,
    api_key: String,
    chat_model: String,
    client: Client,
}

impl ChatKitClient {
    pub fn new(config: &Config) -> Result<Self> {
        info!("Using ChatKit API at: {}", config.api_base);

        let mut builder = Client::builder();
        if let Some(timeout) = config.upstream_timeout {
            info!("Upstream requests time out after {:?}", timeout);
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
            chat_model: config.chat_model.clone(),
            client: builder.build()?,
        })
    }

    /// Issues exactly one `POST /v1/chatkit/sessions` call. No retries.
    pub async fn create_session(
        &self,
        workflow_id: &str,
        user_id: Option<&str>,
        file_upload_enabled: bool,
    ) -> Result<UpstreamSession, UpstreamError> {
        if self.api_key.is_empty() {
            return Err(UpstreamError::MissingApiKey);
        }

        let url = format!("{}/v1/chatkit/sessions", self.api_base);
        let payload = CreateSessionPayload {
            workflow: WorkflowPayload { id: workflow_id },
            chatkit_configuration: ChatKitConfigurationPayload {
                file_upload: FileUploadPayload {
                    enabled: file_upload_enabled,
                },
            },
            user: user_id.filter(|id| !id.is_empty()),
        };

        debug!("Creating ChatKit session for workflow: {}", workflow_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER, BETA_VALUE)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejected(status, response).await);
        }

        let body: Value = response.json().await?;
        match body {
            Value::Object(record) => Ok(UpstreamSession(record)),
            other => Err(UpstreamError::InvalidResponse(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    /// Sends `message` as the only user turn and returns the first choice's text.
    pub async fn chat_completion(&self, message: &str) -> Result<String, UpstreamError> {
        if self.api_key.is_empty() {
            return Err(UpstreamError::MissingApiKey);
        }

        let url = format!("{}/v1/chat/completions", self.api_base);
        let payload = ChatCompletionPayload {
            model: &self.chat_model,
            messages: vec![Message {
                role: Role::User,
                content: message.to_string(),
            }],
            temperature: CHAT_TEMPERATURE,
            max_tokens: CHAT_MAX_TOKENS,
        };

        debug!("Sending chat completion request with model: {}", self.chat_model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejected(status, response).await);
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                UpstreamError::InvalidResponse("Failed to extract content from response".into())
            })?;

        info!("Response length: {} characters", content.len());
        Ok(content)
    }
}

async fn rejected(status: StatusCode, response: reqwest::Response) -> UpstreamError {
    // An unreadable or non-JSON body still yields an error, just without detail.
    let body = response.json::<Value>().await.ok();
    UpstreamError::Rejected {
        status,
        message: extract_upstream_error(body.as_ref()),
    }
}
