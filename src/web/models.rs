use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{StarterPrompt, Theme};

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub workflow: Option<WorkflowRef>,
    pub scope: Option<HashMap<String, String>>,
    pub chatkit_configuration: Option<ChatKitConfiguration>,
}

impl CreateSessionRequest {
    pub fn workflow_id(&self) -> Option<&str> {
        self.workflow
            .as_ref()
            .and_then(|w| w.id.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn file_upload_enabled(&self) -> bool {
        self.chatkit_configuration
            .as_ref()
            .and_then(|c| c.file_upload.as_ref())
            .and_then(|f| f.enabled)
            .unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
pub struct WorkflowRef {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatKitConfiguration {
    pub file_upload: Option<FileUpload>,
}

#[derive(Debug, Deserialize)]
pub struct FileUpload {
    pub enabled: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfigQuery {
    pub theme: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClientConfig<'a> {
    pub workflow_id: &'a str,
    pub greeting: &'a str,
    pub placeholder: &'a str,
    pub prompts: &'a [StarterPrompt],
    pub theme: Theme,
    pub endpoint: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthStatus<'a> {
    Healthy { workflow_id: &'a str },
    Unhealthy { error: String },
}
