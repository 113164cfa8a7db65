use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{debug, error, info};
use serde_json::Value;
use tera::Context;
use uuid::Uuid;

use crate::chatkit::session::{build_session_cookie, SessionIdentity};
use crate::config::{ColorScheme, UiVariant, CHAT_ENDPOINT, CREATE_SESSION_ENDPOINT};
use crate::error::AppError;
use crate::web::models::{
    ChatRequest, ChatResponse, ClientConfig, ConfigQuery, CreateSessionRequest, HealthStatus,
};
use crate::AppState;

// Index page handler
pub async fn index(data: web::Data<AppState>) -> impl Responder {
    let config = &data.config;
    let mut context = Context::new();

    let template = match config.ui {
        UiVariant::Widget => {
            context.insert("workflow_id", &config.workflow_id);
            context.insert("session_endpoint", CREATE_SESSION_ENDPOINT);
            context.insert("placeholder", &config.placeholder);
            context.insert("greeting", &config.greeting);
            "index.html"
        }
        UiVariant::Simple => {
            context.insert("chat_endpoint", CHAT_ENDPOINT);
            context.insert("placeholder", &config.placeholder);
            "chat.html"
        }
    };

    match data.tera.render(template, &context) {
        Ok(html) => HttpResponse::Ok().content_type("text/html").body(html),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

// Health check endpoint
pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    match data.config.validate() {
        Ok(()) => HttpResponse::Ok().json(HealthStatus::Healthy {
            workflow_id: &data.config.workflow_id,
        }),
        Err(e) => HttpResponse::ServiceUnavailable().json(HealthStatus::Unhealthy {
            error: e.to_string(),
        }),
    }
}

// Client-safe configuration for the widget
pub async fn client_config(
    data: web::Data<AppState>,
    query: web::Query<ConfigQuery>,
) -> impl Responder {
    let config = &data.config;
    let scheme = ColorScheme::from_query(query.theme.as_deref());

    HttpResponse::Ok().json(ClientConfig {
        workflow_id: &config.workflow_id,
        greeting: &config.greeting,
        placeholder: &config.placeholder,
        prompts: &config.starter_prompts,
        theme: scheme.theme(),
        endpoint: CREATE_SESSION_ENDPOINT,
    })
}

// ChatKit session endpoint
pub async fn create_session(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let config = &data.config;

    // A missing or unparseable body counts as an empty request.
    let raw: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let request = match raw {
        Value::Null => CreateSessionRequest::default(),
        ref value => serde_json::from_value::<CreateSessionRequest>(value.clone())
            .map_err(|e| AppError::Internal(format!("invalid create-session body: {}", e)))?,
    };

    let existing = req.cookie(&config.cookie_name);
    let identity = SessionIdentity::resolve(existing.as_ref().map(|c| c.value()));

    let workflow_id = request
        .workflow_id()
        .unwrap_or(config.workflow_id.as_str())
        .to_string();
    if workflow_id.is_empty() {
        return Err(AppError::MissingWorkflowId);
    }

    if config.debug {
        info!("[create-session] handling request: {}", workflow_id);
        debug!("[create-session] body: {} scope: {:?}", raw, request.scope);
    }

    let session = data
        .client
        .create_session(
            &workflow_id,
            Some(identity.user_id.as_str()),
            request.file_upload_enabled(),
        )
        .await
        .map_err(|e| {
            error!("ChatKit API error: {}", e);
            AppError::from_session_upstream(e)
        })?;

    if config.debug {
        info!("[create-session] session created successfully");
        debug!("[create-session] upstream session: {:?}", session.get("session_id"));
    }

    Ok(HttpResponse::Ok()
        .cookie(build_session_cookie(config, &identity.session_cookie))
        .json(session))
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, AppError> {
    let ChatRequest {
        message,
        session_id,
        user_id,
    } = req.into_inner();

    let session_id = session_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if message.trim().is_empty() {
        return Ok(HttpResponse::Ok().json(ChatResponse {
            response: String::new(),
            session_id,
        }));
    }

    info!("Chat request from session {}", session_id);
    debug!("Message: {} (user: {:?})", message, user_id);

    match data.client.chat_completion(&message).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ChatResponse {
            response,
            session_id,
        })),
        Err(e) => {
            error!("Chat completion error: {}", e);
            Err(AppError::ChatRequestFailed(e.to_string()))
        }
    }
}

pub async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}
