use actix_web::cookie::time::{Duration, OffsetDateTime};
use actix_web::cookie::{Cookie, SameSite};
use rand::RngCore;
use serde_json::Value;

use crate::config::Config;

const USER_ID_BYTES: usize = 16;
const SESSION_COOKIE_BYTES: usize = 32;

/// Per-browser identity attached to a create-session call.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub user_id: String,
    pub session_cookie: String,
}

impl SessionIdentity {
    /// Reuses the browser's cookie value when there is one. The user id is
    /// minted fresh on every call, even when the cookie is reused.
    pub fn resolve(existing_cookie: Option<&str>) -> Self {
        let session_cookie = existing_cookie
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| random_hex(SESSION_COOKIE_BYTES));

        Self {
            user_id: random_hex(USER_ID_BYTES),
            session_cookie,
        }
    }
}

pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn build_session_cookie(config: &Config, value: &str) -> Cookie<'static> {
    let max_age = Duration::seconds(config.cookie_max_age);
    Cookie::build(config.cookie_name.clone(), value.to_string())
        .path("/")
        .max_age(max_age)
        .expires(OffsetDateTime::now_utc() + max_age)
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// Pulls a readable message out of an upstream error body.
pub fn extract_upstream_error(body: Option<&Value>) -> String {
    let body = match body {
        Some(Value::Null) | None => return "Unknown error".to_string(),
        Some(body) => body,
    };

    match body.get("error") {
        Some(Value::Object(error)) => match error.get("message") {
            Some(message) => value_to_message(message),
            None => Value::Object(error.clone()).to_string(),
        },
        Some(error) => value_to_message(error),
        None => body.to_string(),
    }
}

fn value_to_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
