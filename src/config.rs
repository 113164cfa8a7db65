use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

pub const CREATE_SESSION_ENDPOINT: &str = "/api/create-session";
pub const CHAT_ENDPOINT: &str = "/api/chat";

const DEFAULT_API_BASE: &str = "https://api.openai.com";
const DEFAULT_COOKIE_NAME: &str = "chatkit_session_id";
const DEFAULT_COOKIE_MAX_AGE: i64 = 60 * 60 * 24 * 30; // 30 days

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Which page `/` renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiVariant {
    /// Vendor web component bootstrapped against the create-session endpoint.
    Widget,
    /// Minimal in-page chat that talks to the chat relay.
    Simple,
}

impl FromStr for UiVariant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "widget" => Ok(UiVariant::Widget),
            "simple" => Ok(UiVariant::Simple),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    /// Anything other than `dark` falls back to light.
    pub fn from_query(theme: Option<&str>) -> Self {
        match theme {
            Some("dark") => ColorScheme::Dark,
            _ => ColorScheme::Light,
        }
    }

    pub fn theme(self) -> Theme {
        let dark = self == ColorScheme::Dark;
        Theme {
            color: ThemeColor {
                grayscale: Grayscale {
                    hue: 220,
                    tint: 6,
                    shade: if dark { -1 } else { -4 },
                },
                accent: Accent {
                    primary: if dark { "#f1f5f9" } else { "#0f172a" },
                    level: 1,
                },
            },
            radius: "round",
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Theme {
    pub color: ThemeColor,
    pub radius: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ThemeColor {
    pub grayscale: Grayscale,
    pub accent: Accent,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Grayscale {
    pub hue: u16,
    pub tint: i8,
    pub shade: i8,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Accent {
    pub primary: &'static str,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StarterPrompt {
    pub label: String,
    pub prompt: String,
    pub icon: String,
}

impl StarterPrompt {
    fn new(label: &str, prompt: &str, icon: &str) -> Self {
        Self {
            label: label.to_string(),
            prompt: prompt.to_string(),
            icon: icon.to_string(),
        }
    }
}

// Process-wide settings, read once at startup and shared read-only with every handler.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub workflow_id: String,
    pub api_base: String,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub cookie_name: String,
    pub cookie_max_age: i64,
    pub greeting: String,
    pub placeholder: String,
    pub starter_prompts: Vec<StarterPrompt>,
    pub chat_model: String,
    pub ui: UiVariant,
    pub upstream_timeout: Option<Duration>,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_base = get_or("CHATKIT_API_BASE", DEFAULT_API_BASE)
            .trim()
            .trim_end_matches('/')
            .to_string();

        let port = parse_var(&lookup, "PORT")?.unwrap_or(8000);
        let cookie_max_age =
            parse_var(&lookup, "SESSION_COOKIE_MAX_AGE")?.unwrap_or(DEFAULT_COOKIE_MAX_AGE);
        let upstream_timeout =
            parse_var::<u64, _>(&lookup, "UPSTREAM_TIMEOUT_SECS")?.map(Duration::from_secs);

        let ui = match lookup("CHATKIT_UI") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "CHATKIT_UI",
                value,
            })?,
            None => UiVariant::Widget,
        };

        let debug = lookup("DEBUG")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        Ok(Self {
            api_key: get_or("OPENAI_API_KEY", ""),
            workflow_id: get_or("CHATKIT_WORKFLOW_ID", "").trim().to_string(),
            api_base,
            host: get_or("HOST", "0.0.0.0"),
            port,
            debug,
            cookie_name: get_or("SESSION_COOKIE_NAME", DEFAULT_COOKIE_NAME),
            cookie_max_age,
            greeting: get_or("CHATKIT_GREETING", "How can I help you today?"),
            placeholder: get_or("CHATKIT_PLACEHOLDER", "Ask anything..."),
            starter_prompts: vec![StarterPrompt::new(
                "What can you do?",
                "What can you do?",
                "circle-question",
            )],
            chat_model: get_or("CHAT_MODEL", "gpt-4"),
            ui,
            upstream_timeout,
            static_dir: get_or("STATIC_DIR", "./static"),
        })
    }

    /// A config is healthy once both the workflow id and the API key are set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workflow_id.is_empty() {
            return Err(ConfigError::Missing("CHATKIT_WORKFLOW_ID"));
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::Missing("OPENAI_API_KEY"));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(None),
    }
}
