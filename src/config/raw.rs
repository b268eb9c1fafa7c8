//! Raw TOML deserialization types.
//!
//! These structs mirror the TOML file shape and use `serde` defaults.
//! The `load` module converts them into the public `types` structs.

use serde::Deserialize;

// ── Top-level ────────────────────────────────────────────────────────────────

/// Raw TOML shape — serde target before resolution.
#[derive(Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub app: RawApp,
    #[serde(default)]
    pub session: RawSession,
    #[serde(default)]
    pub llm: RawLlm,
}

#[derive(Deserialize)]
pub(super) struct RawApp {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RawApp {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

// ── Session ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawSession {
    #[serde(default = "default_persona")]
    pub persona: String,
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default = "default_min_user_chars")]
    pub min_user_chars: usize,
    #[serde(default = "default_newline_handling")]
    pub newline_handling: String,
}

impl Default for RawSession {
    fn default() -> Self {
        Self {
            persona: default_persona(),
            greeting: None,
            min_user_chars: default_min_user_chars(),
            newline_handling: default_newline_handling(),
        }
    }
}

// ── LLM ──────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawLlm {
    #[serde(rename = "default", default = "default_llm_provider")]
    pub provider: String,
    #[serde(default)]
    pub openai: RawOpenAi,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            openai: RawOpenAi::default(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct RawOpenAi {
    #[serde(default = "default_openai_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stop: Vec<String>,
    #[serde(default)]
    pub frequency_penalty: Option<f64>,
    #[serde(default)]
    pub presence_penalty: Option<f64>,
    #[serde(default)]
    pub seed: Option<i64>,
}

impl Default for RawOpenAi {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            timeout_seconds: default_openai_timeout_seconds(),
            temperature: None,
            top_p: None,
            max_tokens: None,
            stop: Vec::new(),
            frequency_penalty: None,
            presence_penalty: None,
            seed: None,
        }
    }
}

// ── Defaults ─────────────────────────────────────────────────────────────────

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_persona() -> String {
    "You are a helpful assistant. Keep replies brief.".to_string()
}

pub(super) fn default_min_user_chars() -> usize {
    10
}

pub(super) fn default_newline_handling() -> String {
    "strip".to_string()
}

pub(super) fn default_llm_provider() -> String {
    "dummy".to_string()
}

pub(super) fn default_openai_api_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

pub(super) fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

pub(super) fn default_openai_timeout_seconds() -> u64 {
    30
}
