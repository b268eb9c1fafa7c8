//! Configuration loading with env-var overrides.
//!
//! Reads a TOML file (explicit path, or `config/default.toml` when
//! present) and applies the `BANYAN_LOG_LEVEL` env override. The API
//! credential comes only from `LLM_API_KEY` — never from TOML.

use std::env;
use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::logger;

use super::raw::RawConfig;
use super::types::*;

/// Load config from the given path, or `config/default.toml`, then apply
/// env-var overrides. If no path is given and `config/default.toml` does
/// not exist, returns a hardcoded minimal default.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let log_level_override = env::var("BANYAN_LOG_LEVEL").ok();

    if let Some(path) = config_path {
        return load_from(Path::new(path), log_level_override.as_deref());
    }

    let default_path = Path::new("config/default.toml");
    if default_path.exists() {
        load_from(default_path, log_level_override.as_deref())
    } else {
        // Hardcoded minimal default — dummy backend, no network needed.
        let log_level = log_level_override.unwrap_or_else(|| "info".to_string());
        Ok(Config {
            log_level,
            session: SessionConfig {
                persona: "You are a helpful assistant. Keep replies brief.".to_string(),
                greeting: None,
                min_user_chars: 10,
                newline_handling: NewlineHandling::Strip,
            },
            llm: LlmConfig {
                provider: "dummy".to_string(),
                openai: OpenAiConfig {
                    api_base_url: "https://api.openai.com/v1/chat/completions".to_string(),
                    timeout_seconds: 30,
                    request: RequestConfig {
                        model: "gpt-3.5-turbo".to_string(),
                        temperature: Some(0.1),
                        top_p: None,
                        max_tokens: Some(100),
                        stop: Vec::new(),
                        frequency_penalty: None,
                        presence_penalty: None,
                        seed: None,
                    },
                },
            },
            llm_api_key: env::var("LLM_API_KEY").ok(),
        })
    }
}

/// Internal loader — accepts an explicit path and an optional level
/// override. Tests pass the override directly instead of mutating env vars.
pub fn load_from(path: &Path, log_level_override: Option<&str>) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let log_level = log_level_override
        .unwrap_or(&parsed.app.log_level)
        .to_string();
    // Fail on an unusable level now, not at subscriber install time.
    logger::parse_level(&log_level)?;

    let newline_handling = parse_newline_handling(&parsed.session.newline_handling)?;

    Ok(Config {
        log_level,
        session: SessionConfig {
            persona: parsed.session.persona,
            greeting: parsed.session.greeting,
            min_user_chars: parsed.session.min_user_chars,
            newline_handling,
        },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                timeout_seconds: parsed.llm.openai.timeout_seconds,
                request: RequestConfig {
                    model: parsed.llm.openai.model,
                    temperature: parsed.llm.openai.temperature,
                    top_p: parsed.llm.openai.top_p,
                    max_tokens: parsed.llm.openai.max_tokens,
                    stop: parsed.llm.openai.stop,
                    frequency_penalty: parsed.llm.openai.frequency_penalty,
                    presence_penalty: parsed.llm.openai.presence_penalty,
                    seed: parsed.llm.openai.seed,
                },
            },
        },
        llm_api_key: env::var("LLM_API_KEY").ok(),
    })
}

fn parse_newline_handling(value: &str) -> Result<NewlineHandling, AppError> {
    match value {
        "strip" => Ok(NewlineHandling::Strip),
        "space" => Ok(NewlineHandling::Space),
        "keep" => Ok(NewlineHandling::Keep),
        other => Err(AppError::Config(format!(
            "unrecognised newline_handling: '{other}' (expected strip, space, or keep)"
        ))),
    }
}
