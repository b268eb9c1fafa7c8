//! Concrete completion backends plus the config-driven factory.

pub mod dummy;
pub mod openai_compatible;

use crate::config::LlmConfig;
use crate::error::AppError;

use super::LlmClient;

/// Build the client selected by `[llm] default`.
///
/// `api_key` comes from the `LLM_API_KEY` env var — never from TOML.
pub fn build(config: &LlmConfig, api_key: Option<String>) -> Result<LlmClient, AppError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmClient::Dummy(dummy::DummyClient::echo())),
        "openai" => Ok(LlmClient::OpenAiCompatible(
            openai_compatible::OpenAiCompatibleClient::new(
                config.openai.api_base_url.clone(),
                config.openai.timeout_seconds,
                api_key,
            )?,
        )),
        other => Err(AppError::Client(format!("unknown backend: {other}"))),
    }
}
