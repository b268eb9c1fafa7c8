//! OpenAI-compatible chat-completions backend (`/v1/chat/completions`).
//!
//! Covers OpenAI and OpenAI-compatible local servers (Ollama, LM Studio…).
//! Constructed once at startup, then cheaply cloned because
//! `reqwest::Client` is an `Arc` internally. Response wire types are
//! private to this module — callers see [`CompletionResult`] only. The
//! request shape lives in [`crate::llm::request`] so the builder can be
//! tested without a transport.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, trace};

use crate::error::AppError;
use crate::llm::request::ChatCompletionRequest;
use crate::llm::{ClientError, CompletionResult, TokenUsage};

/// Hard timeout for the reachability probe, independent of the request timeout.
const PING_TIMEOUT_SECS: u64 = 5;

// ── Public client ────────────────────────────────────────────────────────────

/// Adapter for any HTTP endpoint implementing `/v1/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
    api_base_url: String,
    timeout_seconds: u64,
    api_key: Option<String>,
}

impl OpenAiCompatibleClient {
    /// Build a client from config values and an optional API key.
    ///
    /// `api_key` is `None` for keyless local endpoints. When present it is
    /// sent as `Authorization: Bearer <key>` on every request. The timeout
    /// rides on the request future itself — there is no polling.
    pub fn new(
        api_base_url: String,
        timeout_seconds: u64,
        api_key: Option<String>,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| AppError::Client(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, api_base_url, timeout_seconds, api_key })
    }

    /// Lightweight reachability probe.
    ///
    /// Sends a HEAD request to the configured endpoint. Any HTTP response
    /// (including 4xx) means the server is reachable; only a transport
    /// failure is reported.
    pub async fn ping(&self) -> Result<(), ClientError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(PING_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::NetworkUnavailable(format!("failed to build ping client: {e}")))?;

        let mut req = client.head(&self.api_base_url);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        req.send()
            .await
            .map(|_| ())
            .map_err(|e| transport_error(e, PING_TIMEOUT_SECS))
    }

    /// One request, one response. Reads exactly the first choice; never
    /// retries — retry policy belongs to the caller.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<CompletionResult, ClientError> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending completion request"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(request)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full request payload");
        }

        let mut req = self.client.post(&self.api_base_url).json(request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(|e| {
            error!(url = %self.api_base_url, error = %e, "completion request failed (transport)");
            transport_error(e, self.timeout_seconds)
        })?;

        let response = check_status(response).await?;

        let parsed = response.json::<ChatCompletionResponse>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize completion response");
            ClientError::MalformedResponse(format!("failed to parse response body: {e}"))
        })?;

        debug!(choices = parsed.choices.len(), "received completion response");

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                ClientError::MalformedResponse("missing choices[0].message.content".into())
            })?;

        let usage = parsed.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        Ok(CompletionResult { content, usage })
    }
}

// ── Error mapping ────────────────────────────────────────────────────────────

fn transport_error(e: reqwest::Error, timeout_seconds: u64) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout(timeout_seconds)
    } else {
        ClientError::NetworkUnavailable(e.to_string())
    }
}

/// Consume the response and return it if successful, or a structured error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    // Error envelope used by OpenAI and compatible APIs.
    let message = if let Ok(env) = serde_json::from_str::<ErrorEnvelope>(&body) {
        let code = env
            .error
            .code
            .map(|v| match v {
                serde_json::Value::String(s) => format!(" [code={s}]"),
                other => format!(" [code={other}]"),
            })
            .unwrap_or_default();
        format!("{}{code}", env.error.message)
    } else {
        body
    };

    error!(%status, %message, "completion request returned HTTP error");
    Err(ClientError::HttpError { status: status.as_u16(), message })
}

// ── Private wire types ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<UsageData>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageData {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<serde_json::Value>,
}
