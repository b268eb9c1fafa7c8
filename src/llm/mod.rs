//! Completion client boundary.
//!
//! [`LlmClient`] is an enum over concrete backends — enum dispatch avoids
//! `dyn` trait objects and the `async-trait` dependency. One request, one
//! response: even if a transport streams internally, this boundary yields
//! a single final message. Retry policy, if any, belongs to the caller;
//! none is implemented here.
//!
//! Client instances are shared immutable capabilities — clone them freely.

pub mod providers;
pub mod request;

use thiserror::Error;

pub use request::{build_request, ChatCompletionRequest, StopField, WireMessage};

// ── Error ────────────────────────────────────────────────────────────────────

/// Failure modes surfaced by a completion backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport-level failure before any HTTP exchange (DNS, connect, TLS).
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The request exceeded the configured deadline.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Non-success HTTP status from the endpoint.
    #[error("http {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Response body did not match the expected choice/message shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

// ── Result types ─────────────────────────────────────────────────────────────

/// Token counts reported by the provider, when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// One assistant completion. The role is implicitly `assistant`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

// ── Client enum ──────────────────────────────────────────────────────────────

/// All available completion backends.
///
/// Adding a backend = new module under `providers/` + new variant + new
/// `complete` arm.
#[derive(Debug, Clone)]
pub enum LlmClient {
    OpenAiCompatible(providers::openai_compatible::OpenAiCompatibleClient),
    Dummy(providers::dummy::DummyClient),
}

impl LlmClient {
    /// Send one request and return the parsed first-choice reply.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<CompletionResult, ClientError> {
        match self {
            LlmClient::OpenAiCompatible(c) => c.complete(request).await,
            LlmClient::Dummy(c) => c.complete(request).await,
        }
    }

    /// Probe endpoint reachability. Always `Ok` for the dummy backend.
    pub async fn ping(&self) -> Result<(), ClientError> {
        match self {
            LlmClient::OpenAiCompatible(c) => c.ping().await,
            LlmClient::Dummy(_) => Ok(()),
        }
    }
}
