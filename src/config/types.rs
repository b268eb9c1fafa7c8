//! Public configuration types.
//!
//! These are the resolved, ready-to-use structs the session and client
//! consume. Raw TOML deserialization types live in `raw.rs`.

// ── Session ──────────────────────────────────────────────────────────────────

/// How assistant line breaks are rewritten before entering the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlineHandling {
    /// Remove line breaks entirely (single-line chat bubbles).
    #[default]
    Strip,
    /// Collapse each run of line breaks into one space.
    Space,
    /// Leave content untouched.
    Keep,
}

/// Per-session behaviour (`[session]`).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// System message seeded as the first transcript entry.
    pub persona: String,
    /// Opening line shown by the UI. Never enters the transcript.
    pub greeting: Option<String>,
    /// Minimum accepted user-input length, in characters.
    pub min_user_chars: usize,
    /// Post-processing applied to assistant replies.
    pub newline_handling: NewlineHandling,
}

// ── LLM ──────────────────────────────────────────────────────────────────────

/// Model and sampling parameters sent with every request of a session.
///
/// Immutable after session construction. `None` fields are omitted from
/// the payload entirely — nothing here is validated; out-of-range values
/// are the remote API's to reject.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    /// Model name passed in the request body.
    pub model: String,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u32>,
    /// Stop sequences, in order. Zero entries omits the field; exactly one
    /// is sent as a lone string; two or more as an array.
    pub stop: Vec<String>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub seed: Option<i64>,
}

/// OpenAI-compatible endpoint configuration (`[llm.openai]`).
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat-completions endpoint URL.
    pub api_base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Model plus sampling knobs sent in the request body.
    pub request: RequestConfig,
}

/// LLM client selection (`[llm]`).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which backend is active (`"dummy"`, `"openai"`).
    pub provider: String,
    /// Config for the OpenAI-compatible backend (`[llm.openai]`).
    pub openai: OpenAiConfig,
}

// ── Config (root) ────────────────────────────────────────────────────────────

/// Fully-resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub session: SessionConfig,
    pub llm: LlmConfig,
    /// API key from the `LLM_API_KEY` env var — never sourced from TOML.
    pub llm_api_key: Option<String>,
}
