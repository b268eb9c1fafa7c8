//! Dummy completion backend — echoes the last user message back prefixed
//! with `[echo]`.
//!
//! Exercises the full session round-trip without a network or API key.
//! Canned, failing, and delayed modes let tests drive the success,
//! failure, and in-flight paths offline.

use std::time::Duration;

use crate::llm::request::ChatCompletionRequest;
use crate::llm::{ClientError, CompletionResult};

#[derive(Debug, Clone)]
enum Mode {
    Echo,
    Canned(String),
    Fail(ClientError),
}

#[derive(Debug, Clone)]
pub struct DummyClient {
    mode: Mode,
    delay: Option<Duration>,
}

impl DummyClient {
    /// Echo the last user message back.
    pub fn echo() -> Self {
        Self { mode: Mode::Echo, delay: None }
    }

    /// Always reply with `content`.
    pub fn canned(content: impl Into<String>) -> Self {
        Self { mode: Mode::Canned(content.into()), delay: None }
    }

    /// Always fail with `error`.
    pub fn failing(error: ClientError) -> Self {
        Self { mode: Mode::Fail(error), delay: None }
    }

    /// Hold each request for `delay` before resolving, to keep the session
    /// observably in its awaiting state.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<CompletionResult, ClientError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.mode {
            Mode::Echo => {
                let last_user = request
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == "user")
                    .map(|m| m.content.as_str())
                    .unwrap_or_default();
                Ok(CompletionResult {
                    content: format!("[echo] {last_user}"),
                    usage: None,
                })
            }
            Mode::Canned(content) => Ok(CompletionResult {
                content: content.clone(),
                usage: None,
            }),
            Mode::Fail(error) => Err(error.clone()),
        }
    }
}
