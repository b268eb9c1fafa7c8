//! Session controller — the transcript's single writer.
//!
//! The Idle/AwaitingResponse state lives in an atomic busy flag, checked
//! and set with compare-exchange as a hard precondition. A second
//! submission racing in through any call path is dropped before it can
//! touch the transcript; the disabled send control in the UI mirrors this
//! state but is not the guard.
//!
//! The completion call is the only suspension point. The transcript mutex
//! is never held across an await.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{NewlineHandling, RequestConfig, SessionConfig};
use crate::llm::{build_request, LlmClient};

use super::events::{EventReceiver, EventSender, SessionEvent, Submission};
use super::transcript::{Message, Transcript};

pub struct ChatSession {
    session_id: String,
    client: LlmClient,
    request: RequestConfig,
    min_user_chars: usize,
    newline: NewlineHandling,
    /// `true` while a completion request is in flight (`AwaitingResponse`).
    busy: AtomicBool,
    transcript: Mutex<Transcript>,
    events: EventSender,
}

impl ChatSession {
    /// Build a session with its dependencies injected — the client carries
    /// its own credential; nothing ambient. The transcript is seeded with
    /// the persona, and the returned receiver is the UI's end of the event
    /// protocol.
    pub fn new(
        client: LlmClient,
        request: RequestConfig,
        session: &SessionConfig,
    ) -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session_id = Uuid::new_v4().to_string();
        info!(%session_id, model = %request.model, "chat session created");
        (
            Self {
                session_id,
                client,
                request,
                min_user_chars: session.min_user_chars,
                newline: session.newline_handling,
                busy: AtomicBool::new(false),
                transcript: Mutex::new(Transcript::new(&session.persona)),
                events: tx,
            },
            rx,
        )
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// `false` while a request is in flight — the UI's send control mirrors this.
    pub fn send_enabled(&self) -> bool {
        !self.busy.load(Ordering::Acquire)
    }

    /// Ordered copy of the transcript as of this call.
    pub fn snapshot(&self) -> Vec<Message> {
        self.transcript_guard().snapshot()
    }

    /// Submit one user message and run the full round-trip.
    ///
    /// Returns immediately with a rejection when the session is busy or
    /// the input is below the minimum length; rejections change nothing.
    /// On acceptance the user message is appended at once, the assistant
    /// reply (or a failure notification) follows when the call resolves,
    /// and the session is Idle again by the time this future completes.
    pub async fn submit_user_message(&self, text: &str) -> Submission {
        // Atomic Idle -> AwaitingResponse transition.
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(session_id = %self.session_id, "submission dropped: request already in flight");
            return Submission::RejectedBusy;
        }

        if text.chars().count() < self.min_user_chars {
            self.busy.store(false, Ordering::Release);
            debug!(
                session_id = %self.session_id,
                len = text.chars().count(),
                min = self.min_user_chars,
                "submission dropped: below minimum length"
            );
            return Submission::RejectedTooShort;
        }

        self.emit(SessionEvent::SendEnabledChanged(false));

        let user = Message::user(text);
        let request = {
            let mut transcript = self.transcript_guard();
            transcript.append(user.clone());
            build_request(&transcript.snapshot(), &self.request)
        };
        self.emit(SessionEvent::MessageAppended(user));

        match self.client.complete(&request).await {
            Ok(result) => {
                if let Some(usage) = result.usage {
                    debug!(
                        session_id = %self.session_id,
                        input_tokens = usage.input_tokens,
                        output_tokens = usage.output_tokens,
                        "completion usage"
                    );
                }
                let content = normalize_newlines(&result.content, self.newline);
                let assistant = Message::assistant(content);
                self.transcript_guard().append(assistant.clone());
                self.emit(SessionEvent::MessageAppended(assistant));
            }
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "completion failed");
                self.emit(SessionEvent::Failure(e));
            }
        }

        self.busy.store(false, Ordering::Release);
        self.emit(SessionEvent::SendEnabledChanged(true));
        Submission::Accepted
    }

    /// Poisoning cannot leave a half-applied append; recover the guard.
    fn transcript_guard(&self) -> MutexGuard<'_, Transcript> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Non-blocking event emission. A closed receiver only logs.
    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            warn!(session_id = %self.session_id, "session event dropped: receiver closed");
        }
    }
}

/// Rewrite embedded line breaks in an assistant reply per the configured
/// representation.
fn normalize_newlines(content: &str, mode: NewlineHandling) -> String {
    match mode {
        NewlineHandling::Keep => content.to_string(),
        NewlineHandling::Strip => content.replace(['\n', '\r'], ""),
        NewlineHandling::Space => {
            let mut out = String::with_capacity(content.len());
            let mut in_break = false;
            for ch in content.chars() {
                if ch == '\n' || ch == '\r' {
                    if !in_break {
                        out.push(' ');
                        in_break = true;
                    }
                } else {
                    out.push(ch);
                    in_break = false;
                }
            }
            out
        }
    }
}
