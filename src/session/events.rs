//! Session → UI event protocol.
//!
//! The controller emits [`SessionEvent`]s over an unbounded channel; the
//! UI owns the receiver. Unbounded is safe here — the event rate is
//! bounded by the one-outstanding-request rule.

use tokio::sync::mpsc;

use crate::llm::ClientError;
use super::transcript::Message;

/// Notifications the session controller emits for the UI layer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The send control should be greyed out (`false`) or re-enabled (`true`).
    SendEnabledChanged(bool),
    /// A message (user or assistant) was appended to the transcript.
    MessageAppended(Message),
    /// The completion call failed; no assistant message was appended.
    Failure(ClientError),
}

/// Outcome of a submit call. Rejections are no-ops — the transcript and
/// session state are untouched — and are not surfaced as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Accepted,
    /// A request is already in flight; the input was dropped.
    RejectedBusy,
    /// Input was shorter than the configured minimum.
    RejectedTooShort,
}

pub type EventSender = mpsc::UnboundedSender<SessionEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<SessionEvent>;
