//! Conversation session: transcript, controller, and the UI event protocol.

pub mod controller;
pub mod events;
pub mod transcript;

pub use controller::ChatSession;
pub use events::{EventReceiver, EventSender, SessionEvent, Submission};
pub use transcript::{Message, Role, Transcript};
