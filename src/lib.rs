//! Conversation-session core for LLM chat front-ends.
//!
//! The library owns the append-only message transcript, builds
//! chat-completion requests from it, dispatches them through a pluggable
//! completion client, and reconciles replies (or failures) back into the
//! transcript while notifying the UI layer through typed events.
//!
//! The binary in `main.rs` wires a console front-end around the library;
//! any other UI consumes the same [`session::SessionEvent`] protocol.

pub mod config;
pub mod error;
pub mod llm;
pub mod logger;
pub mod session;
