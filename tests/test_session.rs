//! End-to-end session tests over the dummy backend: transcript growth,
//! the busy guard, event ordering, and failure handling.

use std::sync::Arc;
use std::time::Duration;

use banyan_chat::config::{NewlineHandling, RequestConfig, SessionConfig};
use banyan_chat::llm::providers::dummy::DummyClient;
use banyan_chat::llm::{ClientError, LlmClient};
use banyan_chat::session::{ChatSession, EventReceiver, Role, SessionEvent, Submission};

fn request_config() -> RequestConfig {
    RequestConfig {
        model: "gpt-3.5-turbo".to_string(),
        temperature: Some(0.1),
        top_p: None,
        max_tokens: Some(100),
        stop: Vec::new(),
        frequency_penalty: None,
        presence_penalty: None,
        seed: None,
    }
}

fn session_config() -> SessionConfig {
    SessionConfig {
        persona: "You are a test persona.".to_string(),
        greeting: None,
        min_user_chars: 10,
        newline_handling: NewlineHandling::Strip,
    }
}

fn drain(events: &mut EventReceiver) -> Vec<SessionEvent> {
    let mut out = Vec::new();
    while let Ok(e) = events.try_recv() {
        out.push(e);
    }
    out
}

#[tokio::test]
async fn successful_round_trip_grows_transcript_by_two() {
    let client = LlmClient::Dummy(DummyClient::canned("Why did..."));
    let (session, mut events) = ChatSession::new(client, request_config(), &session_config());

    assert!(session.send_enabled());
    assert_eq!(session.snapshot().len(), 1);

    let outcome = session.submit_user_message("Tell me a short joke").await;
    assert_eq!(outcome, Submission::Accepted);

    let snap = session.snapshot();
    assert_eq!(snap.len(), 3);
    assert_eq!(snap[0].role, Role::System);
    assert_eq!(snap[0].content, "You are a test persona.");
    assert_eq!(snap[1].role, Role::User);
    assert_eq!(snap[1].content, "Tell me a short joke");
    assert_eq!(snap[2].role, Role::Assistant);
    assert_eq!(snap[2].content, "Why did...");

    assert!(session.send_enabled());

    let got = drain(&mut events);
    assert_eq!(got.len(), 4);
    assert!(matches!(got[0], SessionEvent::SendEnabledChanged(false)));
    assert!(matches!(&got[1], SessionEvent::MessageAppended(m) if m.role == Role::User));
    assert!(matches!(&got[2], SessionEvent::MessageAppended(m) if m.role == Role::Assistant));
    assert!(matches!(got[3], SessionEvent::SendEnabledChanged(true)));
}

#[tokio::test]
async fn too_short_input_is_a_noop() {
    let client = LlmClient::Dummy(DummyClient::echo());
    let (session, mut events) = ChatSession::new(client, request_config(), &session_config());

    let outcome = session.submit_user_message("hi").await;
    assert_eq!(outcome, Submission::RejectedTooShort);

    assert_eq!(session.snapshot().len(), 1);
    assert!(session.send_enabled());
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn minimum_length_is_configurable() {
    let client = LlmClient::Dummy(DummyClient::echo());
    let mut cfg = session_config();
    cfg.min_user_chars = 2;
    let (session, _events) = ChatSession::new(client, request_config(), &cfg);

    assert_eq!(session.submit_user_message("hi").await, Submission::Accepted);
    assert_eq!(session.snapshot().len(), 3);
}

#[tokio::test]
async fn failure_leaves_user_message_and_recovers() {
    let client = LlmClient::Dummy(DummyClient::failing(ClientError::HttpError {
        status: 500,
        message: "internal".into(),
    }));
    let (session, mut events) = ChatSession::new(client, request_config(), &session_config());

    let outcome = session.submit_user_message("Tell me a short joke").await;
    assert_eq!(outcome, Submission::Accepted);

    // No assistant entry; the user's message stays.
    let snap = session.snapshot();
    assert_eq!(snap.len(), 2);
    assert_eq!(snap[1].role, Role::User);

    assert!(session.send_enabled());

    let got = drain(&mut events);
    assert_eq!(got.len(), 4);
    assert!(matches!(got[0], SessionEvent::SendEnabledChanged(false)));
    assert!(matches!(&got[1], SessionEvent::MessageAppended(m) if m.role == Role::User));
    assert!(matches!(
        &got[2],
        SessionEvent::Failure(ClientError::HttpError { status: 500, .. })
    ));
    assert!(matches!(got[3], SessionEvent::SendEnabledChanged(true)));

    // The session stays usable — a retry adds a fresh user turn.
    session.submit_user_message("Tell me another one").await;
    assert_eq!(session.snapshot().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn second_submission_while_awaiting_is_dropped() {
    let client = LlmClient::Dummy(
        DummyClient::canned("slow reply").with_delay(Duration::from_millis(50)),
    );
    let (session, _events) = ChatSession::new(client, request_config(), &session_config());
    let session = Arc::new(session);

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.submit_user_message("Tell me a short joke").await }
    });

    // Let the first submission reach its in-flight await.
    tokio::task::yield_now().await;
    assert!(!session.send_enabled());

    let second = session.submit_user_message("And another thing...").await;
    assert_eq!(second, Submission::RejectedBusy);
    assert_eq!(session.snapshot().len(), 2); // system + first user only

    assert_eq!(first.await.unwrap(), Submission::Accepted);
    assert_eq!(session.snapshot().len(), 3);
    assert!(session.send_enabled());
}

#[tokio::test(start_paused = true)]
async fn racing_submissions_accept_exactly_one() {
    let client = LlmClient::Dummy(
        DummyClient::canned("reply").with_delay(Duration::from_millis(10)),
    );
    let (session, _events) = ChatSession::new(client, request_config(), &session_config());
    let session = Arc::new(session);

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let session = session.clone();
            tokio::spawn(async move {
                session
                    .submit_user_message(&format!("racing submission {i}"))
                    .await
            })
        })
        .collect();

    let mut accepted = 0;
    for t in tasks {
        if t.await.unwrap() == Submission::Accepted {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(session.snapshot().len(), 3);
}

#[tokio::test]
async fn assistant_line_breaks_are_normalized() {
    let client = LlmClient::Dummy(DummyClient::canned("Why did\nthe chicken\r\ncross?"));
    let (session, _events) = ChatSession::new(client, request_config(), &session_config());

    session.submit_user_message("Tell me a short joke").await;
    assert_eq!(
        session.snapshot()[2].content,
        "Why didthe chickencross?"
    );
}

#[tokio::test]
async fn keep_mode_preserves_line_breaks() {
    let client = LlmClient::Dummy(DummyClient::canned("line one\nline two"));
    let mut cfg = session_config();
    cfg.newline_handling = NewlineHandling::Keep;
    let (session, _events) = ChatSession::new(client, request_config(), &cfg);

    session.submit_user_message("Tell me a short joke").await;
    assert_eq!(session.snapshot()[2].content, "line one\nline two");
}

#[tokio::test]
async fn echo_backend_sees_full_history() {
    let client = LlmClient::Dummy(DummyClient::echo());
    let (session, _events) = ChatSession::new(client, request_config(), &session_config());

    session.submit_user_message("first message here").await;
    session.submit_user_message("second message here").await;

    let snap = session.snapshot();
    assert_eq!(snap.len(), 5);
    assert_eq!(snap[4].content, "[echo] second message here");
}

#[tokio::test]
async fn dropped_receiver_does_not_break_the_session() {
    let client = LlmClient::Dummy(DummyClient::canned("still works"));
    let (session, events) = ChatSession::new(client, request_config(), &session_config());
    drop(events);

    let outcome = session.submit_user_message("Tell me a short joke").await;
    assert_eq!(outcome, Submission::Accepted);
    assert_eq!(session.snapshot().len(), 3);
}
