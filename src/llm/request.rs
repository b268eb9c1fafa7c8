//! Chat-completions request types and the request builder.
//!
//! [`build_request`] is a pure mapping from a transcript snapshot plus the
//! session's fixed [`RequestConfig`] to the outbound payload shape. No
//! I/O, no validation — out-of-range sampling values are the remote API's
//! to reject.

use serde::Serialize;

use crate::config::RequestConfig;
use crate::session::Message;

// ── Wire types ───────────────────────────────────────────────────────────────

/// `{role, content}` pair as the provider expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

/// The `stop` field serialises as a lone string when exactly one sequence
/// is configured and as an array otherwise — some providers distinguish
/// the two shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StopField {
    One(String),
    Many(Vec<String>),
}

/// Outbound chat-completions payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<StopField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

// ── Builder ──────────────────────────────────────────────────────────────────

/// Build the outbound payload from a transcript snapshot and the session's
/// request configuration. Message order is preserved; absent sampling
/// knobs are omitted from the payload entirely.
pub fn build_request(messages: &[Message], config: &RequestConfig) -> ChatCompletionRequest {
    let stop = match config.stop.len() {
        0 => None,
        1 => Some(StopField::One(config.stop[0].clone())),
        _ => Some(StopField::Many(config.stop.clone())),
    };

    ChatCompletionRequest {
        model: config.model.clone(),
        messages: messages
            .iter()
            .map(|m| WireMessage { role: m.role.as_str(), content: m.content.clone() })
            .collect(),
        temperature: config.temperature,
        top_p: config.top_p,
        max_tokens: config.max_tokens,
        stop,
        frequency_penalty: config.frequency_penalty,
        presence_penalty: config.presence_penalty,
        seed: config.seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Message;

    fn config_with_stop(stop: &[&str]) -> RequestConfig {
        RequestConfig {
            model: "gpt-3.5-turbo".to_string(),
            temperature: Some(0.1),
            top_p: None,
            max_tokens: Some(100),
            stop: stop.iter().map(|s| s.to_string()).collect(),
            frequency_penalty: None,
            presence_penalty: None,
            seed: None,
        }
    }

    fn messages() -> Vec<Message> {
        vec![
            Message::system("persona"),
            Message::user("Tell me a short joke"),
        ]
    }

    #[test]
    fn maps_messages_in_order() {
        let req = build_request(&messages(), &config_with_stop(&[]));
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[0].content, "persona");
        assert_eq!(req.messages[1].role, "user");
        assert_eq!(req.messages[1].content, "Tell me a short joke");
    }

    #[test]
    fn build_is_pure() {
        let msgs = messages();
        let cfg = config_with_stop(&["END"]);
        assert_eq!(build_request(&msgs, &cfg), build_request(&msgs, &cfg));
    }

    #[test]
    fn zero_stop_sequences_omit_field() {
        let req = build_request(&messages(), &config_with_stop(&[]));
        assert_eq!(req.stop, None);

        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("stop").is_none());
    }

    #[test]
    fn one_stop_sequence_is_a_lone_string() {
        let req = build_request(&messages(), &config_with_stop(&["END"]));
        assert_eq!(req.stop, Some(StopField::One("END".to_string())));

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["stop"], serde_json::json!("END"));
    }

    #[test]
    fn many_stop_sequences_are_an_ordered_array() {
        let req = build_request(&messages(), &config_with_stop(&["a", "b", "c"]));

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["stop"], serde_json::json!(["a", "b", "c"]));
    }

    #[test]
    fn absent_knobs_are_omitted() {
        let mut cfg = config_with_stop(&[]);
        cfg.temperature = None;
        cfg.max_tokens = None;

        let json = serde_json::to_value(build_request(&messages(), &cfg)).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("top_p").is_none());
        assert!(json.get("frequency_penalty").is_none());
        assert!(json.get("presence_penalty").is_none());
        assert!(json.get("seed").is_none());
    }

    #[test]
    fn present_knobs_pass_through_unmodified() {
        let mut cfg = config_with_stop(&[]);
        cfg.temperature = Some(-3.5); // invalid on purpose — not ours to reject
        cfg.seed = Some(42);

        let json = serde_json::to_value(build_request(&messages(), &cfg)).unwrap();
        assert_eq!(json["temperature"], serde_json::json!(-3.5));
        assert_eq!(json["seed"], serde_json::json!(42));
        assert_eq!(json["max_tokens"], serde_json::json!(100));
    }
}
