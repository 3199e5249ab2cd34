//! Chat transcript model and thinking trace formatting.

use serde::Deserialize;

/// Reply payload from the message processing endpoint. Extra fields
/// the backend includes (session bookkeeping and the like) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessReply {
    pub response: String,
    #[serde(default)]
    pub thinking_trace: String,
}

/// Shown in place of a reply when the backend call fails
pub const FALLBACK_MESSAGE: &str = "Sorry, there was an error processing your message.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
    /// Reasoning trace attached to the preceding assistant reply
    Thinking,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Ordered chat history. Only reply handling appends non-user entries,
/// so a thinking entry always follows the assistant reply it belongs to.
#[derive(Debug, Default)]
pub struct Transcript {
    pub messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: content.into(),
        });
    }

    /// Fold a finished request into the transcript. A successful
    /// exchange always appends the reply and its trace entry, even when
    /// the trace came back empty, so every exchange has the same shape.
    /// Returns true when the exchange succeeded and the other panels
    /// should refresh.
    pub fn apply_reply(&mut self, result: Result<ProcessReply, String>) -> bool {
        match result {
            Ok(reply) => {
                self.messages.push(ChatMessage {
                    role: ChatRole::Assistant,
                    content: reply.response,
                });
                self.messages.push(ChatMessage {
                    role: ChatRole::Thinking,
                    content: format_thinking_trace(&reply.thinking_trace),
                });
                true
            }
            Err(err) => {
                tracing::warn!("Message processing failed: {}", err);
                self.messages.push(ChatMessage {
                    role: ChatRole::Assistant,
                    content: FALLBACK_MESSAGE.to_string(),
                });
                false
            }
        }
    }
}

/// Pretty-print a thinking trace for display. Traces usually arrive as
/// JSON wrapped in markdown code fences; strip the fences and reformat.
/// Anything that does not parse is shown untouched.
pub fn format_thinking_trace(raw: &str) -> String {
    let mut body = raw.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }

    match serde_json::from_str::<serde_json::Value>(body.trim()) {
        Ok(value) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string())
        }
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(response: &str, trace: &str) -> ProcessReply {
        ProcessReply {
            response: response.to_string(),
            thinking_trace: trace.to_string(),
        }
    }

    #[test]
    fn test_successful_exchange_appends_reply_and_trace() {
        let mut transcript = Transcript::new();
        transcript.push_user("why did it loop?");
        let refreshed = transcript.apply_reply(Ok(reply("It retried.", "{\"a\":1}")));

        assert!(refreshed);
        assert_eq!(transcript.messages.len(), 3);
        let roles: Vec<ChatRole> = transcript.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::User, ChatRole::Assistant, ChatRole::Thinking]
        );
    }

    #[test]
    fn test_empty_trace_still_appends_trace_entry() {
        let mut transcript = Transcript::new();
        transcript.push_user("hello");
        transcript.apply_reply(Ok(reply("hi", "")));

        assert_eq!(transcript.messages.len(), 3);
        assert_eq!(transcript.messages[2].role, ChatRole::Thinking);
        assert!(transcript.messages[2].content.is_empty());
    }

    #[test]
    fn test_missing_trace_field_deserializes_empty() {
        let reply: ProcessReply = serde_json::from_str(r#"{"response": "hi"}"#).unwrap();
        assert!(reply.thinking_trace.is_empty());
    }

    #[test]
    fn test_failure_appends_single_fallback_without_refresh() {
        let mut transcript = Transcript::new();
        transcript.push_user("hello");
        let refreshed = transcript.apply_reply(Err("connection refused".to_string()));

        assert!(!refreshed);
        assert_eq!(transcript.messages.len(), 2);
        assert_eq!(transcript.messages[1].role, ChatRole::Assistant);
        assert_eq!(transcript.messages[1].content, FALLBACK_MESSAGE);
    }

    #[test]
    fn test_thinking_never_appears_without_assistant_reply() {
        let mut transcript = Transcript::new();
        transcript.push_user("q1");
        transcript.apply_reply(Ok(reply("a1", "{\"step\":1}")));
        transcript.push_user("q2");
        transcript.apply_reply(Err("timeout".to_string()));
        transcript.push_user("q3");
        transcript.apply_reply(Ok(reply("a3", "done")));

        for (i, msg) in transcript.messages.iter().enumerate() {
            if msg.role == ChatRole::Thinking {
                assert_eq!(transcript.messages[i - 1].role, ChatRole::Assistant);
            }
        }
    }

    #[test]
    fn test_json_fence_is_stripped_and_pretty_printed() {
        let formatted = format_thinking_trace("```json\n{\"plan\":[\"read\",\"reply\"]}\n```");
        assert!(formatted.starts_with('{'));
        assert!(formatted.contains("\"plan\": ["));
        assert!(!formatted.contains("```"));
    }

    #[test]
    fn test_bare_fence_is_stripped() {
        let formatted = format_thinking_trace("```\n{\"a\": 1}\n```");
        assert_eq!(formatted, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_unfenced_json_is_pretty_printed() {
        let formatted = format_thinking_trace("{\"a\":1,\"b\":2}");
        assert!(formatted.contains("\"a\": 1"));
        assert!(formatted.contains('\n'));
    }

    #[test]
    fn test_non_json_trace_is_returned_raw() {
        let raw = "thinking about the retry budget...";
        assert_eq!(format_thinking_trace(raw), raw);
    }

    #[test]
    fn test_fenced_non_json_is_returned_raw() {
        let raw = "```json\nnot actually json\n```";
        assert_eq!(format_thinking_trace(raw), raw);
    }
}
