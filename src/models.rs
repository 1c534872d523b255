use serde::{Deserialize, Serialize};

use crate::transcript::Turn;

/// Outbound chat-completions request body. The message list is the
/// transcript snapshot, borrowed rather than cloned.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Turn],
    pub stream: bool,
}

/// One decoded streaming chunk payload.
///
/// Every field defaults: providers interleave housekeeping chunks (role
/// announcements, finish markers) that carry no content, and those must
/// decode rather than kill the stream.
#[derive(Debug, Default, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatChunk {
    /// Text fragment carried by the first choice; empty when absent.
    pub fn into_fragment(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatChunk, ChatRequest};
    use crate::transcript::Turn;

    #[test]
    fn request_serializes_model_messages_and_stream_flag() {
        let turns = vec![Turn::system("be brief"), Turn::user("hi")];
        let request = ChatRequest {
            model: "llama-3.3-70b-versatile",
            messages: &turns,
            stream: true,
        };
        let value = serde_json::to_value(&request).expect("request serializes");
        assert_eq!(value["model"], "llama-3.3-70b-versatile");
        assert_eq!(value["stream"], true);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(
            value.as_object().expect("object").len(),
            3,
            "body carries exactly model, messages and stream"
        );
    }

    #[test]
    fn chunk_with_content_yields_its_fragment() {
        let chunk: ChatChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":"হ্যালো"}}]}"#)
                .expect("chunk parses");
        assert_eq!(chunk.into_fragment(), "হ্যালো");
    }

    #[test]
    fn contentless_chunks_yield_empty_fragments() {
        for payload in [
            r#"{"choices":[{"delta":{}}]}"#,
            r#"{"choices":[{"delta":{"role":"assistant"}}]}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":[{"delta":{"content":null}}]}"#,
            r#"{}"#,
        ] {
            let chunk: ChatChunk = serde_json::from_str(payload).expect("chunk parses");
            assert_eq!(chunk.into_fragment(), "", "payload: {payload}");
        }
    }

    #[test]
    fn only_the_first_choice_is_read() {
        let chunk: ChatChunk = serde_json::from_str(
            r#"{"choices":[{"delta":{"content":"a"}},{"delta":{"content":"b"}}]}"#,
        )
        .expect("chunk parses");
        assert_eq!(chunk.into_fragment(), "a");
    }
}
