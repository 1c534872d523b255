use serde::{Deserialize, Serialize};

/// Built-in system prompt seeded into every fresh transcript.
pub const SYSTEM_PROMPT: &str = r#"You are Songlap AI.

Primary language: Bangla.

Speaking style:
- Use natural, fluent, human Bangla.
- Avoid robotic, bookish or translation-style Bangla.
- Speak like a smart, friendly Bangladeshi person.

Greeting rules:
- Do not say "নমস্কার".
- Allowed greetings: "হ্যালো", "হাই", "আসসালামু আলাইকুম".

Branding:
Songlap AI is a software product.
It is crafted, developed and maintained by JR Torikul Islam.
Always keep the name exactly as: JR Torikul Islam.
Never translate or partially convert the name into Bangla.

Contact handling:
If the user asks how to contact the developer, give this official link:
https://jrtkl.netlify.app/

Behavior:
- Keep answers short and clear.
- No religious or spiritual terms.
- No corporate tone.
- Be practical and friendly."#;

/// Speaker of one conversational entry, in wire casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered conversation history: the system prompt followed by alternating
/// user/assistant turns.
///
/// The first turn is always the system prompt and is never removed, only
/// replaced wholesale by [`Transcript::reset`]. Turn alternation is the
/// caller's submission discipline; the store only guarantees order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::system(SYSTEM_PROMPT)],
        }
    }

    /// Start over with a fresh single-system-turn transcript.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Append a user turn. Callers guard empty input before getting here;
    /// the text arrives already trimmed.
    pub fn append_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    /// Append an assistant turn. Empty text is still appended: a stream that
    /// produced no content is a completed turn, not an error.
    pub fn append_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::assistant(text));
    }

    /// The full ordered turn sequence, used verbatim as the outbound request
    /// payload.
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, Transcript, Turn, SYSTEM_PROMPT};

    #[test]
    fn fresh_transcript_holds_only_the_system_prompt() {
        let transcript = Transcript::new();
        assert_eq!(transcript.snapshot(), &[Turn::system(SYSTEM_PROMPT)]);
    }

    #[test]
    fn appends_preserve_conversation_order() {
        let mut transcript = Transcript::new();
        transcript.append_user("hi");
        transcript.append_assistant("hello");
        transcript.append_user("how are you?");

        let roles: Vec<Role> = transcript
            .snapshot()
            .iter()
            .map(|turn| turn.role)
            .collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(transcript.snapshot()[1].content, "hi");
        assert_eq!(transcript.snapshot()[2].content, "hello");
    }

    #[test]
    fn empty_assistant_turn_is_still_appended() {
        let mut transcript = Transcript::new();
        transcript.append_user("hi");
        transcript.append_assistant("");
        assert_eq!(transcript.snapshot().len(), 3);
        assert_eq!(transcript.snapshot()[2], Turn::assistant(""));
    }

    #[test]
    fn reset_replaces_the_whole_history() {
        let mut transcript = Transcript::new();
        transcript.append_user("hi");
        transcript.append_assistant("hello");
        transcript.reset();
        assert_eq!(transcript.snapshot(), Transcript::new().snapshot());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut transcript = Transcript::new();
        transcript.reset();
        let once = transcript.clone();
        transcript.reset();
        assert_eq!(transcript, once);
        assert_eq!(transcript.snapshot().len(), 1);
        assert_eq!(transcript.snapshot()[0].role, Role::System);
    }

    #[test]
    fn roles_serialize_to_lowercase_wire_strings() {
        let value = serde_json::to_value(Turn::user("hi")).expect("turn serializes");
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"], "hi");
        assert_eq!(
            serde_json::to_value(Role::Assistant).expect("role serializes"),
            "assistant"
        );
        assert_eq!(
            serde_json::to_value(Role::System).expect("role serializes"),
            "system"
        );
    }
}
