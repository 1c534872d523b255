use tracing::error;

use crate::error::ChatError;
use crate::groq::ChatClient;
use crate::transcript::Transcript;

/// Fixed notice committed as the assistant turn when transport fails, so the
/// conversation stays well-formed for the next request.
pub const FALLBACK_NOTICE: &str = "দুঃখিত, সংযোগে সমস্যা হচ্ছে।";

/// How one submitted turn ended. Either way the transcript gained exactly
/// one user turn and one assistant turn.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The stream completed; this text was committed.
    Completed(String),
    /// Transport failed; the fallback notice was committed instead. None of
    /// the partial accumulation reaches the transcript.
    Failed(ChatError),
}

/// One conversation: a transcript and the client that extends it.
///
/// `submit` takes `&mut self`, so a session can only ever have one exchange
/// in flight.
#[derive(Debug)]
pub struct ChatSession {
    transcript: Transcript,
    client: ChatClient,
}

impl ChatSession {
    pub fn new(client: ChatClient) -> Self {
        Self {
            transcript: Transcript::new(),
            client,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    /// Drop the conversation and start from the system prompt again.
    pub fn reset(&mut self) {
        self.transcript.reset();
    }

    /// Run one full exchange: commit the user turn, stream the reply, commit
    /// the final text, or the fallback notice when the stream fails.
    ///
    /// Empty input is the caller's guard; `text` arrives non-empty and is
    /// trimmed here so the committed turn is canonical.
    pub async fn submit<F>(&mut self, text: &str, on_delta: F) -> TurnOutcome
    where
        F: FnMut(&str),
    {
        let text = text.trim();
        debug_assert!(!text.is_empty(), "empty input is guarded before submit");

        self.transcript.append_user(text);
        let result = self
            .client
            .complete(self.transcript.snapshot(), on_delta)
            .await;
        match result {
            Ok(reply) => {
                self.transcript.append_assistant(reply.as_str());
                TurnOutcome::Completed(reply)
            }
            Err(err) => {
                error!(error = %err, "exchange failed, committing fallback notice");
                self.transcript.append_assistant(FALLBACK_NOTICE);
                TurnOutcome::Failed(err)
            }
        }
    }
}
