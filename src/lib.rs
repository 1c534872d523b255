//! Terminal chat client for Groq's OpenAI-compatible streaming completions.
//!
//! The core is a streaming consumer and a transcript store: each user turn
//! sends the whole transcript, the response arrives as `data: ` framed JSON
//! lines terminated by `data: [DONE]`, and a residual byte buffer keeps
//! decoding correct no matter where network chunk boundaries fall. Transport
//! failure commits a fixed Bangla notice instead of partial output. The
//! binary wires this to a dialoguer prompt, an indicatif typing indicator,
//! and bat-rendered markdown.

pub mod commands;
pub mod error;
pub mod groq;
pub mod models;
pub mod render;
pub mod session;
pub mod sse;
pub mod transcript;

pub use error::ChatError;
pub use groq::{ChatClient, ClientConfig};
pub use session::{ChatSession, TurnOutcome, FALLBACK_NOTICE};
pub use sse::{SseLineParser, StreamFrame};
pub use transcript::{Role, Transcript, Turn, SYSTEM_PROMPT};
