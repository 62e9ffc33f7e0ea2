//! Language model clients behind the `LanguageModel` seam.
//!
//! `GroqClient` talks to the hosted chat-completions API with a blocking
//! HTTP call. `ScriptedModel` answers from a fixed script for tests.

pub mod groq;
pub mod scripted;

pub use groq::GroqClient;
pub use scripted::ScriptedModel;
