//! Hosted model backends.
//!
//! # Available Engines
//!
//! - `gemini` - text generation, implements [`crate::TextGenerator`]
//! - `elevenlabs` - speech synthesis, implements [`crate::SpeechEngine`]

pub mod elevenlabs;
pub mod gemini;
