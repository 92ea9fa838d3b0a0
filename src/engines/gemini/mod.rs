//! Gemini text-generation client.
//!
//! Used by the ethnicity and transliteration agents. The client only moves
//! prompt text in and response text out; interpreting the response is left to
//! [`crate::extract`].

pub mod client;

pub use client::{GeminiClient, GeminiError};
