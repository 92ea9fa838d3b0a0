//! # pronounce-rs
//!
//! A Rust service that tells you how a personal name is pronounced.
//!
//! ## Features
//!
//! - **Origin detection**: a hosted text-generation model predicts the ethnic origin of a name
//! - **Native script**: the same model renders the name in its native writing system when one exists
//! - **Pronunciation audio**: a hosted speech-synthesis API speaks the name with a voice picked
//!   for the detected origin
//! - **Admin store**: an in-memory list of names with review status for a demo admin panel
//!
//! ## Quick Start
//!
//! ```ignore
//! use pronounce_rs::{config::{Credentials, ServiceConfig}, pipeline::{NameQuery, Pipeline}};
//!
//! let config = ServiceConfig::default();
//! let credentials = Credentials::from_env()?;
//! let pipeline = Pipeline::from_config(&config, &credentials)?;
//!
//! let output = pipeline.process(&NameQuery::new("Siobhan")).await;
//! println!("{:?}", output.pronunciation_result.audio_reference);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod agents;
pub mod config;
pub mod engines;
pub mod extract;
pub mod pipeline;
pub mod server;
pub mod store;

use std::path::Path;

use async_trait::async_trait;

/// Boxed error returned by backend implementations.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Encoded audio returned by a speech engine.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Encoded audio payload, written to disk as-is
    pub bytes: Vec<u8>,
    /// MIME type reported for the payload (`audio/mpeg` for ElevenLabs)
    pub content_type: String,
}

impl AudioClip {
    /// Write the payload to `path`, replacing any existing file.
    pub async fn write_to(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::write(path, &self.bytes).await
    }

    /// File extension matching the content type.
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "audio/wav" | "audio/x-wav" => "wav",
            "audio/ogg" => "ogg",
            _ => "mp3",
        }
    }
}

/// Common interface for hosted text-generation models.
///
/// Implementations send a single prompt and return the raw model text. Callers
/// are responsible for interpreting the text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Common interface for speech-synthesis engines.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Synthesize `text` with the voice identified by `voice_id`.
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<AudioClip, BackendError>;
}
