use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PathsConfig;
use crate::engines::elevenlabs::VoiceCatalog;
use crate::{AudioClip, SpeechEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisStatus {
    Success,
    Error,
}

/// How the voice for a synthesis call was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    /// The caller named the voice.
    Manual,
    /// The detected ethnicity has a mapped voice.
    AutomaticSpecific,
    /// Nothing matched; the catalog default was used.
    AutomaticDefault,
}

/// Outcome of one synthesis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PronunciationResult {
    /// URL path of the saved audio, `None` on error.
    #[serde(rename = "audio_output")]
    pub audio_reference: Option<String>,
    pub status: SynthesisStatus,
    pub details: String,
    #[serde(rename = "voice_id_used")]
    pub voice_used: Option<String>,
    pub selection_method: SelectionMethod,
    pub voice_name: Option<String>,
}

impl PronunciationResult {
    pub fn is_success(&self) -> bool {
        self.status == SynthesisStatus::Success
    }
}

/// A resolved voice and the rule that picked it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSelection {
    pub voice_id: String,
    pub method: SelectionMethod,
}

/// Pick a voice: explicit override, then ethnicity mapping, then default.
///
/// A blank override counts as absent.
pub fn resolve_voice(
    catalog: &VoiceCatalog,
    ethnicity: &str,
    voice_id: Option<&str>,
) -> VoiceSelection {
    if let Some(id) = voice_id.map(str::trim).filter(|id| !id.is_empty()) {
        return VoiceSelection {
            voice_id: id.to_string(),
            method: SelectionMethod::Manual,
        };
    }
    match catalog.voice_for_ethnicity(ethnicity) {
        Some(id) => VoiceSelection {
            voice_id: id.to_string(),
            method: SelectionMethod::AutomaticSpecific,
        },
        None => VoiceSelection {
            voice_id: catalog.default_voice_id.clone(),
            method: SelectionMethod::AutomaticDefault,
        },
    }
}

/// Where audio files go and how they are addressed.
#[derive(Debug, Clone)]
pub struct AudioOutput {
    pub dir: PathBuf,
    pub url_prefix: String,
}

impl AudioOutput {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Write `clip` under a fresh unique name and return its URL path.
    async fn persist(&self, clip: &AudioClip) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let filename = format!("pronunciation_{}.{}", Uuid::new_v4(), clip.extension());
        clip.write_to(&self.dir.join(&filename)).await?;
        Ok(format!("{}/{}", self.url_prefix, filename))
    }
}

impl From<&PathsConfig> for AudioOutput {
    fn from(paths: &PathsConfig) -> Self {
        Self::new(&paths.audio_dir, &paths.audio_url_prefix)
    }
}

/// Speaks a name with a voice chosen for its origin and saves the audio.
pub struct PronunciationSynthesizer {
    engine: Arc<dyn SpeechEngine>,
    catalog: Arc<VoiceCatalog>,
    output: AudioOutput,
}

impl PronunciationSynthesizer {
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        catalog: Arc<VoiceCatalog>,
        output: AudioOutput,
    ) -> Self {
        Self {
            engine,
            catalog,
            output,
        }
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// Synthesize `text`. Never fails: engine and file errors produce a
    /// result with `status = error` that still reports the resolved voice.
    pub async fn synthesize(
        &self,
        text: &str,
        ethnicity: &str,
        voice_id: Option<&str>,
    ) -> PronunciationResult {
        let selection = resolve_voice(&self.catalog, ethnicity, voice_id);
        let voice_name = self.catalog.voice_name(&selection.voice_id).map(str::to_string);
        log::info!(
            "Generating speech for {text:?} with voice {} ({:?})",
            selection.voice_id,
            selection.method
        );

        let outcome = match self.engine.synthesize(text, &selection.voice_id).await {
            Ok(clip) => self
                .output
                .persist(&clip)
                .await
                .map_err(|e| format!("Failed to save audio file. {e}")),
            Err(e) => Err(format!("Failed to generate audio via API call. {e}")),
        };

        let (audio_reference, status, details) = match outcome {
            Ok(path) => (
                Some(path),
                SynthesisStatus::Success,
                format!("Audio generated for '{text}'."),
            ),
            Err(details) => {
                log::warn!("Speech synthesis for {text:?} failed: {details}");
                (None, SynthesisStatus::Error, details)
            }
        };

        PronunciationResult {
            audio_reference,
            status,
            details,
            voice_used: Some(selection.voice_id),
            selection_method: selection.method,
            voice_name,
        }
    }
}
