use async_trait::async_trait;
use derive_builder::Builder;
use serde::Serialize;

use crate::config::ElevenLabsConfig;
use crate::{AudioClip, BackendError, SpeechEngine};

const AUDIO_MPEG: &str = "audio/mpeg";

#[derive(thiserror::Error, Debug)]
pub enum ElevenLabsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ElevenLabs returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Invalid voice settings: {0}")]
    Settings(#[from] VoiceSettingsBuilderError),
    #[error("Invalid voice id {0:?}: expected letters, digits, '_' or '-'")]
    InvalidVoiceId(String),
}

/// Voice ids are interpolated into the request path, so only plain
/// `[A-Za-z0-9_-]+` ids are accepted.
pub fn is_valid_voice_id(voice_id: &str) -> bool {
    !voice_id.is_empty()
        && voice_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Voice-quality parameters sent with every synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[builder(default)]
pub struct VoiceSettings {
    /// Lower values give more expressive, less consistent speech. Range 0.0–1.0.
    pub stability: f32,
    /// How closely the output adheres to the original voice. Range 0.0–1.0.
    pub similarity_boost: f32,
    /// Speech speed multiplier.
    pub speed: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            speed: 1.0,
        }
    }
}

#[derive(Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

/// ElevenLabs text-to-speech client.
///
/// Each call is one `POST /v1/text-to-speech/{voice_id}` and returns the MP3
/// payload untouched.
///
/// ```rust,no_run
/// use pronounce_rs::{SpeechEngine, config::ElevenLabsConfig, engines::elevenlabs::ElevenLabsEngine};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let engine = ElevenLabsEngine::from_config(&ElevenLabsConfig::default(), "xi-key")?;
/// let clip = engine.synthesize("Siobhan", "21m00Tcm4TlvDq8ikWAM").await?;
/// println!("{} bytes", clip.bytes.len());
/// # Ok(())
/// # }
/// ```
pub struct ElevenLabsEngine {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model_id: String,
    settings: VoiceSettings,
}

impl ElevenLabsEngine {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model_id: impl Into<String>,
        settings: VoiceSettings,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model_id: model_id.into(),
            settings,
        }
    }

    /// Build an engine from the `[elevenlabs]` config table.
    pub fn from_config(config: &ElevenLabsConfig, api_key: &str) -> Result<Self, ElevenLabsError> {
        let settings = VoiceSettingsBuilder::default()
            .stability(config.stability)
            .similarity_boost(config.similarity_boost)
            .speed(config.speed)
            .build()?;
        Ok(Self::new(
            config.base_url.as_str(),
            api_key,
            config.model_id.as_str(),
            settings,
        ))
    }

    pub fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    /// Request speech for `text` and return the raw audio payload.
    pub async fn text_to_speech(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<AudioClip, ElevenLabsError> {
        if !is_valid_voice_id(voice_id) {
            return Err(ElevenLabsError::InvalidVoiceId(voice_id.to_string()));
        }
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, voice_id);
        let body = TtsRequest {
            text,
            model_id: &self.model_id,
            voice_settings: &self.settings,
        };

        log::debug!("ElevenLabs request: voice={voice_id}, {} chars", text.chars().count());

        let response = self
            .client
            .post(&url)
            .header("Accept", AUDIO_MPEG)
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ElevenLabsError::Status { status, body });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(AUDIO_MPEG)
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        Ok(AudioClip {
            bytes,
            content_type,
        })
    }
}

#[async_trait]
impl SpeechEngine for ElevenLabsEngine {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<AudioClip, BackendError> {
        Ok(self.text_to_speech(text, voice_id).await?)
    }
}
