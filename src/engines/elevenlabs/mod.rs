//! ElevenLabs speech-synthesis engine.
//!
//! Wraps the hosted text-to-speech endpoint and the voice tables used to pick
//! a voice for a name.
//!
//! # Request Shape
//!
//! ```text
//! POST {base_url}/v1/text-to-speech/{voice_id}
//! Accept: audio/mpeg
//! xi-api-key: <ELEVENLABS_API_KEY>
//!
//! {"text": "...", "model_id": "eleven_multilingual_v2",
//!  "voice_settings": {"stability": 0.5, "similarity_boost": 0.75, "speed": 1.0}}
//! ```
//!
//! # Voice Catalog
//!
//! | Table | Used by |
//! |---|---|
//! | `specialized` | `/pronounce/all` fan-out, `/voices` |
//! | `general` | `/pronounce/general` fan-out, `/voices` |
//! | `ethnicity_voices` | automatic voice selection |
//! | `default_voice_id` | fallback when no mapping matches |

pub mod engine;
pub mod voices;

pub use engine::{
    is_valid_voice_id, ElevenLabsEngine, ElevenLabsError, VoiceSettings, VoiceSettingsBuilder,
};
pub use voices::{CatalogEntry, Voice, VoiceCatalog, VoiceCategory};
