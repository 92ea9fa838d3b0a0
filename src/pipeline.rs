//! Detect → transliterate → synthesize.
//!
//! Every call runs the whole chain again; nothing is cached between calls.
//! Stages run strictly in sequence, and the fan-out variants only multiply
//! the synthesis stage.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agents::{
    AudioOutput, EthnicityClassifier, EthnicityPrediction, PronunciationResult,
    PronunciationSynthesizer, TransliterationResult, Transliterator,
};
use crate::config::{Credentials, ServiceConfig};
use crate::engines::elevenlabs::{ElevenLabsEngine, ElevenLabsError, VoiceCatalog, VoiceCategory};
use crate::engines::gemini::GeminiClient;
use crate::{SpeechEngine, TextGenerator};

/// A name to pronounce, with an optional caller-chosen voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameQuery {
    pub name: String,
    #[serde(default)]
    pub voice_id: Option<String>,
}

impl NameQuery {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            voice_id: None,
        }
    }

    pub fn with_voice(mut self, voice_id: &str) -> Self {
        self.voice_id = Some(voice_id.to_string());
        self
    }
}

/// Results of the first two stages.
#[derive(Debug, Clone, PartialEq)]
pub struct NameAnalysis {
    pub ethnicity: EthnicityPrediction,
    pub transliteration: TransliterationResult,
}

impl NameAnalysis {
    /// Text handed to the synthesizer: the native script when transliteration
    /// succeeded, otherwise the original name.
    pub fn synthesis_text<'a>(&'a self, name: &'a str) -> &'a str {
        if self.transliteration.success {
            &self.transliteration.native_script
        } else {
            name
        }
    }
}

/// All stage results for one query. `P` is a single result or a fan-out list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput<P> {
    pub ethnicity_result: EthnicityPrediction,
    pub transliteration_result: TransliterationResult,
    pub pronunciation_result: P,
}

/// Sequences the classifier, transliterator and synthesizer.
pub struct Pipeline {
    classifier: EthnicityClassifier,
    transliterator: Transliterator,
    synthesizer: PronunciationSynthesizer,
}

impl Pipeline {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        engine: Arc<dyn SpeechEngine>,
        catalog: Arc<VoiceCatalog>,
        output: AudioOutput,
    ) -> Self {
        Self {
            classifier: EthnicityClassifier::new(generator.clone()),
            transliterator: Transliterator::new(generator),
            synthesizer: PronunciationSynthesizer::new(engine, catalog, output),
        }
    }

    /// Build a pipeline against the hosted Gemini and ElevenLabs APIs.
    pub fn from_config(
        config: &ServiceConfig,
        credentials: &Credentials,
    ) -> Result<Self, ElevenLabsError> {
        let generator = GeminiClient::from_config(&config.gemini, &credentials.google_api_key);
        let engine =
            ElevenLabsEngine::from_config(&config.elevenlabs, &credentials.elevenlabs_api_key)?;
        Ok(Self::new(
            Arc::new(generator),
            Arc::new(engine),
            Arc::new(config.voices.clone()),
            AudioOutput::from(&config.paths),
        ))
    }

    pub fn voices(&self) -> &VoiceCatalog {
        self.synthesizer.catalog()
    }

    /// Run detection and transliteration.
    pub async fn analyze(&self, name: &str) -> NameAnalysis {
        let ethnicity = self.classifier.classify(name).await;
        let transliteration = self
            .transliterator
            .transliterate(name, &ethnicity.ethnicity)
            .await;
        NameAnalysis {
            ethnicity,
            transliteration,
        }
    }

    /// Synthesize the analysed name once, honoring an explicit voice.
    pub async fn pronounce(
        &self,
        name: &str,
        analysis: &NameAnalysis,
        voice_id: Option<&str>,
    ) -> PronunciationResult {
        self.synthesizer
            .synthesize(
                analysis.synthesis_text(name),
                &analysis.ethnicity.ethnicity,
                voice_id,
            )
            .await
    }

    /// Full chain with a single synthesis.
    pub async fn process(&self, query: &NameQuery) -> PipelineOutput<PronunciationResult> {
        let analysis = self.analyze(&query.name).await;
        let pronunciation = self
            .pronounce(&query.name, &analysis, query.voice_id.as_deref())
            .await;
        PipelineOutput {
            ethnicity_result: analysis.ethnicity,
            transliteration_result: analysis.transliteration,
            pronunciation_result: pronunciation,
        }
    }

    /// Full chain, synthesizing once per voice of `category`, in catalog order.
    pub async fn process_fan_out(
        &self,
        name: &str,
        category: VoiceCategory,
    ) -> PipelineOutput<Vec<PronunciationResult>> {
        let analysis = self.analyze(name).await;
        let mut results = Vec::with_capacity(self.voices().voices(category).len());
        for voice in self.voices().voices(category) {
            results.push(self.pronounce(name, &analysis, Some(voice.voice_id.as_str())).await);
        }
        log::info!(
            "Generated {} {:?} pronunciations for {name:?}",
            results.len(),
            category
        );
        PipelineOutput {
            ethnicity_result: analysis.ethnicity,
            transliteration_result: analysis.transliteration,
            pronunciation_result: results,
        }
    }
}
