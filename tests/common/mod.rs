#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pronounce_rs::agents::AudioOutput;
use pronounce_rs::engines::elevenlabs::VoiceCatalog;
use pronounce_rs::pipeline::Pipeline;
use pronounce_rs::{AudioClip, BackendError, SpeechEngine, TextGenerator};

/// Canned model answers for one name.
#[derive(Clone)]
pub struct Answers {
    pub ethnicity: String,
    pub transliteration: String,
}

pub fn answers(ethnicity: &str, confidence: f64, native: Option<&str>, name: &str) -> Answers {
    let ethnicity_json = format!(
        "```json\n{{\"ethnicity\": \"{ethnicity}\", \"confidence\": {confidence}, \"alternatives\": [], \"details\": \"stub\"}}\n```"
    );
    let transliteration_json = match native {
        Some(script) => format!(
            "{{\"native_script\": \"{script}\", \"transliteration_successful\": true, \"details\": \"stub\"}}"
        ),
        None => format!(
            "{{\"native_script\": \"{name}\", \"transliteration_successful\": false, \"details\": \"stub\"}}"
        ),
    };
    Answers {
        ethnicity: ethnicity_json,
        transliteration: transliteration_json,
    }
}

/// Text generator that answers by looking up the quoted name in the prompt.
#[derive(Default)]
pub struct NameBookGenerator {
    book: HashMap<String, Answers>,
    calls: AtomicUsize,
}

impl NameBookGenerator {
    pub fn with(mut self, name: &str, answers: Answers) -> Self {
        self.book.insert(name.to_string(), answers);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for NameBookGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answers = self
            .book
            .iter()
            .find(|(name, _)| prompt.contains(&format!("Name: \"{name}\"")))
            .map(|(_, answers)| answers)
            .ok_or("unknown name")?;
        if prompt.contains("Ethnicity: \"") {
            Ok(answers.transliteration.clone())
        } else {
            Ok(answers.ethnicity.clone())
        }
    }
}

/// Speech engine returning a fixed payload and recording `(text, voice_id)`.
#[derive(Default)]
pub struct StubEngine {
    pub requests: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SpeechEngine for StubEngine {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<AudioClip, BackendError> {
        self.requests
            .lock()
            .unwrap()
            .push((text.to_string(), voice_id.to_string()));
        Ok(AudioClip {
            bytes: b"ID3stub".to_vec(),
            content_type: "audio/mpeg".to_string(),
        })
    }
}

pub fn stub_pipeline(
    generator: Arc<NameBookGenerator>,
    engine: Arc<StubEngine>,
    audio_dir: &std::path::Path,
) -> Pipeline {
    Pipeline::new(
        generator,
        engine,
        Arc::new(VoiceCatalog::default()),
        AudioOutput::new(audio_dir, "/static/audio"),
    )
}
