//! Scripted backends for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{AudioClip, BackendError, SpeechEngine, TextGenerator};

enum Script {
    Always(Result<String, String>),
    Queue(Mutex<VecDeque<String>>),
}

/// Text generator that returns canned replies and records prompts.
pub struct ScriptedGenerator {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Self::with_script(Script::Always(Ok(text.to_string())))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::with_script(Script::Always(Err(message.to_string())))
    }

    /// Replies in order; errors once the queue is exhausted.
    pub fn sequence(replies: &[&str]) -> Arc<Self> {
        let queue = replies.iter().map(|r| r.to_string()).collect();
        Self::with_script(Script::Queue(Mutex::new(queue)))
    }

    fn with_script(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.script {
            Script::Always(reply) => reply.clone().map_err(Into::into),
            Script::Queue(queue) => queue
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| "script exhausted".into()),
        }
    }
}

/// Speech engine that records requests and returns fixed audio.
pub struct RecordingEngine {
    failure: Option<String>,
    requests: Mutex<Vec<(String, String)>>,
}

impl RecordingEngine {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            failure: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// `(text, voice_id)` pairs in call order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechEngine for RecordingEngine {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<AudioClip, BackendError> {
        self.requests
            .lock()
            .unwrap()
            .push((text.to_string(), voice_id.to_string()));
        match &self.failure {
            Some(message) => Err(message.clone().into()),
            None => Ok(AudioClip {
                bytes: b"ID3fake-mp3".to_vec(),
                content_type: "audio/mpeg".to_string(),
            }),
        }
    }
}
