//! The three pipeline stages.
//!
//! Each agent wraps one backend call and always returns a value: upstream and
//! parse failures become sentinel results with a readable `details` string,
//! so later stages can keep going.

pub mod ethnicity;
pub mod pronunciation;
pub mod transliteration;

#[cfg(test)]
pub(crate) mod testing;

pub use ethnicity::{EthnicityClassifier, EthnicityPrediction, ERROR_ETHNICITY, UNCERTAIN_ETHNICITY};
pub use pronunciation::{
    resolve_voice, AudioOutput, PronunciationResult, PronunciationSynthesizer, SelectionMethod,
    SynthesisStatus, VoiceSelection,
};
pub use transliteration::{TransliterationResult, Transliterator};
