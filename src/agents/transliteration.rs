use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ethnicity::{ERROR_ETHNICITY, UNCERTAIN_ETHNICITY};
use crate::extract::extract_as;
use crate::TextGenerator;

const NO_ETHNICITY_DETAILS: &str = "Cannot transliterate without a clear ethnicity.";
const FAILURE_DETAILS: &str = "Failed to process transliteration model response.";

/// A name rendered in its native script, or the original when not applicable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransliterationResult {
    /// Native-script rendering. Equals the input name whenever `success` is false.
    pub native_script: String,
    #[serde(rename = "transliteration_successful")]
    pub success: bool,
    pub details: String,
}

impl TransliterationResult {
    /// Result that keeps `name` unchanged.
    pub fn fallback(name: &str, details: &str) -> Self {
        Self {
            native_script: name.to_string(),
            success: false,
            details: details.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawTransliteration {
    native_script: Option<String>,
    transliteration_successful: Option<bool>,
    details: Option<String>,
}

impl RawTransliteration {
    fn into_result(self, name: &str) -> TransliterationResult {
        let details = self.details.unwrap_or_default();
        let native = self
            .native_script
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        match (self.transliteration_successful, native) {
            (Some(true), Some(native_script)) => TransliterationResult {
                native_script,
                success: true,
                details,
            },
            _ => TransliterationResult::fallback(name, &details),
        }
    }
}

/// Ethnicities for which transliteration is skipped without a model call.
pub fn is_unresolved_ethnicity(ethnicity: &str) -> bool {
    ethnicity == ERROR_ETHNICITY || ethnicity == UNCERTAIN_ETHNICITY
}

/// Converts a romanized name into its native script with a text-generation model.
pub struct Transliterator {
    generator: Arc<dyn TextGenerator>,
}

impl Transliterator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn prompt(name: &str, ethnicity: &str) -> String {
        format!(
            r#"You convert romanized personal names into their native writing system.
Name: "{name}"
Ethnicity: "{ethnicity}"

Rules:
- Transliterate only. Do not add honorifics, titles or suffixes such as "san" or "ji".
- If the language is written in the Latin alphabet (e.g. English, Spanish, German, Irish),
  transliteration does not apply: return the name unchanged and mark it unsuccessful.
- If you are not confident in a native rendering, return the original name and mark it
  unsuccessful. A correct original is better than a wrong guess.

Answer with one JSON object and nothing else, using these keys:
- "native_script": the native-script name, or the original name if not converted
- "transliteration_successful": true only if a meaningful conversion was made
- "details": a short explanation

Example (converted):
{{"native_script": "李伟", "transliteration_successful": true, "details": "Common Mandarin given name and surname."}}

Example (not applicable):
{{"native_script": "John Smith", "transliteration_successful": false, "details": "English name already in Latin script."}}

JSON response:"#
        )
    }

    /// Transliterate `name` given its predicted `ethnicity`. Never fails.
    pub async fn transliterate(&self, name: &str, ethnicity: &str) -> TransliterationResult {
        if is_unresolved_ethnicity(ethnicity) {
            log::debug!("Skipping transliteration of {name:?}: ethnicity {ethnicity:?}");
            return TransliterationResult::fallback(name, NO_ETHNICITY_DETAILS);
        }

        let text = match self.generator.generate(&Self::prompt(name, ethnicity)).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Transliteration model call failed for {name:?}: {e}");
                return TransliterationResult::fallback(name, FAILURE_DETAILS);
            }
        };

        match extract_as::<RawTransliteration>(&text) {
            Ok(raw) => raw.into_result(name),
            Err(e) => {
                log::warn!("Could not parse transliteration response for {name:?}: {e}");
                TransliterationResult::fallback(name, FAILURE_DETAILS)
            }
        }
    }
}
