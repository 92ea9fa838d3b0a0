use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::extract::extract_as;
use crate::TextGenerator;

/// Ethnicity reported when classification failed.
pub const ERROR_ETHNICITY: &str = "Error";
/// Ethnicity reported when an upstream agent declined to decide.
pub const UNCERTAIN_ETHNICITY: &str = "Uncertain (Agent)";

const FAILURE_DETAILS: &str = "Failed to parse response from the AI model.";

/// Predicted origin of a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthnicityPrediction {
    pub ethnicity: String,
    /// Model confidence, clamped to `[0, 1]`.
    pub confidence: f64,
    pub alternatives: Vec<String>,
    pub details: String,
}

impl EthnicityPrediction {
    /// Sentinel returned when the model call or its parsing fails.
    pub fn failure() -> Self {
        Self {
            ethnicity: ERROR_ETHNICITY.to_string(),
            confidence: 0.0,
            alternatives: Vec::new(),
            details: FAILURE_DETAILS.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.ethnicity == ERROR_ETHNICITY
    }
}

/// Model payload before normalization; tolerates nulls and missing keys.
#[derive(Deserialize)]
struct RawPrediction {
    ethnicity: String,
    confidence: Option<f64>,
    alternatives: Option<Vec<String>>,
    details: Option<String>,
}

impl From<RawPrediction> for EthnicityPrediction {
    fn from(raw: RawPrediction) -> Self {
        let confidence = raw
            .confidence
            .filter(|c| c.is_finite())
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);
        Self {
            ethnicity: raw.ethnicity.trim().to_string(),
            confidence,
            alternatives: raw.alternatives.unwrap_or_default(),
            details: raw.details.unwrap_or_default(),
        }
    }
}

/// Predicts the ethnic origin of a personal name with a text-generation model.
pub struct EthnicityClassifier {
    generator: Arc<dyn TextGenerator>,
}

impl EthnicityClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Prompt asking for a single JSON object describing the name's origin.
    pub fn prompt(name: &str) -> String {
        format!(
            r#"Determine the most likely ethnic or linguistic origin of the personal name below.
Name: "{name}"

Answer with one JSON object and nothing else, using these keys:
- "ethnicity": the most probable origin, e.g. "Japanese", "Irish", "Hindi"
- "confidence": a number between 0.0 and 1.0
- "alternatives": a list of other plausible origins
- "details": one or two sentences explaining the choice

Example:
{{
  "ethnicity": "Irish",
  "confidence": 0.85,
  "alternatives": ["Scottish", "Welsh"],
  "details": "Siobhan is a Gaelic given name of Irish origin."
}}

JSON response:"#
        )
    }

    /// Classify `name`. Never fails: transport and parse errors yield
    /// [`EthnicityPrediction::failure`].
    pub async fn classify(&self, name: &str) -> EthnicityPrediction {
        let text = match self.generator.generate(&Self::prompt(name)).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Ethnicity model call failed for {name:?}: {e}");
                return EthnicityPrediction::failure();
            }
        };

        match extract_as::<RawPrediction>(&text) {
            Ok(raw) => {
                let prediction = EthnicityPrediction::from(raw);
                log::info!(
                    "Detected {:?} for {name:?} (confidence {:.2})",
                    prediction.ethnicity,
                    prediction.confidence
                );
                prediction
            }
            Err(e) => {
                log::warn!("Could not parse ethnicity response for {name:?}: {e}");
                EthnicityPrediction::failure()
            }
        }
    }
}
