use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A synthetic voice offered by the speech provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    /// Provider voice identifier, used in the synthesis URL.
    pub voice_id: String,
    /// Display name shown to users.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Voice {
    pub fn new(voice_id: &str, name: &str, description: Option<&str>) -> Self {
        Self {
            voice_id: voice_id.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }
}

/// Which half of the catalog a voice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceCategory {
    Specialized,
    General,
}

/// A catalog voice tagged with its category, as listed by `GET /voices`.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub voice: Voice,
    pub category: VoiceCategory,
}

/// Voice tables used for voice resolution and fan-out.
///
/// Deserialized from the `[voices]` table of the service config; every field
/// falls back to the built-in tables, so a partial table only overrides what
/// it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceCatalog {
    /// Voice used when neither a caller override nor an ethnicity mapping applies.
    pub default_voice_id: String,
    /// Voices tuned for particular origins.
    pub specialized: Vec<Voice>,
    /// General-purpose voices.
    pub general: Vec<Voice>,
    /// Ethnicity label to voice id. Keys are matched after trimming and lowercasing.
    pub ethnicity_voices: BTreeMap<String, String>,
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        let specialized = vec![
            Voice::new("MMT36IyAWQHYKeo728oe", "Amy", Some("Multilingual, East Asian names")),
            Voice::new(
                "m0ym3Tl23iHi7B3lTc2L",
                "Monica",
                Some("Multilingual, Iberian and Latin American names"),
            ),
            Voice::new("XB0fDUnXU5powFXDhCwa", "Charlotte", Some("Nordic names")),
            Voice::new("onwK4e9ZLuTAKqWW03F9", "Daniel", Some("British English names")),
        ];
        let general = vec![
            Voice::new("21m00Tcm4TlvDq8ikWAM", "Rachel", None),
            Voice::new("pNInz6obpgDQGcFmaJgB", "Adam", None),
            Voice::new("ErXwobaYiN019PkySvjV", "Antoni", None),
            Voice::new("EXAVITQu4vr4xnSDxMaL", "Bella", None),
            Voice::new("TxGEqnHWrfWFTfGW9XjX", "Josh", None),
        ];

        let mapping: &[(&str, &str)] = &[
            ("chinese", "MMT36IyAWQHYKeo728oe"),
            ("japanese", "MMT36IyAWQHYKeo728oe"),
            ("korean", "MMT36IyAWQHYKeo728oe"),
            ("vietnamese", "MMT36IyAWQHYKeo728oe"),
            ("spanish", "m0ym3Tl23iHi7B3lTc2L"),
            ("mexican", "m0ym3Tl23iHi7B3lTc2L"),
            ("portuguese", "m0ym3Tl23iHi7B3lTc2L"),
            ("brazilian", "m0ym3Tl23iHi7B3lTc2L"),
            ("swedish", "XB0fDUnXU5powFXDhCwa"),
            ("norwegian", "XB0fDUnXU5powFXDhCwa"),
            ("danish", "XB0fDUnXU5powFXDhCwa"),
            ("english", "onwK4e9ZLuTAKqWW03F9"),
            ("british", "onwK4e9ZLuTAKqWW03F9"),
        ];

        Self {
            default_voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(),
            specialized,
            general,
            ethnicity_voices: mapping
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Normalize an ethnicity label for table lookup.
pub fn normalize_ethnicity(ethnicity: &str) -> String {
    ethnicity.trim().to_lowercase()
}

impl VoiceCatalog {
    /// Look up the voice mapped to `ethnicity`, if any.
    pub fn voice_for_ethnicity(&self, ethnicity: &str) -> Option<&str> {
        let key = normalize_ethnicity(ethnicity);
        if key.is_empty() {
            return None;
        }
        self.ethnicity_voices
            .iter()
            .find(|(k, _)| normalize_ethnicity(k) == key)
            .map(|(_, id)| id.as_str())
    }

    /// Display name for a voice id from either half of the catalog.
    pub fn voice_name(&self, voice_id: &str) -> Option<&str> {
        self.specialized
            .iter()
            .chain(self.general.iter())
            .find(|v| v.voice_id == voice_id)
            .map(|v| v.name.as_str())
    }

    /// Voices of one category, in catalog order.
    pub fn voices(&self, category: VoiceCategory) -> &[Voice] {
        match category {
            VoiceCategory::Specialized => &self.specialized,
            VoiceCategory::General => &self.general,
        }
    }

    /// Specialized voices followed by general voices, each tagged with its category.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let tagged = |voices: &[Voice], category| {
            voices
                .iter()
                .map(move |voice| CatalogEntry {
                    voice: voice.clone(),
                    category,
                })
                .collect::<Vec<_>>()
        };
        let mut entries = tagged(&self.specialized, VoiceCategory::Specialized);
        entries.extend(tagged(&self.general, VoiceCategory::General));
        entries
    }

    /// Total number of voices across both categories.
    pub fn len(&self) -> usize {
        self.specialized.len() + self.general.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
