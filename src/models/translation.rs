//! Localized header texts and speech locales

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fallback speech locale for languages without a mapping
pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub welcome: String,
    pub voice_prompt: String,
}

/// Language code to translated texts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationBundle(BTreeMap<String, Translation>);

impl TranslationBundle {
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Translation> {
        self.0.get(code)
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    /// Available language codes in sorted order
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Translation)> for TranslationBundle {
    fn from_iter<I: IntoIterator<Item = (String, Translation)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Speech capture/playback locale for a language code
#[must_use]
pub fn locale_for(language: &str) -> &'static str {
    match language {
        "te" => "te-IN",
        "hi" => "hi-IN",
        "ta" => "ta-IN",
        "kn" => "kn-IN",
        "ml" => "ml-IN",
        "en" => "en-US",
        _ => DEFAULT_LOCALE,
    }
}
