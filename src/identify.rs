//! Fish image identification
//!
//! [`SimulatedClassifier`] is a stand-in: it performs no inference and picks
//! a random species with a random confidence. A real model plugs in through
//! the [`Classifier`] trait without touching the rest of the app.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngExt;
use serde::{Deserialize, Serialize};

use crate::models::FishSpecies;
use crate::{AquaScopeError, Result};

/// Confidence range reported by the simulator, in percent
pub const SIMULATED_CONFIDENCE: std::ops::RangeInclusive<u8> = 70..=99;

/// Uploaded file as received from a picker or drag and drop
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Only the MIME type is checked
    pub fn validate(&self) -> Result<()> {
        if self.mime_type.starts_with("image/") {
            Ok(())
        } else {
            Err(AquaScopeError::invalid_file_type(&self.mime_type))
        }
    }

    /// Local preview, no network round trip
    #[must_use]
    pub fn preview(&self) -> ImagePreview {
        ImagePreview {
            file_name: self.name.clone(),
            data_url: format!(
                "data:{};base64,{}",
                self.mime_type,
                STANDARD.encode(&self.bytes)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePreview {
    pub file_name: String,
    pub data_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentificationResult {
    pub species: FishSpecies,
    /// Confidence in percent
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum IdentificationStatus {
    #[default]
    Idle,
    Analyzing {
        file_name: String,
    },
    Identified {
        result: IdentificationResult,
    },
}

pub trait Classifier: Send + Sync {
    /// Identify the species in `image` among `catalogue`. `None` when nothing matches.
    fn classify(&self, image: &ImageFile, catalogue: &[FishSpecies]) -> Option<IdentificationResult>;
}

/// Uniformly random species and confidence; no actual inference
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedClassifier;

impl Classifier for SimulatedClassifier {
    fn classify(&self, image: &ImageFile, catalogue: &[FishSpecies]) -> Option<IdentificationResult> {
        if catalogue.is_empty() {
            return None;
        }

        let mut rng = rand::rng();
        let species = catalogue[rng.random_range(0..catalogue.len())].clone();
        let confidence = rng.random_range(SIMULATED_CONFIDENCE);
        tracing::debug!(file = %image.name, species = %species.name, confidence, "Simulated identification");

        Some(IdentificationResult {
            species,
            confidence,
        })
    }
}
