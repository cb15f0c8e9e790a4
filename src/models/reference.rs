//! Static reference data bundled with the dashboard
//!
//! Everything here is loaded once at startup and treated as read-only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FishSpecies, ForecastDay, SafetyAlert, Station, StationType, TranslationBundle};
use crate::{AquaScopeError, Result};

const EMBEDDED_REFERENCE: &str = include_str!("../../data/reference.json");

const NO_TIP: &str = "No specific recommendations available for this species.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    pub marine_stations: Vec<Station>,
    pub fish_species: Vec<FishSpecies>,
    pub weather_forecast: Vec<ForecastDay>,
    pub safety_alerts: Vec<SafetyAlert>,
    pub translations: TranslationBundle,
    /// Prompts offered while typing in the chat input
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub fishing_tips: BTreeMap<String, String>,
}

impl ReferenceData {
    /// Load the bundle compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_REFERENCE)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let data: ReferenceData = serde_json::from_str(raw)
            .map_err(|e| AquaScopeError::config(format!("Invalid reference data: {e}")))?;
        if data.translations.get("en").is_none() {
            return Err(AquaScopeError::config(
                "Reference data must contain an 'en' translation",
            ));
        }
        Ok(data)
    }

    #[must_use]
    pub fn fishing_tip(&self, species: &str) -> &str {
        self.fishing_tips
            .get(species)
            .map_or(NO_TIP, String::as_str)
    }

    /// Number of stations per type, in first-seen order
    #[must_use]
    pub fn station_type_counts(&self) -> Vec<(StationType, usize)> {
        let mut counts: Vec<(StationType, usize)> = Vec::new();
        for station in &self.marine_stations {
            match counts.iter_mut().find(|(t, _)| *t == station.station_type) {
                Some((_, count)) => *count += 1,
                None => counts.push((station.station_type, 1)),
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_reference_loads() {
        let data = ReferenceData::embedded().unwrap();
        assert_eq!(data.marine_stations.len(), 5);
        assert_eq!(data.fish_species.len(), 4);
        assert_eq!(data.weather_forecast.len(), 7);
        assert_eq!(data.safety_alerts.len(), 2);
        assert_eq!(data.suggestions.len(), 8);
        assert!(data.translations.contains("te"));
    }

    #[test]
    fn test_station_type_counts() {
        let data = ReferenceData::embedded().unwrap();
        assert_eq!(
            data.station_type_counts(),
            vec![
                (StationType::Coastal, 2),
                (StationType::Port, 2),
                (StationType::DeepSea, 1)
            ]
        );
    }

    #[test]
    fn test_fishing_tip_fallback() {
        let data = ReferenceData::embedded().unwrap();
        assert!(data.fishing_tip("Tuna").contains("heavy tackle"));
        assert_eq!(data.fishing_tip("Shark"), NO_TIP);
    }

    #[test]
    fn test_reference_requires_english() {
        let raw = r#"{"marineStations": [], "fishSpecies": [], "weatherForecast": [],
            "safetyAlerts": [], "translations": {}, "suggestions": []}"#;
        let err = ReferenceData::from_json(raw).unwrap_err();
        assert!(matches!(err, AquaScopeError::Config { .. }));
    }
}
