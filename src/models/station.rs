//! Marine observation station model

use serde::{Deserialize, Serialize};

/// Kind of observation station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationType {
    Coastal,
    Port,
    #[serde(rename = "Deep Sea")]
    DeepSea,
}

impl StationType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StationType::Coastal => "Coastal",
            StationType::Port => "Port",
            StationType::DeepSea => "Deep Sea",
        }
    }

    /// CSS class used for map markers
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self {
            StationType::Coastal => "coastal",
            StationType::Port => "port",
            StationType::DeepSea => "deep-sea",
        }
    }
}

/// Marine station with its latest readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub name: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
    #[serde(rename = "type")]
    pub station_type: StationType,
    /// Water temperature in Celsius
    pub temperature: f32,
    /// Salinity in PSU
    pub salinity: f32,
    /// Wind speed in knots
    pub wind_speed: f32,
    /// Wave height in meters
    pub wave_height: f32,
}

impl Station {
    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }

    /// One-line summary shown when a station is selected
    #[must_use]
    pub fn details(&self) -> String {
        format!(
            "{}: {}°C, {}kt wind, {}m waves",
            self.name, self.temperature, self.wind_speed, self.wave_height
        )
    }
}
