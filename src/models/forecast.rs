//! Daily marine weather forecast model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sky condition for a forecast day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    Cloudy,
    #[serde(rename = "Light Rain")]
    LightRain,
    Rain,
    Storm,
}

impl Condition {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::PartlyCloudy => "Partly Cloudy",
            Condition::Cloudy => "Cloudy",
            Condition::LightRain => "Light Rain",
            Condition::Rain => "Rain",
            Condition::Storm => "Storm",
        }
    }

    /// Icon class for the forecast card
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Condition::Clear => "fas fa-sun",
            Condition::PartlyCloudy => "fas fa-cloud-sun",
            Condition::Cloudy => "fas fa-cloud",
            Condition::LightRain => "fas fa-cloud-rain",
            Condition::Rain => "fas fa-cloud-showers-heavy",
            Condition::Storm => "fas fa-thunderstorm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Excellent,
    Good,
    Moderate,
    Poor,
}

/// Forecast for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub condition: Condition,
    /// Wind speed in knots
    pub wind_speed: f32,
    /// Wave height in meters
    pub wave_height: f32,
    pub visibility: Visibility,
}

impl ForecastDay {
    /// Heading for the card at `index`: "Today" for the first entry, short weekday otherwise
    #[must_use]
    pub fn day_label(&self, index: usize) -> String {
        if index == 0 {
            "Today".to_string()
        } else {
            self.date.format("%a").to_string()
        }
    }

    /// Short month and day, e.g. "Sep 29"
    #[must_use]
    pub fn date_label(&self) -> String {
        self.date.format("%b %-d").to_string()
    }
}
