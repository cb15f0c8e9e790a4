//! Data models for the AquaScope dashboard
//!
//! This module contains the static reference entities organized by concern:
//! - Station: marine observation stations and their latest readings
//! - Species: fish species catalogue
//! - Forecast: daily marine weather forecast
//! - Alert: safety alerts
//! - Translation: localized header texts and speech locales
//! - Reference: the embedded bundle tying them together

pub mod alert;
pub mod forecast;
pub mod reference;
pub mod species;
pub mod station;
pub mod translation;

// Re-export all public types for convenient access
pub use alert::{AlertSeverity, SafetyAlert};
pub use forecast::{Condition, ForecastDay, Visibility};
pub use reference::ReferenceData;
pub use species::FishSpecies;
pub use station::{Station, StationType};
pub use translation::{Translation, TranslationBundle, locale_for};
