//! Safety alert model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl AlertSeverity {
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyAlert {
    #[serde(rename = "type")]
    pub alert_type: String,
    pub message: String,
    pub severity: AlertSeverity,
}

impl SafetyAlert {
    /// Icon class, chosen by alert type first and severity second
    #[must_use]
    pub fn icon(&self) -> &'static str {
        if self.alert_type.contains("Weather") {
            "fas fa-cloud-bolt"
        } else if self.alert_type.contains("Navigation") {
            "fas fa-route"
        } else if self.severity == AlertSeverity::High {
            "fas fa-exclamation-triangle"
        } else {
            "fas fa-info-circle"
        }
    }
}
