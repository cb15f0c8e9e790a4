//! Built-in keyword responder
//!
//! Answers from canned texts keyed on words in the question. Kept as an
//! explicit alternative to the remote endpoint for offline use and demos.

use async_trait::async_trait;

use super::{ChatOutcome, ResponseGenerator};

const RULES: &[(&[&str], &str)] = &[
    (
        &["weather", "forecast"],
        "Current marine weather shows partly cloudy conditions with moderate waves. Wind speed is 15 knots with good visibility. The 7-day forecast indicates favorable fishing conditions for the next 3 days.",
    ),
    (
        &["fish", "fishing"],
        "Based on current season and conditions, Pomfret and Sardine are active in coastal waters. Best fishing times are early morning (5-8 AM) and evening (6-8 PM). Water temperature is optimal at 24.5°C.",
    ),
    (
        &["safety", "alert"],
        "Current safety status: Moderate wave warning in Bay of Bengal. Navigation alert for restricted zone near Kalpakkam. All other areas are safe for fishing activities.",
    ),
    (
        &["station", "location"],
        "5 marine stations are currently active: Mumbai High, Kochi, Chennai, Visakhapatnam, and RAMA Buoy. All stations reporting normal conditions with real-time data updates.",
    ),
    (
        &["salinity", "water"],
        "Current salinity levels are optimal at 35.1 PSU average. Water temperature ranges from 23.9°C to 26.1°C across different stations. Conditions are favorable for marine life.",
    ),
];

const FALLBACK: &str = "I understand you're asking about marine conditions. I can help you with weather forecasts, fish locations, safety alerts, water conditions, and navigation assistance. What specific information would you like?";

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordResponder;

impl KeywordResponder {
    /// First rule with a keyword contained in the lowercased input wins
    #[must_use]
    pub fn answer(input: &str) -> &'static str {
        let lower = input.to_lowercase();
        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map_or(FALLBACK, |(_, reply)| *reply)
    }
}

#[async_trait]
impl ResponseGenerator for KeywordResponder {
    async fn respond(&self, message: &str) -> ChatOutcome {
        ChatOutcome::Reply(Self::answer(message).to_string())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
