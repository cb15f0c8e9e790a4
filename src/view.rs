//! View models
//!
//! Pure functions from state and reference data to serializable view
//! models. Nothing here mutates state; the HTTP layer (or any other front
//! end) binds these to the screen.

use chrono::{Duration, NaiveDate};
use rand::RngExt;
use serde::{Deserialize, Serialize};

use crate::identify::IdentificationStatus;
use crate::models::{ReferenceData, locale_for};
use crate::notifications::Notification;
use crate::state::{AppState, ChatMessage, MapLayers, Modal, Section, SignInState};
use crate::suggestions::SuggestionPanel;
use crate::voice::Utterance;

/// External ocean observing network map opened from the map panel
pub const OCEAN_MAP_URL: &str = "https://incois.gov.in/OON/index.jsp";

const CHART_COLORS: [&str; 3] = ["#1FB8CD", "#FFC185", "#B4413C"];

/// Seven-day sample series shown on the dashboard chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarineTrend {
    pub labels: Vec<String>,
    pub temperature: Vec<f32>,
    pub wave_height: Vec<f32>,
    pub wind_speed: Vec<f32>,
}

impl MarineTrend {
    /// Random sample data for the week ending `today`
    #[must_use]
    pub fn sample(today: NaiveDate) -> Self {
        let mut rng = rand::rng();
        let mut trend = Self::default();
        for offset in (0..7).rev() {
            let day = today - Duration::days(offset);
            trend.labels.push(day.format("%a").to_string());
            trend.temperature.push(22.0 + rng.random_range(0.0..8.0));
            trend.wave_height.push(1.5 + rng.random_range(0.0..2.0));
            trend.wind_speed.push(10.0 + rng.random_range(0.0..15.0));
        }
        trend
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationCard {
    pub name: String,
    pub subtitle: String,
    pub summary: String,
    pub coordinates: String,
    pub marker_class: String,
    pub marker_left_pct: u32,
    pub marker_top_pct: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FishCard {
    pub name: String,
    pub scientific_name: String,
    pub habitat: String,
    pub season: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastCard {
    pub day_label: String,
    pub date_label: String,
    pub today: bool,
    pub icon: String,
    pub condition: String,
    pub wind: String,
    pub waves: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationCard {
    pub level: &'static str,
    pub icon: &'static str,
    pub title: &'static str,
    pub text: &'static str,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertItem {
    pub class: String,
    pub icon: String,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f32>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoughnutChart {
    pub labels: Vec<String>,
    pub data: Vec<usize>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartsView {
    pub marine_trend: LineChart,
    pub station_types: DoughnutChart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    pub language: String,
    pub welcome_text: String,
    pub voice_prompt: String,
    pub theme: String,
    pub color_scheme: String,
    pub theme_icon: String,
    pub account_label: String,
    pub high_contrast: bool,
    pub reduce_motion: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavItem {
    pub section: Section,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceView {
    pub available: bool,
    pub listening: bool,
    pub icon: &'static str,
    pub label: &'static str,
    /// Locale the front end captures in
    pub locale: &'static str,
    pub utterance: Option<Utterance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatView {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub suggestions: SuggestionPanel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub layers: MapLayers,
    pub external_url: &'static str,
}

/// Where the front end fetches the uploaded image preview
pub const PREVIEW_URL: &str = "/api/identify/preview";

/// The preview itself is fetched separately; views are polled often
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewLink {
    pub file_name: String,
    pub url: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifyView {
    pub preview: Option<PreviewLink>,
    pub status: IdentificationStatus,
}

/// Everything a front end needs to draw the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub header: HeaderView,
    pub navigation: Vec<NavItem>,
    pub stations: Vec<StationCard>,
    pub fish: Vec<FishCard>,
    pub forecast: Vec<ForecastCard>,
    pub recommendations: Vec<RecommendationCard>,
    pub alerts: Vec<AlertItem>,
    pub charts: ChartsView,
    pub voice: VoiceView,
    pub chat: ChatView,
    pub map: MapView,
    pub identify: IdentifyView,
    pub notifications: Vec<Notification>,
    pub modals: Vec<Modal>,
}

#[must_use]
pub fn render_stations(reference: &ReferenceData) -> Vec<StationCard> {
    reference
        .marine_stations
        .iter()
        .zip(0u32..)
        .map(|(station, index)| StationCard {
            name: station.name.clone(),
            subtitle: format!("{} Station", station.station_type.as_str()),
            summary: format!(
                "Temp: {}°C | Wind: {}kt",
                station.temperature, station.wind_speed
            ),
            coordinates: station.format_coordinates(),
            marker_class: format!("station-marker {}", station.station_type.css_class()),
            marker_left_pct: 30 + index * 15,
            marker_top_pct: 20 + index * 12,
            title: format!("{} - {}", station.name, station.station_type.as_str()),
        })
        .collect()
}

#[must_use]
pub fn render_fish_database(reference: &ReferenceData) -> Vec<FishCard> {
    reference
        .fish_species
        .iter()
        .map(|fish| FishCard {
            name: fish.name.clone(),
            scientific_name: fish.scientific_name.clone(),
            habitat: fish.habitat.clone(),
            season: fish.best_season.clone(),
        })
        .collect()
}

#[must_use]
pub fn render_forecast(reference: &ReferenceData) -> Vec<ForecastCard> {
    reference
        .weather_forecast
        .iter()
        .enumerate()
        .map(|(index, day)| ForecastCard {
            day_label: day.day_label(index),
            date_label: day.date_label(),
            today: index == 0,
            icon: day.condition.icon().to_string(),
            condition: day.condition.as_str().to_string(),
            wind: format!("{}kt", day.wind_speed),
            waves: format!("{}m", day.wave_height),
        })
        .collect()
}

/// Fishing outlook cards shown under the forecast
#[must_use]
pub fn render_recommendations(reference: &ReferenceData) -> Vec<RecommendationCard> {
    let max_wave = reference
        .weather_forecast
        .iter()
        .map(|day| day.wave_height)
        .fold(0.0_f32, f32::max);

    vec![
        RecommendationCard {
            level: "excellent",
            icon: "fas fa-star",
            title: "Excellent Fishing Conditions",
            text: "Next 2 days show perfect conditions with calm seas and good visibility. Ideal for offshore fishing.",
            detail: "Best time: 5:30 AM - 8:00 AM".to_string(),
        },
        RecommendationCard {
            level: "good",
            icon: "fas fa-thumbs-up",
            title: "Favorable Conditions",
            text: "Moderate conditions expected mid-week. Good for coastal fishing with proper safety measures.",
            detail: "Recommended areas: Coastal zones".to_string(),
        },
        RecommendationCard {
            level: "caution",
            icon: "fas fa-exclamation-triangle",
            title: "Exercise Caution",
            text: "Higher waves expected towards weekend. Experienced fishermen only for deep sea fishing.",
            detail: format!("Wave height: Up to {max_wave}m"),
        },
    ]
}

#[must_use]
pub fn render_alerts(reference: &ReferenceData) -> Vec<AlertItem> {
    reference
        .safety_alerts
        .iter()
        .map(|alert| AlertItem {
            class: format!("alert-item {}", alert.severity.css_class()),
            icon: alert.icon().to_string(),
            title: alert.alert_type.clone(),
            message: alert.message.clone(),
        })
        .collect()
}

#[must_use]
pub fn render_charts(trend: &MarineTrend, reference: &ReferenceData) -> ChartsView {
    let series = [
        ("Temperature (°C)", &trend.temperature),
        ("Wave Height (m)", &trend.wave_height),
        ("Wind Speed (kt)", &trend.wind_speed),
    ];
    let datasets = series
        .into_iter()
        .zip(CHART_COLORS)
        .map(|((label, data), color)| Dataset {
            label: label.to_string(),
            data: data.clone(),
            color: color.to_string(),
        })
        .collect();

    let counts = reference.station_type_counts();
    ChartsView {
        marine_trend: LineChart {
            labels: trend.labels.clone(),
            datasets,
        },
        station_types: DoughnutChart {
            labels: counts.iter().map(|(t, _)| t.as_str().to_string()).collect(),
            data: counts.iter().map(|(_, n)| *n).collect(),
            colors: CHART_COLORS
                .iter()
                .cycle()
                .take(counts.len())
                .map(|c| (*c).to_string())
                .collect(),
        },
    }
}

#[must_use]
pub fn render_header(state: &AppState) -> HeaderView {
    HeaderView {
        language: state.language.clone(),
        welcome_text: state.welcome_text.clone(),
        voice_prompt: state.voice_prompt.clone(),
        theme: state.theme.as_str().to_string(),
        color_scheme: state.color_scheme.as_str().to_string(),
        theme_icon: state.color_scheme.toggle_icon().to_string(),
        account_label: match state.sign_in {
            SignInState::SignedIn { .. } => "Profile".to_string(),
            _ => "Sign In".to_string(),
        },
        high_contrast: state.high_contrast,
        reduce_motion: state.reduce_motion,
    }
}

#[must_use]
pub fn render_navigation(state: &AppState) -> Vec<NavItem> {
    Section::ALL
        .into_iter()
        .map(|section| NavItem {
            section,
            active: section == state.active_section,
        })
        .collect()
}

#[must_use]
pub fn render_voice(state: &AppState, available: bool) -> VoiceView {
    let listening = state.is_listening();
    let (icon, label) = if listening {
        ("fas fa-stop", "Stop Listening")
    } else {
        ("fas fa-microphone", "Start Voice Command")
    };
    VoiceView {
        available,
        listening,
        icon,
        label,
        locale: locale_for(&state.language),
        utterance: state.utterance.clone(),
    }
}

#[must_use]
pub fn render_chat(state: &AppState) -> ChatView {
    ChatView {
        messages: state.transcript.messages().to_vec(),
        input: state.chat_input.clone(),
        suggestions: state.suggestions.clone(),
    }
}

#[must_use]
pub fn render_dashboard(
    state: &AppState,
    reference: &ReferenceData,
    notifications: &[Notification],
    voice_available: bool,
) -> DashboardView {
    DashboardView {
        header: render_header(state),
        navigation: render_navigation(state),
        stations: render_stations(reference),
        fish: render_fish_database(reference),
        forecast: render_forecast(reference),
        recommendations: render_recommendations(reference),
        alerts: render_alerts(reference),
        charts: render_charts(&state.marine_trend, reference),
        voice: render_voice(state, voice_available),
        chat: render_chat(state),
        map: MapView {
            layers: state.map_layers,
            external_url: OCEAN_MAP_URL,
        },
        identify: IdentifyView {
            preview: state.image_preview.as_ref().map(|preview| PreviewLink {
                file_name: preview.file_name.clone(),
                url: PREVIEW_URL,
            }),
            status: state.identification.clone(),
        },
        notifications: notifications.to_vec(),
        modals: state.open_modals.iter().copied().collect(),
    }
}
