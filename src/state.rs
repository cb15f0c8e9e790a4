//! Session state of the dashboard
//!
//! Plain data plus the pure transitions on it. Side effects (notifications,
//! timers, outbound requests) are driven by [`crate::app::App`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::identify::{IdentificationStatus, ImagePreview};
use crate::models::{ReferenceData, TranslationBundle};
use crate::suggestions::SuggestionPanel;
use crate::view::MarineTrend;
use crate::voice::{Utterance, VoiceState};
use crate::{AquaScopeError, Result};

/// Top-level panel of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    #[default]
    Dashboard,
    VoiceAssistant,
    MarineMap,
    FishId,
    Weather,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::VoiceAssistant,
        Section::MarineMap,
        Section::FishId,
        Section::Weather,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::VoiceAssistant => "voice-assistant",
            Section::MarineMap => "marine-map",
            Section::FishId => "fish-id",
            Section::Weather => "weather",
        }
    }

    /// Name used in notifications, e.g. "voice assistant"
    #[must_use]
    pub fn display_name(&self) -> String {
        self.as_str().replacen('-', " ", 1)
    }

    /// Section bound to Ctrl/Cmd + digit
    #[must_use]
    pub fn from_shortcut(key: char) -> Option<Section> {
        let index = key.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = AquaScopeError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == name)
            .ok_or_else(|| AquaScopeError::not_found(format!("Section '{name}'")))
    }
}

/// Theme preference chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl Theme {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }
}

impl FromStr for Theme {
    type Err = AquaScopeError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(AquaScopeError::validation(format!(
                "Unknown theme '{other}'"
            ))),
        }
    }
}

/// Effective visual mode applied to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }

    /// Icon on the theme toggle: offers the opposite mode
    #[must_use]
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            ColorScheme::Dark => "fas fa-sun",
            ColorScheme::Light => "fas fa-moon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub role: Role,
}

/// Ordered chat history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(Vec<ChatMessage>);

impl Transcript {
    pub fn push(&mut self, role: Role, text: impl Into<String>) {
        self.0.push(ChatMessage {
            text: text.into(),
            role,
        });
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.0.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MapLayer {
    Stations,
    FishZones,
    Weather,
}

impl MapLayer {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MapLayer::Stations => "stations",
            MapLayer::FishZones => "fishZones",
            MapLayer::Weather => "weather",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayers {
    pub stations: bool,
    pub fish_zones: bool,
    pub weather: bool,
}

impl Default for MapLayers {
    fn default() -> Self {
        Self {
            stations: true,
            fish_zones: false,
            weather: false,
        }
    }
}

impl MapLayers {
    /// Flip a layer and return its new visibility
    pub fn toggle(&mut self, layer: MapLayer) -> bool {
        let flag = match layer {
            MapLayer::Stations => &mut self.stations,
            MapLayer::FishZones => &mut self.fish_zones,
            MapLayer::Weather => &mut self.weather,
        };
        *flag = !*flag;
        *flag
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Modal {
    SignIn,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SignInState {
    #[default]
    SignedOut,
    SigningIn {
        email: String,
    },
    SignedIn {
        email: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct AppState {
    pub language: String,
    pub welcome_text: String,
    pub voice_prompt: String,
    pub theme: Theme,
    pub color_scheme: ColorScheme,
    pub voice: VoiceState,
    /// Latest spoken reply, played by the front end
    pub utterance: Option<Utterance>,
    pub active_section: Section,
    pub transcript: Transcript,
    pub chat_input: String,
    pub suggestions: SuggestionPanel,
    pub high_contrast: bool,
    pub reduce_motion: bool,
    pub map_layers: MapLayers,
    pub open_modals: BTreeSet<Modal>,
    pub sign_in: SignInState,
    pub image_preview: Option<ImagePreview>,
    pub identification: IdentificationStatus,
    pub marine_trend: MarineTrend,
}

impl AppState {
    /// Initial state: base language, theme following the system preference
    pub fn new(
        reference: &ReferenceData,
        language: &str,
        system: ColorScheme,
        marine_trend: MarineTrend,
    ) -> Result<Self> {
        let mut state = Self {
            language: String::new(),
            welcome_text: String::new(),
            voice_prompt: String::new(),
            theme: Theme::Auto,
            color_scheme: system,
            voice: VoiceState::Idle,
            utterance: None,
            active_section: Section::default(),
            transcript: Transcript::default(),
            chat_input: String::new(),
            suggestions: SuggestionPanel::hidden(),
            high_contrast: false,
            reduce_motion: false,
            map_layers: MapLayers::default(),
            open_modals: BTreeSet::new(),
            sign_in: SignInState::default(),
            image_preview: None,
            identification: IdentificationStatus::Idle,
            marine_trend,
        };

        if !state.set_language(language, &reference.translations) {
            return Err(AquaScopeError::config(format!(
                "Default language '{language}' has no translation"
            )));
        }
        Ok(state)
    }

    pub fn switch_section(&mut self, section: Section) {
        self.active_section = section;
    }

    /// Apply a language code. Unknown codes leave language and texts untouched.
    pub fn set_language(&mut self, code: &str, translations: &TranslationBundle) -> bool {
        match translations.get(code) {
            Some(translation) => {
                self.language = code.to_string();
                self.welcome_text = translation.welcome.clone();
                self.voice_prompt = translation.voice_prompt.clone();
                true
            }
            None => false,
        }
    }

    /// Flip the effective scheme: dark goes light, anything else goes dark
    pub fn toggle_theme(&mut self) -> ColorScheme {
        let next = match self.color_scheme {
            ColorScheme::Dark => ColorScheme::Light,
            ColorScheme::Light => ColorScheme::Dark,
        };
        self.color_scheme = next;
        self.theme = match next {
            ColorScheme::Dark => Theme::Dark,
            ColorScheme::Light => Theme::Light,
        };
        next
    }

    /// Apply a theme; `Auto` snapshots `system` and does not track later changes
    pub fn set_theme(&mut self, theme: Theme, system: ColorScheme) {
        self.theme = theme;
        self.color_scheme = match theme {
            Theme::Light => ColorScheme::Light,
            Theme::Dark => ColorScheme::Dark,
            Theme::Auto => system,
        };
    }

    pub fn open_modal(&mut self, modal: Modal) {
        self.open_modals.insert(modal);
    }

    pub fn close_modal(&mut self, modal: Modal) {
        self.open_modals.remove(&modal);
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.voice == VoiceState::Listening
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn state() -> AppState {
        let reference = ReferenceData::embedded().unwrap();
        AppState::new(&reference, "en", ColorScheme::Light, MarineTrend::default()).unwrap()
    }

    #[rstest]
    #[case("dashboard", Section::Dashboard)]
    #[case("voice-assistant", Section::VoiceAssistant)]
    #[case("marine-map", Section::MarineMap)]
    #[case("fish-id", Section::FishId)]
    #[case("weather", Section::Weather)]
    fn test_section_parse(#[case] name: &str, #[case] expected: Section) {
        assert_eq!(name.parse::<Section>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_section_is_not_found() {
        let err = "reef".parse::<Section>().unwrap_err();
        assert!(matches!(err, AquaScopeError::NotFound { .. }));
    }

    #[rstest]
    #[case('1', Some(Section::Dashboard))]
    #[case('5', Some(Section::Weather))]
    #[case('0', None)]
    #[case('6', None)]
    #[case('x', None)]
    fn test_shortcuts(#[case] key: char, #[case] expected: Option<Section>) {
        assert_eq!(Section::from_shortcut(key), expected);
    }

    #[test]
    fn test_display_name_replaces_first_dash() {
        assert_eq!(Section::VoiceAssistant.display_name(), "voice assistant");
        assert_eq!(Section::Dashboard.display_name(), "dashboard");
    }

    #[test]
    fn test_unknown_language_keeps_texts() {
        let reference = ReferenceData::embedded().unwrap();
        let mut state = state();
        assert!(state.set_language("hi", &reference.translations));
        let welcome = state.welcome_text.clone();
        let prompt = state.voice_prompt.clone();

        for code in ["xx", "", "EN", "fr-FR"] {
            assert!(!state.set_language(code, &reference.translations));
            assert_eq!(state.language, "hi");
            assert_eq!(state.welcome_text, welcome);
            assert_eq!(state.voice_prompt, prompt);
        }
    }

    #[test]
    fn test_toggle_theme_flips_scheme() {
        let mut state = state();
        assert_eq!(state.toggle_theme(), ColorScheme::Dark);
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.toggle_theme(), ColorScheme::Light);
        assert_eq!(state.theme, Theme::Light);
    }

    #[test]
    fn test_auto_theme_snapshots_system_preference() {
        let mut state = state();
        state.set_theme(Theme::Auto, ColorScheme::Dark);
        assert_eq!(state.color_scheme, ColorScheme::Dark);
        assert_eq!(state.theme, Theme::Auto);

        state.set_theme(Theme::Light, ColorScheme::Dark);
        assert_eq!(state.color_scheme, ColorScheme::Light);
    }

    #[test]
    fn test_map_layer_toggle() {
        let mut layers = MapLayers::default();
        assert!(!layers.toggle(MapLayer::Stations));
        assert!(layers.toggle(MapLayer::FishZones));
        assert!(layers.toggle(MapLayer::Weather));
        assert!(!layers.stations);
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
