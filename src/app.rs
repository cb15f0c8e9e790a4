//! Application controller
//!
//! [`App`] owns the session state and is the only place it changes. UI
//! actions arrive as [`UiEvent`]s; completions of asynchronous work (timers,
//! chat replies, speech results) come back as [`Event`]s on the same
//! channel, so every mutation happens on the single task running
//! [`App::run`].

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::chat::{ChatOutcome, ChatPipeline, MessageOrigin, RequestId, ResponseGenerator};
use crate::config::Timings;
use crate::identify::{Classifier, IdentificationStatus, ImageFile, ImagePreview};
use crate::models::{ReferenceData, locale_for};
use crate::notifications::{Notification, NotificationCenter, NotificationId, Severity};
use crate::scheduler::Scheduler;
use crate::state::{AppState, ColorScheme, MapLayer, Modal, Role, Section, SignInState, Theme};
use crate::suggestions::SuggestionPanel;
use crate::view::{self, DashboardView, MarineTrend};
use crate::voice::{SpeechRecognizer, SpeechSynthesizer, VoicePipeline, VoiceTransition};
use crate::{AquaScopeError, Result};

pub type EventSender = mpsc::UnboundedSender<Event>;
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Startup stages reported while the dashboard boots
pub const LOADING_STAGES: [&str; 4] = [
    "Connecting to marine stations...",
    "Loading weather data...",
    "Initializing AI systems...",
    "Preparing user interface...",
];

/// Actions a user can take on the dashboard
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UiEvent {
    SwitchSection { section: String },
    /// Ctrl/Cmd + key
    Shortcut { key: char },
    ToggleTheme,
    SetTheme { theme: Theme },
    SetLanguage { language: String },
    SetHighContrast { enabled: bool },
    SetReducedMotion { enabled: bool },
    SaveSettings {
        theme: Theme,
        language: String,
        high_contrast: bool,
        reduce_motion: bool,
    },
    OpenModal { modal: Modal },
    CloseModal { modal: Modal },
    InputChanged { text: String },
    SelectSuggestion { text: String },
    SendMessage,
    ToggleVoice,
    /// Final transcript from a capture running in the front end
    VoiceResult { transcript: String },
    /// Capture failed in the front end, e.g. "no-speech"
    VoiceError { error: String },
    VoiceEnded,
    DismissNotification { id: NotificationId },
    ToggleMapLayer { layer: MapLayer },
    OpenOceanMap,
    SelectStation { index: usize },
    SelectFish { index: usize },
    RequestFishingTips { species: String },
    SignIn { email: String, password: String },
}

#[derive(Debug)]
pub enum Event {
    Ui(UiEvent),
    UploadImage(ImageFile),
    VoiceResult(String),
    VoiceError(String),
    VoiceEnded,
    ChatCompleted {
        request: RequestId,
        origin: MessageOrigin,
        outcome: ChatOutcome,
    },
    NotificationExpired(NotificationId),
    AnalysisDue(u64),
    SignInDue,
    Snapshot(oneshot::Sender<DashboardView>),
    Preview(oneshot::Sender<Option<ImagePreview>>),
    Shutdown,
}

impl From<UiEvent> for Event {
    fn from(event: UiEvent) -> Self {
        Event::Ui(event)
    }
}

/// Reports the host's preferred color scheme
pub trait SystemPreference: Send {
    fn color_scheme(&self) -> ColorScheme;
}

/// A preference that never changes
#[derive(Debug, Clone, Copy)]
pub struct FixedPreference(pub ColorScheme);

impl SystemPreference for FixedPreference {
    fn color_scheme(&self) -> ColorScheme {
        self.0
    }
}

/// Replaceable collaborators of the app
pub struct Collaborators {
    pub responder: Arc<dyn ResponseGenerator>,
    pub classifier: Arc<dyn Classifier>,
    pub recognizer: Option<Box<dyn SpeechRecognizer>>,
    pub synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    pub system_preference: Box<dyn SystemPreference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Timer {
    Analysis,
    SignIn,
}

pub struct App {
    reference: Arc<ReferenceData>,
    state: AppState,
    notifications: NotificationCenter,
    voice: VoicePipeline,
    chat: ChatPipeline,
    classifier: Arc<dyn Classifier>,
    system_preference: Box<dyn SystemPreference>,
    timers: Scheduler<Timer>,
    timings: Timings,
    pending_image: Option<ImageFile>,
    analysis_generation: u64,
}

impl App {
    /// Build the app. Must be called from within a tokio runtime.
    pub fn new(
        reference: Arc<ReferenceData>,
        language: &str,
        timings: Timings,
        collaborators: Collaborators,
        events: EventSender,
    ) -> Result<Self> {
        let system = collaborators.system_preference.color_scheme();
        let trend = MarineTrend::sample(Utc::now().date_naive());
        let state = AppState::new(&reference, language, system, trend)?;

        Ok(Self {
            state,
            notifications: NotificationCenter::new(timings.notification_ttl, events.clone()),
            voice: VoicePipeline::new(collaborators.recognizer, collaborators.synthesizer),
            chat: ChatPipeline::spawn(collaborators.responder, events.clone()),
            classifier: collaborators.classifier,
            system_preference: collaborators.system_preference,
            timers: Scheduler::new(events),
            timings,
            pending_image: None,
            analysis_generation: 0,
            reference,
        })
    }

    /// Report loading stages and capability warnings
    pub fn start(&mut self) {
        for stage in LOADING_STAGES {
            info!("{}", stage);
        }
        if !self.voice.is_available() {
            let err = AquaScopeError::capability("Voice recognition");
            self.surface(&err);
        }
        info!(
            language = %self.state.language,
            scheme = self.state.color_scheme.as_str(),
            "Dashboard ready"
        );
    }

    /// Process events until the channel closes or [`Event::Shutdown`] arrives
    pub async fn run(mut self, mut events: EventReceiver) {
        while let Some(event) = events.recv().await {
            if matches!(event, Event::Shutdown) {
                info!("Dashboard shutting down");
                break;
            }
            self.dispatch(event);
        }
    }

    /// The single update path. Handler errors become notifications.
    pub fn dispatch(&mut self, event: Event) {
        if let Err(err) = self.handle(event) {
            warn!("{}", err);
            self.surface(&err);
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        self.notifications.active()
    }

    #[must_use]
    pub fn render(&self) -> DashboardView {
        view::render_dashboard(
            &self.state,
            &self.reference,
            self.notifications.active(),
            self.voice.is_available(),
        )
    }

    fn surface(&mut self, err: &AquaScopeError) {
        self.notifications.notify(err.user_message(), err.severity());
    }

    fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notifications.notify(message, severity);
    }

    fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Ui(ui) => self.handle_ui(ui),
            Event::UploadImage(file) => self.upload_image(file),
            Event::VoiceResult(transcript) => {
                self.voice_result(&transcript);
                Ok(())
            }
            Event::VoiceError(code) => self.voice_error(&code),
            Event::VoiceEnded => {
                self.voice_ended();
                Ok(())
            }
            Event::ChatCompleted {
                request,
                origin,
                outcome,
            } => {
                self.chat_completed(request, origin, &outcome);
                Ok(())
            }
            Event::NotificationExpired(id) => {
                self.notifications.expire(id);
                Ok(())
            }
            Event::AnalysisDue(generation) => self.analysis_due(generation),
            Event::SignInDue => {
                self.sign_in_due();
                Ok(())
            }
            Event::Snapshot(reply) => {
                if reply.send(self.render()).is_err() {
                    debug!("Snapshot requester went away");
                }
                Ok(())
            }
            Event::Preview(reply) => {
                if reply.send(self.state.image_preview.clone()).is_err() {
                    debug!("Preview requester went away");
                }
                Ok(())
            }
            Event::Shutdown => Ok(()),
        }
    }

    fn handle_ui(&mut self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::SwitchSection { section } => self.switch_section(&section),
            UiEvent::Shortcut { key } => {
                if let Some(section) = Section::from_shortcut(key) {
                    self.switch_section(section.as_str())?;
                }
                Ok(())
            }
            UiEvent::ToggleTheme => {
                let scheme = self.state.toggle_theme();
                self.notify(
                    format!("Switched to {} theme", scheme.as_str()),
                    Severity::Info,
                );
                Ok(())
            }
            UiEvent::SetTheme { theme } => {
                self.set_theme(theme);
                Ok(())
            }
            UiEvent::SetLanguage { language } => {
                self.set_language(&language);
                Ok(())
            }
            UiEvent::SetHighContrast { enabled } => {
                self.set_high_contrast(enabled);
                Ok(())
            }
            UiEvent::SetReducedMotion { enabled } => {
                self.set_reduced_motion(enabled);
                Ok(())
            }
            UiEvent::SaveSettings {
                theme,
                language,
                high_contrast,
                reduce_motion,
            } => {
                self.set_theme(theme);
                if language != self.state.language {
                    self.set_language(&language);
                }
                self.set_high_contrast(high_contrast);
                self.set_reduced_motion(reduce_motion);
                self.notify("Settings saved successfully", Severity::Success);
                self.state.close_modal(Modal::Settings);
                Ok(())
            }
            UiEvent::OpenModal { modal } => {
                self.state.open_modal(modal);
                Ok(())
            }
            UiEvent::CloseModal { modal } => {
                self.state.close_modal(modal);
                Ok(())
            }
            UiEvent::InputChanged { text } => {
                self.state.suggestions = SuggestionPanel::for_input(&self.reference.suggestions, &text);
                self.state.chat_input = text;
                Ok(())
            }
            UiEvent::SelectSuggestion { text } => {
                self.state.chat_input = text;
                self.state.suggestions = SuggestionPanel::hidden();
                self.send_message();
                Ok(())
            }
            UiEvent::SendMessage => {
                self.send_message();
                Ok(())
            }
            UiEvent::ToggleVoice => self.toggle_voice(),
            UiEvent::VoiceResult { transcript } => {
                self.voice_result(&transcript);
                Ok(())
            }
            UiEvent::VoiceError { error } => self.voice_error(&error),
            UiEvent::VoiceEnded => {
                self.voice_ended();
                Ok(())
            }
            UiEvent::DismissNotification { id } => {
                if !self.notifications.dismiss(id) {
                    debug!(%id, "Notification already gone");
                }
                Ok(())
            }
            UiEvent::ToggleMapLayer { layer } => {
                let visible = self.state.map_layers.toggle(layer);
                debug!(layer = layer.as_str(), visible, "Map layer toggled");
                self.notify(
                    format!("Toggled {} layer on map", layer.as_str()),
                    Severity::Info,
                );
                Ok(())
            }
            UiEvent::OpenOceanMap => {
                self.notify(
                    "Opening INCOIS Ocean Observing Network map...",
                    Severity::Info,
                );
                Ok(())
            }
            UiEvent::SelectStation { index } => {
                let details = self
                    .reference
                    .marine_stations
                    .get(index)
                    .map(|station| station.details())
                    .ok_or_else(|| AquaScopeError::not_found(format!("Station #{index}")))?;
                self.notify(details, Severity::Info);
                Ok(())
            }
            UiEvent::SelectFish { index } => {
                let details = self
                    .reference
                    .fish_species
                    .get(index)
                    .map(|fish| fish.details())
                    .ok_or_else(|| AquaScopeError::not_found(format!("Species #{index}")))?;
                self.notify(details, Severity::Info);
                Ok(())
            }
            UiEvent::RequestFishingTips { species } => {
                let tip = self.reference.fishing_tip(&species).to_string();
                self.notify(format!("{species} Fishing Tip: {tip}"), Severity::Success);
                Ok(())
            }
            UiEvent::SignIn { email, password } => self.sign_in(email, &password),
        }
    }

    #[instrument(skip(self))]
    fn switch_section(&mut self, name: &str) -> Result<()> {
        let section: Section = name.parse()?;
        self.state.switch_section(section);
        self.notify(
            format!("Switched to {} section", section.display_name()),
            Severity::Info,
        );
        Ok(())
    }

    fn set_theme(&mut self, theme: Theme) {
        let system = self.system_preference.color_scheme();
        self.state.set_theme(theme, system);
        self.notify(format!("Theme set to {}", theme.as_str()), Severity::Info);
    }

    fn set_language(&mut self, code: &str) {
        if self.state.set_language(code, &self.reference.translations) {
            self.notify(
                format!("Language changed to {}", code.to_uppercase()),
                Severity::Success,
            );
        } else {
            debug!(code, "No translation for language, keeping current texts");
        }
    }

    fn set_high_contrast(&mut self, enabled: bool) {
        self.state.high_contrast = enabled;
        let status = if enabled { "enabled" } else { "disabled" };
        self.notify(format!("High contrast mode {status}"), Severity::Info);
    }

    fn set_reduced_motion(&mut self, enabled: bool) {
        self.state.reduce_motion = enabled;
        let status = if enabled { "enabled" } else { "disabled" };
        self.notify(format!("Reduced motion {status}"), Severity::Info);
    }

    /// Send the current input. Blank input is ignored without side effects.
    fn send_message(&mut self) {
        let text = self.state.chat_input.trim().to_string();
        if text.is_empty() {
            debug!("Ignoring blank chat input");
            return;
        }

        self.state.transcript.push(Role::User, text.clone());
        self.state.chat_input.clear();
        self.state.suggestions = SuggestionPanel::hidden();
        let request = self.chat.submit(text, MessageOrigin::Text);
        debug!(%request, "Chat request submitted");
    }

    fn chat_completed(&mut self, request: RequestId, origin: MessageOrigin, outcome: &ChatOutcome) {
        debug!(%request, ?origin, "Chat request completed");
        self.state
            .transcript
            .push(Role::Assistant, outcome.transcript_text());

        if origin == MessageOrigin::Voice {
            if let Some(reply) = outcome.reply() {
                let locale = locale_for(&self.state.language);
                self.voice.speak(reply, locale);
                self.state.utterance = self.voice.utterance().cloned();
            }
        }
    }

    fn toggle_voice(&mut self) -> Result<()> {
        let locale = locale_for(&self.state.language);
        let transition = self.voice.toggle(locale)?;
        self.state.voice = self.voice.state();
        if transition == VoiceTransition::Started {
            self.notify("Listening... Speak now", Severity::Info);
        }
        Ok(())
    }

    fn voice_result(&mut self, transcript: &str) {
        let captured = self.voice.on_result(transcript);
        self.state.voice = self.voice.state();

        if let Some(text) = captured {
            self.state.transcript.push(Role::User, text.clone());
            let request = self.chat.submit(text, MessageOrigin::Voice);
            debug!(%request, "Voice request submitted");
        }
    }

    fn voice_ended(&mut self) {
        self.voice.on_end();
        self.state.voice = self.voice.state();
    }

    fn voice_error(&mut self, code: &str) -> Result<()> {
        self.voice.on_error();
        self.state.voice = self.voice.state();
        Err(AquaScopeError::general(format!(
            "Voice recognition error: {code}"
        )))
    }

    #[instrument(skip(self, file), fields(name = %file.name, mime = %file.mime_type))]
    fn upload_image(&mut self, file: ImageFile) -> Result<()> {
        file.validate()?;

        self.state.image_preview = Some(file.preview());
        self.state.identification = IdentificationStatus::Analyzing {
            file_name: file.name.clone(),
        };

        self.analysis_generation += 1;
        self.pending_image = Some(file);
        self.timers.schedule(
            Timer::Analysis,
            self.timings.analysis_delay,
            Event::AnalysisDue(self.analysis_generation),
        );
        Ok(())
    }

    fn analysis_due(&mut self, generation: u64) -> Result<()> {
        if generation != self.analysis_generation {
            debug!(generation, "Ignoring stale analysis");
            return Ok(());
        }
        self.timers.complete(&Timer::Analysis);

        let Some(image) = self.pending_image.take() else {
            return Ok(());
        };
        match self.classifier.classify(&image, &self.reference.fish_species) {
            Some(result) => {
                info!(species = %result.species.name, confidence = result.confidence, "Image identified");
                self.state.identification = IdentificationStatus::Identified { result };
                Ok(())
            }
            None => {
                self.state.identification = IdentificationStatus::Idle;
                Err(AquaScopeError::general("Could not identify the species in this image"))
            }
        }
    }

    fn sign_in(&mut self, email: String, password: &str) -> Result<()> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AquaScopeError::validation("Please fill in all fields"));
        }

        self.state.sign_in = SignInState::SigningIn { email };
        self.notify("Signing in...", Severity::Info);
        self.timers
            .schedule(Timer::SignIn, self.timings.sign_in_delay, Event::SignInDue);
        Ok(())
    }

    fn sign_in_due(&mut self) {
        self.timers.complete(&Timer::SignIn);
        let SignInState::SigningIn { email } = &self.state.sign_in else {
            return;
        };

        self.state.sign_in = SignInState::SignedIn {
            email: email.clone(),
        };
        self.notify(
            "Welcome! You have been signed in successfully",
            Severity::Success,
        );
        self.state.close_modal(Modal::SignIn);
    }
}

/// Cloneable sender side of a running app
#[derive(Clone)]
pub struct AppHandle {
    events: EventSender,
}

impl AppHandle {
    pub fn send(&self, event: impl Into<Event>) -> Result<()> {
        self.events
            .send(event.into())
            .map_err(|_| AquaScopeError::general("Dashboard is not running"))
    }

    pub fn upload(&self, file: ImageFile) -> Result<()> {
        self.send(Event::UploadImage(file))
    }

    /// Render the current dashboard on the app task
    pub async fn snapshot(&self) -> Result<DashboardView> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::Snapshot(tx))?;
        rx.await
            .map_err(|_| AquaScopeError::general("Dashboard stopped before answering"))
    }

    /// Preview of the latest accepted upload
    pub async fn preview(&self) -> Result<Option<ImagePreview>> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::Preview(tx))?;
        rx.await
            .map_err(|_| AquaScopeError::general("Dashboard stopped before answering"))
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(Event::Shutdown)
    }
}

/// Build, start and spawn the app on the current runtime
pub fn launch(
    reference: Arc<ReferenceData>,
    language: &str,
    timings: Timings,
    collaborators: Collaborators,
) -> Result<(AppHandle, JoinHandle<()>)> {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = App::new(reference, language, timings, collaborators, tx.clone())?;
    app.start();
    let task = tokio::spawn(app.run(rx));
    Ok((AppHandle { events: tx }, task))
}
