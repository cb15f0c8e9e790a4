//! Voice pipeline: speech capture in front of the chat, playback behind it
//!
//! Speech capture and playback are host capabilities that may be absent.
//! Recognizer implementations deliver their results asynchronously as
//! [`crate::app::Event::VoiceResult`], [`crate::app::Event::VoiceError`] and
//! [`crate::app::Event::VoiceEnded`]. [`ClientSpeech`] bridges both
//! capabilities to a browser front end.

use serde::{Deserialize, Serialize};

use crate::{AquaScopeError, Result};

const RECOGNITION: &str = "Voice recognition";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceState {
    #[default]
    Idle,
    Listening,
}

/// Speech-to-text capability
pub trait SpeechRecognizer: Send {
    /// Begin a single capture in `locale` (e.g. "en-US")
    fn start(&mut self, locale: &str) -> Result<()>;

    /// Terminate the current capture without producing a result
    fn stop(&mut self);
}

/// Text-to-speech capability
pub trait SpeechSynthesizer: Send {
    fn speak(&mut self, text: &str, locale: &str);

    /// Stop whatever is currently being spoken
    fn cancel(&mut self);
}

/// A reply handed to the front end for playback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Increases with every reply so the player can tell new text from old
    pub id: u64,
    pub text: String,
    pub locale: String,
}

/// Speech provided by the connected front end.
///
/// Capture runs in the browser, which reports results back as voice UI
/// events. Playback happens there too, driven by the [`Utterance`] published
/// in the dashboard view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientSpeech;

impl SpeechRecognizer for ClientSpeech {
    fn start(&mut self, locale: &str) -> Result<()> {
        tracing::debug!(locale, "Front end asked to start capture");
        Ok(())
    }

    fn stop(&mut self) {
        tracing::debug!("Front end asked to stop capture");
    }
}

impl SpeechSynthesizer for ClientSpeech {
    fn speak(&mut self, text: &str, locale: &str) {
        tracing::debug!(locale, chars = text.chars().count(), "Reply published for playback");
    }

    fn cancel(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceTransition {
    Started,
    Stopped,
}

pub struct VoicePipeline {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    state: VoiceState,
    utterance: Option<Utterance>,
    next_utterance: u64,
}

impl VoicePipeline {
    pub fn new(
        recognizer: Option<Box<dyn SpeechRecognizer>>,
        synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    ) -> Self {
        Self {
            recognizer,
            synthesizer,
            state: VoiceState::Idle,
            utterance: None,
            next_utterance: 1,
        }
    }

    #[must_use]
    pub fn state(&self) -> VoiceState {
        self.state
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Start listening when idle, stop when listening
    pub fn toggle(&mut self, locale: &str) -> Result<VoiceTransition> {
        let recognizer = self
            .recognizer
            .as_mut()
            .ok_or_else(|| AquaScopeError::capability(RECOGNITION))?;

        match self.state {
            VoiceState::Listening => {
                recognizer.stop();
                self.state = VoiceState::Idle;
                tracing::debug!("Voice capture stopped");
                Ok(VoiceTransition::Stopped)
            }
            VoiceState::Idle => {
                recognizer.start(locale)?;
                self.state = VoiceState::Listening;
                tracing::debug!(locale, "Voice capture started");
                Ok(VoiceTransition::Started)
            }
        }
    }

    /// Accept a final transcript. Results arriving after a stop are dropped.
    pub fn on_result(&mut self, transcript: &str) -> Option<String> {
        if self.state != VoiceState::Listening {
            tracing::debug!("Dropping voice result received while idle");
            return None;
        }
        self.state = VoiceState::Idle;

        let text = transcript.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    pub fn on_error(&mut self) {
        self.state = VoiceState::Idle;
    }

    pub fn on_end(&mut self) {
        self.state = VoiceState::Idle;
    }

    /// Last reply spoken, if any
    #[must_use]
    pub fn utterance(&self) -> Option<&Utterance> {
        self.utterance.as_ref()
    }

    /// Speak `text`, cancelling any playback in progress
    pub fn speak(&mut self, text: &str, locale: &str) {
        let Some(synthesizer) = self.synthesizer.as_mut() else {
            tracing::debug!("No speech synthesizer, reply not spoken");
            return;
        };
        synthesizer.cancel();
        synthesizer.speak(text, locale);

        self.utterance = Some(Utterance {
            id: self.next_utterance,
            text: text.to_string(),
            locale: locale.to_string(),
        });
        self.next_utterance += 1;
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Start(String),
        Stop,
        Speak(String, String),
        Cancel,
    }

    /// Records every capability call in a shared log
    #[derive(Clone, Default)]
    pub struct Recorder(pub Arc<Mutex<Vec<Call>>>);

    impl Recorder {
        pub fn calls(&self) -> Vec<Call> {
            self.0.lock().unwrap().clone()
        }
    }

    impl SpeechRecognizer for Recorder {
        fn start(&mut self, locale: &str) -> Result<()> {
            self.0.lock().unwrap().push(Call::Start(locale.to_string()));
            Ok(())
        }

        fn stop(&mut self) {
            self.0.lock().unwrap().push(Call::Stop);
        }
    }

    impl SpeechSynthesizer for Recorder {
        fn speak(&mut self, text: &str, locale: &str) {
            self.0
                .lock()
                .unwrap()
                .push(Call::Speak(text.to_string(), locale.to_string()));
        }

        fn cancel(&mut self) {
            self.0.lock().unwrap().push(Call::Cancel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::{Call, Recorder};
    use super::*;

    fn pipeline() -> (VoicePipeline, Recorder) {
        let recorder = Recorder::default();
        let pipeline = VoicePipeline::new(
            Some(Box::new(recorder.clone())),
            Some(Box::new(recorder.clone())),
        );
        (pipeline, recorder)
    }

    #[test]
    fn test_missing_recognizer_stays_idle() {
        let mut pipeline = VoicePipeline::new(None, None);
        let err = pipeline.toggle("en-US").unwrap_err();
        assert!(matches!(err, AquaScopeError::CapabilityUnavailable { .. }));
        assert_eq!(pipeline.state(), VoiceState::Idle);
    }

    #[test]
    fn test_toggle_cycles_states() {
        let (mut pipeline, recorder) = pipeline();
        assert_eq!(pipeline.toggle("ta-IN").unwrap(), VoiceTransition::Started);
        assert_eq!(pipeline.state(), VoiceState::Listening);
        assert_eq!(pipeline.toggle("ta-IN").unwrap(), VoiceTransition::Stopped);
        assert_eq!(pipeline.state(), VoiceState::Idle);
        assert_eq!(
            recorder.calls(),
            vec![Call::Start("ta-IN".to_string()), Call::Stop]
        );
    }

    #[test]
    fn test_result_after_stop_is_dropped() {
        let (mut pipeline, _) = pipeline();
        pipeline.toggle("en-US").unwrap();
        pipeline.toggle("en-US").unwrap();
        assert_eq!(pipeline.on_result("late words"), None);
    }

    #[test]
    fn test_result_returns_to_idle() {
        let (mut pipeline, _) = pipeline();
        pipeline.toggle("en-US").unwrap();
        assert_eq!(
            pipeline.on_result("  any safety alerts?  ").as_deref(),
            Some("any safety alerts?")
        );
        assert_eq!(pipeline.state(), VoiceState::Idle);
    }

    #[test]
    fn test_spoken_replies_are_published_in_order() {
        let mut pipeline = VoicePipeline::new(Some(Box::new(ClientSpeech)), Some(Box::new(ClientSpeech)));
        assert!(pipeline.utterance().is_none());

        assert_eq!(pipeline.toggle("te-IN").unwrap(), VoiceTransition::Started);
        pipeline.speak("Calm seas", "te-IN");
        pipeline.speak("High waves", "te-IN");

        let utterance = pipeline.utterance().unwrap();
        assert_eq!(utterance.id, 2);
        assert_eq!(utterance.text, "High waves");
        assert_eq!(utterance.locale, "te-IN");
    }

    #[test]
    fn test_nothing_published_without_synthesizer() {
        let mut pipeline = VoicePipeline::new(None, None);
        pipeline.speak("Calm seas", "en-US");
        assert!(pipeline.utterance().is_none());
    }

    #[test]
    fn test_speak_cancels_previous_playback() {
        let (mut pipeline, recorder) = pipeline();
        pipeline.speak("Calm seas", "hi-IN");
        assert_eq!(
            recorder.calls(),
            vec![
                Call::Cancel,
                Call::Speak("Calm seas".to_string(), "hi-IN".to_string())
            ]
        );
    }
}
