//! Integration tests for the AquaScope binary and dashboard session

use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use aquascope::app::UiEvent;
use aquascope::identify::IdentificationStatus;
use aquascope::{
    AquaScopeConfig, Collaborators, ColorScheme, FixedPreference, ImageFile, KeywordResponder,
    ReferenceData, Section, SimulatedClassifier, Timings,
};

/// Test that the CLI shows help with the explicit help flag
#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_aquascope"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("aquascope"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--port"));
}

/// Test that an out of range setting is rejected before the server starts
#[test]
fn test_cli_rejects_invalid_config() {
    let output = Command::new(env!("CARGO_BIN_EXE_aquascope"))
        .env("AQUASCOPE_LOGGING__LEVEL", "chatty")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid log level"), "got: {stderr}");
}

#[test]
fn test_default_config_is_valid() {
    let config = AquaScopeConfig::default();
    config.validate().unwrap();
    let timings = Timings::from(&config);
    assert_eq!(timings.analysis_delay, Duration::from_millis(2000));
}

fn collaborators() -> Collaborators {
    Collaborators {
        responder: Arc::new(KeywordResponder),
        classifier: Arc::new(SimulatedClassifier),
        recognizer: None,
        synthesizer: None,
        system_preference: Box::new(FixedPreference(ColorScheme::Dark)),
    }
}

/// Walk through a short session over the public handle
#[tokio::test]
async fn test_session_flow() {
    let reference = Arc::new(ReferenceData::embedded().unwrap());
    let timings = Timings {
        notification_ttl: Duration::from_secs(60),
        analysis_delay: Duration::from_millis(10),
        sign_in_delay: Duration::from_millis(10),
    };
    let (app, task) = aquascope::launch(reference, "te", timings, collaborators()).unwrap();

    let view = app.snapshot().await.unwrap();
    assert_eq!(view.header.language, "te");
    assert_eq!(view.header.color_scheme, "dark");

    app.send(UiEvent::Shortcut { key: '2' }).unwrap();
    app.send(UiEvent::InputChanged {
        text: "How salty is the water?".to_string(),
    })
    .unwrap();
    app.send(UiEvent::SendMessage).unwrap();
    app.upload(ImageFile::new("catch.jpg", "image/jpeg", vec![0xff, 0xd8]))
        .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let view = app.snapshot().await.unwrap();

    assert!(
        view.navigation
            .iter()
            .any(|n| n.section == Section::VoiceAssistant && n.active)
    );
    assert_eq!(view.chat.messages.len(), 2);
    assert!(view.chat.messages[1].text.contains("PSU"));
    assert!(matches!(
        view.identify.status,
        IdentificationStatus::Identified { .. }
    ));

    app.shutdown().unwrap();
    task.await.unwrap();
}
