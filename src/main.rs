use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use aquascope::api::ApiState;
use aquascope::voice::{ClientSpeech, SpeechRecognizer, SpeechSynthesizer};
use aquascope::{
    AquaScopeConfig, Collaborators, FixedPreference, ReferenceData, SimulatedClassifier, Timings,
    chat, telemetry, web,
};

#[derive(Debug, Parser)]
#[command(name = "aquascope", version, about = "Marine weather dashboard server")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "AQUASCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on, overrides the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AquaScopeConfig::load_from_path(cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    config.validate()?;

    let _telemetry = telemetry::init(&config.logging)?;

    let reference = Arc::new(ReferenceData::embedded().context("Failed to load reference data")?);
    let responder = chat::build_generator(&config.chat)?;

    // the server has no microphone or speaker; the browser can stand in
    let (recognizer, synthesizer): (
        Option<Box<dyn SpeechRecognizer>>,
        Option<Box<dyn SpeechSynthesizer>>,
    ) = if config.ui.client_speech {
        (Some(Box::new(ClientSpeech)), Some(Box::new(ClientSpeech)))
    } else {
        (None, None)
    };
    let collaborators = Collaborators {
        responder: responder.clone(),
        classifier: Arc::new(SimulatedClassifier),
        recognizer,
        synthesizer,
        system_preference: Box::new(FixedPreference(config.ui.system_color_scheme)),
    };
    let (app, dashboard) = aquascope::launch(
        reference.clone(),
        &config.ui.default_language,
        Timings::from(&config),
        collaborators,
    )
    .context("Failed to start dashboard")?;

    let state = ApiState {
        app: app.clone(),
        responder,
        reference,
    };
    web::run(&config, state).await?;

    if app.shutdown().is_ok() {
        dashboard.await.context("Dashboard task failed")?;
    }
    Ok(())
}
