//! `AquaScope` - Marine weather dashboard
//!
//! This library provides the dashboard session (sections, theme, language,
//! notifications), the chat and voice pipelines in front of a pluggable
//! responder, a simulated fish identifier, and the HTTP API serving it all.

pub mod api;
pub mod app;
pub mod chat;
pub mod config;
pub mod error;
pub mod identify;
pub mod models;
pub mod notifications;
pub mod scheduler;
pub mod state;
pub mod suggestions;
pub mod telemetry;
pub mod view;
pub mod voice;
pub mod web;

// Re-export core types for public API
pub use app::{App, AppHandle, Collaborators, Event, FixedPreference, UiEvent, launch};
pub use chat::{ChatOutcome, ChatStrategy, KeywordResponder, RemoteResponder, ResponseGenerator};
pub use config::{AquaScopeConfig, Timings};
pub use error::AquaScopeError;
pub use identify::{Classifier, ImageFile, SimulatedClassifier};
pub use models::ReferenceData;
pub use notifications::{Notification, Severity};
pub use state::{AppState, ColorScheme, Section, Theme};
pub use view::DashboardView;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AquaScopeError>;
