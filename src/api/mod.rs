//! JSON API over the running dashboard

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::app::{AppHandle, UiEvent};
use crate::chat::{ChatOutcome, ChatRequestBody, ChatResponseBody, ResponseGenerator};
use crate::identify::{ImageFile, ImagePreview};
use crate::models::ReferenceData;
use crate::suggestions::SuggestionPanel;
use crate::view::{self, AlertItem, ChartsView, DashboardView, FishCard, ForecastCard, StationCard};

/// Shared by all handlers
#[derive(Clone)]
pub struct ApiState {
    pub app: AppHandle,
    pub responder: Arc<dyn ResponseGenerator>,
    pub reference: Arc<ReferenceData>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

fn app_gone(err: &crate::AquaScopeError) -> ApiError {
    warn!("{}", err);
    api_error(StatusCode::SERVICE_UNAVAILABLE, "Dashboard is not running")
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub q: String,
}

pub fn router(state: ApiState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/view", get(get_view))
        .route("/stations", get(get_stations))
        .route("/fish", get(get_fish))
        .route("/forecast", get(get_forecast))
        .route("/alerts", get(get_alerts))
        .route("/charts", get(get_charts))
        .route("/suggestions", get(get_suggestions))
        .route("/events", post(post_event))
        .route("/chat", post(post_chat))
        .route(
            "/identify",
            post(post_identify).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/identify/preview", get(get_preview))
        .with_state(state)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn get_view(State(state): State<ApiState>) -> Result<Json<DashboardView>, ApiError> {
    let view = state.app.snapshot().await.map_err(|e| app_gone(&e))?;
    Ok(Json(view))
}

async fn get_stations(State(state): State<ApiState>) -> Json<Vec<StationCard>> {
    Json(view::render_stations(&state.reference))
}

async fn get_fish(State(state): State<ApiState>) -> Json<Vec<FishCard>> {
    Json(view::render_fish_database(&state.reference))
}

async fn get_forecast(State(state): State<ApiState>) -> Json<Vec<ForecastCard>> {
    Json(view::render_forecast(&state.reference))
}

async fn get_alerts(State(state): State<ApiState>) -> Json<Vec<AlertItem>> {
    Json(view::render_alerts(&state.reference))
}

/// Charts come from the session so the trend stays stable between calls
async fn get_charts(State(state): State<ApiState>) -> Result<Json<ChartsView>, ApiError> {
    let view = state.app.snapshot().await.map_err(|e| app_gone(&e))?;
    Ok(Json(view.charts))
}

async fn get_suggestions(
    State(state): State<ApiState>,
    Query(query): Query<SuggestionQuery>,
) -> Json<SuggestionPanel> {
    Json(SuggestionPanel::for_input(
        &state.reference.suggestions,
        &query.q,
    ))
}

async fn post_event(
    State(state): State<ApiState>,
    Json(event): Json<UiEvent>,
) -> Result<StatusCode, ApiError> {
    debug!(?event, "UI event received");
    state.app.send(event).map_err(|e| app_gone(&e))?;
    Ok(StatusCode::ACCEPTED)
}

/// Stateless proxy to the configured responder
#[instrument(skip_all, fields(responder = state.responder.name()))]
async fn post_chat(
    State(state): State<ApiState>,
    Json(body): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, (StatusCode, Json<ChatResponseBody>)> {
    let message = body.message.trim();
    if message.is_empty() {
        let outcome = ChatOutcome::ServiceError(Some("Message is required".to_string()));
        return Err((StatusCode::BAD_REQUEST, Json(ChatResponseBody::from(&outcome))));
    }

    let outcome = state.responder.respond(message).await;
    let response = Json(ChatResponseBody::from(&outcome));
    match outcome {
        ChatOutcome::Reply(_) => Ok(response),
        _ => Err((StatusCode::BAD_GATEWAY, response)),
    }
}

/// Accepts the first file part. The analysis result shows up in `/view`.
async fn post_identify(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No file uploaded"))?;

    let name = field.file_name().unwrap_or("upload").to_string();
    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| api_error(e.status(), e.body_text()))?;

    let file = ImageFile::new(name, mime_type, bytes.to_vec());
    if let Err(err) = file.validate() {
        // still dispatched so the session shows the same notification
        state.app.upload(file).map_err(|e| app_gone(&e))?;
        return Err(api_error(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            err.user_message(),
        ));
    }

    state.app.upload(file).map_err(|e| app_gone(&e))?;
    Ok(StatusCode::ACCEPTED)
}

async fn get_preview(State(state): State<ApiState>) -> Result<Json<ImagePreview>, ApiError> {
    state
        .app
        .preview()
        .await
        .map_err(|e| app_gone(&e))?
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "No image uploaded"))
}
