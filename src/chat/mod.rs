//! Chat pipeline
//!
//! User text goes to a [`ResponseGenerator`] and every outcome, including
//! failures, ends up as one assistant entry in the transcript. Requests are
//! sequenced per conversation by a single worker so replies land in the
//! order they were asked.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::Result;
use crate::app::{Event, EventSender};
use crate::config::ChatConfig;

pub mod local;
pub mod remote;

pub use local::KeywordResponder;
pub use remote::RemoteResponder;

pub const UNREACHABLE_TEXT: &str = "⚠️ Could not reach server";
pub const UNEXPECTED_TEXT: &str = "⚠️ Unexpected response from server";

/// Which responder answers chat messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStrategy {
    /// Remote chat endpoint over HTTP
    #[default]
    Remote,
    /// Built-in keyword responder
    Local,
}

/// Where the user text came from; voice replies are spoken back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    Text,
    Voice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Reply(String),
    /// The service answered with an error object
    ServiceError(Option<String>),
    /// Well-formed JSON without `reply` or `error`
    Unexpected,
    /// Network failure, timeout or malformed body
    Unreachable,
}

impl ChatOutcome {
    /// Classify a decoded response body
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        if let Some(reply) = body.get("reply").and_then(Value::as_str) {
            if !reply.is_empty() {
                return ChatOutcome::Reply(reply.to_string());
            }
        }

        match body.get("error") {
            Some(error) if !error.is_null() => {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .or_else(|| error.as_str())
                    .map(str::to_string);
                ChatOutcome::ServiceError(message)
            }
            _ => ChatOutcome::Unexpected,
        }
    }

    /// Text of the assistant transcript entry for this outcome
    #[must_use]
    pub fn transcript_text(&self) -> String {
        match self {
            ChatOutcome::Reply(reply) => reply.clone(),
            ChatOutcome::ServiceError(message) => format!(
                "⚠️ Error: {}",
                message.as_deref().unwrap_or("Unknown error")
            ),
            ChatOutcome::Unexpected => UNEXPECTED_TEXT.to_string(),
            ChatOutcome::Unreachable => UNREACHABLE_TEXT.to_string(),
        }
    }

    #[must_use]
    pub fn reply(&self) -> Option<&str> {
        match self {
            ChatOutcome::Reply(reply) => Some(reply),
            _ => None,
        }
    }
}

/// Request body of the chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequestBody {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatErrorBody {
    pub message: String,
}

/// Response body of the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ChatErrorBody>,
}

impl From<&ChatOutcome> for ChatResponseBody {
    fn from(outcome: &ChatOutcome) -> Self {
        match outcome {
            ChatOutcome::Reply(reply) => Self {
                reply: Some(reply.clone()),
                error: None,
            },
            ChatOutcome::ServiceError(message) => Self {
                reply: None,
                error: Some(ChatErrorBody {
                    message: message.clone().unwrap_or_else(|| "Unknown error".to_string()),
                }),
            },
            ChatOutcome::Unexpected => Self {
                reply: None,
                error: Some(ChatErrorBody {
                    message: "Unexpected response from chat service".to_string(),
                }),
            },
            ChatOutcome::Unreachable => Self {
                reply: None,
                error: Some(ChatErrorBody {
                    message: "Could not reach server".to_string(),
                }),
            },
        }
    }
}

/// Produces an assistant answer for a user message. Never fails: failures
/// are expressed as [`ChatOutcome`] variants.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn respond(&self, message: &str) -> ChatOutcome;

    fn name(&self) -> &'static str;
}

/// Build the responder selected by `config.strategy`
pub fn build_generator(config: &ChatConfig) -> Result<Arc<dyn ResponseGenerator>> {
    let generator: Arc<dyn ResponseGenerator> = match config.strategy {
        ChatStrategy::Remote => Arc::new(RemoteResponder::from_config(config)?),
        ChatStrategy::Local => Arc::new(KeywordResponder),
    };
    tracing::info!(responder = generator.name(), "Chat responder ready");
    Ok(generator)
}

#[derive(Debug)]
struct ChatRequest {
    id: RequestId,
    origin: MessageOrigin,
    message: String,
}

/// Queue in front of a single worker that answers requests in submission order
pub struct ChatPipeline {
    next_id: u64,
    queue: mpsc::UnboundedSender<ChatRequest>,
    worker: JoinHandle<()>,
}

impl ChatPipeline {
    /// Spawn the worker. Must be called from within a tokio runtime.
    pub fn spawn(generator: Arc<dyn ResponseGenerator>, events: EventSender) -> Self {
        let (queue, requests) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(generator, requests, events));
        Self {
            next_id: 1,
            queue,
            worker,
        }
    }

    /// Enqueue a message; the answer arrives as [`Event::ChatCompleted`]
    pub fn submit(&mut self, message: String, origin: MessageOrigin) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;

        let request = ChatRequest {
            id,
            origin,
            message,
        };
        if let Err(mpsc::error::SendError(request)) = self.queue.send(request) {
            tracing::error!(id = %request.id, "Chat worker is gone, request dropped");
        }
        id
    }
}

impl Drop for ChatPipeline {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run_worker(
    generator: Arc<dyn ResponseGenerator>,
    mut requests: mpsc::UnboundedReceiver<ChatRequest>,
    events: EventSender,
) {
    while let Some(request) = requests.recv().await {
        tracing::debug!(id = %request.id, origin = ?request.origin, "Answering chat request");
        let outcome = generator.respond(&request.message).await;
        let completed = Event::ChatCompleted {
            request: request.id,
            origin: request.origin,
            outcome,
        };
        if events.send(completed).is_err() {
            tracing::debug!("Event loop closed, chat worker exiting");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use std::time::Duration;

    #[rstest]
    #[case(json!({"reply": "Calm seas"}), ChatOutcome::Reply("Calm seas".to_string()))]
    #[case(json!({"error": {"message": "quota exceeded"}}), ChatOutcome::ServiceError(Some("quota exceeded".to_string())))]
    #[case(json!({"error": {}}), ChatOutcome::ServiceError(None))]
    #[case(json!({"error": "boom"}), ChatOutcome::ServiceError(Some("boom".to_string())))]
    #[case(json!({"status": "ok"}), ChatOutcome::Unexpected)]
    #[case(json!({"reply": ""}), ChatOutcome::Unexpected)]
    #[case(json!([1, 2]), ChatOutcome::Unexpected)]
    fn test_outcome_from_body(#[case] body: Value, #[case] expected: ChatOutcome) {
        assert_eq!(ChatOutcome::from_body(&body), expected);
    }

    #[rstest]
    #[case(ChatOutcome::Reply("Hi".to_string()), "Hi")]
    #[case(ChatOutcome::ServiceError(Some("quota".to_string())), "⚠️ Error: quota")]
    #[case(ChatOutcome::ServiceError(None), "⚠️ Error: Unknown error")]
    #[case(ChatOutcome::Unexpected, UNEXPECTED_TEXT)]
    #[case(ChatOutcome::Unreachable, UNREACHABLE_TEXT)]
    fn test_transcript_text(#[case] outcome: ChatOutcome, #[case] expected: &str) {
        assert_eq!(outcome.transcript_text(), expected);
    }

    /// Answers slower for earlier requests, echoing the message
    struct SlowEcho;

    #[async_trait]
    impl ResponseGenerator for SlowEcho {
        async fn respond(&self, message: &str) -> ChatOutcome {
            let delay = if message == "first" { 3 } else { 1 };
            tokio::time::sleep(Duration::from_secs(delay)).await;
            ChatOutcome::Reply(message.to_string())
        }

        fn name(&self) -> &'static str {
            "slow-echo"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_replies_arrive_in_submission_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut pipeline = ChatPipeline::spawn(Arc::new(SlowEcho), tx);

        let first = pipeline.submit("first".to_string(), MessageOrigin::Text);
        let second = pipeline.submit("second".to_string(), MessageOrigin::Voice);
        assert!(first < second);

        let mut completed = Vec::new();
        while completed.len() < 2 {
            if let Some(Event::ChatCompleted {
                request, outcome, ..
            }) = rx.recv().await
            {
                completed.push((request, outcome));
            }
        }
        assert_eq!(
            completed,
            vec![
                (first, ChatOutcome::Reply("first".to_string())),
                (second, ChatOutcome::Reply("second".to_string())),
            ]
        );
    }
}
