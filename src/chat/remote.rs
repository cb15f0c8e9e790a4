//! Remote chat endpoint client

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
    RetryTransientMiddleware, Retryable, RetryableStrategy, policies::ExponentialBackoff,
};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{ChatOutcome, ChatRequestBody, ResponseGenerator};
use crate::config::{CHAT_MAX_BACKOFF, ChatConfig};
use crate::{AquaScopeError, Result};

/// Retries only when no response arrived (connect failure or timeout).
/// Any received response, 5xx included, is final.
struct TransportFailuresOnly;

impl RetryableStrategy for TransportFailuresOnly {
    fn handle(
        &self,
        res: &std::result::Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(_) => None,
            Err(reqwest_middleware::Error::Reqwest(e)) if e.is_connect() || e.is_timeout() => {
                Some(Retryable::Transient)
            }
            Err(_) => Some(Retryable::Fatal),
        }
    }
}

/// POSTs `{message}` to the configured endpoint and classifies the JSON answer.
/// Every call is bounded by the configured timeout.
pub struct RemoteResponder {
    client: ClientWithMiddleware,
    endpoint: String,
}

impl RemoteResponder {
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("AquaScope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AquaScopeError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(500), CHAT_MAX_BACKOFF)
            .build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                TransportFailuresOnly,
            ))
            .build();

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ResponseGenerator for RemoteResponder {
    #[instrument(name = "remote_chat", skip(self, message), fields(endpoint = %self.endpoint))]
    async fn respond(&self, message: &str) -> ChatOutcome {
        let start_time = Instant::now();
        let body = ChatRequestBody {
            message: message.to_string(),
        };

        let response = match self.client.post(&self.endpoint).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Chat endpoint unreachable: {}", e);
                return ChatOutcome::Unreachable;
            }
        };

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(%status, "Malformed chat response: {}", e);
                return ChatOutcome::Unreachable;
            }
        };

        let outcome = ChatOutcome::from_body(&body);
        if outcome == ChatOutcome::Unexpected {
            warn!(%status, %body, "Unexpected response from chat endpoint");
        }
        debug!(
            %status,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Chat endpoint answered"
        );
        outcome
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
