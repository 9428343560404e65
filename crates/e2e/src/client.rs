//! GraphQL over HTTP

use relaycheck_common::GraphqlResponse;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint
    pub api_url: String,

    /// Bearer token for staff-only queries
    pub token: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/graphql/".to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Thin client posting `{ query, variables }` documents
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl GraphqlClient {
    pub fn new(config: ClientConfig) -> E2eResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Execute one document
    pub async fn execute(&self, document: &str, variables: Value) -> E2eResult<GraphqlResponse> {
        debug!("POST {} variables={}", self.config.api_url, variables);

        let mut request = self
            .http
            .post(&self.config.api_url)
            .json(&json!({ "query": document, "variables": variables }));
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        // GraphQL servers answer rejected documents with 400 and an `errors` body
        let parsed = serde_json::from_str::<Value>(&text);
        let has_errors = matches!(&parsed, Ok(body) if body.get("errors").is_some());
        if !status.is_success() && !has_errors {
            let snippet: String = text.chars().take(200).collect();
            return Err(E2eError::Api(format!(
                "{} returned {} without GraphQL errors: {}",
                self.config.api_url, status, snippet
            )));
        }

        Ok(GraphqlResponse::from_value(parsed?)?)
    }

    /// Wait for the endpoint to answer a trivial query
    pub async fn wait_until_ready(&self, timeout_duration: Duration) -> E2eResult<()> {
        let start = Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout_duration {
            attempts += 1;

            match self.execute("{ __typename }", json!({})).await {
                Ok(resp) if !resp.has_errors() => {
                    info!("API ready at {}", self.config.api_url);
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("Readiness query returned errors: {:?}", resp.errors);
                }
                Err(E2eError::Http(e)) => {
                    if attempts == 1 {
                        info!("Waiting for API at {}...", self.config.api_url);
                    }
                    // Connection refused is expected while the API is starting
                    if !e.is_connect() {
                        warn!("Readiness check error: {}", e);
                    }
                }
                Err(e) => {
                    warn!("Readiness check error: {}", e);
                }
            }

            sleep(Duration::from_millis(200)).await;
        }

        Err(E2eError::ApiUnavailable(attempts))
    }
}
