use std::error::Error as StdError;
use std::fmt;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::value::RawValue;
use thiserror::Error;

use crate::config::Config;
use crate::models::ContentRequest;

/// The two calls the gateway relays to the Codebase Query service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Structure,
    Content,
}

impl Operation {
    /// Path of the operation on the upstream service
    pub fn path(self) -> &'static str {
        match self {
            Operation::Structure => "/files/structure",
            Operation::Content => "/files/content",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Structure => f.write_str("file structure"),
            Operation::Content => f.write_str("file content"),
        }
    }
}

/// Failure of an upstream call
///
/// Connect errors, timeouts, non-2xx statuses and undecodable bodies all
/// collapse into this one shape; only the description differs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error retrieving {operation}: {description}")]
pub struct ForwardError {
    pub operation: Operation,
    pub description: String,
}

impl ForwardError {
    pub fn new(operation: Operation, description: impl Into<String>) -> Self {
        Self {
            operation,
            description: description.into(),
        }
    }
}

/// Low-level cause of a failed upstream call
#[derive(Debug, Error)]
enum FetchError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("error decoding response body")]
    Decode(#[source] serde_json::Error),
}

/// Shareable client for the upstream service
///
/// Holds one connection pool for the whole process; clones share it.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a client whose every request is bounded by `timeout`
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.upstream_base_url, config.upstream_timeout)
    }

    fn url(&self, operation: Operation) -> String {
        format!("{}{}", self.base_url, operation.path())
    }

    /// GET `/files/structure` and return the upstream JSON body as-is
    pub async fn file_structure(&self) -> Result<Box<RawValue>, ForwardError> {
        let request = self.http.get(self.url(Operation::Structure));
        self.relay(Operation::Structure, request).await
    }

    /// POST `/files/content` with `payload` as the JSON body
    ///
    /// The payload is sent exactly as the caller wrote it.
    pub async fn file_content(
        &self,
        payload: &ContentRequest,
    ) -> Result<Box<RawValue>, ForwardError> {
        let request = self
            .http
            .post(self.url(Operation::Content))
            .json(payload.as_raw());
        self.relay(Operation::Content, request).await
    }

    async fn relay(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Box<RawValue>, ForwardError> {
        let started = Instant::now();
        let result = fetch_json(request).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(body) => {
                tracing::debug!(%operation, elapsed_ms, "Upstream call succeeded");
                Ok(body)
            }
            Err(err) => {
                let description = describe(&err);
                let (timeout, status) = match &err {
                    FetchError::Transport(err) => {
                        (err.is_timeout(), err.status().map(|s| s.as_u16()))
                    }
                    FetchError::Decode(_) => (false, None),
                };
                tracing::error!(
                    %operation,
                    elapsed_ms,
                    timeout,
                    status,
                    "Upstream call failed: {}",
                    description
                );
                Err(ForwardError::new(operation, description))
            }
        }
    }
}

/// Send the request and check that a 2xx body is JSON, keeping its original text
async fn fetch_json(request: RequestBuilder) -> Result<Box<RawValue>, FetchError> {
    let response = request.send().await?.error_for_status()?;
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(FetchError::Decode)
}

/// Render an error and its source chain as one line
fn describe(err: &dyn StdError) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }
    description
}
