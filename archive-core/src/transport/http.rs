use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{decode::WireError, error::ArchiveError};

use super::{ArchiveRequest, Transport};

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("weather-archive/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ArchiveRequest) -> Result<String, ArchiveError> {
        debug!(url = %request.url, "sending archive request");

        let res = self
            .http
            .get(&request.url)
            .query(&request.params)
            .send()
            .await
            .map_err(|source| ArchiveError::Request {
                url: request.url.clone(),
                source,
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| ArchiveError::Request {
            url: request.url.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(ArchiveError::Status {
                status: status.as_u16(),
                reason: error_reason(&body),
            });
        }

        debug!(bytes = body.len(), "archive response received");
        Ok(body)
    }
}

/// The API's `reason` field when the body carries one, else the raw body.
fn error_reason(body: &str) -> String {
    serde_json::from_str::<WireError>(body)
        .map(|e| e.reason)
        .unwrap_or_else(|_| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
