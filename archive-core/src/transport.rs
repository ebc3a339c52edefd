use std::{fmt::Debug, time::Duration};

use anyhow::Context;
use async_trait::async_trait;

use crate::{config::Config, error::ArchiveError, query::Query};

pub mod cache;
pub mod http;
pub mod retry;

pub use cache::{CachedTransport, ResponseCache};
pub use http::HttpTransport;
pub use retry::{RetryPolicy, RetryTransport};

/// A fully parameterised archive request.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRequest {
    pub url: String,
    pub params: Vec<(&'static str, String)>,
}

impl ArchiveRequest {
    pub fn new(url: impl Into<String>, query: &Query) -> Self {
        Self {
            url: url.into(),
            params: query.to_params(),
        }
    }

    /// Stable identity of the request, used as the cache key.
    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.url, params)
    }
}

/// Delivers the raw body for an archive request.
///
/// Implementations are layered: [`HttpTransport`] talks to the network,
/// [`RetryTransport`] and [`CachedTransport`] wrap another transport.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn execute(&self, request: &ArchiveRequest) -> Result<String, ArchiveError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn execute(&self, request: &ArchiveRequest) -> Result<String, ArchiveError> {
        (**self).execute(request).await
    }
}

/// Build the production transport stack: HTTP, retried, optionally cached.
pub fn transport_from_config(config: &Config) -> anyhow::Result<Box<dyn Transport>> {
    let http = HttpTransport::new(Duration::from_secs(config.http.timeout_secs))?;
    let retrying = RetryTransport::new(http, config.retry);

    if !config.cache.enabled {
        return Ok(Box::new(retrying));
    }

    let dir = config
        .cache_dir()
        .context("Failed to resolve the response cache directory")?;

    Ok(Box::new(CachedTransport::new(retrying, ResponseCache::new(dir))))
}
