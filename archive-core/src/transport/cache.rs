//! Persistent response cache.
//!
//! Successful bodies are stored as JSON files named after a hash of the
//! request signature. Entries never expire; the full signature is stored
//! alongside the body so a hash collision reads as a miss.

use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ArchiveError;

use super::{ArchiveRequest, Transport};

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    signature: String,
    cached_at: DateTime<Utc>,
    body: String,
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, signature: &str) -> PathBuf {
        self.dir.join(format!("{:016x}.json", fnv1a(signature)))
    }

    /// Cached body for `signature`, if a readable matching entry exists.
    pub fn read(&self, signature: &str) -> Option<String> {
        let path = self.entry_path(signature);
        let contents = fs::read_to_string(&path).ok()?;

        match serde_json::from_str::<CacheEntry>(&contents) {
            Ok(entry) if entry.signature == signature => Some(entry.body),
            Ok(_) => {
                debug!(path = %path.display(), "cache entry belongs to another request");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable cache entry");
                None
            }
        }
    }

    /// Store `body` under `signature`, replacing any previous entry.
    pub fn write(&self, signature: &str, body: &str) -> Result<(), ArchiveError> {
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let entry = CacheEntry {
            signature: signature.to_string(),
            cached_at: Utc::now(),
            body: body.to_string(),
        };
        let path = self.entry_path(signature);
        let json = serde_json::to_string(&entry).map_err(|source| ArchiveError::CacheEncode {
            path: path.clone(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;

        Ok(())
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ArchiveError {
    let path = path.to_path_buf();
    move |source| ArchiveError::Cache { path, source }
}

/// 64-bit FNV-1a; stable across builds, unlike `DefaultHasher`.
fn fnv1a(input: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    input
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// Serves repeated requests from a [`ResponseCache`], delegating misses.
#[derive(Debug, Clone)]
pub struct CachedTransport<T> {
    inner: T,
    cache: ResponseCache,
}

impl<T: Transport> CachedTransport<T> {
    pub fn new(inner: T, cache: ResponseCache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<T: Transport> Transport for CachedTransport<T> {
    async fn execute(&self, request: &ArchiveRequest) -> Result<String, ArchiveError> {
        let signature = request.signature();

        if let Some(body) = self.cache.read(&signature) {
            info!(dir = %self.cache.dir().display(), "archive response served from cache");
            return Ok(body);
        }

        info!("cache miss, fetching archive response");
        let body = self.inner.execute(request).await?;

        if let Err(e) = self.cache.write(&signature, &body) {
            warn!(error = %e, "failed to store archive response in cache");
        }

        Ok(body)
    }
}
