#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use czds_api::{ApiError, ByteStream, Result, Session, ZoneDetails, url_from_tld};
use futures_util::stream;

pub const API_URL: &str = "https://czds.test";

pub fn zone_url(tld: &str) -> String {
    url_from_tld(API_URL, tld)
}

/// Canned behavior of one zone.
#[derive(Clone)]
pub struct StubZone {
    pub body: Vec<u8>,
    /// Content length reported by `details`; defaults to the body length.
    pub advertised: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub details_error: Option<fn() -> ApiError>,
    pub download_error: Option<fn() -> ApiError>,
    /// Fail the body stream after this many bytes.
    pub break_after: Option<usize>,
    pub delay: Option<Duration>,
}

impl StubZone {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            advertised: Some(body.len() as u64),
            body,
            last_modified: Some(Utc::now()),
            details_error: None,
            download_error: None,
            break_after: None,
            delay: None,
        }
    }

    pub fn advertised(mut self, length: Option<u64>) -> Self {
        self.advertised = length;
        self
    }

    pub fn last_modified(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_modified = at;
        self
    }

    pub fn details_error(mut self, error: fn() -> ApiError) -> Self {
        self.details_error = Some(error);
        self
    }

    pub fn download_error(mut self, error: fn() -> ApiError) -> Self {
        self.download_error = Some(error);
        self
    }

    pub fn break_after(mut self, bytes: usize) -> Self {
        self.break_after = Some(bytes);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// In-memory session keyed by zone URL.
#[derive(Default)]
pub struct StubSession {
    zones: Mutex<HashMap<String, StubZone>>,
    downloads: AtomicUsize,
}

impl StubSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(self, tld: &str, zone: StubZone) -> Self {
        self.insert(tld, zone);
        self
    }

    pub fn insert(&self, tld: &str, zone: StubZone) {
        self.insert_url(zone_url(tld), zone);
    }

    pub fn insert_url(&self, url: impl Into<String>, zone: StubZone) {
        self.zones.lock().unwrap().insert(url.into(), zone);
    }

    pub fn urls(&self) -> Vec<String> {
        let mut urls: Vec<_> = self.zones.lock().unwrap().keys().cloned().collect();
        urls.sort();
        urls
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    fn zone(&self, url: &str) -> Result<StubZone> {
        self.zones
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| ApiError::UnexpectedStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}

impl Session for StubSession {
    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.urls())
    }

    async fn details(&self, url: &str) -> Result<ZoneDetails> {
        let zone = self.zone(url)?;
        if let Some(error) = zone.details_error {
            return Err(error());
        }
        Ok(ZoneDetails {
            name: url.to_string(),
            last_modified: zone.last_modified,
            content_length: zone.advertised,
            content_type: "application/x-gzip".to_string(),
        })
    }

    async fn download(&self, url: &str) -> Result<ByteStream> {
        let zone = self.zone(url)?;
        if let Some(delay) = zone.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = zone.download_error {
            return Err(error());
        }
        self.downloads.fetch_add(1, Ordering::SeqCst);

        let cut = zone.break_after.unwrap_or(zone.body.len()).min(zone.body.len());
        let mut chunks: Vec<Result<Bytes>> = zone.body[..cut]
            .chunks(128)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        if zone.break_after.is_some() {
            chunks.push(Err(ApiError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))));
        }
        Ok(Box::pin(stream::iter(chunks)))
    }
}
