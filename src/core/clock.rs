//! Current-time resolution for Europe/Berlin.
//!
//! Clock events are stamped server-side. The authoritative source is an
//! external time API; when it is slow, down or returns junk, a local
//! fallback shifts the host UTC clock by the German UTC offset so that
//! clocking in keeps working offline.

use crate::core::duration::parse_timestamp;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, SecondsFormat, Utc};
use std::sync::Arc;

/// Source of the current UTC instant. Swappable so tests can pin the clock.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of the official Europe/Berlin wall-clock time.
#[async_trait]
pub trait TimeProvider: Send + Sync {
    /// Return the current Berlin time as an ISO 8601 string.
    async fn fetch(&self) -> AppResult<String>;
}

/// Queries a timeapi.io-style endpoint and extracts the `dateTime` field.
pub struct HttpTimeProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpTimeProvider {
    pub fn new(url: &str, timeout_ms: u64) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| AppError::TimeProvider(e.to_string()))?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl TimeProvider for HttpTimeProvider {
    async fn fetch(&self) -> AppResult<String> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::TimeProvider(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AppError::TimeProvider(format!(
                "unexpected status {}",
                resp.status()
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AppError::TimeProvider(e.to_string()))?;

        body.get("dateTime")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::TimeProvider("response carries no dateTime field".to_string()))
    }
}

/// Resolves "now in Germany", preferring the provider and falling back to
/// the shifted host clock. Never fails: clocking in must not depend on an
/// external service being up.
#[derive(Clone)]
pub struct GermanyClock {
    provider: Arc<dyn TimeProvider>,
    clock: Arc<dyn Clock>,
}

impl GermanyClock {
    pub fn new(provider: Arc<dyn TimeProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { provider, clock }
    }

    /// The current Berlin time as an ISO 8601 string.
    pub async fn now_iso(&self) -> String {
        match self.provider.fetch().await {
            Ok(ts) if parse_timestamp(&ts).is_some() => {
                tracing::debug!("time received from provider");
                ts
            }
            Ok(ts) => {
                tracing::warn!("provider returned unparseable time {ts:?}, using fallback");
                germany_fallback(self.clock.now_utc())
            }
            Err(e) => {
                tracing::warn!("failed to fetch Germany time, using fallback: {e}");
                germany_fallback(self.clock.now_utc())
            }
        }
    }
}

/// Approximate Berlin time from a UTC instant: CEST (UTC+2) from April
/// through October, CET (UTC+1) otherwise. Off by an hour near the exact
/// DST transition weekends; the provider is authoritative when reachable.
pub fn germany_fallback(now_utc: DateTime<Utc>) -> String {
    let month = now_utc.month();
    let is_dst = month > 3 && month < 11;
    let offset_hours = if is_dst { 2 } else { 1 };
    (now_utc + Duration::hours(offset_hours)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a stored timestamp as "DD.MM.YYYY, HH:MM:SS" in its own offset.
/// Empty input stays empty; unparseable input becomes "Invalid date".
pub fn format_display(ts: &str) -> String {
    if ts.is_empty() {
        return String::new();
    }
    match parse_timestamp(ts) {
        Some(dt) => dt.format("%d.%m.%Y, %H:%M:%S").to_string(),
        None => "Invalid date".to_string(),
    }
}
