//! Retrieval of Chinese statutory long-holiday dates from the timor.tech
//! calendar service.
//!
//! The remote calendar is treated as optional data rather than a hard
//! dependency: any failure while fetching or decoding a year collapses to
//! an empty day set, so a broken or unreachable service can only cause
//! missed flags, never a failed validation run.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Base URL of the timor.tech holiday calendar; the year is appended as
/// the final path segment.
pub const DEFAULT_BASE_URL: &str = "https://timor.tech/api/holiday/year";

/// Days within one year that belong to a qualifying long holiday, as
/// zero-padded `MM-DD` strings.
pub type FestivalDays = BTreeSet<String>;

/// Provider of long-holiday dates, keyed by calendar year.
///
/// Implementations never fail observably: an internal error yields an
/// empty set, which callers treat as "no holidays known for that year".
/// Swapping in an in-memory implementation keeps the checker testable
/// without network access.
pub trait HolidaySource {
    fn festival_days_for(&self, year: i32) -> FestivalDays;
}

/// Connection settings for [`TimorHolidaySource`].
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Calendar endpoint without the trailing year segment.
    pub base_url: String,
    /// Bound on the whole request; an expired fetch counts as a failure.
    pub timeout: Duration,
    /// Skip TLS certificate verification for the calendar call. Off by
    /// default; only enable when the deployment must reach the service
    /// through an intercepting proxy.
    pub danger_accept_invalid_certs: bool,
}

impl Default for SourceConfig {
    fn default() -> SourceConfig {
        SourceConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(8),
            danger_accept_invalid_certs: false,
        }
    }
}

/// Holiday source backed by the timor.tech HTTP API.
///
/// One blocking `GET {base_url}/{year}` per lookup, no retries. Callers
/// that need per-year deduplication hold their own cache.
pub struct TimorHolidaySource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl TimorHolidaySource {
    pub fn new() -> Result<TimorHolidaySource, reqwest::Error> {
        TimorHolidaySource::with_config(SourceConfig::default())
    }

    pub fn with_config(config: SourceConfig) -> Result<TimorHolidaySource, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .build()?;
        Ok(TimorHolidaySource {
            client,
            base_url: config.base_url,
        })
    }

    fn fetch_year(&self, year: i32) -> Option<FestivalDays> {
        let url = format!("{}/{}", self.base_url, year);
        let resp = self.client.get(&url).send().ok()?;
        if resp.status() != reqwest::StatusCode::OK {
            return None;
        }
        let payload: YearPayload = resp.json().ok()?;
        if payload.code != 0 {
            return None;
        }
        Some(collect_festival_days(payload.holiday))
    }
}

impl HolidaySource for TimorHolidaySource {
    fn festival_days_for(&self, year: i32) -> FestivalDays {
        self.fetch_year(year).unwrap_or_default()
    }
}

/// Envelope of one year's calendar response.
#[derive(Deserialize)]
struct YearPayload {
    code: i64,
    #[serde(default)]
    holiday: BTreeMap<String, Value>,
}

/// A single day entry inside the `holiday` table. The service also sends
/// `wage`, `date` and friends; only these two fields matter here.
#[derive(Deserialize)]
struct DayEntry {
    #[serde(default)]
    holiday: bool,
    #[serde(default)]
    name: String,
}

fn collect_festival_days(entries: BTreeMap<String, Value>) -> FestivalDays {
    let mut days = FestivalDays::new();
    for (month_day, value) in entries {
        // entries that are not well-formed records are skipped silently
        let entry: DayEntry = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        if entry.holiday && is_qualifying_name(&entry.name) {
            if let Some(normalized) = normalize_month_day(&month_day) {
                days.insert(normalized);
            }
        }
    }
    days
}

/// A holiday qualifies only if its display name marks Spring Festival
/// (including its eve) or National Day.
fn is_qualifying_name(name: &str) -> bool {
    name.contains("春节") || name.contains("除夕") || name.contains("国庆")
}

/// Zero-pad each component of a `M-D` key to two digits; reject keys that
/// are not two components.
fn normalize_month_day(raw: &str) -> Option<String> {
    let parts: Vec<&str> = raw.split('-').collect();
    if parts.len() != 2 {
        return None;
    }
    Some(format!("{:0>2}-{:0>2}", parts[0], parts[1]))
}
