//! Validation of travel records against the long-holiday calendar.
//!
//! One call to [`TravelChecker::check`] parses the caller's JSON payload,
//! expands each record's date range, cross-references the touched years
//! against a [`HolidaySource`] and assembles the pass/reject verdict.

use crate::source::{FestivalDays, HolidaySource};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `specialCase` labels that exempt a record from the long-holiday check:
/// sanctioned statutory-holiday travel and overseas travel.
const EXEMPT_SPECIAL_CASES: [&str; 2] = ["国家法定长假日", "境外"];

/// Fixed rejection text, appended once per offending record.
pub const REJECTION_MESSAGE: &str =
    "出差日期含国家法定长假日，请在特殊情况字段选择“国家法定长假日”";

/// Marker returned when every record passes.
pub const PASS_MARKER: &str = "通过";

const INPUT_FORMAT_ERROR: &str = "Invalid JSON format";
const DATE_FORMAT: &str = "%Y-%m-%d";
const MONTH_DAY_FORMAT: &str = "%m-%d";

/// One travel line as submitted by the caller. Unknown fields such as
/// `busiCate`, `from` and `to` are accepted and ignored; missing fields
/// deserialize as empty strings.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct TravelRecord {
    #[serde(rename = "lineNum")]
    pub line_num: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    #[serde(rename = "specialCase")]
    pub special_case: String,
}

/// Verdict of one validation call. Reject and pass are mutually
/// exclusive; the rejection list keeps input order and duplicates.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CheckResult {
    /// Top-level payload was not a JSON array of records.
    Error { error: String },
    /// At least one record overlaps a long holiday without an exemption.
    Rejected {
        #[serde(rename = "驳回信息")]
        rejections: Vec<String>,
    },
    /// Every record passed (or was skipped).
    Pass { res: String },
}

/// Envelope around the verdict, matching the caller's expected
/// `{"result": {...}}` shape.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CheckOutput {
    pub result: CheckResult,
}

/// Expand `start..=end` (both `YYYY-MM-DD`) into individual calendar
/// days, endpoints included. Unparsable or inverted input yields an
/// empty sequence rather than an error.
pub fn expand_date_range(start: &str, end: &str) -> Vec<NaiveDate> {
    let start = match NaiveDate::parse_from_str(start, DATE_FORMAT) {
        Ok(date) => date,
        Err(_) => return Vec::new(),
    };
    let end = match NaiveDate::parse_from_str(end, DATE_FORMAT) {
        Ok(date) => date,
        Err(_) => return Vec::new(),
    };
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        current = current.succ_opt().unwrap();
    }
    days
}

/// Drives the per-record checks against a [`HolidaySource`].
pub struct TravelChecker<S: HolidaySource> {
    source: S,
}

impl<S: HolidaySource> TravelChecker<S> {
    pub fn new(source: S) -> TravelChecker<S> {
        TravelChecker { source }
    }

    /// Top-level entry point. A payload that does not parse as an array
    /// of records short-circuits to the fixed error object; nothing else
    /// runs in that case.
    pub fn check(&self, payload: &str) -> CheckOutput {
        let records: Vec<TravelRecord> = match serde_json::from_str(payload) {
            Ok(records) => records,
            Err(_) => {
                return CheckOutput {
                    result: CheckResult::Error {
                        error: INPUT_FORMAT_ERROR.to_string(),
                    },
                }
            }
        };
        CheckOutput {
            result: self.validate(&records),
        }
    }

    /// Validate already-parsed records in input order.
    ///
    /// Festival sets are cached per year for the duration of this call,
    /// so each touched year costs at most one source lookup no matter
    /// how many records share it.
    pub fn validate(&self, records: &[TravelRecord]) -> CheckResult {
        let mut festival_cache: BTreeMap<i32, FestivalDays> = BTreeMap::new();
        let mut rejections = Vec::new();

        for record in records {
            let start = record.start_time.trim();
            let end = record.end_time.trim();
            let special_case = record.special_case.trim();

            // no dates, nothing to check
            if start.is_empty() || end.is_empty() {
                continue;
            }
            let days = expand_date_range(start, end);
            if days.is_empty() {
                continue;
            }

            for day in &days {
                festival_cache
                    .entry(day.year())
                    .or_insert_with(|| self.source.festival_days_for(day.year()));
            }

            let overlaps = days.iter().any(|day| {
                let month_day = day.format(MONTH_DAY_FORMAT).to_string();
                festival_cache
                    .get(&day.year())
                    .map(|set| set.contains(month_day.as_str()))
                    .unwrap_or(false)
            });

            if overlaps && !EXEMPT_SPECIAL_CASES.contains(&special_case) {
                rejections.push(REJECTION_MESSAGE.to_string());
            }
        }

        assemble(rejections)
    }
}

/// Fold the collected rejection messages into the final verdict.
fn assemble(rejections: Vec<String>) -> CheckResult {
    if rejections.is_empty() {
        CheckResult::Pass {
            res: PASS_MARKER.to_string(),
        }
    } else {
        CheckResult::Rejected { rejections }
    }
}
