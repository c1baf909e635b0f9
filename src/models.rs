use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Columns added by the v2 analytics migration. An unmigrated remote schema
/// rejects inserts containing any of these, so the writer strips them when it
/// falls back to base columns.
pub const ANALYTICS_COLUMNS: &[&str] = &[
    "sentiment",
    "was_booked",
    "interrupt_count",
    "estimated_cost_usd",
    "call_date",
    "call_hour",
    "call_day_of_week",
];

fn default_sentiment() -> String {
    "unknown".to_string()
}

fn is_none_or_empty(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// One completed call's outcome, created once at end-of-call and never
/// mutated. Field names are the store's column names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    pub phone_number: String,
    pub duration_seconds: u32,
    pub transcript: String,
    /// Short outcome description; contains "Confirmed" when a booking occurred.
    #[serde(default)]
    pub summary: String,
    /// Omitted from the payload entirely when absent or empty, never stored
    /// as an empty string.
    #[serde(default, skip_serializing_if = "is_none_or_empty")]
    pub recording_url: Option<String>,
    #[serde(default, skip_serializing_if = "is_none_or_empty")]
    pub caller_name: Option<String>,
    #[serde(default = "default_sentiment")]
    pub sentiment: String,
    #[serde(default)]
    pub was_booked: bool,
    #[serde(default)]
    pub interrupt_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "is_none_or_empty")]
    pub call_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_hour: Option<u8>,
    #[serde(default, skip_serializing_if = "is_none_or_empty")]
    pub call_day_of_week: Option<String>,
}

impl CallRecord {
    pub fn new(
        phone_number: impl Into<String>,
        duration_seconds: u32,
        transcript: impl Into<String>,
    ) -> Self {
        Self {
            phone_number: phone_number.into(),
            duration_seconds,
            transcript: transcript.into(),
            summary: String::new(),
            recording_url: None,
            caller_name: None,
            sentiment: default_sentiment(),
            was_booked: false,
            interrupt_count: 0,
            estimated_cost_usd: None,
            call_date: None,
            call_hour: None,
            call_day_of_week: None,
        }
    }

    /// Fill the time-bucketing columns from a call timestamp.
    pub fn stamped(mut self, at: DateTime<Local>) -> Self {
        self.call_date = Some(at.format("%Y-%m-%d").to_string());
        self.call_hour = Some(at.hour() as u8);
        self.call_day_of_week = Some(at.format("%A").to_string());
        self
    }

    /// Full insert payload: every present field, analytics columns included.
    pub fn full_payload(&self) -> Value {
        // CallRecord serializes to a JSON object by construction.
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()))
    }

    /// Fallback payload for an unmigrated remote schema: the full payload
    /// minus the analytics columns.
    pub fn base_payload(&self) -> Value {
        let mut payload = self.full_payload();
        if let Some(map) = payload.as_object_mut() {
            for column in ANALYTICS_COLUMNS {
                map.remove(*column);
            }
        }
        payload
    }
}

/// A row read back from the store. Analytics columns are optional so rows
/// written before the v2 migration still deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLogRow {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub phone_number: String,
    #[serde(default)]
    pub duration_seconds: u32,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub recording_url: Option<String>,
    #[serde(default)]
    pub caller_name: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub was_booked: Option<bool>,
    #[serde(default)]
    pub interrupt_count: Option<u32>,
    #[serde(default)]
    pub estimated_cost_usd: Option<f64>,
    #[serde(default)]
    pub call_date: Option<String>,
    #[serde(default)]
    pub call_hour: Option<u8>,
    #[serde(default)]
    pub call_day_of_week: Option<String>,
}

/// Reduced projection returned by the bookings query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRow {
    #[serde(default)]
    pub id: Option<i64>,
    pub phone_number: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Projection used by the stats computation.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsRow {
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Aggregates derived on demand from all call logs; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub total_calls: u64,
    pub total_bookings: u64,
    pub avg_duration_seconds: u64,
    pub booking_rate_percent: u64,
}

impl StatsSummary {
    /// Compute the summary from {duration, summary} projections.
    ///
    /// Bookings count rows whose summary contains "Confirmed"
    /// (case-sensitive, matching how summaries are generated). The average
    /// skips absent and zero durations.
    pub fn from_rows(rows: &[StatsRow]) -> Self {
        let total_calls = rows.len() as u64;
        let total_bookings = rows
            .iter()
            .filter(|r| r.summary.as_deref().is_some_and(|s| s.contains("Confirmed")))
            .count() as u64;

        let durations: Vec<u64> = rows
            .iter()
            .filter_map(|r| r.duration_seconds)
            .filter(|&d| d > 0)
            .map(u64::from)
            .collect();
        let avg_duration_seconds = if durations.is_empty() {
            0
        } else {
            let sum: u64 = durations.iter().sum();
            (sum as f64 / durations.len() as f64).round() as u64
        };

        let booking_rate_percent = if total_calls == 0 {
            0
        } else {
            ((total_bookings as f64 / total_calls as f64) * 100.0).round() as u64
        };

        Self {
            total_calls,
            total_bookings,
            avg_duration_seconds,
            booking_rate_percent,
        }
    }
}
