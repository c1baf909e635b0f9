use crate::config::StoreAccess;
use crate::models::{BookingRow, CallLogRow, StatsRow, StatsSummary};
use crate::retry::RetryPolicy;
use crate::store::Store;
use serde_json::Value;

/// Read-side queries over the call-log table.
///
/// The read path favors availability over error visibility: every operation
/// returns an empty (or all-zero) result on unrecoverable failure, since the
/// callers are reporting surfaces that must not crash on a store hiccup. All
/// three operations share the writer's transient-retry policy. Reads select
/// columns generically, so there is no schema-mismatch fallback here.
#[derive(Debug, Clone)]
pub struct LogReader {
    store: Option<Store>,
    policy: RetryPolicy,
}

impl LogReader {
    pub fn new(access: StoreAccess) -> Self {
        Self::with_policy(access, RetryPolicy::default())
    }

    pub fn with_policy(access: StoreAccess, policy: RetryPolicy) -> Self {
        let store = match access {
            StoreAccess::Configured(creds) => Some(Store::new(creds)),
            StoreAccess::Unconfigured => None,
        };
        Self { store, policy }
    }

    /// Up to `limit` most-recent call logs, newest first.
    pub async fn fetch_recent(&self, limit: usize) -> Vec<CallLogRow> {
        let limit = limit.to_string();
        let rows = self
            .select("recent", &[
                ("select", "*"),
                ("order", "created_at.desc"),
                ("limit", limit.as_str()),
            ])
            .await;
        Self::decode(rows)
    }

    /// Calls whose summary marks a confirmed booking, newest first, projected
    /// to {id, phone_number, summary, created_at}. The `ilike` filter matches
    /// case-insensitively, wider than the stats computation's exact match.
    pub async fn fetch_bookings(&self) -> Vec<BookingRow> {
        let rows = self
            .select("bookings", &[
                ("select", "id,phone_number,summary,created_at"),
                ("summary", "ilike.*Confirmed*"),
                ("order", "created_at.desc"),
                ("limit", "200"),
            ])
            .await;
        Self::decode(rows)
    }

    /// Aggregate stats over every call log, computed locally from a
    /// two-column projection. All-zero when the store is unreachable or
    /// unconfigured.
    pub async fn fetch_stats(&self) -> StatsSummary {
        let rows: Vec<StatsRow> = Self::decode(
            self.select("stats", &[("select", "duration_seconds,summary")])
                .await,
        );
        StatsSummary::from_rows(&rows)
    }

    async fn select(&self, label: &str, params: &[(&str, &str)]) -> Vec<Value> {
        let Some(store) = &self.store else {
            tracing::info!(label, "store not configured, returning empty result");
            return Vec::new();
        };

        let owned: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let result = self
            .policy
            .run(label, || {
                let store = store.clone();
                let owned = owned.clone();
                async move {
                    let params: Vec<(&str, &str)> = owned
                        .iter()
                        .map(|(k, v)| (k.as_str(), v.as_str()))
                        .collect();
                    store.select(&params).await
                }
            })
            .await;

        match result {
            Ok(rows) => rows,
            Err(err) => {
                tracing::error!(label, error = %err, "failed to fetch call logs");
                Vec::new()
            }
        }
    }

    fn decode<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> Vec<T> {
        rows.into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(decoded) => Some(decoded),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping undecodable row");
                    None
                }
            })
            .collect()
    }
}
