use crate::config::StoreAccess;
use crate::error::StoreError;
use crate::models::CallRecord;
use crate::retry::RetryPolicy;
use crate::store::Store;
use serde_json::Value;

/// Result of a save: always structured, never an error across the component
/// boundary. `Skipped` is the unconfigured degraded mode, distinct from a
/// real failure.
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    /// The store accepted the insert; carries the returned representation.
    Saved(Value),
    /// No store configured; nothing was attempted.
    Skipped(String),
    /// Both the full and fallback attempts failed.
    Failed(String),
}

impl SaveOutcome {
    pub fn success(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Saved(rows) => rows.to_string(),
            Self::Skipped(reason) | Self::Failed(reason) => reason.clone(),
        }
    }
}

/// Persists completed-call records.
///
/// Insert strategy, in order:
/// 1. Full payload, analytics columns included.
/// 2. On a schema mismatch (analytics migration not yet applied remotely),
///    one fallback insert with base columns only — losing the analytics
///    fields is better than losing the call record.
/// 3. Each attempt independently retries transient failures under the
///    configured [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct LogWriter {
    store: Option<Store>,
    policy: RetryPolicy,
}

impl LogWriter {
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

    pub async fn save(&self, record: &CallRecord) -> SaveOutcome {
        let Some(store) = &self.store else {
            tracing::info!(
                phone = %record.phone_number,
                duration_seconds = record.duration_seconds,
                "store not configured, call log kept local only"
            );
            return SaveOutcome::Skipped("store not configured".to_string());
        };

        match self.insert(store, record.full_payload(), "full").await {
            Ok(rows) => SaveOutcome::Saved(rows),
            Err(StoreError::SchemaMismatch(detail)) => {
                tracing::warn!(
                    phone = %record.phone_number,
                    detail = %detail,
                    "analytics columns missing remotely (run the v2 migration); \
                     falling back to base columns for this call log"
                );
                self.save_base(store, record).await
            }
            Err(err) => self.fail(record, err),
        }
    }

    /// One-shot fallback; a schema mismatch here means even the base columns
    /// are unrecognized, which is a deployment fault rather than drift.
    async fn save_base(&self, store: &Store, record: &CallRecord) -> SaveOutcome {
        match self.insert(store, record.base_payload(), "base-fallback").await {
            Ok(rows) => SaveOutcome::Saved(rows),
            Err(StoreError::SchemaMismatch(detail)) => {
                tracing::error!(
                    phone = %record.phone_number,
                    detail = %detail,
                    "base columns rejected by the store; check table name and schema"
                );
                SaveOutcome::Failed(format!("base columns rejected: {detail}"))
            }
            Err(err) => self.fail(record, err),
        }
    }

    async fn insert(
        &self,
        store: &Store,
        payload: Value,
        label: &str,
    ) -> Result<Value, StoreError> {
        let rows = self
            .policy
            .run(label, || {
                let store = store.clone();
                let payload = payload.clone();
                async move { store.insert(&payload).await }
            })
            .await?;
        tracing::info!(label, "saved call log");
        Ok(rows)
    }

    fn fail(&self, record: &CallRecord, err: StoreError) -> SaveOutcome {
        tracing::error!(
            phone = %record.phone_number,
            error = %err,
            "failed to save call log"
        );
        SaveOutcome::Failed(err.detail().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreAccess;

    #[tokio::test]
    async fn test_unconfigured_save_is_skipped() {
        let writer = LogWriter::new(StoreAccess::Unconfigured);
        let record = CallRecord::new("+15551234567", 30, "hello");
        let outcome = writer.save(&record).await;
        assert!(!outcome.success());
        assert!(matches!(outcome, SaveOutcome::Skipped(_)));
        assert_eq!(outcome.detail(), "store not configured");
    }
}
