//! WebhookEventRepository port - ledger of processed payment webhooks.
//!
//! The reconciliation engine's check-then-write steps already make each
//! mutation safe to re-apply, but they cannot tell a replayed delivery
//! from a legitimately new event. This ledger, keyed by the processor's
//! event id, closes that gap: a replay is detected, acknowledged, and
//! never re-dispatched, and the stored outcome is available for audit.
//!
//! The processor may deliver the same event more than once (timeouts,
//! 5xx responses, lost acknowledgments), so every consumer of this port
//! must stay idempotent even without it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::DomainError;

/// Record of a processed webhook event.
#[derive(Debug, Clone)]
pub struct WebhookEventRecord {
    /// Processor-assigned event id (evt_xxx format).
    pub event_id: String,

    /// Processor event type (e.g. "checkout.session.completed").
    pub event_type: String,

    /// When the event was processed.
    pub processed_at: DateTime<Utc>,

    /// Result of processing: "success", "ignored", or "failed".
    pub result: String,

    /// Error or ignore reason, if any.
    pub detail: Option<String>,
}

impl WebhookEventRecord {
    /// Creates a new success record.
    pub fn success(event_id: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            result: "success".to_string(),
            detail: None,
        }
    }

    /// Creates a new ignored record.
    pub fn ignored(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            result: "ignored".to_string(),
            detail: Some(reason.into()),
        }
    }

    /// Creates a new failure record.
    pub fn failed(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            result: "failed".to_string(),
            detail: Some(error.into()),
        }
    }
}

/// Result of attempting to save a webhook event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// Record was inserted (first time seeing this event).
    Inserted,
    /// Record already exists (duplicate event).
    AlreadyExists,
}

/// Port for the processed-webhook ledger.
///
/// Implementations must use an insert-once primitive (PRIMARY KEY on
/// event_id) so that concurrent deliveries of the same event race safely:
/// first writer wins, the rest observe `AlreadyExists`.
#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    /// Finds a previously processed event by processor event id.
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError>;

    /// Attempts to save a record, with insert-once semantics.
    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory implementation for testing.
    struct InMemoryWebhookEventRepository {
        records: Arc<RwLock<HashMap<String, WebhookEventRecord>>>,
    }

    impl InMemoryWebhookEventRepository {
        fn new() -> Self {
            Self {
                records: Arc::new(RwLock::new(HashMap::new())),
            }
        }
    }

    #[async_trait]
    impl WebhookEventRepository for InMemoryWebhookEventRepository {
        async fn find_by_event_id(
            &self,
            event_id: &str,
        ) -> Result<Option<WebhookEventRecord>, DomainError> {
            let records = self.records.read().await;
            Ok(records.get(event_id).cloned())
        }

        async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError> {
            let mut records = self.records.write().await;
            if records.contains_key(&record.event_id) {
                Ok(SaveResult::AlreadyExists)
            } else {
                records.insert(record.event_id.clone(), record);
                Ok(SaveResult::Inserted)
            }
        }
    }

    #[test]
    fn success_record_has_correct_fields() {
        let record = WebhookEventRecord::success("evt_123", "checkout.session.completed");

        assert_eq!(record.event_id, "evt_123");
        assert_eq!(record.result, "success");
        assert!(record.detail.is_none());
    }

    #[test]
    fn ignored_record_includes_reason() {
        let record = WebhookEventRecord::ignored("evt_456", "charge.refunded", "unhandled type");

        assert_eq!(record.result, "ignored");
        assert_eq!(record.detail, Some("unhandled type".to_string()));
    }

    #[test]
    fn failed_record_includes_error() {
        let record =
            WebhookEventRecord::failed("evt_789", "checkout.session.completed", "store offline");

        assert_eq!(record.result, "failed");
        assert_eq!(record.detail, Some("store offline".to_string()));
    }

    #[tokio::test]
    async fn find_returns_none_for_new_event() {
        let repo = InMemoryWebhookEventRepository::new();
        assert!(repo.find_by_event_id("evt_new").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_returns_inserted_then_already_exists() {
        let repo = InMemoryWebhookEventRepository::new();
        let first = WebhookEventRecord::success("evt_dup", "type");
        let second = WebhookEventRecord::success("evt_dup", "type");

        assert_eq!(repo.save(first).await.unwrap(), SaveResult::Inserted);
        assert_eq!(repo.save(second).await.unwrap(), SaveResult::AlreadyExists);
    }

    #[tokio::test]
    async fn find_returns_record_after_save() {
        let repo = InMemoryWebhookEventRepository::new();
        repo.save(WebhookEventRecord::success("evt_saved", "type"))
            .await
            .unwrap();

        let found = repo.find_by_event_id("evt_saved").await.unwrap().unwrap();
        assert_eq!(found.result, "success");
    }
}
