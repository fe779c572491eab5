//! PurchaseRepository port - persistence for purchase records.
//!
//! The status-changing operations are deliberately conditional: the store
//! re-checks the current status as part of the write itself, because two
//! deliveries for the same purchase may be reconciled concurrently by
//! independent handler instances. State observed earlier in a handler is
//! never trusted for the write decision.

use async_trait::async_trait;

use crate::domain::foundation::{CourseId, DomainError, PurchaseId};
use crate::domain::purchase::Purchase;

/// Port for storing and settling purchase records.
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Persists a newly created pending purchase.
    async fn save(&self, purchase: &Purchase) -> Result<(), DomainError>;

    /// Loads a purchase by id.
    async fn find_by_id(&self, id: &PurchaseId) -> Result<Option<Purchase>, DomainError>;

    /// Settles the purchase as completed, only if it is still pending.
    ///
    /// Returns true if this call performed the transition, false if the
    /// record was already terminal (or absent). The check and the write
    /// are one atomic store operation.
    async fn mark_completed(&self, id: &PurchaseId) -> Result<bool, DomainError>;

    /// Settles the purchase as failed, only if it is still pending.
    ///
    /// Returns true if this call performed the transition. A record
    /// already completed is never overwritten.
    async fn mark_failed(&self, id: &PurchaseId) -> Result<bool, DomainError>;

    /// Lists completed purchases across the given courses.
    ///
    /// Used for educator earnings and enrolled-student reporting.
    async fn list_completed_for_courses(
        &self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Purchase>, DomainError>;
}
