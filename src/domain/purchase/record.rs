//! Purchase record aggregate.
//!
//! One record tracks one buyer's attempt to buy one course. Created
//! `Pending` by checkout initiation, resolved exactly once by the
//! reconciliation of a verified processor notification, never deleted.

use crate::domain::foundation::{
    CourseId, Money, PurchaseId, StateMachine, Timestamp, UserId, ValidationError,
};

use super::PurchaseStatus;

/// Durable record of one purchase attempt.
#[derive(Debug, Clone)]
pub struct Purchase {
    pub id: PurchaseId,
    pub course_id: CourseId,
    pub user_id: UserId,
    /// Amount charged: course price minus discount, fixed at creation.
    pub amount: Money,
    pub status: PurchaseStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Purchase {
    /// Creates a new pending purchase.
    pub fn create(id: PurchaseId, course_id: CourseId, user_id: UserId, amount: Money) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            course_id,
            user_id,
            amount,
            status: PurchaseStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the record has reached a terminal status.
    pub fn is_settled(&self) -> bool {
        self.status.is_terminal()
    }

    /// Marks the purchase completed.
    ///
    /// Only valid from `Pending`; terminal states reject the transition.
    pub fn complete(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(PurchaseStatus::Completed)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Marks the purchase failed.
    ///
    /// Only valid from `Pending`; a completed record wins any race with a
    /// late expiry notification.
    pub fn fail(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(PurchaseStatus::Failed)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
