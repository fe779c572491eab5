//! Purchase status state machine.
//!
//! A purchase starts `Pending` and resolves exactly once: the payment
//! processor's completed notification moves it to `Completed`, an expiry
//! notification moves it to `Failed`. Both outcomes are terminal and a
//! record never leaves them, regardless of what is delivered afterwards.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a purchase record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    /// Created at checkout initiation; awaiting the processor's verdict.
    Pending,

    /// Payment confirmed and enrollment applied. Terminal.
    Completed,

    /// Checkout expired or was abandoned. Terminal.
    Failed,
}

impl PurchaseStatus {
    /// Returns the storage string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Failed => "failed",
        }
    }

    /// Parses a storage string into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PurchaseStatus::Pending),
            "completed" => Some(PurchaseStatus::Completed),
            "failed" => Some(PurchaseStatus::Failed),
            _ => None,
        }
    }
}

impl StateMachine for PurchaseStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PurchaseStatus::*;
        matches!((self, target), (Pending, Completed) | (Pending, Failed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PurchaseStatus::*;
        match self {
            Pending => vec![Completed, Failed],
            Completed => vec![],
            Failed => vec![],
        }
    }
}
