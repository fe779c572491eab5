//! HandlePaymentWebhookHandler - the reconciliation engine for payment
//! processor webhooks.
//!
//! A verified event is applied to durable state in idempotent steps:
//!
//! 1. Replay check against the processed-event ledger (by processor
//!    event id). A known event is acknowledged without re-dispatch.
//! 2. Reconciliation. Every mutating step re-checks current state as
//!    part of the write itself (conditional store operations), because
//!    duplicate deliveries may be processed concurrently.
//! 3. The outcome is recorded in the ledger, insert-once. Failed
//!    reconciliations are NOT recorded: the error surfaces as a failed
//!    acknowledgment, the processor redelivers, and the idempotent
//!    steps converge on the next attempt.
//!
//! Missing state (unknown purchase, vanished course or user) is an
//! acknowledged no-op, never an error: the processor must not be told to
//! redeliver forever for events nothing can consume.

use std::sync::Arc;

use crate::domain::foundation::{CourseId, PurchaseId, UserId};
use crate::domain::purchase::{PurchaseStatus, WebhookError};
use crate::ports::{
    CourseRepository, PaymentProvider, PurchaseRepository, SaveResult, UserRepository,
    WebhookEventKind, WebhookEventRecord, WebhookEventRepository,
};

/// Command to handle a payment webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload, exactly as transmitted.
    pub payload: Vec<u8>,
    /// Webhook signature header.
    pub signature: String,
}

/// Outcome of reconciling one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// Buyer enrolled and purchase settled as completed.
    EnrollmentCompleted {
        purchase_id: PurchaseId,
        course_id: CourseId,
        user_id: UserId,
    },
    /// Purchase settled as failed after checkout expiry.
    PurchaseFailed { purchase_id: PurchaseId },
    /// Purchase was already terminal; nothing changed.
    AlreadySettled { purchase_id: PurchaseId },
    /// No purchase record matches the correlation id.
    NoSuchPurchase,
    /// Purchase exists but its course or buyer no longer does.
    MissingAggregates { purchase_id: PurchaseId },
    /// This exact event id was processed by an earlier delivery.
    AlreadyProcessed,
    /// Event kind outside the set the engine understands.
    Ignored,
}

/// Handler for processing payment provider webhooks.
pub struct HandlePaymentWebhookHandler {
    purchases: Arc<dyn PurchaseRepository>,
    courses: Arc<dyn CourseRepository>,
    users: Arc<dyn UserRepository>,
    ledger: Arc<dyn WebhookEventRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        purchases: Arc<dyn PurchaseRepository>,
        courses: Arc<dyn CourseRepository>,
        users: Arc<dyn UserRepository>,
        ledger: Arc<dyn WebhookEventRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            purchases,
            courses,
            users,
            ledger,
            payment_provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<ReconciliationOutcome, WebhookError> {
        // 1. Verification gates everything: no state is read or mutated
        //    before the signature over the raw bytes checks out.
        let event = self
            .payment_provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await?;

        // 2. Replay check.
        if self.ledger.find_by_event_id(&event.id).await?.is_some() {
            tracing::info!(event_id = %event.id, "duplicate webhook delivery; acknowledging");
            return Ok(ReconciliationOutcome::AlreadyProcessed);
        }

        // 3. Reconcile. Errors propagate without touching the ledger so
        //    the processor's redelivery can complete the work.
        let outcome = self.reconcile(&event.kind).await?;

        // 4. Record the outcome, insert-once.
        let record = match &outcome {
            ReconciliationOutcome::Ignored => WebhookEventRecord::ignored(
                &event.id,
                event.kind.label(),
                "event kind not handled",
            ),
            ReconciliationOutcome::NoSuchPurchase => WebhookEventRecord::ignored(
                &event.id,
                event.kind.label(),
                "no matching purchase record",
            ),
            ReconciliationOutcome::MissingAggregates { purchase_id } => {
                WebhookEventRecord::ignored(
                    &event.id,
                    event.kind.label(),
                    format!("course or user missing for purchase {}", purchase_id),
                )
            }
            _ => WebhookEventRecord::success(&event.id, event.kind.label()),
        };

        match self.ledger.save(record).await? {
            SaveResult::Inserted => Ok(outcome),
            // A concurrent delivery of the same event finished first. Its
            // reconciliation and ours were both idempotent, so either
            // answer is truthful; report the skip.
            SaveResult::AlreadyExists => Ok(ReconciliationOutcome::AlreadyProcessed),
        }
    }

    async fn reconcile(
        &self,
        kind: &WebhookEventKind,
    ) -> Result<ReconciliationOutcome, WebhookError> {
        match kind {
            WebhookEventKind::CheckoutCompleted { purchase_id, .. } => {
                self.reconcile_completed(purchase_id).await
            }
            WebhookEventKind::CheckoutExpired { purchase_id, .. } => {
                self.reconcile_expired(purchase_id).await
            }
            WebhookEventKind::Ignored(name) => {
                tracing::debug!(event_type = %name, "acknowledging unhandled event kind");
                Ok(ReconciliationOutcome::Ignored)
            }
        }
    }

    async fn reconcile_completed(
        &self,
        purchase_id: &PurchaseId,
    ) -> Result<ReconciliationOutcome, WebhookError> {
        let Some(purchase) = self.purchases.find_by_id(purchase_id).await? else {
            tracing::warn!(
                %purchase_id,
                "completed checkout references no purchase record; acknowledging"
            );
            return Ok(ReconciliationOutcome::NoSuchPurchase);
        };

        if purchase.is_settled() {
            if purchase.status == PurchaseStatus::Failed {
                // A completed notification lost the race against an expiry
                // for the same correlation id. Terminal status wins; this
                // needs an operator, not a state change.
                tracing::error!(
                    %purchase_id,
                    "completed checkout arrived after purchase was settled as failed"
                );
            }
            return Ok(ReconciliationOutcome::AlreadySettled {
                purchase_id: purchase.id,
            });
        }

        let course = self.courses.find_by_id(&purchase.course_id).await?;
        let user = self.users.find_by_id(&purchase.user_id).await?;
        let (Some(course), Some(user)) = (course, user) else {
            tracing::warn!(
                %purchase_id,
                course_id = %purchase.course_id,
                user_id = %purchase.user_id,
                "course or user missing; acknowledging without enrollment"
            );
            return Ok(ReconciliationOutcome::MissingAggregates {
                purchase_id: purchase.id,
            });
        };

        // Three idempotent writes, no cross-store transaction. A crash
        // between them leaves a one-sided enrollment that the processor's
        // redelivery of this same event heals: each store re-checks
        // membership/status as part of its own write.
        let newly_in_course = self.courses.enroll_student(&course.id, &user.id).await?;
        let newly_in_user = self.users.enroll_course(&user.id, &course.id).await?;
        let settled_now = self.purchases.mark_completed(&purchase.id).await?;

        tracing::info!(
            %purchase_id,
            course_id = %course.id,
            user_id = %user.id,
            newly_in_course,
            newly_in_user,
            settled_now,
            "checkout completion reconciled"
        );

        Ok(ReconciliationOutcome::EnrollmentCompleted {
            purchase_id: purchase.id,
            course_id: course.id,
            user_id: user.id,
        })
    }

    async fn reconcile_expired(
        &self,
        purchase_id: &PurchaseId,
    ) -> Result<ReconciliationOutcome, WebhookError> {
        let Some(purchase) = self.purchases.find_by_id(purchase_id).await? else {
            tracing::warn!(
                %purchase_id,
                "expired checkout references no purchase record; acknowledging"
            );
            return Ok(ReconciliationOutcome::NoSuchPurchase);
        };

        if purchase.is_settled() {
            return Ok(ReconciliationOutcome::AlreadySettled {
                purchase_id: purchase.id,
            });
        }

        // Conditional at the store: only a still-pending record fails. A
        // completion racing in between leaves the record completed.
        let transitioned = self.purchases.mark_failed(&purchase.id).await?;
        if transitioned {
            tracing::info!(%purchase_id, "checkout expiry reconciled; purchase failed");
            Ok(ReconciliationOutcome::PurchaseFailed {
                purchase_id: purchase.id,
            })
        } else {
            Ok(ReconciliationOutcome::AlreadySettled {
                purchase_id: purchase.id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Course;
    use crate::domain::foundation::{DomainError, Money, Percentage, Rating};
    use crate::domain::learner::User;
    use crate::domain::purchase::Purchase;
    use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentError, WebhookEvent};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    // ══════════════════════════════════════════════════════════════
    // Mock Implementations
    // ══════════════════════════════════════════════════════════════

    struct MockPurchaseRepository {
        purchases: Mutex<Vec<Purchase>>,
    }

    impl MockPurchaseRepository {
        fn with(purchases: Vec<Purchase>) -> Self {
            Self {
                purchases: Mutex::new(purchases),
            }
        }

        fn status_of(&self, id: &PurchaseId) -> Option<PurchaseStatus> {
            self.purchases
                .lock()
                .unwrap()
                .iter()
                .find(|p| &p.id == id)
                .map(|p| p.status)
        }
    }

    #[async_trait]
    impl PurchaseRepository for MockPurchaseRepository {
        async fn save(&self, purchase: &Purchase) -> Result<(), DomainError> {
            self.purchases.lock().unwrap().push(purchase.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &PurchaseId) -> Result<Option<Purchase>, DomainError> {
            Ok(self
                .purchases
                .lock()
                .unwrap()
                .iter()
                .find(|p| &p.id == id)
                .cloned())
        }

        async fn mark_completed(&self, id: &PurchaseId) -> Result<bool, DomainError> {
            let mut purchases = self.purchases.lock().unwrap();
            match purchases
                .iter_mut()
                .find(|p| &p.id == id && p.status == PurchaseStatus::Pending)
            {
                Some(p) => {
                    p.complete().expect("pending purchase completes");
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn mark_failed(&self, id: &PurchaseId) -> Result<bool, DomainError> {
            let mut purchases = self.purchases.lock().unwrap();
            match purchases
                .iter_mut()
                .find(|p| &p.id == id && p.status == PurchaseStatus::Pending)
            {
                Some(p) => {
                    p.fail().expect("pending purchase fails");
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn list_completed_for_courses(
            &self,
            _course_ids: &[CourseId],
        ) -> Result<Vec<Purchase>, DomainError> {
            Ok(vec![])
        }
    }

    struct MockCourseRepository {
        course: Option<Course>,
        enrollments: Mutex<HashSet<(CourseId, String)>>,
    }

    impl MockCourseRepository {
        fn with(course: Option<Course>) -> Self {
            Self {
                course,
                enrollments: Mutex::new(HashSet::new()),
            }
        }

        fn enrollment_count(&self) -> usize {
            self.enrollments.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CourseRepository for MockCourseRepository {
        async fn save(&self, _course: &Course) -> Result<(), DomainError> {
            Ok(())
        }

        async fn update(&self, _course: &Course) -> Result<(), DomainError> {
            Ok(())
        }

        async fn delete(&self, _id: &CourseId) -> Result<(), DomainError> {
            Ok(())
        }

        async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
            Ok(self.course.clone().filter(|c| &c.id == id))
        }

        async fn list_published(
            &self,
        ) -> Result<Vec<crate::ports::CourseSummary>, DomainError> {
            Ok(vec![])
        }

        async fn find_summaries(
            &self,
            _ids: &[CourseId],
        ) -> Result<Vec<crate::ports::CourseSummary>, DomainError> {
            Ok(vec![])
        }

        async fn list_by_educator(&self, _educator: &UserId) -> Result<Vec<Course>, DomainError> {
            Ok(vec![])
        }

        async fn enroll_student(
            &self,
            id: &CourseId,
            user_id: &UserId,
        ) -> Result<bool, DomainError> {
            Ok(self
                .enrollments
                .lock()
                .unwrap()
                .insert((*id, user_id.as_str().to_string())))
        }

        async fn upsert_rating(
            &self,
            _id: &CourseId,
            _user_id: &UserId,
            _rating: Rating,
        ) -> Result<(), DomainError> {
            Ok(())
        }
    }

    struct MockUserRepository {
        user: Option<User>,
        enrollments: Mutex<HashSet<(String, CourseId)>>,
        /// Fail this many enroll_course calls before succeeding.
        fail_enrollments: AtomicU32,
    }

    impl MockUserRepository {
        fn with(user: Option<User>) -> Self {
            Self {
                user,
                enrollments: Mutex::new(HashSet::new()),
                fail_enrollments: AtomicU32::new(0),
            }
        }

        fn failing_once(user: Option<User>) -> Self {
            Self {
                user,
                enrollments: Mutex::new(HashSet::new()),
                fail_enrollments: AtomicU32::new(1),
            }
        }

        fn enrollment_count(&self) -> usize {
            self.enrollments.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn upsert(&self, _user: &User) -> Result<(), DomainError> {
            Ok(())
        }

        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
            Ok(self.user.clone().filter(|u| &u.id == id))
        }

        async fn find_many(&self, _ids: &[UserId]) -> Result<Vec<User>, DomainError> {
            Ok(vec![])
        }

        async fn enroll_course(
            &self,
            id: &UserId,
            course_id: &CourseId,
        ) -> Result<bool, DomainError> {
            let remaining = self.fail_enrollments.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_enrollments.store(remaining - 1, Ordering::SeqCst);
                return Err(DomainError::database("simulated outage"));
            }
            Ok(self
                .enrollments
                .lock()
                .unwrap()
                .insert((id.as_str().to_string(), *course_id)))
        }
    }

    struct MockLedger {
        records: Mutex<HashMap<String, WebhookEventRecord>>,
    }

    impl MockLedger {
        fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
            }
        }

        fn record_for(&self, event_id: &str) -> Option<WebhookEventRecord> {
            self.records.lock().unwrap().get(event_id).cloned()
        }
    }

    #[async_trait]
    impl WebhookEventRepository for MockLedger {
        async fn find_by_event_id(
            &self,
            event_id: &str,
        ) -> Result<Option<WebhookEventRecord>, DomainError> {
            Ok(self.records.lock().unwrap().get(event_id).cloned())
        }

        async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError> {
            let mut records = self.records.lock().unwrap();
            if records.contains_key(&record.event_id) {
                Ok(SaveResult::AlreadyExists)
            } else {
                records.insert(record.event_id.clone(), record);
                Ok(SaveResult::Inserted)
            }
        }
    }

    struct MockPaymentProvider {
        event: Option<WebhookEvent>,
    }

    impl MockPaymentProvider {
        fn with_event(event: WebhookEvent) -> Self {
            Self { event: Some(event) }
        }

        fn rejecting() -> Self {
            Self { event: None }
        }
    }

    #[async_trait]
    impl PaymentProvider for MockPaymentProvider {
        async fn create_checkout_session(
            &self,
            _request: CreateCheckoutRequest,
        ) -> Result<CheckoutSession, PaymentError> {
            Err(PaymentError::provider("not under test"))
        }

        async fn verify_webhook(
            &self,
            _payload: &[u8],
            _signature: &str,
        ) -> Result<WebhookEvent, WebhookError> {
            self.event.clone().ok_or(WebhookError::InvalidSignature)
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Test Helpers
    // ══════════════════════════════════════════════════════════════

    struct Fixture {
        purchases: Arc<MockPurchaseRepository>,
        courses: Arc<MockCourseRepository>,
        users: Arc<MockUserRepository>,
        ledger: Arc<MockLedger>,
        purchase_id: PurchaseId,
    }

    fn buyer() -> User {
        User::from_claims(
            UserId::new("user_buyer").unwrap(),
            "Buyer",
            "buyer@example.com",
            None,
        )
    }

    fn course() -> Course {
        Course::create(
            CourseId::new(),
            UserId::new("user_educator").unwrap(),
            "Distributed Systems",
            "Consensus and friends",
            Money::from_major(100).unwrap(),
            Percentage::new(20),
        )
        .unwrap()
    }

    fn fixture() -> Fixture {
        let the_course = course();
        let the_buyer = buyer();
        let purchase = Purchase::create(
            PurchaseId::new(),
            the_course.id,
            the_buyer.id.clone(),
            Money::from_cents(8_000).unwrap(),
        );
        Fixture {
            purchase_id: purchase.id,
            purchases: Arc::new(MockPurchaseRepository::with(vec![purchase])),
            courses: Arc::new(MockCourseRepository::with(Some(the_course))),
            users: Arc::new(MockUserRepository::with(Some(the_buyer))),
            ledger: Arc::new(MockLedger::new()),
        }
    }

    fn handler_for(fixture: &Fixture, event: WebhookEvent) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            fixture.purchases.clone(),
            fixture.courses.clone(),
            fixture.users.clone(),
            fixture.ledger.clone(),
            Arc::new(MockPaymentProvider::with_event(event)),
        )
    }

    fn completed_event(id: &str, purchase_id: PurchaseId) -> WebhookEvent {
        WebhookEvent {
            id: id.to_string(),
            kind: WebhookEventKind::CheckoutCompleted {
                session_id: "cs_1".to_string(),
                purchase_id,
            },
            created_at: 1_704_067_200,
        }
    }

    fn expired_event(id: &str, purchase_id: PurchaseId) -> WebhookEvent {
        WebhookEvent {
            id: id.to_string(),
            kind: WebhookEventKind::CheckoutExpired {
                session_id: "cs_1".to_string(),
                purchase_id,
            },
            created_at: 1_704_067_200,
        }
    }

    fn cmd() -> HandlePaymentWebhookCommand {
        HandlePaymentWebhookCommand {
            payload: br#"{"id":"evt"}"#.to_vec(),
            signature: "t=0,v1=ab".to_string(),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Checkout Completed
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn completed_enrolls_buyer_and_settles_purchase() {
        let f = fixture();
        let handler = handler_for(&f, completed_event("evt_1", f.purchase_id));

        let outcome = handler.handle(cmd()).await.unwrap();

        assert!(matches!(
            outcome,
            ReconciliationOutcome::EnrollmentCompleted { .. }
        ));
        assert_eq!(f.purchases.status_of(&f.purchase_id), Some(PurchaseStatus::Completed));
        assert_eq!(f.courses.enrollment_count(), 1);
        assert_eq!(f.users.enrollment_count(), 1);
        assert_eq!(f.ledger.record_for("evt_1").unwrap().result, "success");
    }

    #[tokio::test]
    async fn duplicate_event_id_is_skipped_via_ledger() {
        let f = fixture();
        let handler = handler_for(&f, completed_event("evt_dup", f.purchase_id));

        handler.handle(cmd()).await.unwrap();
        let second = handler.handle(cmd()).await.unwrap();

        assert_eq!(second, ReconciliationOutcome::AlreadyProcessed);
        assert_eq!(f.courses.enrollment_count(), 1);
        assert_eq!(f.users.enrollment_count(), 1);
    }

    #[tokio::test]
    async fn redelivery_with_fresh_event_id_is_idempotent() {
        let f = fixture();

        // Same logical completion delivered twice under different ids:
        // the ledger cannot catch it, the status check must.
        let first = handler_for(&f, completed_event("evt_a", f.purchase_id));
        let second = handler_for(&f, completed_event("evt_b", f.purchase_id));

        first.handle(cmd()).await.unwrap();
        let outcome = second.handle(cmd()).await.unwrap();

        assert!(matches!(
            outcome,
            ReconciliationOutcome::AlreadySettled { .. }
        ));
        assert_eq!(f.courses.enrollment_count(), 1);
        assert_eq!(f.users.enrollment_count(), 1);
        assert_eq!(f.purchases.status_of(&f.purchase_id), Some(PurchaseStatus::Completed));
    }

    #[tokio::test]
    async fn completed_for_unknown_purchase_acknowledges_without_change() {
        let f = fixture();
        let handler = handler_for(&f, completed_event("evt_ghost", PurchaseId::new()));

        let outcome = handler.handle(cmd()).await.unwrap();

        assert_eq!(outcome, ReconciliationOutcome::NoSuchPurchase);
        assert_eq!(f.courses.enrollment_count(), 0);
        assert_eq!(f.purchases.status_of(&f.purchase_id), Some(PurchaseStatus::Pending));
        assert_eq!(f.ledger.record_for("evt_ghost").unwrap().result, "ignored");
    }

    #[tokio::test]
    async fn completed_with_missing_course_acknowledges_without_enrollment() {
        let mut f = fixture();
        f.courses = Arc::new(MockCourseRepository::with(None));
        let handler = handler_for(&f, completed_event("evt_nc", f.purchase_id));

        let outcome = handler.handle(cmd()).await.unwrap();

        assert!(matches!(
            outcome,
            ReconciliationOutcome::MissingAggregates { .. }
        ));
        assert_eq!(f.users.enrollment_count(), 0);
        // Purchase stays pending; a later redelivery after repair could
        // still complete it.
        assert_eq!(f.purchases.status_of(&f.purchase_id), Some(PurchaseStatus::Pending));
    }

    #[tokio::test]
    async fn completed_with_missing_user_acknowledges_without_enrollment() {
        let mut f = fixture();
        f.users = Arc::new(MockUserRepository::with(None));
        let handler = handler_for(&f, completed_event("evt_nu", f.purchase_id));

        let outcome = handler.handle(cmd()).await.unwrap();

        assert!(matches!(
            outcome,
            ReconciliationOutcome::MissingAggregates { .. }
        ));
        assert_eq!(f.courses.enrollment_count(), 0);
    }

    #[tokio::test]
    async fn transient_store_failure_surfaces_then_redelivery_converges() {
        let mut f = fixture();
        f.users = Arc::new(MockUserRepository::failing_once(Some(buyer())));

        // First delivery: course-side enrollment lands, user-side write
        // fails. The error must surface (failed acknowledgment) and the
        // ledger must NOT record the event.
        let first = handler_for(&f, completed_event("evt_retry", f.purchase_id));
        let err = first.handle(cmd()).await.unwrap_err();
        assert!(matches!(err, WebhookError::Database(_)));
        assert!(err.is_retryable());
        assert!(f.ledger.record_for("evt_retry").is_none());
        assert_eq!(f.courses.enrollment_count(), 1);
        assert_eq!(f.users.enrollment_count(), 0);
        assert_eq!(f.purchases.status_of(&f.purchase_id), Some(PurchaseStatus::Pending));

        // Redelivery of the same event completes the remaining writes
        // without double-enrolling the course side.
        let second = handler_for(&f, completed_event("evt_retry", f.purchase_id));
        let outcome = second.handle(cmd()).await.unwrap();
        assert!(matches!(
            outcome,
            ReconciliationOutcome::EnrollmentCompleted { .. }
        ));
        assert_eq!(f.courses.enrollment_count(), 1);
        assert_eq!(f.users.enrollment_count(), 1);
        assert_eq!(f.purchases.status_of(&f.purchase_id), Some(PurchaseStatus::Completed));
    }

    // ══════════════════════════════════════════════════════════════
    // Checkout Expired
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn expired_fails_pending_purchase() {
        let f = fixture();
        let handler = handler_for(&f, expired_event("evt_exp", f.purchase_id));

        let outcome = handler.handle(cmd()).await.unwrap();

        assert!(matches!(outcome, ReconciliationOutcome::PurchaseFailed { .. }));
        assert_eq!(f.purchases.status_of(&f.purchase_id), Some(PurchaseStatus::Failed));
        assert_eq!(f.courses.enrollment_count(), 0);
    }

    #[tokio::test]
    async fn expired_after_completed_never_regresses_status() {
        let f = fixture();

        let complete = handler_for(&f, completed_event("evt_c", f.purchase_id));
        complete.handle(cmd()).await.unwrap();

        let expire = handler_for(&f, expired_event("evt_e", f.purchase_id));
        let outcome = expire.handle(cmd()).await.unwrap();

        assert!(matches!(
            outcome,
            ReconciliationOutcome::AlreadySettled { .. }
        ));
        assert_eq!(f.purchases.status_of(&f.purchase_id), Some(PurchaseStatus::Completed));
    }

    #[tokio::test]
    async fn expired_for_unknown_purchase_acknowledges() {
        let f = fixture();
        let handler = handler_for(&f, expired_event("evt_exp_ghost", PurchaseId::new()));

        let outcome = handler.handle(cmd()).await.unwrap();
        assert_eq!(outcome, ReconciliationOutcome::NoSuchPurchase);
    }

    // ══════════════════════════════════════════════════════════════
    // Verification and Unhandled Kinds
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn failed_verification_rejects_before_any_state_access() {
        let f = fixture();
        let handler = HandlePaymentWebhookHandler::new(
            f.purchases.clone(),
            f.courses.clone(),
            f.users.clone(),
            f.ledger.clone(),
            Arc::new(MockPaymentProvider::rejecting()),
        );

        let result = handler.handle(cmd()).await;

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
        assert_eq!(f.courses.enrollment_count(), 0);
        assert_eq!(f.purchases.status_of(&f.purchase_id), Some(PurchaseStatus::Pending));
        assert!(f.ledger.record_for("evt_1").is_none());
    }

    #[tokio::test]
    async fn unhandled_event_kind_is_acknowledged_and_recorded() {
        let f = fixture();
        let event = WebhookEvent {
            id: "evt_other".to_string(),
            kind: WebhookEventKind::Ignored("charge.refunded".to_string()),
            created_at: 1_704_067_200,
        };
        let handler = handler_for(&f, event);

        let outcome = handler.handle(cmd()).await.unwrap();

        assert_eq!(outcome, ReconciliationOutcome::Ignored);
        assert_eq!(f.ledger.record_for("evt_other").unwrap().result, "ignored");
        assert_eq!(f.courses.enrollment_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_deliveries_enroll_exactly_once() {
        let f = fixture();
        let h1 = Arc::new(handler_for(&f, completed_event("evt_race", f.purchase_id)));
        let h2 = Arc::new(handler_for(&f, completed_event("evt_race", f.purchase_id)));

        let (r1, r2) = tokio::join!(h1.handle(cmd()), h2.handle(cmd()));
        r1.unwrap();
        r2.unwrap();

        assert_eq!(f.courses.enrollment_count(), 1);
        assert_eq!(f.users.enrollment_count(), 1);
        assert_eq!(f.purchases.status_of(&f.purchase_id), Some(PurchaseStatus::Completed));
    }
}
