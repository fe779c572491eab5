//! BeginCheckoutHandler - Command handler for initiating a course purchase.

use std::sync::Arc;

use crate::domain::foundation::{CourseId, PurchaseId, UserId};
use crate::domain::purchase::{Purchase, PurchaseError};
use crate::ports::{
    CourseRepository, CreateCheckoutRequest, PaymentProvider, PurchaseRepository, UserRepository,
};

/// Command to begin checkout for a course.
#[derive(Debug, Clone)]
pub struct BeginCheckoutCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
    /// Origin of the requesting front-end; checkout return URLs derive
    /// from it.
    pub origin: String,
}

/// Result of successful checkout initiation.
#[derive(Debug, Clone)]
pub struct BeginCheckoutResult {
    pub purchase_id: PurchaseId,
    /// Processor-hosted page the buyer is redirected to.
    pub redirect_url: String,
}

/// Handler for initiating a course purchase.
///
/// Creates a pending purchase record priced at the course's discounted
/// price, then requests a hosted checkout session carrying the purchase
/// id as correlation metadata. The record is settled later, by webhook
/// reconciliation, never here.
pub struct BeginCheckoutHandler {
    purchases: Arc<dyn PurchaseRepository>,
    courses: Arc<dyn CourseRepository>,
    users: Arc<dyn UserRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
    currency: String,
}

impl BeginCheckoutHandler {
    pub fn new(
        purchases: Arc<dyn PurchaseRepository>,
        courses: Arc<dyn CourseRepository>,
        users: Arc<dyn UserRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            purchases,
            courses,
            users,
            payment_provider,
            currency: currency.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: BeginCheckoutCommand,
    ) -> Result<BeginCheckoutResult, PurchaseError> {
        // 1. Both referenced aggregates must exist
        let user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| PurchaseError::user_not_found(cmd.user_id.clone()))?;

        let course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or_else(|| PurchaseError::course_not_found(cmd.course_id))?;

        // 2. Create the pending purchase at the discounted price
        let amount = course.discounted_price();
        let purchase = Purchase::create(PurchaseId::new(), course.id, user.id.clone(), amount);
        self.purchases.save(&purchase).await?;

        // 3. Request a hosted checkout session, correlating by purchase id
        let session = self
            .payment_provider
            .create_checkout_session(CreateCheckoutRequest {
                purchase_id: purchase.id,
                product_name: course.title.clone(),
                amount,
                currency: self.currency.clone(),
                success_url: format!("{}/loading/my-enrollments", cmd.origin),
                cancel_url: format!("{}/", cmd.origin),
            })
            .await
            .map_err(|e| {
                // The pending record stays in place: if the processor did
                // create a session despite the error, its webhook will
                // still reconcile against the purchase id.
                tracing::warn!(
                    purchase_id = %purchase.id,
                    error = %e,
                    "checkout session creation failed; purchase left pending"
                );
                PurchaseError::upstream(e.to_string())
            })?;

        tracing::info!(
            purchase_id = %purchase.id,
            course_id = %course.id,
            user_id = %user.id,
            amount = %amount,
            session_id = %session.id,
            "checkout initiated"
        );

        Ok(BeginCheckoutResult {
            purchase_id: purchase.id,
            redirect_url: session.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Course;
    use crate::domain::foundation::{DomainError, Money, Percentage};
    use crate::domain::learner::User;
    use crate::domain::purchase::{PurchaseStatus, WebhookError};
    use crate::ports::{CheckoutSession, PaymentError, WebhookEvent};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ══════════════════════════════════════════════════════════════
    // Mock Implementations
    // ══════════════════════════════════════════════════════════════

    struct MockPurchaseRepository {
        purchases: Mutex<Vec<Purchase>>,
    }

    impl MockPurchaseRepository {
        fn new() -> Self {
            Self {
                purchases: Mutex::new(Vec::new()),
            }
        }

        fn saved(&self) -> Vec<Purchase> {
            self.purchases.lock().unwrap().clone()
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

        async fn mark_completed(&self, _id: &PurchaseId) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn mark_failed(&self, _id: &PurchaseId) -> Result<bool, DomainError> {
            Ok(false)
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
            _id: &CourseId,
            _user_id: &UserId,
        ) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn upsert_rating(
            &self,
            _id: &CourseId,
            _user_id: &UserId,
            _rating: crate::domain::foundation::Rating,
        ) -> Result<(), DomainError> {
            Ok(())
        }
    }

    struct MockUserRepository {
        user: Option<User>,
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
            _id: &UserId,
            _course_id: &CourseId,
        ) -> Result<bool, DomainError> {
            Ok(false)
        }
    }

    struct MockPaymentProvider {
        fail_session: bool,
        requests: Mutex<Vec<CreateCheckoutRequest>>,
    }

    impl MockPaymentProvider {
        fn new() -> Self {
            Self {
                fail_session: false,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail_session: true,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<CreateCheckoutRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentProvider for MockPaymentProvider {
        async fn create_checkout_session(
            &self,
            request: CreateCheckoutRequest,
        ) -> Result<CheckoutSession, PaymentError> {
            self.requests.lock().unwrap().push(request);
            if self.fail_session {
                return Err(PaymentError::network("connection reset"));
            }
            Ok(CheckoutSession {
                id: "cs_test_123".to_string(),
                url: "https://checkout.example.com/cs_test_123".to_string(),
                expires_at: 1_704_153_600,
            })
        }

        async fn verify_webhook(
            &self,
            _payload: &[u8],
            _signature: &str,
        ) -> Result<WebhookEvent, WebhookError> {
            Err(WebhookError::InvalidSignature)
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Test Helpers
    // ══════════════════════════════════════════════════════════════

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
            "Systems Programming",
            "All the way down",
            Money::from_major(100).unwrap(),
            Percentage::new(20),
        )
        .unwrap()
    }

    fn handler(
        purchases: Arc<MockPurchaseRepository>,
        course: Option<Course>,
        user: Option<User>,
        provider: Arc<MockPaymentProvider>,
    ) -> BeginCheckoutHandler {
        BeginCheckoutHandler::new(
            purchases,
            Arc::new(MockCourseRepository { course }),
            Arc::new(MockUserRepository { user }),
            provider,
            "usd",
        )
    }

    // ══════════════════════════════════════════════════════════════
    // Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn checkout_creates_pending_purchase_at_discounted_price() {
        let purchases = Arc::new(MockPurchaseRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());
        let the_course = course();
        let handler = handler(
            purchases.clone(),
            Some(the_course.clone()),
            Some(buyer()),
            provider.clone(),
        );

        let result = handler
            .handle(BeginCheckoutCommand {
                user_id: buyer().id,
                course_id: the_course.id,
                origin: "https://app.example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            result.redirect_url,
            "https://checkout.example.com/cs_test_123"
        );

        let saved = purchases.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].status, PurchaseStatus::Pending);
        // 100.00 at 20% discount
        assert_eq!(saved[0].amount.as_cents(), 8_000);
    }

    #[tokio::test]
    async fn checkout_session_carries_purchase_id_and_return_urls() {
        let purchases = Arc::new(MockPurchaseRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());
        let the_course = course();
        let handler = handler(
            purchases.clone(),
            Some(the_course.clone()),
            Some(buyer()),
            provider.clone(),
        );

        handler
            .handle(BeginCheckoutCommand {
                user_id: buyer().id,
                course_id: the_course.id,
                origin: "https://app.example.com".to_string(),
            })
            .await
            .unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].purchase_id, purchases.saved()[0].id);
        assert_eq!(
            requests[0].success_url,
            "https://app.example.com/loading/my-enrollments"
        );
        assert_eq!(requests[0].cancel_url, "https://app.example.com/");
        assert_eq!(requests[0].currency, "usd");
    }

    #[tokio::test]
    async fn checkout_fails_when_course_missing() {
        let purchases = Arc::new(MockPurchaseRepository::new());
        let handler = handler(
            purchases.clone(),
            None,
            Some(buyer()),
            Arc::new(MockPaymentProvider::new()),
        );

        let result = handler
            .handle(BeginCheckoutCommand {
                user_id: buyer().id,
                course_id: CourseId::new(),
                origin: "https://app.example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(PurchaseError::CourseNotFound(_))));
        assert!(purchases.saved().is_empty());
    }

    #[tokio::test]
    async fn checkout_fails_when_user_missing() {
        let purchases = Arc::new(MockPurchaseRepository::new());
        let the_course = course();
        let handler = handler(
            purchases.clone(),
            Some(the_course.clone()),
            None,
            Arc::new(MockPaymentProvider::new()),
        );

        let result = handler
            .handle(BeginCheckoutCommand {
                user_id: UserId::new("user_ghost").unwrap(),
                course_id: the_course.id,
                origin: "https://app.example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(PurchaseError::UserNotFound(_))));
        assert!(purchases.saved().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_surfaces_upstream_and_leaves_purchase_pending() {
        let purchases = Arc::new(MockPurchaseRepository::new());
        let provider = Arc::new(MockPaymentProvider::failing());
        let the_course = course();
        let handler = handler(
            purchases.clone(),
            Some(the_course.clone()),
            Some(buyer()),
            provider,
        );

        let result = handler
            .handle(BeginCheckoutCommand {
                user_id: buyer().id,
                course_id: the_course.id,
                origin: "https://app.example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(PurchaseError::Upstream { .. })));

        // The record created before the call is not rolled back.
        let saved = purchases.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].status, PurchaseStatus::Pending);
    }
}
