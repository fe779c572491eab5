//! HTTP adapters - axum routers, handlers, and DTOs.

pub mod catalog;
pub mod educator;
pub mod learner;
pub mod middleware;
pub mod payments;

use std::sync::Arc;

use axum::Router;
use serde::Serialize;

use crate::application::handlers::catalog::{
    DeleteCourseHandler, GetCourseHandler, ListCoursesHandler, PublishCourseHandler,
    UpdateCourseHandler,
};
use crate::application::handlers::educator::{
    BecomeEducatorHandler, EducatorDashboardHandler, EnrolledStudentsHandler,
};
use crate::application::handlers::learner::{
    EnrolledCoursesHandler, GetProfileHandler, GetProgressHandler, RateCourseHandler,
    UpdateProgressHandler,
};
use crate::application::handlers::payments::{BeginCheckoutHandler, HandlePaymentWebhookHandler};
use crate::ports::{
    CourseRepository, IdentityAdmin, MediaStorage, PaymentProvider, ProgressRepository,
    PurchaseRepository, SessionValidator, UserRepository, WebhookEventRepository,
};

/// Shared application state.
///
/// Arc-wrapped port implementations, cloned per request; handlers are
/// constructed on demand from the shared state.
#[derive(Clone)]
pub struct AppState {
    pub courses: Arc<dyn CourseRepository>,
    pub users: Arc<dyn UserRepository>,
    pub purchases: Arc<dyn PurchaseRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub webhook_events: Arc<dyn WebhookEventRepository>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub identity_admin: Arc<dyn IdentityAdmin>,
    pub media: Arc<dyn MediaStorage>,
    pub session_validator: Arc<dyn SessionValidator>,
    /// ISO currency code for checkout sessions.
    pub currency: String,
}

impl AppState {
    pub fn list_courses_handler(&self) -> ListCoursesHandler {
        ListCoursesHandler::new(self.courses.clone())
    }

    pub fn get_course_handler(&self) -> GetCourseHandler {
        GetCourseHandler::new(self.courses.clone())
    }

    pub fn publish_course_handler(&self) -> PublishCourseHandler {
        PublishCourseHandler::new(self.courses.clone(), self.media.clone())
    }

    pub fn update_course_handler(&self) -> UpdateCourseHandler {
        UpdateCourseHandler::new(self.courses.clone(), self.media.clone())
    }

    pub fn delete_course_handler(&self) -> DeleteCourseHandler {
        DeleteCourseHandler::new(self.courses.clone())
    }

    pub fn become_educator_handler(&self) -> BecomeEducatorHandler {
        BecomeEducatorHandler::new(self.identity_admin.clone())
    }

    pub fn dashboard_handler(&self) -> EducatorDashboardHandler {
        EducatorDashboardHandler::new(
            self.courses.clone(),
            self.purchases.clone(),
            self.users.clone(),
        )
    }

    pub fn enrolled_students_handler(&self) -> EnrolledStudentsHandler {
        EnrolledStudentsHandler::new(
            self.courses.clone(),
            self.purchases.clone(),
            self.users.clone(),
        )
    }

    pub fn get_profile_handler(&self) -> GetProfileHandler {
        GetProfileHandler::new(self.users.clone())
    }

    pub fn enrolled_courses_handler(&self) -> EnrolledCoursesHandler {
        EnrolledCoursesHandler::new(self.users.clone(), self.courses.clone())
    }

    pub fn update_progress_handler(&self) -> UpdateProgressHandler {
        UpdateProgressHandler::new(self.progress.clone())
    }

    pub fn get_progress_handler(&self) -> GetProgressHandler {
        GetProgressHandler::new(self.progress.clone())
    }

    pub fn rate_course_handler(&self) -> RateCourseHandler {
        RateCourseHandler::new(self.courses.clone(), self.users.clone())
    }

    pub fn begin_checkout_handler(&self) -> BeginCheckoutHandler {
        BeginCheckoutHandler::new(
            self.purchases.clone(),
            self.courses.clone(),
            self.users.clone(),
            self.payment_provider.clone(),
            self.currency.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.purchases.clone(),
            self.courses.clone(),
            self.users.clone(),
            self.webhook_events.clone(),
            self.payment_provider.clone(),
        )
    }
}

/// Standard error payload for all API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
        }
    }
}

/// Assemble the complete API router.
///
/// The auth middleware wraps everything; routes that need a caller use
/// the `RequireAuth`/`RequireEducator` extractors, public routes and
/// the signature-authenticated webhook ignore it.
pub fn api_router(state: AppState) -> Router {
    let validator = state.session_validator.clone();

    Router::new()
        .nest("/api/course", catalog::routes())
        .nest("/api/educator", educator::routes())
        .nest("/api/user", learner::routes())
        .nest("/api/payments", payments::checkout_routes())
        .nest("/api/webhooks", payments::webhook_routes())
        .layer(axum::middleware::from_fn_with_state(
            validator,
            middleware::auth_middleware,
        ))
        .with_state(state)
}
