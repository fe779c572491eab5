//! HTTP handlers for student endpoints.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use crate::adapters::http::catalog::dto::CourseSummaryResponse;
use crate::adapters::http::catalog::CatalogApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::{AppState, ErrorResponse};
use crate::application::handlers::learner::{
    EnrolledCoursesQuery, GetProfileQuery, GetProgressQuery, RateCourseCommand,
    UpdateProgressCommand, UpdateProgressResult,
};
use crate::domain::catalog::CatalogError;
use crate::domain::foundation::Rating;

use super::dto::{
    AddRatingRequest, EnrolledCoursesResponse, GetProgressRequest, MessageResponse,
    ProgressDataResponse, ProgressResponse, UpdateProgressRequest, UserResponse,
};

/// GET /api/user/data - The caller's profile, auto-provisioned.
pub async fn get_user_data(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, CatalogApiError> {
    let handler = state.get_profile_handler();
    let profile = handler.handle(GetProfileQuery { caller: user }).await?;

    Ok(Json(UserResponse::from(profile)))
}

/// GET /api/user/enrolled-courses - The caller's enrolled courses.
pub async fn enrolled_courses(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, CatalogApiError> {
    let handler = state.enrolled_courses_handler();
    let summaries = handler
        .handle(EnrolledCoursesQuery { user_id: user.id })
        .await?;

    Ok(Json(EnrolledCoursesResponse {
        enrolled_courses: summaries
            .into_iter()
            .map(CourseSummaryResponse::from)
            .collect(),
    }))
}

/// POST /api/user/update-course-progress - Record a completed lecture.
pub async fn update_course_progress(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UpdateProgressRequest>,
) -> Result<impl IntoResponse, CatalogApiError> {
    let handler = state.update_progress_handler();
    let result = handler
        .handle(UpdateProgressCommand {
            user_id: user.id,
            course_id: request.course_id,
            lecture_id: request.lecture_id,
        })
        .await?;

    let message = match result {
        UpdateProgressResult::Recorded => "Progress updated",
        UpdateProgressResult::AlreadyRecorded => "Lecture already completed",
    };
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

/// POST /api/user/get-course-progress - Fetch one course's progress.
pub async fn get_course_progress(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<GetProgressRequest>,
) -> Result<impl IntoResponse, CatalogApiError> {
    let handler = state.get_progress_handler();
    let progress = handler
        .handle(GetProgressQuery {
            user_id: user.id,
            course_id: request.course_id,
        })
        .await?;

    Ok(Json(ProgressDataResponse {
        progress_data: progress.map(ProgressResponse::from),
    }))
}

/// POST /api/user/add-rating - Rate an enrolled course 1-5.
pub async fn add_rating(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<AddRatingRequest>,
) -> Result<impl IntoResponse, RatingApiError> {
    let rating = Rating::try_from_u8(request.rating)
        .map_err(|e| RatingApiError::InvalidRating(e.to_string()))?;

    let handler = state.rate_course_handler();
    handler
        .handle(RateCourseCommand {
            user_id: user.id,
            course_id: request.course_id,
            rating,
        })
        .await
        .map_err(RatingApiError::Catalog)?;

    Ok(Json(MessageResponse {
        message: "Rating added".to_string(),
    }))
}

/// API error for the rating endpoint: out-of-range ratings get their
/// own 400 before any catalog lookup happens.
pub enum RatingApiError {
    InvalidRating(String),
    Catalog(CatalogError),
}

impl IntoResponse for RatingApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            RatingApiError::InvalidRating(message) => (
                axum::http::StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("INVALID_RATING", message)),
            )
                .into_response(),
            RatingApiError::Catalog(err) => CatalogApiError(err).into_response(),
        }
    }
}
