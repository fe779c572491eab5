//! HTTP handlers for public catalog endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::middleware::RequireEducator;
use crate::adapters::http::{AppState, ErrorResponse};
use crate::application::handlers::catalog::{
    DeleteCourseCommand, GetCourseQuery, ListCoursesQuery,
};
use crate::domain::catalog::CatalogError;
use crate::domain::foundation::CourseId;

use super::dto::{CourseDetailResponse, CourseSummaryResponse, CoursesResponse};

/// GET /api/course/all - List published courses.
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, CatalogApiError> {
    let handler = state.list_courses_handler();
    let summaries = handler.handle(ListCoursesQuery).await?;

    let response = CoursesResponse {
        courses: summaries
            .into_iter()
            .map(CourseSummaryResponse::from)
            .collect(),
    };
    Ok(Json(response))
}

/// GET /api/course/:id - Course detail with locked lectures redacted.
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, CatalogApiError> {
    let handler = state.get_course_handler();
    let course = handler.handle(GetCourseQuery { course_id }).await?;

    Ok(Json(CourseDetailResponse::from(course)))
}

/// DELETE /api/course/:id - Delete an owned course (educator only).
pub async fn delete_course(
    State(state): State<AppState>,
    RequireEducator(user): RequireEducator,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, CatalogApiError> {
    let handler = state.delete_course_handler();
    handler
        .handle(DeleteCourseCommand {
            educator: user.id,
            course_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════

/// API error wrapper shared by the catalog-facing endpoints.
pub struct CatalogApiError(pub CatalogError);

impl From<CatalogError> for CatalogApiError {
    fn from(err: CatalogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CatalogApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self.0 {
            CatalogError::NotFound(_) => (StatusCode::NOT_FOUND, "COURSE_NOT_FOUND"),
            CatalogError::NotOwner { .. } => (StatusCode::FORBIDDEN, "NOT_COURSE_OWNER"),
            CatalogError::NotEnrolled { .. } => (StatusCode::FORBIDDEN, "NOT_ENROLLED"),
            CatalogError::ThumbnailMissing => (StatusCode::BAD_REQUEST, "THUMBNAIL_MISSING"),
            CatalogError::MediaUploadFailed(_) => (StatusCode::BAD_GATEWAY, "MEDIA_UPLOAD_FAILED"),
            CatalogError::ValidationFailed { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            CatalogError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ErrorResponse::new(code, self.0.message());
        (status, Json(body)).into_response()
    }
}
