//! HTTP handlers for educator endpoints.

use axum::extract::{Json, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::catalog::dto::{CourseDataDto, CourseDetailResponse};
use crate::adapters::http::catalog::CatalogApiError;
use crate::adapters::http::middleware::{RequireAuth, RequireEducator};
use crate::adapters::http::AppState;
use crate::application::handlers::catalog::{PublishCourseCommand, UpdateCourseCommand};
use crate::application::handlers::educator::{
    BecomeEducatorCommand, EducatorDashboardQuery, EnrolledStudentsQuery,
};
use crate::domain::catalog::CatalogError;
use crate::domain::foundation::CourseId;

use super::dto::{
    DashboardResponse, EducatorCoursesResponse, EnrolledStudentResponse, EnrolledStudentsResponse,
    UpdateRoleResponse,
};

/// Parsed course-editor multipart form: the `courseData` JSON field and
/// an optional `image` file.
struct CourseForm {
    data: CourseDataDto,
    image: Option<(String, Vec<u8>)>,
}

async fn read_course_form(mut multipart: Multipart) -> Result<CourseForm, CatalogError> {
    let mut data: Option<CourseDataDto> = None;
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CatalogError::validation("form", e.to_string()))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("courseData") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| CatalogError::validation("courseData", e.to_string()))?;
                data = Some(
                    serde_json::from_str(&text)
                        .map_err(|e| CatalogError::validation("courseData", e.to_string()))?,
                );
            }
            Some("image") => {
                let filename = field
                    .file_name()
                    .unwrap_or("thumbnail.png")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| CatalogError::validation("image", e.to_string()))?;
                image = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| CatalogError::validation("courseData", "field is required"))?;
    Ok(CourseForm { data, image })
}

/// GET /api/educator/update-role - Promote the caller to educator.
pub async fn update_role(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, CatalogApiError> {
    let handler = state.become_educator_handler();
    handler
        .handle(BecomeEducatorCommand { user_id: user.id })
        .await?;

    Ok(Json(UpdateRoleResponse {
        message: "You can publish a course now".to_string(),
    }))
}

/// POST /api/educator/add-course - Publish a new course (multipart).
pub async fn add_course(
    State(state): State<AppState>,
    RequireEducator(user): RequireEducator,
    multipart: Multipart,
) -> Result<impl IntoResponse, CatalogApiError> {
    let form = read_course_form(multipart).await?;
    let draft = form
        .data
        .into_draft()
        .map_err(|e| CatalogError::validation("courseData", e.to_string()))?;

    let handler = state.publish_course_handler();
    let course = handler
        .handle(PublishCourseCommand {
            educator: user.id,
            draft,
            thumbnail: form.image,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CourseDetailResponse::from(course))))
}

/// PUT /api/educator/update-course/:id - Edit an owned course (multipart).
pub async fn update_course(
    State(state): State<AppState>,
    RequireEducator(user): RequireEducator,
    Path(course_id): Path<CourseId>,
    multipart: Multipart,
) -> Result<impl IntoResponse, CatalogApiError> {
    let form = read_course_form(multipart).await?;
    let draft = form
        .data
        .into_draft()
        .map_err(|e| CatalogError::validation("courseData", e.to_string()))?;

    let handler = state.update_course_handler();
    let course = handler
        .handle(UpdateCourseCommand {
            educator: user.id,
            course_id,
            draft,
            thumbnail: form.image,
        })
        .await?;

    Ok(Json(CourseDetailResponse::from(course)))
}

/// GET /api/educator/courses - The educator's own courses.
pub async fn my_courses(
    State(state): State<AppState>,
    RequireEducator(user): RequireEducator,
) -> Result<impl IntoResponse, CatalogApiError> {
    let courses = state
        .courses
        .list_by_educator(&user.id)
        .await
        .map_err(CatalogError::from)?;

    Ok(Json(EducatorCoursesResponse {
        courses: courses.into_iter().map(CourseDetailResponse::from).collect(),
    }))
}

/// GET /api/educator/dashboard - Earnings and enrollment overview.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireEducator(user): RequireEducator,
) -> Result<impl IntoResponse, CatalogApiError> {
    let handler = state.dashboard_handler();
    let data = handler
        .handle(EducatorDashboardQuery { educator: user.id })
        .await?;

    Ok(Json(DashboardResponse::from(data)))
}

/// GET /api/educator/enrolled-students - Completed purchases listing.
pub async fn enrolled_students(
    State(state): State<AppState>,
    RequireEducator(user): RequireEducator,
) -> Result<impl IntoResponse, CatalogApiError> {
    let handler = state.enrolled_students_handler();
    let records = handler
        .handle(EnrolledStudentsQuery { educator: user.id })
        .await?;

    Ok(Json(EnrolledStudentsResponse {
        enrolled_students: records
            .into_iter()
            .map(EnrolledStudentResponse::from)
            .collect(),
    }))
}
