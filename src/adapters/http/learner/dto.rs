//! Request/response DTOs for student endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::catalog::dto::CourseSummaryResponse;
use crate::domain::foundation::{CourseId, LectureId};
use crate::domain::learner::{CourseProgress, User};

/// The caller's profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub enrolled_courses: Vec<CourseId>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            image_url: user.image_url,
            enrolled_courses: user.enrolled_courses,
        }
    }
}

/// Enrolled-course listing envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCoursesResponse {
    pub enrolled_courses: Vec<CourseSummaryResponse>,
}

/// Request to record a completed lecture.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    pub course_id: CourseId,
    pub lecture_id: LectureId,
}

/// Request for one course's progress.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProgressRequest {
    pub course_id: CourseId,
}

/// Progress for one course; `null` content when not started.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub course_id: CourseId,
    pub completed: bool,
    pub lecture_completed: Vec<LectureId>,
}

impl From<CourseProgress> for ProgressResponse {
    fn from(progress: CourseProgress) -> Self {
        Self {
            course_id: progress.course_id,
            completed: progress.completed,
            lecture_completed: progress.completed_lectures,
        }
    }
}

/// Envelope for the progress query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDataResponse {
    pub progress_data: Option<ProgressResponse>,
}

/// Request to rate a course.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRatingRequest {
    pub course_id: CourseId,
    pub rating: u8,
}

/// Plain message envelope.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
