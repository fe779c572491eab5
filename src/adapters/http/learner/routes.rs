//! Axum routes for student endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::AppState;

use super::handlers::{
    add_rating, enrolled_courses, get_course_progress, get_user_data, update_course_progress,
};

/// Student routes, mounted at `/api/user`.
///
/// - `GET /data` - the caller's profile (auto-provisioned)
/// - `GET /enrolled-courses` - enrolled course summaries
/// - `POST /update-course-progress` - record a completed lecture
/// - `POST /get-course-progress` - fetch progress for one course
/// - `POST /add-rating` - rate an enrolled course
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/data", get(get_user_data))
        .route("/enrolled-courses", get(enrolled_courses))
        .route("/update-course-progress", post(update_course_progress))
        .route("/get-course-progress", post(get_course_progress))
        .route("/add-rating", post(add_rating))
}
