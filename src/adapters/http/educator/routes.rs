//! Axum routes for educator endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::adapters::http::AppState;

use super::handlers::{
    add_course, dashboard, enrolled_students, my_courses, update_course, update_role,
};

/// Educator routes, mounted at `/api/educator`.
///
/// - `GET /update-role` - promote the caller to educator
/// - `POST /add-course` - publish a new course (multipart)
/// - `PUT /update-course/:id` - edit an owned course (multipart)
/// - `GET /courses` - the educator's own courses
/// - `GET /dashboard` - earnings and enrollment overview
/// - `GET /enrolled-students` - completed purchase listing
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/update-role", get(update_role))
        .route("/add-course", post(add_course))
        .route("/update-course/:id", put(update_course))
        .route("/courses", get(my_courses))
        .route("/dashboard", get(dashboard))
        .route("/enrolled-students", get(enrolled_students))
}
