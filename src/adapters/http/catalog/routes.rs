//! Axum routes for public catalog endpoints.

use axum::{routing::get, Router};

use crate::adapters::http::AppState;

use super::handlers::{delete_course, get_course, list_courses};

/// Catalog routes, mounted at `/api/course`.
///
/// - `GET /all` - list published courses (public)
/// - `GET /:id` - course detail (public, locked lectures redacted)
/// - `DELETE /:id` - delete an owned course (educator only)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(list_courses))
        .route("/:id", get(get_course).delete(delete_course))
}
