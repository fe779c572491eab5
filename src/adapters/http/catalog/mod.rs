//! Public catalog endpoints.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::{delete_course, get_course, list_courses, CatalogApiError};
pub use routes::routes;
