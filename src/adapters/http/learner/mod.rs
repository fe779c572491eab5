//! Student endpoints.

mod dto;
mod handlers;
mod routes;

pub use handlers::{
    add_rating, enrolled_courses, get_course_progress, get_user_data, update_course_progress,
};
pub use routes::routes;
