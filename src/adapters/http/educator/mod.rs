//! Educator endpoints.

mod dto;
mod handlers;
mod routes;

pub use handlers::{
    add_course, dashboard, enrolled_students, my_courses, update_course, update_role,
};
pub use routes::routes;
