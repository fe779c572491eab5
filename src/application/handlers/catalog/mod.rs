//! Catalog handlers: browsing and educator course management.

mod delete_course;
mod get_course;
mod list_courses;
mod publish_course;
mod update_course;

pub use delete_course::{DeleteCourseCommand, DeleteCourseHandler};
pub use get_course::{GetCourseHandler, GetCourseQuery};
pub use list_courses::{ListCoursesHandler, ListCoursesQuery};
pub use publish_course::{CourseDraft, PublishCourseCommand, PublishCourseHandler};
pub use update_course::{UpdateCourseCommand, UpdateCourseHandler};
