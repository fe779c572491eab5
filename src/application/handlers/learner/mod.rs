//! Learner handlers: profile, enrollments, progress, ratings.

mod course_progress;
mod enrolled_courses;
mod get_profile;
mod rate_course;

pub use course_progress::{
    GetProgressHandler, GetProgressQuery, UpdateProgressCommand, UpdateProgressHandler,
    UpdateProgressResult,
};
pub use enrolled_courses::{EnrolledCoursesHandler, EnrolledCoursesQuery};
pub use get_profile::{GetProfileHandler, GetProfileQuery};
pub use rate_course::{RateCourseCommand, RateCourseHandler};
