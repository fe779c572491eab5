//! Learner domain module.
//!
//! User profiles (mirrored from the identity provider) and per-course
//! study progress.

mod profile;
mod progress;

pub use profile::User;
pub use progress::CourseProgress;
