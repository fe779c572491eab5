//! Educator handlers: role promotion and sales reporting.

mod become_educator;
mod dashboard;
mod enrolled_students;

pub use become_educator::{BecomeEducatorCommand, BecomeEducatorHandler};
pub use dashboard::{
    DashboardData, DashboardEnrollment, EducatorDashboardHandler, EducatorDashboardQuery,
};
pub use enrolled_students::{
    EnrolledStudentRecord, EnrolledStudentsHandler, EnrolledStudentsQuery,
};
