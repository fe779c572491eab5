//! User profile aggregate.
//!
//! Identity lives at the external provider; this aggregate mirrors the
//! claims we need plus the user's enrolled-course set. The enrolled set
//! is idempotent membership and must stay consistent with the course
//! side: a user is enrolled in a course exactly when the course lists
//! the user and the user lists the course.

use crate::domain::foundation::{CourseId, Timestamp, UserId};

/// A marketplace user, auto-provisioned from identity-provider claims.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub enrolled_courses: Vec<CourseId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Creates a profile from identity-provider claims.
    pub fn from_claims(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        image_url: Option<String>,
    ) -> Self {
        let now = Timestamp::now();
        let name = name.into();
        Self {
            id,
            name: if name.trim().is_empty() {
                "User".to_string()
            } else {
                name
            },
            email: email.into(),
            image_url,
            enrolled_courses: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the course is in the enrolled set.
    pub fn is_enrolled(&self, course_id: &CourseId) -> bool {
        self.enrolled_courses.contains(course_id)
    }

    /// Adds a course to the enrolled set if not already present.
    ///
    /// Returns true if the course was added, false if already enrolled.
    pub fn enroll(&mut self, course_id: CourseId) -> bool {
        if self.is_enrolled(&course_id) {
            return false;
        }
        self.enrolled_courses.push(course_id);
        true
    }
}
