//! UserRepository port - persistence for mirrored user profiles.

use async_trait::async_trait;

use crate::domain::foundation::{CourseId, DomainError, UserId};
use crate::domain::learner::User;

/// Port for user profile persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts or refreshes a profile mirrored from identity claims.
    async fn upsert(&self, user: &User) -> Result<(), DomainError>;

    /// Loads a user by id, including the enrolled-course set.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Loads several users at once (dashboard listings).
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError>;

    /// Adds a course to the user's enrolled set if not already present.
    ///
    /// Returns true if the membership was inserted by this call; the
    /// check and insert are one atomic store operation.
    async fn enroll_course(&self, id: &UserId, course_id: &CourseId) -> Result<bool, DomainError>;
}
