//! DeleteCourseHandler - Command handler for removing a course.

use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{CourseId, UserId};
use crate::ports::CourseRepository;

/// Command to delete a course the caller owns.
#[derive(Debug, Clone)]
pub struct DeleteCourseCommand {
    pub educator: UserId,
    pub course_id: CourseId,
}

/// Handler for course deletion; owner-only.
pub struct DeleteCourseHandler {
    courses: Arc<dyn CourseRepository>,
}

impl DeleteCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    pub async fn handle(&self, cmd: DeleteCourseCommand) -> Result<(), CatalogError> {
        let course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or(CatalogError::NotFound(cmd.course_id))?;

        if !course.is_owned_by(&cmd.educator) {
            return Err(CatalogError::not_owner(course.id, cmd.educator));
        }

        self.courses.delete(&course.id).await?;
        tracing::info!(course_id = %course.id, "course deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::InMemoryCourseRepository;
    use crate::domain::catalog::Course;
    use crate::domain::foundation::{Money, Percentage};

    fn owner() -> UserId {
        UserId::new("user_owner").unwrap()
    }

    fn course() -> Course {
        Course::create(
            CourseId::new(),
            owner(),
            "Ephemeral",
            "Soon gone",
            Money::from_major(10).unwrap(),
            Percentage::ZERO,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn owner_can_delete() {
        let course = course();
        let id = course.id;
        let repo = Arc::new(InMemoryCourseRepository::with(vec![course]));
        let handler = DeleteCourseHandler::new(repo.clone());

        handler
            .handle(DeleteCourseCommand {
                educator: owner(),
                course_id: id,
            })
            .await
            .unwrap();

        assert!(repo.get(&id).is_none());
    }

    #[tokio::test]
    async fn non_owner_cannot_delete() {
        let course = course();
        let id = course.id;
        let repo = Arc::new(InMemoryCourseRepository::with(vec![course]));
        let handler = DeleteCourseHandler::new(repo.clone());

        let result = handler
            .handle(DeleteCourseCommand {
                educator: UserId::new("user_other").unwrap(),
                course_id: id,
            })
            .await;

        assert!(matches!(result, Err(CatalogError::NotOwner { .. })));
        assert!(repo.get(&id).is_some());
    }

    #[tokio::test]
    async fn missing_course_is_not_found() {
        let handler = DeleteCourseHandler::new(Arc::new(InMemoryCourseRepository::new()));

        let result = handler
            .handle(DeleteCourseCommand {
                educator: owner(),
                course_id: CourseId::new(),
            })
            .await;

        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }
}
