//! Course progress handlers: record a completed lecture, fetch progress.

use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{CourseId, LectureId, UserId};
use crate::domain::learner::CourseProgress;
use crate::ports::ProgressRepository;

/// Command to record a completed lecture.
#[derive(Debug, Clone)]
pub struct UpdateProgressCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub lecture_id: LectureId,
}

/// Result of recording progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateProgressResult {
    /// Lecture recorded for the first time.
    Recorded,
    /// Lecture was already recorded; acknowledged no-op.
    AlreadyRecorded,
}

/// Handler recording lecture completion, idempotently.
pub struct UpdateProgressHandler {
    progress: Arc<dyn ProgressRepository>,
}

impl UpdateProgressHandler {
    pub fn new(progress: Arc<dyn ProgressRepository>) -> Self {
        Self { progress }
    }

    pub async fn handle(
        &self,
        cmd: UpdateProgressCommand,
    ) -> Result<UpdateProgressResult, CatalogError> {
        match self.progress.find(&cmd.user_id, &cmd.course_id).await? {
            Some(mut progress) => {
                if !progress.record_lecture(cmd.lecture_id) {
                    return Ok(UpdateProgressResult::AlreadyRecorded);
                }
                self.progress.upsert(&progress).await?;
                Ok(UpdateProgressResult::Recorded)
            }
            None => {
                let progress =
                    CourseProgress::start(cmd.user_id, cmd.course_id, cmd.lecture_id);
                self.progress.upsert(&progress).await?;
                Ok(UpdateProgressResult::Recorded)
            }
        }
    }
}

/// Query for one user's progress in one course.
#[derive(Debug, Clone)]
pub struct GetProgressQuery {
    pub user_id: UserId,
    pub course_id: CourseId,
}

/// Handler fetching progress; None when the user has not started.
pub struct GetProgressHandler {
    progress: Arc<dyn ProgressRepository>,
}

impl GetProgressHandler {
    pub fn new(progress: Arc<dyn ProgressRepository>) -> Self {
        Self { progress }
    }

    pub async fn handle(
        &self,
        query: GetProgressQuery,
    ) -> Result<Option<CourseProgress>, CatalogError> {
        Ok(self.progress.find(&query.user_id, &query.course_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::InMemoryProgressRepository;

    fn ids() -> (UserId, CourseId, LectureId) {
        (
            UserId::new("user_student").unwrap(),
            CourseId::new(),
            LectureId::new(),
        )
    }

    #[tokio::test]
    async fn first_lecture_starts_progress() {
        let repo = Arc::new(InMemoryProgressRepository::new());
        let handler = UpdateProgressHandler::new(repo.clone());
        let (user, course, lecture) = ids();

        let result = handler
            .handle(UpdateProgressCommand {
                user_id: user.clone(),
                course_id: course,
                lecture_id: lecture,
            })
            .await
            .unwrap();

        assert_eq!(result, UpdateProgressResult::Recorded);
        let stored = GetProgressHandler::new(repo)
            .handle(GetProgressQuery {
                user_id: user,
                course_id: course,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.completed_lectures, vec![lecture]);
    }

    #[tokio::test]
    async fn repeated_lecture_is_acknowledged_noop() {
        let repo = Arc::new(InMemoryProgressRepository::new());
        let handler = UpdateProgressHandler::new(repo.clone());
        let (user, course, lecture) = ids();
        let cmd = UpdateProgressCommand {
            user_id: user,
            course_id: course,
            lecture_id: lecture,
        };

        handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();

        assert_eq!(second, UpdateProgressResult::AlreadyRecorded);
        assert_eq!(repo.records.lock().unwrap()[0].completed_lectures.len(), 1);
    }

    #[tokio::test]
    async fn progress_accumulates_distinct_lectures() {
        let repo = Arc::new(InMemoryProgressRepository::new());
        let handler = UpdateProgressHandler::new(repo.clone());
        let (user, course, lecture) = ids();

        handler
            .handle(UpdateProgressCommand {
                user_id: user.clone(),
                course_id: course,
                lecture_id: lecture,
            })
            .await
            .unwrap();
        handler
            .handle(UpdateProgressCommand {
                user_id: user,
                course_id: course,
                lecture_id: LectureId::new(),
            })
            .await
            .unwrap();

        assert_eq!(repo.records.lock().unwrap()[0].completed_lectures.len(), 2);
    }

    #[tokio::test]
    async fn unstarted_progress_is_none() {
        let handler = GetProgressHandler::new(Arc::new(InMemoryProgressRepository::new()));
        let (user, course, _) = ids();

        let result = handler
            .handle(GetProgressQuery {
                user_id: user,
                course_id: course,
            })
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
