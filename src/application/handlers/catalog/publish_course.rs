//! PublishCourseHandler - Command handler for educators adding a course.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, Chapter, Course};
use crate::domain::foundation::{CourseId, Money, Percentage, UserId};
use crate::ports::{CourseRepository, MediaStorage};

/// Course fields supplied by the educator.
#[derive(Debug, Clone)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub price: Money,
    pub discount: Percentage,
    pub is_published: bool,
    pub chapters: Vec<Chapter>,
}

/// Command to publish a new course with its thumbnail image.
#[derive(Debug, Clone)]
pub struct PublishCourseCommand {
    pub educator: UserId,
    pub draft: CourseDraft,
    /// Raw thumbnail image, required for new courses.
    pub thumbnail: Option<(String, Vec<u8>)>,
}

/// Handler for creating a course.
///
/// The thumbnail is uploaded to the asset host first; the course stores
/// only the returned durable URL.
pub struct PublishCourseHandler {
    courses: Arc<dyn CourseRepository>,
    media: Arc<dyn MediaStorage>,
}

impl PublishCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, media: Arc<dyn MediaStorage>) -> Self {
        Self { courses, media }
    }

    pub async fn handle(&self, cmd: PublishCourseCommand) -> Result<Course, CatalogError> {
        let (filename, bytes) = cmd.thumbnail.ok_or(CatalogError::ThumbnailMissing)?;

        let thumbnail_url = self
            .media
            .upload_image(&filename, bytes)
            .await
            .map_err(|e| CatalogError::media_upload_failed(e.to_string()))?;

        let mut course = Course::create(
            CourseId::new(),
            cmd.educator,
            cmd.draft.title,
            cmd.draft.description,
            cmd.draft.price,
            cmd.draft.discount,
        )
        .map_err(|e| CatalogError::validation("course", e.to_string()))?;

        course.thumbnail_url = Some(thumbnail_url);
        course.is_published = cmd.draft.is_published;
        course.chapters = cmd.draft.chapters;

        self.courses.save(&course).await?;

        tracing::info!(course_id = %course.id, educator = %course.educator, "course published");
        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::InMemoryCourseRepository;
    use crate::ports::MediaError;
    use async_trait::async_trait;

    struct StubMediaStorage {
        fail: bool,
    }

    #[async_trait]
    impl MediaStorage for StubMediaStorage {
        async fn upload_image(
            &self,
            filename: &str,
            _bytes: Vec<u8>,
        ) -> Result<String, MediaError> {
            if self.fail {
                return Err(MediaError::Unavailable("host down".to_string()));
            }
            Ok(format!("https://cdn.example.com/{}", filename))
        }
    }

    fn draft() -> CourseDraft {
        CourseDraft {
            title: "Compilers".to_string(),
            description: "Front to back".to_string(),
            price: Money::from_major(120).unwrap(),
            discount: Percentage::new(10),
            is_published: true,
            chapters: Vec::new(),
        }
    }

    fn educator() -> UserId {
        UserId::new("user_educator").unwrap()
    }

    #[tokio::test]
    async fn publish_uploads_thumbnail_and_saves_course() {
        let repo = Arc::new(InMemoryCourseRepository::new());
        let handler =
            PublishCourseHandler::new(repo.clone(), Arc::new(StubMediaStorage { fail: false }));

        let course = handler
            .handle(PublishCourseCommand {
                educator: educator(),
                draft: draft(),
                thumbnail: Some(("cover.png".to_string(), vec![1, 2, 3])),
            })
            .await
            .unwrap();

        assert_eq!(
            course.thumbnail_url.as_deref(),
            Some("https://cdn.example.com/cover.png")
        );
        assert!(repo.get(&course.id).is_some());
    }

    #[tokio::test]
    async fn publish_without_thumbnail_is_rejected() {
        let repo = Arc::new(InMemoryCourseRepository::new());
        let handler =
            PublishCourseHandler::new(repo.clone(), Arc::new(StubMediaStorage { fail: false }));

        let result = handler
            .handle(PublishCourseCommand {
                educator: educator(),
                draft: draft(),
                thumbnail: None,
            })
            .await;

        assert!(matches!(result, Err(CatalogError::ThumbnailMissing)));
        assert!(repo.courses.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_failure_saves_nothing() {
        let repo = Arc::new(InMemoryCourseRepository::new());
        let handler =
            PublishCourseHandler::new(repo.clone(), Arc::new(StubMediaStorage { fail: true }));

        let result = handler
            .handle(PublishCourseCommand {
                educator: educator(),
                draft: draft(),
                thumbnail: Some(("cover.png".to_string(), vec![1])),
            })
            .await;

        assert!(matches!(result, Err(CatalogError::MediaUploadFailed(_))));
        assert!(repo.courses.lock().unwrap().is_empty());
    }
}
