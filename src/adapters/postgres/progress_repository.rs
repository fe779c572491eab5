//! PostgreSQL implementation of ProgressRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, LectureId, Timestamp, UserId};
use crate::domain::learner::CourseProgress;
use crate::ports::ProgressRepository;

/// PostgreSQL implementation of the ProgressRepository port.
pub struct PostgresProgressRepository {
    pool: PgPool,
}

impl PostgresProgressRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProgressRow {
    user_id: String,
    course_id: Uuid,
    completed: bool,
    completed_lectures: serde_json::Value,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProgressRow> for CourseProgress {
    type Error = DomainError;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        let completed_lectures: Vec<LectureId> = serde_json::from_value(row.completed_lectures)
            .map_err(|e| DomainError::database(format!("Invalid lecture list: {}", e)))?;

        Ok(CourseProgress {
            user_id: UserId::new(row.user_id)
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?,
            course_id: CourseId::from_uuid(row.course_id),
            completed_lectures,
            completed: row.completed,
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl ProgressRepository for PostgresProgressRepository {
    async fn find(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<CourseProgress>, DomainError> {
        let row: Option<ProgressRow> = sqlx::query_as(
            r#"
            SELECT user_id, course_id, completed, completed_lectures, updated_at
            FROM course_progress
            WHERE user_id = $1 AND course_id = $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load progress: {}", e)))?;

        row.map(CourseProgress::try_from).transpose()
    }

    async fn upsert(&self, progress: &CourseProgress) -> Result<(), DomainError> {
        let lectures = serde_json::to_value(&progress.completed_lectures)
            .map_err(|e| DomainError::database(format!("Failed to encode lectures: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO course_progress (user_id, course_id, completed, completed_lectures, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, course_id) DO UPDATE SET
                completed = EXCLUDED.completed,
                completed_lectures = EXCLUDED.completed_lectures,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(progress.user_id.as_str())
        .bind(progress.course_id.as_uuid())
        .bind(progress.completed)
        .bind(lectures)
        .bind(progress.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save progress: {}", e)))?;

        Ok(())
    }
}
