//! PostgreSQL implementation of UserRepository.
//!
//! The user's enrolled-course set lives in its own table, mirroring the
//! course-side membership table. The two are written independently by
//! reconciliation, each through an idempotent `ON CONFLICT` insert.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::learner::User;
use crate::ports::UserRepository;

/// PostgreSQL implementation of the UserRepository port.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_enrollments(&self, id: &UserId) -> Result<Vec<CourseId>, DomainError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT course_id FROM user_enrollments WHERE user_id = $1 ORDER BY enrolled_at",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load enrollments: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(course_id,)| CourseId::from_uuid(course_id))
            .collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, enrolled_courses: Vec<CourseId>) -> Result<User, DomainError> {
        Ok(User {
            id: UserId::new(self.id)
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?,
            name: self.name,
            email: self.email,
            image_url: self.image_url,
            enrolled_courses,
            created_at: Timestamp::from_datetime(self.created_at),
            updated_at: Timestamp::from_datetime(self.updated_at),
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn upsert(&self, user: &User) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                image_url = EXCLUDED.image_url,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.image_url)
        .bind(user.created_at.as_datetime())
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to upsert user: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, image_url, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load user: {}", e)))?;

        match row {
            Some(row) => {
                let enrollments = self.load_enrollments(id).await?;
                Ok(Some(row.into_user(enrollments)?))
            }
            None => Ok(None),
        }
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        let id_strs: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();

        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, name, email, image_url, created_at, updated_at FROM users WHERE id = ANY($1)",
        )
        .bind(&id_strs)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load users: {}", e)))?;

        // Listing callers only need profile fields; skip the per-user
        // enrollment queries.
        rows.into_iter().map(|row| row.into_user(Vec::new())).collect()
    }

    async fn enroll_course(&self, id: &UserId, course_id: &CourseId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_enrollments (user_id, course_id, enrolled_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, course_id) DO NOTHING
            "#,
        )
        .bind(id.as_str())
        .bind(course_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to enroll course: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }
}
