//! PostgreSQL implementation of CourseRepository.
//!
//! Course rows hold scalar fields plus the chapter/lecture tree as
//! JSONB. Ratings and enrollment membership live in their own tables so
//! that rating upserts and enrollment inserts are single-statement,
//! per-row atomic operations (`ON CONFLICT` carries the idempotence).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::catalog::{Chapter, Course, CourseRating};
use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, Money, Percentage, Rating, Timestamp, UserId,
};
use crate::ports::{CourseRepository, CourseSummary};

/// PostgreSQL implementation of the CourseRepository port.
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_ratings(&self, id: &CourseId) -> Result<Vec<CourseRating>, DomainError> {
        let rows: Vec<(String, i16)> =
            sqlx::query_as("SELECT user_id, rating FROM course_ratings WHERE course_id = $1")
                .bind(id.as_uuid())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to load ratings: {}", e)))?;

        rows.into_iter()
            .map(|(user_id, rating)| {
                Ok(CourseRating {
                    user_id: UserId::new(user_id)
                        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?,
                    rating: Rating::try_from_u8(rating as u8)
                        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?,
                })
            })
            .collect()
    }

    async fn load_enrollments(&self, id: &CourseId) -> Result<Vec<UserId>, DomainError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT user_id FROM course_enrollments WHERE course_id = $1 ORDER BY enrolled_at",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load enrollments: {}", e)))?;

        rows.into_iter()
            .map(|(user_id,)| {
                UserId::new(user_id)
                    .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))
            })
            .collect()
    }

    async fn hydrate(&self, row: CourseRow) -> Result<Course, DomainError> {
        let id = CourseId::from_uuid(row.id);
        let ratings = self.load_ratings(&id).await?;
        let enrolled_students = self.load_enrollments(&id).await?;

        let chapters: Vec<Chapter> = serde_json::from_value(row.content)
            .map_err(|e| DomainError::database(format!("Invalid course content: {}", e)))?;

        Ok(Course {
            id,
            educator: UserId::new(row.educator_id)
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?,
            title: row.title,
            description: row.description,
            thumbnail_url: row.thumbnail_url,
            price: Money::from_cents(row.price_cents)
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?,
            discount: Percentage::new(row.discount_pct as u8),
            is_published: row.is_published,
            chapters,
            ratings,
            enrolled_students,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    educator_id: String,
    title: String,
    description: String,
    thumbnail_url: Option<String>,
    price_cents: i64,
    discount_pct: i16,
    is_published: bool,
    content: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    educator_id: String,
    educator_name: String,
    title: String,
    thumbnail_url: Option<String>,
    price_cents: i64,
    discount_pct: i16,
    rating_average: Option<f64>,
    rating_count: i64,
}

impl TryFrom<SummaryRow> for CourseSummary {
    type Error = DomainError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(CourseSummary {
            id: CourseId::from_uuid(row.id),
            educator: UserId::new(row.educator_id)
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?,
            educator_name: row.educator_name,
            title: row.title,
            thumbnail_url: row.thumbnail_url,
            price: Money::from_cents(row.price_cents)
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?,
            discount: Percentage::new(row.discount_pct as u8),
            rating_average: row.rating_average,
            rating_count: row.rating_count as u32,
        })
    }
}

const SUMMARY_SELECT: &str = r#"
    SELECT c.id,
           c.educator_id,
           COALESCE(u.name, '') AS educator_name,
           c.title,
           c.thumbnail_url,
           c.price_cents,
           c.discount_pct,
           AVG(r.rating)::float8 AS rating_average,
           COUNT(r.rating) AS rating_count
    FROM courses c
    LEFT JOIN users u ON u.id = c.educator_id
    LEFT JOIN course_ratings r ON r.course_id = c.id
"#;

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn save(&self, course: &Course) -> Result<(), DomainError> {
        let content = serde_json::to_value(&course.chapters)
            .map_err(|e| DomainError::database(format!("Failed to encode content: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO courses (
                id, educator_id, title, description, thumbnail_url,
                price_cents, discount_pct, is_published, content, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(course.educator.as_str())
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.thumbnail_url)
        .bind(course.price.as_cents())
        .bind(i16::from(course.discount.value()))
        .bind(course.is_published)
        .bind(content)
        .bind(course.created_at.as_datetime())
        .bind(course.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save course: {}", e)))?;

        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<(), DomainError> {
        let content = serde_json::to_value(&course.chapters)
            .map_err(|e| DomainError::database(format!("Failed to encode content: {}", e)))?;

        let result = sqlx::query(
            r#"
            UPDATE courses SET
                title = $2,
                description = $3,
                thumbnail_url = $4,
                price_cents = $5,
                discount_pct = $6,
                is_published = $7,
                content = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.thumbnail_url)
        .bind(course.price.as_cents())
        .bind(i16::from(course.discount.value()))
        .bind(course.is_published)
        .bind(content)
        .bind(course.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update course: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CourseNotFound,
                format!("Course {} not found", course.id),
            ));
        }
        Ok(())
    }

    async fn delete(&self, id: &CourseId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete course: {}", e)))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let row: Option<CourseRow> = sqlx::query_as(
            r#"
            SELECT id, educator_id, title, description, thumbnail_url,
                   price_cents, discount_pct, is_published, content, created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load course: {}", e)))?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_published(&self) -> Result<Vec<CourseSummary>, DomainError> {
        let sql = format!(
            "{} WHERE c.is_published GROUP BY c.id, u.name ORDER BY c.created_at DESC",
            SUMMARY_SELECT
        );
        let rows: Vec<SummaryRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to list courses: {}", e)))?;

        rows.into_iter().map(CourseSummary::try_from).collect()
    }

    async fn find_summaries(&self, ids: &[CourseId]) -> Result<Vec<CourseSummary>, DomainError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let sql = format!(
            "{} WHERE c.id = ANY($1) GROUP BY c.id, u.name ORDER BY c.created_at DESC",
            SUMMARY_SELECT
        );
        let rows: Vec<SummaryRow> = sqlx::query_as(&sql)
            .bind(&uuids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to load summaries: {}", e)))?;

        rows.into_iter().map(CourseSummary::try_from).collect()
    }

    async fn list_by_educator(&self, educator: &UserId) -> Result<Vec<Course>, DomainError> {
        let rows: Vec<CourseRow> = sqlx::query_as(
            r#"
            SELECT id, educator_id, title, description, thumbnail_url,
                   price_cents, discount_pct, is_published, content, created_at, updated_at
            FROM courses
            WHERE educator_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(educator.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list educator courses: {}", e)))?;

        let mut courses = Vec::with_capacity(rows.len());
        for row in rows {
            courses.push(self.hydrate(row).await?);
        }
        Ok(courses)
    }

    async fn enroll_student(&self, id: &CourseId, user_id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO course_enrollments (course_id, user_id, enrolled_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (course_id, user_id) DO NOTHING
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to enroll student: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn upsert_rating(
        &self,
        id: &CourseId,
        user_id: &UserId,
        rating: Rating,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO course_ratings (course_id, user_id, rating)
            VALUES ($1, $2, $3)
            ON CONFLICT (course_id, user_id) DO UPDATE SET rating = EXCLUDED.rating
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .bind(i16::from(rating.value()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save rating: {}", e)))?;

        Ok(())
    }
}
