//! PostgreSQL implementation of PurchaseRepository.
//!
//! Settlement is a single conditional UPDATE: the status check and the
//! write are one atomic statement, which is what makes redelivered and
//! concurrent webhook reconciliation safe without locks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, Money, PurchaseId, Timestamp, UserId,
};
use crate::domain::purchase::{Purchase, PurchaseStatus};
use crate::ports::PurchaseRepository;

/// PostgreSQL implementation of the PurchaseRepository port.
pub struct PostgresPurchaseRepository {
    pool: PgPool,
}

impl PostgresPurchaseRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: Uuid,
    course_id: Uuid,
    user_id: String,
    amount_cents: i64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = DomainError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        let status = PurchaseStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid status value: {}", row.status),
            )
        })?;

        Ok(Purchase {
            id: PurchaseId::from_uuid(row.id),
            course_id: CourseId::from_uuid(row.course_id),
            user_id: UserId::new(row.user_id)
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?,
            amount: Money::from_cents(row.amount_cents)
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?,
            status,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl PurchaseRepository for PostgresPurchaseRepository {
    async fn save(&self, purchase: &Purchase) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO purchases (id, course_id, user_id, amount_cents, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(purchase.id.as_uuid())
        .bind(purchase.course_id.as_uuid())
        .bind(purchase.user_id.as_str())
        .bind(purchase.amount.as_cents())
        .bind(purchase.status.as_str())
        .bind(purchase.created_at.as_datetime())
        .bind(purchase.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save purchase: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &PurchaseId) -> Result<Option<Purchase>, DomainError> {
        let row: Option<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, course_id, user_id, amount_cents, status, created_at, updated_at
            FROM purchases
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load purchase: {}", e)))?;

        row.map(Purchase::try_from).transpose()
    }

    async fn mark_completed(&self, id: &PurchaseId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE purchases
            SET status = 'completed', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to complete purchase: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_failed(&self, id: &PurchaseId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE purchases
            SET status = 'failed', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fail purchase: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_completed_for_courses(
        &self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Purchase>, DomainError> {
        let ids: Vec<Uuid> = course_ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, course_id, user_id, amount_cents, status, created_at, updated_at
            FROM purchases
            WHERE status = 'completed' AND course_id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list purchases: {}", e)))?;

        rows.into_iter().map(Purchase::try_from).collect()
    }
}
