//! EnrolledStudentsHandler - Query handler for an educator's buyer list.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{CourseRepository, PurchaseRepository, UserRepository};

/// Query for completed purchases across an educator's courses.
#[derive(Debug, Clone)]
pub struct EnrolledStudentsQuery {
    pub educator: UserId,
}

/// One completed purchase joined with student and course data.
#[derive(Debug, Clone)]
pub struct EnrolledStudentRecord {
    pub student_name: String,
    pub student_image_url: Option<String>,
    pub course_title: String,
    pub purchase_date: Timestamp,
}

/// Handler listing who bought which of the educator's courses, and when.
pub struct EnrolledStudentsHandler {
    courses: Arc<dyn CourseRepository>,
    purchases: Arc<dyn PurchaseRepository>,
    users: Arc<dyn UserRepository>,
}

impl EnrolledStudentsHandler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        purchases: Arc<dyn PurchaseRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            courses,
            purchases,
            users,
        }
    }

    pub async fn handle(
        &self,
        query: EnrolledStudentsQuery,
    ) -> Result<Vec<EnrolledStudentRecord>, CatalogError> {
        let courses = self.courses.list_by_educator(&query.educator).await?;
        let course_ids: Vec<_> = courses.iter().map(|c| c.id).collect();
        let titles: HashMap<_, _> = courses.iter().map(|c| (c.id, c.title.clone())).collect();

        let completed = self
            .purchases
            .list_completed_for_courses(&course_ids)
            .await?;

        let buyer_ids: Vec<_> = completed.iter().map(|p| p.user_id.clone()).collect();
        let buyers: HashMap<_, _> = self
            .users
            .find_many(&buyer_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        Ok(completed
            .into_iter()
            .filter_map(|purchase| {
                let buyer = buyers.get(&purchase.user_id)?;
                Some(EnrolledStudentRecord {
                    student_name: buyer.name.clone(),
                    student_image_url: buyer.image_url.clone(),
                    course_title: titles.get(&purchase.course_id)?.clone(),
                    purchase_date: purchase.created_at,
                })
            })
            .collect())
    }
}
