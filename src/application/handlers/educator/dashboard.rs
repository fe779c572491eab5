//! EducatorDashboardHandler - Query handler for the educator dashboard.

use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{Money, UserId};
use crate::ports::{CourseRepository, PurchaseRepository, UserRepository};

/// Query for one educator's dashboard.
#[derive(Debug, Clone)]
pub struct EducatorDashboardQuery {
    pub educator: UserId,
}

/// One enrolled student shown on the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardEnrollment {
    pub course_title: String,
    pub student_name: String,
    pub student_image_url: Option<String>,
}

/// Aggregated dashboard data.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub total_courses: usize,
    /// Sum of completed purchase amounts over the educator's courses.
    pub total_earnings: Money,
    pub enrollments: Vec<DashboardEnrollment>,
}

/// Handler computing dashboard aggregates from completed purchases and
/// enrollment membership.
pub struct EducatorDashboardHandler {
    courses: Arc<dyn CourseRepository>,
    purchases: Arc<dyn PurchaseRepository>,
    users: Arc<dyn UserRepository>,
}

impl EducatorDashboardHandler {
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

    pub async fn handle(&self, query: EducatorDashboardQuery) -> Result<DashboardData, CatalogError> {
        let courses = self.courses.list_by_educator(&query.educator).await?;
        let course_ids: Vec<_> = courses.iter().map(|c| c.id).collect();

        let completed = self
            .purchases
            .list_completed_for_courses(&course_ids)
            .await?;
        let total_earnings = Money::total(completed.iter().map(|p| p.amount));

        let mut enrollments = Vec::new();
        for course in &courses {
            let students = self.users.find_many(&course.enrolled_students).await?;
            for student in students {
                enrollments.push(DashboardEnrollment {
                    course_title: course.title.clone(),
                    student_name: student.name,
                    student_image_url: student.image_url,
                });
            }
        }

        Ok(DashboardData {
            total_courses: courses.len(),
            total_earnings,
            enrollments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        InMemoryCourseRepository, InMemoryPurchaseRepository, InMemoryUserRepository,
    };
    use crate::domain::catalog::Course;
    use crate::domain::foundation::{CourseId, Percentage, PurchaseId};
    use crate::domain::learner::User;
    use crate::domain::purchase::Purchase;

    fn educator() -> UserId {
        UserId::new("user_educator").unwrap()
    }

    fn student() -> User {
        User::from_claims(
            UserId::new("user_student").unwrap(),
            "Student",
            "s@example.com",
            Some("https://cdn.example.com/s.png".to_string()),
        )
    }

    fn course_with_student() -> Course {
        let mut course = Course::create(
            CourseId::new(),
            educator(),
            "Observability",
            "Logs, traces, and vibes",
            Money::from_major(40).unwrap(),
            Percentage::ZERO,
        )
        .unwrap();
        course.enroll(student().id);
        course
    }

    fn completed_purchase(course_id: CourseId, cents: i64) -> Purchase {
        let mut p = Purchase::create(
            PurchaseId::new(),
            course_id,
            student().id,
            Money::from_cents(cents).unwrap(),
        );
        p.complete().unwrap();
        p
    }

    #[tokio::test]
    async fn dashboard_sums_completed_earnings_and_lists_students() {
        let course = course_with_student();
        let course_id = course.id;
        let courses = Arc::new(InMemoryCourseRepository::with(vec![course]));
        let mut failed = Purchase::create(
            PurchaseId::new(),
            course_id,
            student().id,
            Money::from_cents(999).unwrap(),
        );
        failed.fail().unwrap();
        let purchases = Arc::new(InMemoryPurchaseRepository::with(vec![
            completed_purchase(course_id, 4_000),
            completed_purchase(course_id, 4_000),
            failed,
        ]));
        let users = Arc::new(InMemoryUserRepository::with(vec![student()]));

        let handler = EducatorDashboardHandler::new(courses, purchases, users);
        let data = handler
            .handle(EducatorDashboardQuery {
                educator: educator(),
            })
            .await
            .unwrap();

        assert_eq!(data.total_courses, 1);
        // Only completed purchases count.
        assert_eq!(data.total_earnings.as_cents(), 8_000);
        assert_eq!(data.enrollments.len(), 1);
        assert_eq!(data.enrollments[0].student_name, "Student");
    }

    #[tokio::test]
    async fn empty_educator_has_empty_dashboard() {
        let handler = EducatorDashboardHandler::new(
            Arc::new(InMemoryCourseRepository::new()),
            Arc::new(InMemoryPurchaseRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        );

        let data = handler
            .handle(EducatorDashboardQuery {
                educator: educator(),
            })
            .await
            .unwrap();

        assert_eq!(data.total_courses, 0);
        assert_eq!(data.total_earnings, Money::ZERO);
        assert!(data.enrollments.is_empty());
    }
}
