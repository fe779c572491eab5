//! Shared in-memory port implementations for handler tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::catalog::Course;
use crate::domain::foundation::{CourseId, DomainError, PurchaseId, Rating, UserId};
use crate::domain::learner::{CourseProgress, User};
use crate::domain::purchase::{Purchase, PurchaseStatus};
use crate::ports::{
    CourseRepository, CourseSummary, ProgressRepository, PurchaseRepository, UserRepository,
};

/// In-memory course store backed by the aggregate itself.
pub struct InMemoryCourseRepository {
    pub courses: Mutex<Vec<Course>>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self {
            courses: Mutex::new(Vec::new()),
        }
    }

    pub fn with(courses: Vec<Course>) -> Self {
        Self {
            courses: Mutex::new(courses),
        }
    }

    pub fn get(&self, id: &CourseId) -> Option<Course> {
        self.courses.lock().unwrap().iter().find(|c| &c.id == id).cloned()
    }

    fn summary_of(course: &Course) -> CourseSummary {
        CourseSummary {
            id: course.id,
            educator: course.educator.clone(),
            educator_name: course.educator.as_str().to_string(),
            title: course.title.clone(),
            thumbnail_url: course.thumbnail_url.clone(),
            price: course.price,
            discount: course.discount,
            rating_average: course.average_rating(),
            rating_count: course.ratings.len() as u32,
        }
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn save(&self, course: &Course) -> Result<(), DomainError> {
        self.courses.lock().unwrap().push(course.clone());
        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<(), DomainError> {
        let mut courses = self.courses.lock().unwrap();
        if let Some(existing) = courses.iter_mut().find(|c| c.id == course.id) {
            *existing = course.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &CourseId) -> Result<(), DomainError> {
        self.courses.lock().unwrap().retain(|c| &c.id != id);
        Ok(())
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        Ok(self.get(id))
    }

    async fn list_published(&self) -> Result<Vec<CourseSummary>, DomainError> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_published)
            .map(Self::summary_of)
            .collect())
    }

    async fn find_summaries(&self, ids: &[CourseId]) -> Result<Vec<CourseSummary>, DomainError> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(Self::summary_of)
            .collect())
    }

    async fn list_by_educator(&self, educator: &UserId) -> Result<Vec<Course>, DomainError> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.educator == educator)
            .cloned()
            .collect())
    }

    async fn enroll_student(&self, id: &CourseId, user_id: &UserId) -> Result<bool, DomainError> {
        let mut courses = self.courses.lock().unwrap();
        match courses.iter_mut().find(|c| &c.id == id) {
            Some(course) => Ok(course.enroll(user_id.clone())),
            None => Err(DomainError::database("course row missing")),
        }
    }

    async fn upsert_rating(
        &self,
        id: &CourseId,
        user_id: &UserId,
        rating: Rating,
    ) -> Result<(), DomainError> {
        let mut courses = self.courses.lock().unwrap();
        if let Some(course) = courses.iter_mut().find(|c| &c.id == id) {
            course.rate(user_id.clone(), rating);
        }
        Ok(())
    }
}

/// In-memory user store.
pub struct InMemoryUserRepository {
    pub users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }

    pub fn with(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    pub fn get(&self, id: &UserId) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| &u.id == id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn upsert(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.get(id))
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn enroll_course(&self, id: &UserId, course_id: &CourseId) -> Result<bool, DomainError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| &u.id == id) {
            Some(user) => Ok(user.enroll(*course_id)),
            None => Err(DomainError::database("user row missing")),
        }
    }
}

/// In-memory purchase store with conditional settlement.
pub struct InMemoryPurchaseRepository {
    pub purchases: Mutex<Vec<Purchase>>,
}

impl InMemoryPurchaseRepository {
    pub fn new() -> Self {
        Self {
            purchases: Mutex::new(Vec::new()),
        }
    }

    pub fn with(purchases: Vec<Purchase>) -> Self {
        Self {
            purchases: Mutex::new(purchases),
        }
    }
}

#[async_trait]
impl PurchaseRepository for InMemoryPurchaseRepository {
    async fn save(&self, purchase: &Purchase) -> Result<(), DomainError> {
        self.purchases.lock().unwrap().push(purchase.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PurchaseId) -> Result<Option<Purchase>, DomainError> {
        Ok(self
            .purchases
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }

    async fn mark_completed(&self, id: &PurchaseId) -> Result<bool, DomainError> {
        let mut purchases = self.purchases.lock().unwrap();
        match purchases
            .iter_mut()
            .find(|p| &p.id == id && p.status == PurchaseStatus::Pending)
        {
            Some(p) => {
                p.complete().expect("pending purchase completes");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_failed(&self, id: &PurchaseId) -> Result<bool, DomainError> {
        let mut purchases = self.purchases.lock().unwrap();
        match purchases
            .iter_mut()
            .find(|p| &p.id == id && p.status == PurchaseStatus::Pending)
        {
            Some(p) => {
                p.fail().expect("pending purchase fails");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_completed_for_courses(
        &self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Purchase>, DomainError> {
        Ok(self
            .purchases
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                p.status == PurchaseStatus::Completed && course_ids.contains(&p.course_id)
            })
            .cloned()
            .collect())
    }
}

/// In-memory progress store.
pub struct InMemoryProgressRepository {
    pub records: Mutex<Vec<CourseProgress>>,
}

impl InMemoryProgressRepository {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn find(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<CourseProgress>, DomainError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.user_id == user_id && &p.course_id == course_id)
            .cloned())
    }

    async fn upsert(&self, progress: &CourseProgress) -> Result<(), DomainError> {
        let mut records = self.records.lock().unwrap();
        match records
            .iter_mut()
            .find(|p| p.user_id == progress.user_id && p.course_id == progress.course_id)
        {
            Some(existing) => *existing = progress.clone(),
            None => records.push(progress.clone()),
        }
        Ok(())
    }
}
