//! Course aggregate.
//!
//! A course is owned by one educator and holds ordered chapters of
//! lectures, per-user star ratings, and the set of enrolled students.
//! Enrollment membership is idempotent: a student appears at most once.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ChapterId, CourseId, LectureId, Money, Percentage, Rating, Timestamp, UserId, ValidationError,
};

/// One lecture inside a chapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    pub id: LectureId,
    pub title: String,
    /// Lecture length in minutes.
    pub duration_minutes: u32,
    /// Playback URL at the external video host.
    pub media_url: String,
    /// Free-preview lectures expose their media URL to non-enrolled viewers.
    pub is_preview_free: bool,
    /// Position within the chapter, 1-based.
    pub order: u32,
}

/// One chapter of ordered lectures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub title: String,
    /// Position within the course, 1-based.
    pub order: u32,
    pub lectures: Vec<Lecture>,
}

/// A single user's rating of a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRating {
    pub user_id: UserId,
    pub rating: Rating,
}

/// Course aggregate root.
#[derive(Debug, Clone)]
pub struct Course {
    pub id: CourseId,
    /// Owning educator; fixed at creation.
    pub educator: UserId,
    pub title: String,
    pub description: String,
    /// Durable URL at the asset host.
    pub thumbnail_url: Option<String>,
    pub price: Money,
    pub discount: Percentage,
    pub is_published: bool,
    pub chapters: Vec<Chapter>,
    pub ratings: Vec<CourseRating>,
    pub enrolled_students: Vec<UserId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Course {
    /// Creates a new course for an educator.
    pub fn create(
        id: CourseId,
        educator: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        discount: Percentage,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        let now = Timestamp::now();
        Ok(Self {
            id,
            educator,
            title,
            description: description.into(),
            thumbnail_url: None,
            price,
            discount,
            is_published: false,
            chapters: Vec::new(),
            ratings: Vec::new(),
            enrolled_students: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Price after applying the course discount, rounded to the cent.
    pub fn discounted_price(&self) -> Money {
        self.price.apply_discount(self.discount)
    }

    /// Returns true if the educator owns this course.
    pub fn is_owned_by(&self, educator: &UserId) -> bool {
        &self.educator == educator
    }

    /// Returns true if the user is in the enrolled set.
    pub fn is_enrolled(&self, user_id: &UserId) -> bool {
        self.enrolled_students.iter().any(|u| u == user_id)
    }

    /// Adds a student to the enrolled set if not already present.
    ///
    /// Returns true if the student was added, false if already enrolled.
    pub fn enroll(&mut self, user_id: UserId) -> bool {
        if self.is_enrolled(&user_id) {
            return false;
        }
        self.enrolled_students.push(user_id);
        true
    }

    /// Records a user's rating, replacing any previous rating by that user.
    pub fn rate(&mut self, user_id: UserId, rating: Rating) {
        if let Some(existing) = self.ratings.iter_mut().find(|r| r.user_id == user_id) {
            existing.rating = rating;
        } else {
            self.ratings.push(CourseRating { user_id, rating });
        }
    }

    /// Average star rating, or None if unrated.
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: u32 = self.ratings.iter().map(|r| u32::from(r.rating.value())).sum();
        Some(f64::from(sum) / self.ratings.len() as f64)
    }

    /// Total duration across all lectures, in minutes.
    pub fn total_duration_minutes(&self) -> u32 {
        self.chapters
            .iter()
            .flat_map(|c| c.lectures.iter())
            .map(|l| l.duration_minutes)
            .sum()
    }

    /// Number of lectures across all chapters.
    pub fn lecture_count(&self) -> usize {
        self.chapters.iter().map(|c| c.lectures.len()).sum()
    }

    /// Returns true if the lecture exists in this course.
    pub fn has_lecture(&self, lecture_id: &LectureId) -> bool {
        self.chapters
            .iter()
            .flat_map(|c| c.lectures.iter())
            .any(|l| &l.id == lecture_id)
    }

    /// Blanks media URLs on lectures that are not free previews.
    ///
    /// Applied before returning course detail to viewers who have not
    /// purchased the course.
    pub fn redact_locked_lectures(&mut self) {
        for chapter in &mut self.chapters {
            for lecture in &mut chapter.lectures {
                if !lecture.is_preview_free {
                    lecture.media_url.clear();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn educator() -> UserId {
        UserId::new("user_educator").unwrap()
    }

    fn student() -> UserId {
        UserId::new("user_student").unwrap()
    }

    fn test_course() -> Course {
        Course::create(
            CourseId::new(),
            educator(),
            "Rust for Backend Engineers",
            "From zero to production services",
            Money::from_major(100).unwrap(),
            Percentage::new(20),
        )
        .unwrap()
    }

    fn lecture(preview: bool) -> Lecture {
        Lecture {
            id: LectureId::new(),
            title: "Intro".to_string(),
            duration_minutes: 12,
            media_url: "https://videos.example.com/abc".to_string(),
            is_preview_free: preview,
            order: 1,
        }
    }

    #[test]
    fn create_rejects_blank_title() {
        let result = Course::create(
            CourseId::new(),
            educator(),
            "   ",
            "desc",
            Money::ZERO,
            Percentage::ZERO,
        );
        assert!(result.is_err());
    }

    #[test]
    fn discounted_price_applies_percentage() {
        let course = test_course();
        assert_eq!(course.discounted_price().to_string(), "80.00");
    }

    #[test]
    fn enroll_adds_student_once() {
        let mut course = test_course();

        assert!(course.enroll(student()));
        assert!(!course.enroll(student()));

        assert_eq!(course.enrolled_students.len(), 1);
        assert!(course.is_enrolled(&student()));
    }

    #[test]
    fn rate_replaces_existing_rating() {
        let mut course = test_course();

        course.rate(student(), Rating::Three);
        course.rate(student(), Rating::Five);

        assert_eq!(course.ratings.len(), 1);
        assert_eq!(course.ratings[0].rating, Rating::Five);
    }

    #[test]
    fn average_rating_none_when_unrated() {
        assert!(test_course().average_rating().is_none());
    }

    #[test]
    fn average_rating_computes_mean() {
        let mut course = test_course();
        course.rate(UserId::new("u1").unwrap(), Rating::Four);
        course.rate(UserId::new("u2").unwrap(), Rating::Two);

        assert_eq!(course.average_rating(), Some(3.0));
    }

    #[test]
    fn redact_locked_lectures_clears_non_preview_urls() {
        let mut course = test_course();
        course.chapters.push(Chapter {
            id: ChapterId::new(),
            title: "Basics".to_string(),
            order: 1,
            lectures: vec![lecture(true), lecture(false)],
        });

        course.redact_locked_lectures();

        let lectures = &course.chapters[0].lectures;
        assert!(!lectures[0].media_url.is_empty());
        assert!(lectures[1].media_url.is_empty());
    }

    #[test]
    fn total_duration_sums_all_lectures() {
        let mut course = test_course();
        course.chapters.push(Chapter {
            id: ChapterId::new(),
            title: "Basics".to_string(),
            order: 1,
            lectures: vec![lecture(true), lecture(false)],
        });

        assert_eq!(course.total_duration_minutes(), 24);
        assert_eq!(course.lecture_count(), 2);
    }

    #[test]
    fn is_owned_by_matches_educator() {
        let course = test_course();
        assert!(course.is_owned_by(&educator()));
        assert!(!course.is_owned_by(&student()));
    }
}
