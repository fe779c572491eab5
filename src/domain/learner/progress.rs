//! Course progress tracking.

use crate::domain::foundation::{CourseId, LectureId, Timestamp, UserId};

/// One user's progress through one course.
#[derive(Debug, Clone)]
pub struct CourseProgress {
    pub user_id: UserId,
    pub course_id: CourseId,
    /// Lectures the user has completed, in completion order.
    pub completed_lectures: Vec<LectureId>,
    /// Set once the user has completed at least one lecture.
    pub completed: bool,
    pub updated_at: Timestamp,
}

impl CourseProgress {
    /// Starts progress tracking with a first completed lecture.
    pub fn start(user_id: UserId, course_id: CourseId, lecture_id: LectureId) -> Self {
        Self {
            user_id,
            course_id,
            completed_lectures: vec![lecture_id],
            completed: true,
            updated_at: Timestamp::now(),
        }
    }

    /// Returns true if the lecture has been recorded as completed.
    pub fn has_completed(&self, lecture_id: &LectureId) -> bool {
        self.completed_lectures.contains(lecture_id)
    }

    /// Records a completed lecture if not already recorded.
    ///
    /// Returns true if newly recorded, false if it was a repeat.
    pub fn record_lecture(&mut self, lecture_id: LectureId) -> bool {
        if self.has_completed(&lecture_id) {
            return false;
        }
        self.completed_lectures.push(lecture_id);
        self.completed = true;
        self.updated_at = Timestamp::now();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (UserId, CourseId, LectureId) {
        (
            UserId::new("user_abc").unwrap(),
            CourseId::new(),
            LectureId::new(),
        )
    }

    #[test]
    fn start_records_first_lecture() {
        let (user, course, lecture) = ids();
        let progress = CourseProgress::start(user, course, lecture);

        assert!(progress.has_completed(&lecture));
        assert!(progress.completed);
    }

    #[test]
    fn record_lecture_ignores_repeats() {
        let (user, course, lecture) = ids();
        let mut progress = CourseProgress::start(user, course, lecture);

        assert!(!progress.record_lecture(lecture));
        assert_eq!(progress.completed_lectures.len(), 1);

        let other = LectureId::new();
        assert!(progress.record_lecture(other));
        assert_eq!(progress.completed_lectures.len(), 2);
    }
}
