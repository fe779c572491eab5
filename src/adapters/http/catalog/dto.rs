//! Request/response DTOs for course endpoints.
//!
//! Field names follow the front-end's camelCase JSON contract
//! (courseTitle, courseContent, and so on).

use serde::{Deserialize, Serialize};

use crate::application::handlers::catalog::CourseDraft;
use crate::domain::catalog::{Chapter, Course, Lecture};
use crate::domain::foundation::{
    ChapterId, CourseId, LectureId, Money, Percentage, ValidationError,
};
use crate::ports::CourseSummary;

fn money_to_major(amount: Money) -> f64 {
    amount.as_cents() as f64 / 100.0
}

fn money_from_major(value: f64) -> Result<Money, ValidationError> {
    Money::from_cents((value * 100.0).round() as i64)
}

/// One course in the public listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummaryResponse {
    pub id: CourseId,
    pub course_title: String,
    pub course_thumbnail: Option<String>,
    pub course_price: f64,
    pub discount: u8,
    pub educator_name: String,
    pub rating_average: Option<f64>,
    pub rating_count: u32,
}

impl From<CourseSummary> for CourseSummaryResponse {
    fn from(summary: CourseSummary) -> Self {
        Self {
            id: summary.id,
            course_title: summary.title,
            course_thumbnail: summary.thumbnail_url,
            course_price: money_to_major(summary.price),
            discount: summary.discount.value(),
            educator_name: summary.educator_name,
            rating_average: summary.rating_average,
            rating_count: summary.rating_count,
        }
    }
}

/// Listing envelope.
#[derive(Debug, Clone, Serialize)]
pub struct CoursesResponse {
    pub courses: Vec<CourseSummaryResponse>,
}

/// One lecture in a course detail response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureResponse {
    pub lecture_id: LectureId,
    pub lecture_title: String,
    pub lecture_duration: u32,
    pub lecture_url: String,
    pub is_preview_free: bool,
    pub lecture_order: u32,
}

/// One chapter in a course detail response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterResponse {
    pub chapter_id: ChapterId,
    pub chapter_title: String,
    pub chapter_order: u32,
    pub chapter_content: Vec<LectureResponse>,
}

/// Full course detail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailResponse {
    pub id: CourseId,
    pub educator: String,
    pub course_title: String,
    pub course_description: String,
    pub course_thumbnail: Option<String>,
    pub course_price: f64,
    pub discount: u8,
    pub is_published: bool,
    pub course_content: Vec<ChapterResponse>,
    pub rating_average: Option<f64>,
    pub rating_count: u32,
    pub enrolled_students: Vec<String>,
}

impl From<Course> for CourseDetailResponse {
    fn from(course: Course) -> Self {
        let rating_average = course.average_rating();
        Self {
            id: course.id,
            educator: course.educator.to_string(),
            course_title: course.title,
            course_description: course.description,
            course_thumbnail: course.thumbnail_url,
            course_price: money_to_major(course.price),
            discount: course.discount.value(),
            is_published: course.is_published,
            rating_average,
            rating_count: course.ratings.len() as u32,
            course_content: course
                .chapters
                .into_iter()
                .map(ChapterResponse::from)
                .collect(),
            enrolled_students: course
                .enrolled_students
                .into_iter()
                .map(|u| u.to_string())
                .collect(),
        }
    }
}

impl From<Chapter> for ChapterResponse {
    fn from(chapter: Chapter) -> Self {
        Self {
            chapter_id: chapter.id,
            chapter_title: chapter.title,
            chapter_order: chapter.order,
            chapter_content: chapter
                .lectures
                .into_iter()
                .map(LectureResponse::from)
                .collect(),
        }
    }
}

impl From<Lecture> for LectureResponse {
    fn from(lecture: Lecture) -> Self {
        Self {
            lecture_id: lecture.id,
            lecture_title: lecture.title,
            lecture_duration: lecture.duration_minutes,
            lecture_url: lecture.media_url,
            is_preview_free: lecture.is_preview_free,
            lecture_order: lecture.order,
        }
    }
}

/// Incoming lecture payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureDto {
    #[serde(default)]
    pub lecture_id: Option<LectureId>,
    pub lecture_title: String,
    pub lecture_duration: u32,
    pub lecture_url: String,
    #[serde(default)]
    pub is_preview_free: bool,
    pub lecture_order: u32,
}

/// Incoming chapter payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDto {
    #[serde(default)]
    pub chapter_id: Option<ChapterId>,
    pub chapter_title: String,
    pub chapter_order: u32,
    #[serde(default)]
    pub chapter_content: Vec<LectureDto>,
}

/// Incoming course payload (the `courseData` multipart field).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDataDto {
    pub course_title: String,
    #[serde(default)]
    pub course_description: String,
    pub course_price: f64,
    #[serde(default)]
    pub discount: u8,
    #[serde(default = "default_published")]
    pub is_published: bool,
    #[serde(default)]
    pub course_content: Vec<ChapterDto>,
}

fn default_published() -> bool {
    true
}

impl CourseDataDto {
    /// Converts into the application-layer draft.
    ///
    /// Client-supplied chapter/lecture ids are kept when present so that
    /// content edits do not orphan existing progress records; missing
    /// ids are generated.
    pub fn into_draft(self) -> Result<CourseDraft, ValidationError> {
        let price = money_from_major(self.course_price)?;
        let discount = Percentage::try_new(self.discount)?;

        let chapters = self
            .course_content
            .into_iter()
            .map(|chapter| Chapter {
                id: chapter.chapter_id.unwrap_or_default(),
                title: chapter.chapter_title,
                order: chapter.chapter_order,
                lectures: chapter
                    .chapter_content
                    .into_iter()
                    .map(|lecture| Lecture {
                        id: lecture.lecture_id.unwrap_or_default(),
                        title: lecture.lecture_title,
                        duration_minutes: lecture.lecture_duration,
                        media_url: lecture.lecture_url,
                        is_preview_free: lecture.is_preview_free,
                        order: lecture.lecture_order,
                    })
                    .collect(),
            })
            .collect();

        Ok(CourseDraft {
            title: self.course_title,
            description: self.course_description,
            price,
            discount,
            is_published: self.is_published,
            chapters,
        })
    }
}
