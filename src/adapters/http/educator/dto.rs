//! Response DTOs for educator endpoints.

use serde::Serialize;

use crate::adapters::http::catalog::dto::CourseDetailResponse;
use crate::application::handlers::educator::{DashboardData, EnrolledStudentRecord};

/// Response after role promotion.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRoleResponse {
    pub message: String,
}

/// One student entry on the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEnrollmentResponse {
    pub course_title: String,
    pub student_name: String,
    pub student_image_url: Option<String>,
}

/// Dashboard envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_courses: usize,
    pub total_earnings: f64,
    pub enrolled_students_data: Vec<DashboardEnrollmentResponse>,
}

impl From<DashboardData> for DashboardResponse {
    fn from(data: DashboardData) -> Self {
        Self {
            total_courses: data.total_courses,
            total_earnings: data.total_earnings.as_cents() as f64 / 100.0,
            enrolled_students_data: data
                .enrollments
                .into_iter()
                .map(|e| DashboardEnrollmentResponse {
                    course_title: e.course_title,
                    student_name: e.student_name,
                    student_image_url: e.student_image_url,
                })
                .collect(),
        }
    }
}

/// One completed purchase in the enrolled-students listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledStudentResponse {
    pub student_name: String,
    pub student_image_url: Option<String>,
    pub course_title: String,
    pub purchase_date: chrono::DateTime<chrono::Utc>,
}

impl From<EnrolledStudentRecord> for EnrolledStudentResponse {
    fn from(record: EnrolledStudentRecord) -> Self {
        Self {
            student_name: record.student_name,
            student_image_url: record.student_image_url,
            course_title: record.course_title,
            purchase_date: *record.purchase_date.as_datetime(),
        }
    }
}

/// Enrolled-students envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledStudentsResponse {
    pub enrolled_students: Vec<EnrolledStudentResponse>,
}

/// Educator's own course list.
#[derive(Debug, Clone, Serialize)]
pub struct EducatorCoursesResponse {
    pub courses: Vec<CourseDetailResponse>,
}
