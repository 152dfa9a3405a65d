//! Transport-level DTOs exchanged with the attendance backend

use rollcall_macros::new_type;
use serde::{Deserialize, Serialize};

new_type!(StudentId, u64);
new_type!(TagId, String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub register_number: String,
    pub section: String,
    pub department: String,
    pub duration: String,

    /// true iff `nfc_tag_id` is set, kept consistent by the server
    #[serde(default)]
    pub has_nfc: bool,

    #[serde(default)]
    pub nfc_tag_id: Option<TagId>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: u64,
    pub student_id: StudentId,

    #[serde(default)]
    pub student_name: Option<String>,

    #[serde(default)]
    pub register_number: Option<String>,

    /// ISO-8601, naive timestamps are UTC
    pub timestamp: String,
    pub recorded_by: String,

    #[serde(default)]
    pub section: Option<String>,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub class_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceStats {
    pub total_students: u64,
    pub total_attendance_records: u64,
    pub today_attendance_count: u64,
    pub today_unique_students: u64,
    pub today_percentage: f64,
}

/// Body of `POST /api/students`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentForm {
    pub name: String,
    pub register_number: String,
    pub section: String,
    pub department: String,
    pub duration: String,
}

/// Body of `POST /api/attendance/record`, identify the student by id or by tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<StudentId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nfc_tag_id: Option<TagId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl AttendanceRequest {
    pub fn for_student(student_id: StudentId) -> Self {
        Self { student_id: Some(student_id), ..Default::default() }
    }

    pub fn for_tag(tag_id: TagId) -> Self {
        Self { nfc_tag_id: Some(tag_id), ..Default::default() }
    }

    pub fn faculty_name(mut self, faculty_name: impl Into<String>) -> Self {
        self.faculty_name = Some(faculty_name.into());
        self
    }

    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RegisterTagBody<'a> {
    pub student_id: StudentId,
    pub nfc_tag_id: &'a TagId,
}

// MARK: responses

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StudentsResponse {
    #[serde(default)]
    pub count: usize,
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StudentResponse {
    pub student: Student,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedStudentResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub student: Student,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NfcRegisterResponse {
    pub message: String,
    pub student: Student,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagCheckResponse {
    pub nfc_tag_id: TagId,
    pub is_registered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendanceResponse {
    pub message: String,
    pub attendance: AttendanceRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendanceListResponse {
    #[serde(default)]
    pub count: usize,
    pub attendance: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendanceDateResponse {
    pub date: String,
    #[serde(default)]
    pub count: usize,
    pub attendance: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadRowError {
    pub row: u64,
    pub register_number: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub success_count: u64,
    pub failed_count: u64,
    #[serde(default)]
    pub errors: Vec<UploadRowError>,
}
