use std::fmt;

use itertools::Itertools as _;
use rollcall_util::html::Escaped;

use crate::api::types::{Student, StudentId};

/// The NFC cell shared by the list and the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NfcBadge {
    Registered,
    NotRegistered,
}

impl NfcBadge {
    pub fn for_student(student: &Student) -> Self {
        if student.has_nfc { Self::Registered } else { Self::NotRegistered }
    }
}

impl fmt::Display for NfcBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered => f.write_str(r#"<span class="badge badge-success">✓ Registered</span>"#),
            Self::NotRegistered => {
                f.write_str(r#"<span class="badge badge-warning">Not Registered</span>"#)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub id: StudentId,
    pub register_number: String,
    pub name: String,
    pub section: String,
    pub department: String,
    pub duration: String,
    pub badge: NfcBadge,
}

impl From<&Student> for StudentRow {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            register_number: student.register_number.clone(),
            name: student.name.clone(),
            section: student.section.clone(),
            department: student.department.clone(),
            duration: student.duration.clone(),
            badge: NfcBadge::for_student(student),
        }
    }
}

impl fmt::Display for StudentRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            concat!(
                "<tr>",
                "<td><strong>{register_number}</strong></td>",
                "<td>{name}</td>",
                "<td>{section}</td>",
                "<td>{department}</td>",
                "<td>{duration}</td>",
                "<td>{badge}</td>",
                r#"<td><a href="student-profile.html?id={id}" class="btn btn-secondary btn-icon" title="View Profile">👤</a></td>"#,
                "</tr>"
            ),
            register_number = Escaped(&self.register_number),
            name = Escaped(&self.name),
            section = Escaped(&self.section),
            department = Escaped(&self.department),
            duration = Escaped(&self.duration),
            badge = self.badge,
            id = self.id,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentListView {
    Empty,
    Table(Vec<StudentRow>),
}

impl StudentListView {
    pub fn new(students: &[Student]) -> Self {
        if students.is_empty() {
            return Self::Empty;
        }

        Self::Table(students.iter().map(StudentRow::from).collect_vec())
    }
}

const TABLE_HEAD: &str = concat!(
    "<thead><tr>",
    "<th>Register Number</th>",
    "<th>Name</th>",
    "<th>Section</th>",
    "<th>Department</th>",
    "<th>Duration</th>",
    "<th>NFC Status</th>",
    "<th>Actions</th>",
    "</tr></thead>"
);

impl fmt::Display for StudentListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str(concat!(
                r#"<div class="text-center" style="padding: 3rem;">"#,
                "<h3>No students found</h3>",
                r#"<p class="text-secondary">Add students manually or upload an Excel file to get started.</p>"#,
                "</div>"
            )),

            Self::Table(rows) => write!(
                f,
                r#"<div class="table-container"><table class="table">{TABLE_HEAD}<tbody>{}</tbody></table></div>"#,
                rows.iter().join("")
            ),
        }
    }
}

pub fn render_student_list(students: &[Student]) -> String {
    StudentListView::new(students).to_string()
}
