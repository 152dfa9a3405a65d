use std::fmt;

use itertools::Itertools as _;
use jiff::tz::TimeZone;
use rollcall_util::html::Escaped;

use super::student_list::NfcBadge;
use crate::{
    api::types::{AttendanceRecord, Student, StudentId, TagId},
    format::format_date_time,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NfcStatus {
    /// The server should always send the tag with `has_nfc`, it is shown when present
    Registered { tag_id: Option<TagId> },
    NotRegistered,
}

impl NfcStatus {
    pub fn for_student(student: &Student) -> Self {
        match NfcBadge::for_student(student) {
            NfcBadge::Registered => Self::Registered { tag_id: student.nfc_tag_id.clone() },
            NfcBadge::NotRegistered => Self::NotRegistered,
        }
    }
}

impl fmt::Display for NfcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered { tag_id: Some(tag_id) } => {
                write!(f, "{}<br><small>{}</small>", NfcBadge::Registered, Escaped(tag_id.as_str()))
            }
            Self::Registered { tag_id: None } => fmt::Display::fmt(&NfcBadge::Registered, f),
            Self::NotRegistered => fmt::Display::fmt(&NfcBadge::NotRegistered, f),
        }
    }
}

/// The one button the profile offers, calls back into the page scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAction {
    RegisterNfc(StudentId),
    RemoveNfc(StudentId),
}

impl fmt::Display for ProfileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegisterNfc(id) => write!(
                f,
                r#"<button onclick="registerNFC({id})" class="btn btn-primary">📱 Register NFC Tag</button>"#
            ),
            Self::RemoveNfc(id) => write!(
                f,
                r#"<button onclick="unregisterNFC({id})" class="btn btn-secondary">Remove NFC Tag</button>"#
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRow {
    pub when: String,
    pub recorded_by: String,
}

impl fmt::Display for AttendanceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            concat!(
                r#"<div class="attendance-record">"#,
                r#"<div class="attendance-record-header"><span><strong>{when}</strong></span>"#,
                r#"<span class="badge badge-success">Present</span></div>"#,
                r#"<div class="text-secondary">Recorded by: {recorded_by}</div>"#,
                "</div>"
            ),
            when = Escaped(&self.when),
            recorded_by = Escaped(&self.recorded_by),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentProfileView {
    pub name: String,
    pub register_number: String,
    pub section: String,
    pub department: String,
    pub duration: String,
    pub nfc: NfcStatus,
    pub action: ProfileAction,

    /// How many records were asked for
    pub attendance_limit: u32,

    /// Server order, newest first
    pub attendance: Vec<AttendanceRow>,
}

impl StudentProfileView {
    pub fn new(
        student: &Student,
        attendance: &[AttendanceRecord],
        attendance_limit: u32,
        time_zone: &TimeZone,
    ) -> Self {
        let action = if student.has_nfc {
            ProfileAction::RemoveNfc(student.id)
        } else {
            ProfileAction::RegisterNfc(student.id)
        };

        let attendance = attendance
            .iter()
            .map(|record| AttendanceRow {
                when: format_date_time(&record.timestamp, time_zone),
                recorded_by: record.recorded_by.clone(),
            })
            .collect_vec();

        Self {
            name: student.name.clone(),
            register_number: student.register_number.clone(),
            section: student.section.clone(),
            department: student.department.clone(),
            duration: student.duration.clone(),
            nfc: NfcStatus::for_student(student),
            action,
            attendance_limit,
            attendance,
        }
    }

    fn fmt_information(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#"<div class="card"><div class="card-header"><h3 class="card-title">Student Information</h3></div>"#)?;
        f.write_str(r#"<div class="profile-fields">"#)?;

        let fields = [
            ("Name", &self.name),
            ("Register Number", &self.register_number),
            ("Section", &self.section),
            ("Department", &self.department),
            ("Duration", &self.duration),
        ];

        for (label, value) in fields {
            write!(f, "<div><strong>{label}:</strong> {}</div>", Escaped(value))?;
        }

        write!(f, "<div><strong>NFC Status:</strong> {}</div>", self.nfc)?;
        write!(f, r#"</div><div class="mt-3">{}</div></div>"#, self.action)
    }

    fn fmt_attendance(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            concat!(
                r#"<div class="card"><div class="card-header">"#,
                r#"<h3 class="card-title">Recent Attendance</h3>"#,
                r#"<p class="card-subtitle">Last {} records</p>"#,
                "</div>"
            ),
            self.attendance_limit
        )?;

        if self.attendance.is_empty() {
            f.write_str(r#"<p class="text-secondary">No attendance records yet.</p>"#)?;
        } else {
            write!(f, r#"<div class="attendance-list">{}</div>"#, self.attendance.iter().join(""))?;
        }

        f.write_str("</div>")
    }
}

impl fmt::Display for StudentProfileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#"<div class="grid grid-2">"#)?;
        self.fmt_information(f)?;
        self.fmt_attendance(f)?;
        f.write_str("</div>")
    }
}

pub fn render_student_profile(
    student: &Student,
    attendance: &[AttendanceRecord],
    attendance_limit: u32,
    time_zone: &TimeZone,
) -> String {
    StudentProfileView::new(student, attendance, attendance_limit, time_zone).to_string()
}
