//! Markup for the student pages and the loader that fills them
//!
//! Views are plain values rendered through `Display`, every piece of server data is
//! escaped on the way out

pub mod document;
pub mod manager;
pub mod student_list;
pub mod student_profile;

use std::fmt;

use rollcall_util::html::Escaped;

use crate::api::types::StudentId;

pub use document::Document;
pub use manager::{RenderOutcome, StudentManager};
pub use student_list::{StudentListView, render_student_list};
pub use student_profile::{StudentProfileView, render_student_profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AlertKind {
    Success,
    Error,
    Warning,
}

/// A banner carrying a single message
#[derive(Debug, Clone, Copy)]
pub struct Alert<'a> {
    pub message: &'a str,
    pub kind: AlertKind,
}

impl fmt::Display for Alert<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<div class="alert alert-{}">{}</div>"#,
            self.kind.as_ref(),
            Escaped(self.message)
        )
    }
}

pub fn alert_html(message: &str, kind: AlertKind) -> String {
    Alert { message, kind }.to_string()
}

pub fn loading_html() -> String {
    r#"<div class="loading-container"><div class="spinner"></div></div>"#.to_string()
}

/// The `id` parameter of a page query like `?id=7`
pub fn student_id_from_query(query: &str) -> Option<StudentId> {
    let query = query.strip_prefix('?').unwrap_or(query);

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == "id")
        .and_then(|(_, value)| value.trim().parse().ok())
}
