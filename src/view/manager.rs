use std::sync::Arc;

use jiff::tz::TimeZone;
use tracing::{debug, warn};

use super::{
    AlertKind, Document, alert_html, loading_html, student_list::render_student_list,
    student_profile::render_student_profile,
};
use crate::api::{ApiClient, ApiError, RequestFilters, types::StudentId};

/// What a load left in its container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,

    /// The container now shows the error banner
    Failed(ApiError),

    /// No element with the target id, nothing was requested
    NoContainer,
}

/// Fills page containers with student data fetched through [`ApiClient`]
#[derive(Debug, Clone)]
pub struct StudentManager {
    client: Arc<ApiClient>,
    document: Arc<dyn Document>,
    time_zone: TimeZone,
}

impl StudentManager {
    pub fn new(client: Arc<ApiClient>, document: Arc<dyn Document>) -> Self {
        let time_zone = client.config().time_zone().unwrap_or_else(|error| {
            warn!("{error}, showing times in UTC");
            TimeZone::UTC
        });

        Self { client, document, time_zone }
    }

    pub async fn load_students(&self, target_id: &str, filters: &RequestFilters) -> RenderOutcome {
        if !self.document.set_inner_html(target_id, &loading_html()) {
            debug!("no container {target_id}, skipping student list");
            return RenderOutcome::NoContainer;
        }

        match self.client.get_students(filters).await {
            Ok(response) => {
                self.document.set_inner_html(target_id, &render_student_list(&response.students));
                RenderOutcome::Rendered
            }
            Err(error) => {
                let message = format!("Failed to load students: {error}");
                self.document.set_inner_html(target_id, &alert_html(&message, AlertKind::Error));
                RenderOutcome::Failed(error)
            }
        }
    }

    /// Student and recent attendance are fetched together, nothing renders unless both arrive
    pub async fn load_student_profile(&self, student_id: StudentId, target_id: &str) -> RenderOutcome {
        if !self.document.set_inner_html(target_id, &loading_html()) {
            debug!("no container {target_id}, skipping profile of {student_id}");
            return RenderOutcome::NoContainer;
        }

        let limit = self.client.config().profile_attendance_limit;
        let fetched = futures::try_join!(
            self.client.get_student(student_id),
            self.client.get_student_attendance(student_id, Some(limit)),
        );

        match fetched {
            Ok((student, attendance)) => {
                let html = render_student_profile(
                    &student.student,
                    &attendance.attendance,
                    limit,
                    &self.time_zone,
                );

                self.document.set_inner_html(target_id, &html);
                RenderOutcome::Rendered
            }
            Err(error) => {
                let message = format!("Failed to load student profile: {error}");
                self.document.set_inner_html(target_id, &alert_html(&message, AlertKind::Error));
                RenderOutcome::Failed(error)
            }
        }
    }
}
