//! One tap, one request: the scan-then-call sequences the pages run

use tracing::info;

use crate::{
    api::{
        ApiClient, ApiError,
        types::{AttendanceRequest, AttendanceResponse, NfcRegisterResponse, StudentId},
    },
    scanner::{NfcError, TagScanner, event::TagReadEvent},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TapFlowError {
    #[error(transparent)]
    Nfc(#[from] NfcError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("NFC scan ended before a tag was read")]
    ScanEnded,
}

type Error = TapFlowError;
type Result<T, E = Error> = std::result::Result<T, E>;

/// Bind the next tapped tag to `student_id`
pub async fn register_next_tag(
    scanner: &TagScanner,
    client: &ApiClient,
    student_id: StudentId,
) -> Result<NfcRegisterResponse> {
    let event = next_reading(scanner).await?;
    let response = client.register_nfc(student_id, &event.tag_id).await?;

    info!("registered tag {} to student {student_id}", event.tag_id);
    Ok(response)
}

/// Mark whoever owns the next tapped tag as present
pub async fn record_next_attendance(
    scanner: &TagScanner,
    client: &ApiClient,
    faculty_name: &str,
) -> Result<AttendanceResponse> {
    let event = next_reading(scanner).await?;
    let request = AttendanceRequest::for_tag(event.tag_id).faculty_name(faculty_name);

    let response = client.record_attendance(&request).await?;
    info!("attendance recorded for student {}", response.attendance.student_id);

    Ok(response)
}

/// A single reading, the scan is stopped whatever it yields
async fn next_reading(scanner: &TagScanner) -> Result<TagReadEvent> {
    let mut scan = scanner.read_tag().await?;
    let reading = scan.next().await;
    scanner.stop_scan();

    match reading {
        Some(reading) => Ok(reading?),
        None => Err(Error::ScanEnded),
    }
}
