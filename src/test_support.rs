//! In-memory stand-ins for the host seams, used by the unit tests

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::{
    api::{
        ApiClient,
        types::{AttendanceRecord, Student, StudentId, TagId},
        transport::{HttpRequest, HttpResponse, Transport, TransportError},
    },
    config::ClientConfig,
    scanner::platform::{NfcPlatform, PlatformError, PlatformReading},
    scanner::cancel::CancellationToken,
    view::document::Document,
};

pub fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        content_type: Some("application/json".to_string()),
        body: body.to_string().into_bytes(),
    }
}

pub fn student(id: u64, name: &str, tag: Option<&str>) -> Student {
    Student {
        id: StudentId::new(id),
        name: name.to_string(),
        register_number: format!("21CS{id:03}"),
        section: "A".to_string(),
        department: "CSE".to_string(),
        duration: "2021-2025".to_string(),
        has_nfc: tag.is_some(),
        nfc_tag_id: tag.map(TagId::from),
        created_at: None,
        updated_at: None,
    }
}

pub fn attendance_record(id: u64, timestamp: &str, recorded_by: &str) -> AttendanceRecord {
    AttendanceRecord {
        id,
        student_id: StudentId::new(3),
        student_name: None,
        register_number: None,
        timestamp: timestamp.to_string(),
        recorded_by: recorded_by.to_string(),
        section: None,
        subject: None,
        date: None,
        class_time: None,
    }
}

/// Answers by URL path, unknown paths fail like an unreachable host
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<HashMap<String, HttpResponse>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &str, response: HttpResponse) {
        self.responses.lock().insert(path.to_string(), response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.lock().last().cloned().expect("no request was sent")
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = request.url.path().to_string();
        self.requests.lock().push(request);

        self.responses
            .lock()
            .get(&path)
            .cloned()
            .ok_or_else(|| TransportError::Send(format!("connection refused for {path}")))
    }
}

pub fn client_with(transport: &FakeTransport) -> ApiClient {
    let config = ClientConfig::new("http://localhost:5000").expect("valid origin");
    ApiClient::new(config, Arc::new(transport.clone()))
}

/// Elements by id, holding whatever markup was last written
#[derive(Debug, Default)]
pub struct FakeDocument {
    elements: Mutex<HashMap<String, Vec<String>>>,
}

impl FakeDocument {
    pub fn with_elements(ids: &[&str]) -> Self {
        let elements = ids.iter().map(|id| (id.to_string(), Vec::new())).collect();
        Self { elements: Mutex::new(elements) }
    }

    /// Current markup of the element
    pub fn html(&self, id: &str) -> String {
        self.elements
            .lock()
            .get(id)
            .and_then(|writes| writes.last().cloned())
            .unwrap_or_default()
    }

    /// Every write to the element, oldest first
    pub fn writes(&self, id: &str) -> Vec<String> {
        self.elements.lock().get(id).cloned().unwrap_or_default()
    }
}

impl Document for FakeDocument {
    fn set_inner_html(&self, element_id: &str, html: &str) -> bool {
        match self.elements.lock().get_mut(element_id) {
            Some(writes) => {
                writes.push(html.to_string());
                true
            }
            None => false,
        }
    }
}

/// A radio the test drives by hand through `tags`
#[derive(Debug)]
pub struct FakePlatform {
    pub supported: bool,
    pub fail_scan: bool,
    pub fail_write: bool,
    pub stall_scan: bool,
    pub tags: flume::Sender<PlatformReading>,
    readings: flume::Receiver<PlatformReading>,
    pub written: Mutex<Vec<Vec<u8>>>,
    pub last_cancel: Mutex<Option<CancellationToken>>,
    pub scans_started: Mutex<usize>,
}

impl FakePlatform {
    pub fn new() -> Self {
        let (tags, readings) = flume::unbounded();

        Self {
            supported: true,
            fail_scan: false,
            fail_write: false,
            stall_scan: false,
            tags,
            readings,
            written: Mutex::new(Vec::new()),
            last_cancel: Mutex::new(None),
            scans_started: Mutex::new(0),
        }
    }

    pub fn unsupported() -> Self {
        Self { supported: false, ..Self::new() }
    }

    pub fn failing_scan() -> Self {
        Self { fail_scan: true, ..Self::new() }
    }

    pub fn failing_write() -> Self {
        Self { fail_write: true, ..Self::new() }
    }

    /// A platform whose scan setup never completes
    pub fn stalled() -> Self {
        Self { stall_scan: true, ..Self::new() }
    }

    pub fn tap(&self, serial_number: &str, message: Vec<u8>) {
        let reading =
            PlatformReading::Tag { serial_number: serial_number.to_string(), message };

        self.tags.send(reading).expect("reader dropped");
    }

    pub fn read_error(&self) {
        self.tags.send(PlatformReading::Error).expect("reader dropped");
    }
}

#[async_trait]
impl NfcPlatform for FakePlatform {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn scan(
        &self,
        cancel: CancellationToken,
    ) -> Result<flume::Receiver<PlatformReading>, PlatformError> {
        if self.fail_scan {
            return Err(PlatformError::new("NotAllowedError: permission denied"));
        }

        *self.scans_started.lock() += 1;
        *self.last_cancel.lock() = Some(cancel);

        if self.stall_scan {
            std::future::pending::<()>().await;
        }

        Ok(self.readings.clone())
    }

    async fn write(&self, message: Vec<u8>) -> Result<(), PlatformError> {
        if self.fail_write {
            return Err(PlatformError::new("NetworkError: tag moved out of range"));
        }

        self.written.lock().push(message);
        Ok(())
    }
}
