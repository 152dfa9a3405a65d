use std::{path::Path, sync::Arc};

use jiff::civil::Date;
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tap::TapFallible as _;
use tracing::{debug, error};
use url::Url;

use rollcall_util::ResultExt as _;

use super::{
    error::ApiError,
    filters::RequestFilters,
    transport::{HttpRequest, HttpResponse, MultipartFile, RequestBody, ReqwestTransport, Transport},
    types::{
        AttendanceDateResponse, AttendanceListResponse, AttendanceRequest, AttendanceResponse,
        AttendanceStats, CreatedStudentResponse, MessageResponse, NfcRegisterResponse,
        RegisterTagBody, StudentForm, StudentId, StudentResponse, StudentsResponse, TagCheckResponse,
        TagId, UploadResponse,
    },
};
use crate::config::ClientConfig;

type Error = ApiError;
type Result<T, E = Error> = std::result::Result<T, E>;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Method, headers and JSON body for [`ApiClient::request`]
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self { method: Method::GET, headers: Vec::new(), body: None }
    }

    pub fn delete() -> Self {
        Self { method: Method::DELETE, ..Self::get() }
    }

    pub fn post() -> Self {
        Self { method: Method::POST, ..Self::get() }
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body).map_err_str(Error::Encode)?);
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A spreadsheet or CSV of students for bulk upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).map(str::to_string);
        Self { file_name, content_type, bytes }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::Io(format!("{} has no file name", path.display())))?;

        let bytes = tokio::fs::read(path).await.map_err_str(Error::Io)?;
        Ok(Self::new(file_name, bytes))
    }
}

fn content_type_for(file_name: &str) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;

    match extension.to_ascii_lowercase().as_str() {
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "xls" => Some("application/vnd.ms-excel"),
        "csv" => Some("text/csv"),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
struct LimitQuery {
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
struct DateQuery {
    date: Option<String>,
}

/// Client for the attendance REST backend
///
/// Every call resolves `origin + endpoint` and goes through the injected
/// [`Transport`]. Failures are logged where they are detected and returned,
/// nothing is retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn with_reqwest(config: ClientConfig) -> Self {
        Self::new(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request with the default JSON content type, caller headers win
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        self.json_request(endpoint, options)
            .await
            .tap_err(|error| error!("API error on {endpoint}: {error}"))
    }

    async fn json_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let RequestOptions { method, headers, body } = options;

        let body = match body {
            Some(body) => RequestBody::Json(body.to_string()),
            None => RequestBody::Empty,
        };

        let request = HttpRequest {
            method,
            url: self.url(endpoint)?,
            headers: merge_headers(headers),
            body,
        };

        let response = self.transport.send(request).await?;
        let json = parse_json(&response)?;

        if !response.is_success() {
            let message = error_message(&json)
                .unwrap_or_else(|| format!("Request failed with status {}", response.status));

            return Err(Error::Server { status: response.status, message });
        }

        serde_json::from_value(json).map_err_str(Error::Decode)
    }

    fn url(&self, endpoint: &str) -> Result<Url> {
        let url = format!("{}{endpoint}", self.config.origin_str());

        Url::parse(&url).map_err(|error| Error::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            error: error.to_string(),
        })
    }

    // MARK: students

    pub async fn get_students(&self, filters: &RequestFilters) -> Result<StudentsResponse> {
        let endpoint = with_query("/api/students", filters)?;
        self.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn get_student(&self, id: StudentId) -> Result<StudentResponse> {
        self.request(&format!("/api/students/{id}"), RequestOptions::get()).await
    }

    pub async fn create_student(&self, form: &StudentForm) -> Result<CreatedStudentResponse> {
        self.request("/api/students", RequestOptions::post().json(form)?).await
    }

    pub async fn delete_student(&self, id: StudentId) -> Result<MessageResponse> {
        self.request(&format!("/api/students/{id}"), RequestOptions::delete()).await
    }

    /// Multipart upload, sent without the JSON content type
    ///
    /// Fails on a non-2xx status or on an `error` field in an otherwise
    /// successful body.
    pub async fn upload_students(&self, file: UploadFile) -> Result<UploadResponse> {
        let endpoint = "/api/students/upload";

        self.upload(endpoint, file)
            .await
            .tap_err(|error| error!("API error on {endpoint}: {error}"))
    }

    async fn upload(&self, endpoint: &str, file: UploadFile) -> Result<UploadResponse> {
        debug!("uploading {} ({} bytes)", file.file_name, file.bytes.len());

        let request = HttpRequest {
            method: Method::POST,
            url: self.url(endpoint)?,
            headers: Vec::new(),
            body: RequestBody::Multipart(MultipartFile {
                field: "file".to_string(),
                file_name: file.file_name,
                content_type: file.content_type,
                bytes: file.bytes,
            }),
        };

        let response = self.transport.send(request).await?;
        let json = parse_json(&response)?;

        let error_field = json.get("error").filter(|error| !error.is_null());
        if !response.is_success() || error_field.is_some() {
            let message = error_message(&json)
                .unwrap_or_else(|| format!("Upload failed with status {}", response.status));

            return Err(Error::Upload { status: response.status, message });
        }

        serde_json::from_value(json).map_err_str(Error::Decode)
    }

    // MARK: nfc

    pub async fn register_nfc(
        &self,
        student_id: StudentId,
        nfc_tag_id: &TagId,
    ) -> Result<NfcRegisterResponse> {
        let body = RegisterTagBody { student_id, nfc_tag_id };
        self.request("/api/nfc/register", RequestOptions::post().json(&body)?).await
    }

    pub async fn unregister_nfc(&self, student_id: StudentId) -> Result<MessageResponse> {
        let endpoint = format!("/api/nfc/unregister/{student_id}");
        self.request(&endpoint, RequestOptions::post()).await
    }

    pub async fn get_student_by_tag(&self, tag_id: &TagId) -> Result<StudentResponse> {
        let endpoint = format!("/api/nfc/student/{}", encode_path_segment(tag_id));
        self.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn check_tag(&self, tag_id: &TagId) -> Result<TagCheckResponse> {
        let endpoint = format!("/api/nfc/check/{}", encode_path_segment(tag_id));
        self.request(&endpoint, RequestOptions::get()).await
    }

    // MARK: attendance

    pub async fn record_attendance(&self, request: &AttendanceRequest) -> Result<AttendanceResponse> {
        self.request("/api/attendance/record", RequestOptions::post().json(request)?).await
    }

    /// No limit means the full history, nothing is truncated here
    pub async fn get_student_attendance(
        &self,
        student_id: StudentId,
        limit: Option<u32>,
    ) -> Result<AttendanceListResponse> {
        let endpoint =
            with_query(&format!("/api/attendance/student/{student_id}"), &LimitQuery { limit })?;

        self.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn get_recent_attendance(&self, limit: Option<u32>) -> Result<AttendanceListResponse> {
        let limit = limit.unwrap_or(self.config.recent_attendance_limit);
        let endpoint = with_query("/api/attendance/recent", &LimitQuery { limit: Some(limit) })?;

        self.request(&endpoint, RequestOptions::get()).await
    }

    /// Attendance for one day, the server uses today when `date` is `None`
    pub async fn get_attendance_by_date(&self, date: Option<Date>) -> Result<AttendanceDateResponse> {
        let query = DateQuery { date: date.map(|date| date.to_string()) };
        let endpoint = with_query("/api/attendance/date", &query)?;

        self.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn get_attendance_stats(&self) -> Result<AttendanceStats> {
        self.request("/api/attendance/stats", RequestOptions::get()).await
    }
}

/// Parse the body as JSON, anything else is an error carrying the status
fn parse_json(response: &HttpResponse) -> Result<Value> {
    if !response.is_json() {
        error!("Non-JSON response: {}", response.text());
        return Err(Error::NonJson { status: response.status });
    }

    serde_json::from_slice(&response.body).map_err_str(Error::Decode)
}

fn error_message(json: &Value) -> Option<String> {
    json.get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn merge_headers(headers: Vec<(String, String)>) -> Vec<(String, String)> {
    let overrides_content_type = headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case(reqwest::header::CONTENT_TYPE.as_str()));

    if overrides_content_type {
        return headers;
    }

    std::iter::once(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()))
        .chain(headers)
        .collect()
}

fn with_query<Q: Serialize + ?Sized>(path: &str, query: &Q) -> Result<String> {
    let query = serde_urlencoded::to_string(query).map_err_str(Error::Encode)?;

    if query.is_empty() {
        return Ok(path.to_string());
    }

    Ok(format!("{path}?{query}"))
}

fn encode_path_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
