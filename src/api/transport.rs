//! The HTTP seam, `ApiClient` talks to the backend only through [`Transport`]

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::{
    Method,
    header::CONTENT_TYPE,
    multipart::{Form, Part},
};
use rollcall_util::ResultExt as _;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Json(String),
    Multipart(MultipartFile),
}

/// A single file sent as one field of a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| content_type.contains("application/json"))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("unable to send request: {0}")]
    Send(String),

    #[error("unable to read response body: {0}")]
    Body(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[async_trait]
pub trait Transport: Send + Sync + Debug + 'static {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest { method, url, headers, body } = request;

        let mut builder = self.client.request(method, url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(json) => builder.body(json),
            RequestBody::Multipart(file) => {
                let mut part = Part::bytes(file.bytes).file_name(file.file_name);
                if let Some(content_type) = &file.content_type {
                    part = part.mime_str(content_type).map_err_str(TransportError::InvalidRequest)?;
                }

                builder.multipart(Form::new().part(file.field, part))
            }
        };

        let response = builder.send().await.map_err_str(TransportError::Send)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err_str(TransportError::Body)?.to_vec();

        Ok(HttpResponse { status, content_type, body })
    }
}
