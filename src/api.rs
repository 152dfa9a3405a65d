//! HTTP access to the attendance backend

pub mod client;
pub mod error;
pub mod filters;
pub mod transport;
pub mod types;

pub use client::{ApiClient, RequestOptions, UploadFile};
pub use error::ApiError;
pub use filters::RequestFilters;
pub use transport::{ReqwestTransport, Transport};
