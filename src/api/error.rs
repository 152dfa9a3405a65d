use crate::api::transport::TransportError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Server returned non-JSON response. Status: {status}")]
    NonJson { status: u16 },

    /// Non-2xx status, `message` is the server's `error` field when it sent one
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{message}")]
    Upload { status: u16, message: String },

    #[error("unable to decode response: {0}")]
    Decode(String),

    #[error("unable to encode request: {0}")]
    Encode(String),

    #[error("invalid endpoint {endpoint}: {error}")]
    InvalidEndpoint { endpoint: String, error: String },

    #[error("unable to read upload file: {0}")]
    Io(String),
}

impl ApiError {
    /// HTTP status of the response that caused the error, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NonJson { status } | Self::Server { status, .. } | Self::Upload { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
